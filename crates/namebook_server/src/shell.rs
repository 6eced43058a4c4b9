//! HTML shell that boots the browser client.

const SHELL_TEMPLATE: &str = include_str!("../assets/index.html");
const TOKEN_PLACEHOLDER: &str = "{{ csrf_token }}";

/// Renders the shell with the session's anti-forgery token in
/// `<meta name="csrf-token">`.
///
/// Tokens are hex strings minted by `CsrfTokens`, so no escaping is applied.
pub fn render_shell(csrf_token: &str) -> String {
    SHELL_TEMPLATE.replace(TOKEN_PLACEHOLDER, csrf_token)
}

#[cfg(test)]
mod tests {
    use super::render_shell;

    #[test]
    fn shell_embeds_token_and_mount_point() {
        let html = render_shell("abc123");
        assert!(html.contains(r#"<meta name="csrf-token" content="abc123">"#));
        assert!(html.contains(r#"<div id="app">"#));
        assert!(html.contains(r#"src="/assets/app.js""#));
        assert!(!html.contains("{{"));
    }
}
