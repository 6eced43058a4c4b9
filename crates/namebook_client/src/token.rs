//! Anti-forgery token providers injected into the client driver.

use once_cell::sync::Lazy;
use regex::Regex;

static CSRF_META_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<meta\s+name="csrf-token"\s+content="([^"]*)"\s*/?>"#)
        .expect("valid csrf meta regex")
});

/// Source of the per-session token sent with mutating requests.
pub trait TokenProvider: Send + Sync {
    /// `None` when no token is available; creates then fail locally.
    fn csrf_token(&self) -> Option<String>;
}

/// Fixed token, or none at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl TokenProvider for StaticTokenProvider {
    fn csrf_token(&self) -> Option<String> {
        self.token.clone()
    }
}

/// Reads the token from the `csrf-token` meta tag of a served shell page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaTagTokenProvider {
    token: Option<String>,
}

impl MetaTagTokenProvider {
    pub fn from_html(html: &str) -> Self {
        let token = CSRF_META_RE
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|token| !token.is_empty());
        Self { token }
    }
}

impl TokenProvider for MetaTagTokenProvider {
    fn csrf_token(&self) -> Option<String> {
        self.token.clone()
    }
}
