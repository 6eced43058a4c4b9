//! Plain-text rendering of the client view.

use std::fmt::Write;

use namebook_core::NameRecord;

use crate::state::ClientState;

pub const EMPTY_LIST_MESSAGE: &str = "No names added yet.";

const HEADERS: [&str; 3] = ["First Name", "Last Name", "Date Added"];

/// Renders banner, form and table.
pub fn render_view(state: &ClientState) -> String {
    let mut out = String::new();

    if let Some(banner) = state.error() {
        let _ = writeln!(out, "[Error] {}  (dismiss to close)", banner.message);
        out.push('\n');
    }

    let draft = state.draft();
    let _ = writeln!(out, "Name Entry");
    let _ = writeln!(out, "Enter a new name below");
    let _ = writeln!(
        out,
        "  First Name: {}",
        placeholder(&draft.first_name, "Enter first name")
    );
    let _ = writeln!(
        out,
        "  Last Name:  {}",
        placeholder(&draft.last_name, "Enter last name")
    );
    let _ = writeln!(out, "  [ {} ]", state.submit_label());
    out.push('\n');

    let _ = writeln!(out, "Names List");
    let _ = writeln!(out, "All registered names");
    out.push_str(&render_table(state.names()));
    out
}

/// Renders the names table, or the empty-list message.
pub fn render_table(names: &[NameRecord]) -> String {
    if names.is_empty() {
        return format!("{EMPTY_LIST_MESSAGE}\n");
    }

    let rows: Vec<[String; 3]> = names
        .iter()
        .map(|record| {
            [
                record.first_name.clone(),
                record.last_name.clone(),
                record.created_at.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|header| header.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 3], widths: &[usize; 3]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}

fn placeholder<'a>(value: &'a str, hint: &'a str) -> &'a str {
    if value.is_empty() {
        hint
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::{render_table, render_view, EMPTY_LIST_MESSAGE};
    use crate::state::{ClientEvent, ClientState, DraftField};
    use chrono::{TimeZone, Utc};
    use namebook_core::NameRecord;

    #[test]
    fn empty_state_shows_placeholder_text() {
        let view = render_view(&ClientState::new());
        assert!(view.contains(EMPTY_LIST_MESSAGE));
        assert!(view.contains("Enter first name"));
        assert!(view.contains("[ Submit ]"));
        assert!(!view.contains("[Error]"));
    }

    #[test]
    fn table_aligns_columns_and_formats_date() {
        let stamp = Utc.with_ymd_and_hms(2026, 2, 13, 10, 0, 0).unwrap();
        let names = vec![NameRecord {
            id: 1,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            created_at: stamp,
            updated_at: stamp,
        }];

        let table = render_table(&names);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines[0], "First Name | Last Name | Date Added");
        assert_eq!(lines[2], "Ada        | Lovelace  | 2026-02-13");
    }

    #[test]
    fn banner_and_busy_label_are_rendered() {
        let state = ClientState::new()
            .apply(ClientEvent::FieldChanged(DraftField::FirstName, "Ada".into()))
            .state
            .apply(ClientEvent::SubmitRequested)
            .state;
        let view = render_view(&state);
        assert!(view.contains("[Error] Both first name and last name are required"));
        assert!(view.contains("First Name: Ada"));
    }
}
