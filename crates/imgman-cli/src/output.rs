//! Output renderers and formatting helpers for CLI commands.

use std::borrow::Cow;

use anyhow::anyhow;
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

use crate::client::{CliError, CliResult};

const POLICY_HEADERS: [&str; 3] = ["Policy name", "Date Created", "User"];
const POLICY_WIDTHS: [usize; 3] = [30, 25, 25];

/// Pretty JSON with two-space indentation.
pub(crate) fn render_json(value: &Value) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

/// Bordered policy table built from a list response's `items`.
///
/// A response without an `items` array renders as an empty table.
pub(crate) fn render_policy_table(list: &Value) -> String {
    let rows: Vec<[String; 3]> = list
        .get("items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    [
                        cell_text(item.get("id")),
                        cell_text(item.get("dateCreated")),
                        cell_text(item.get("user")),
                    ]
                })
                .collect()
        })
        .unwrap_or_default();

    let header = POLICY_HEADERS.map(str::to_string);
    let mut lines = vec![border('-')];
    lines.extend(draw_row(&header));
    lines.push(border('='));
    for (index, row) in rows.iter().enumerate() {
        lines.extend(draw_row(row));
        if index + 1 < rows.len() {
            lines.push(border('-'));
        }
    }
    lines.push(border('-'));
    lines.join("\n")
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn border(fill: char) -> String {
    let mut line = String::from("+");
    for width in POLICY_WIDTHS {
        line.extend(std::iter::repeat_n(fill, width + 2));
        line.push('+');
    }
    line
}

fn draw_row(cells: &[String; 3]) -> Vec<String> {
    let wrapped: Vec<Vec<String>> = cells
        .iter()
        .zip(POLICY_WIDTHS)
        .map(|(cell, width)| {
            textwrap::wrap(cell, width)
                .into_iter()
                .map(Cow::into_owned)
                .collect()
        })
        .collect();
    let height = wrapped.iter().map(Vec::len).max().unwrap_or(1);

    (0..height)
        .map(|line_index| {
            let mut line = String::from("|");
            for (lines, width) in wrapped.iter().zip(POLICY_WIDTHS) {
                let top = (height - lines.len()) / 2;
                let text = line_index
                    .checked_sub(top)
                    .and_then(|offset| lines.get(offset))
                    .map_or("", String::as_str);
                line.push(' ');
                line.push_str(&center(text, width));
                line.push_str(" |");
            }
            line
        })
        .collect()
}

/// Centre `text` in `width` display columns; odd padding goes to the right.
fn center(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    let left = fill / 2;
    format!("{}{text}{}", " ".repeat(left), " ".repeat(fill - left))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn table_has_header_and_one_row_per_item() {
        let table = render_policy_table(&json!({
            "items": [
                {"id": "p1", "dateCreated": "2021-01-01", "user": "u1"},
                {"id": "p2", "dateCreated": "2021-02-02", "user": "u2"}
            ]
        }));
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], border('-'));
        assert_eq!(
            lines[1],
            "|          Policy name           |       Date Created        |           User            |"
        );
        assert_eq!(lines[2], border('='));
        assert_eq!(
            lines[3],
            "|               p1               |        2021-01-01         |            u1             |"
        );
        assert_eq!(lines[4], border('-'));
        assert!(lines[5].contains("p2"));
        assert_eq!(lines[6], border('-'));
    }

    #[test]
    fn empty_list_renders_header_only() {
        let table = render_policy_table(&json!({"items": []}));
        assert_eq!(table.lines().count(), 4);
        assert!(table.contains("Policy name"));
        assert_eq!(render_policy_table(&json!({})), table);
    }

    #[test]
    fn long_cells_wrap_inside_their_column() {
        let long_user = "someone.with.a.very.long.address@example.com";
        let table = render_policy_table(&json!({
            "items": [{"id": "p1", "dateCreated": "2021-01-01", "user": long_user}]
        }));
        let width = border('-').width();
        assert!(table.lines().all(|line| line.width() == width));
        assert!(table.lines().count() > 5);
    }

    #[test]
    fn wide_characters_stay_inside_their_column() {
        let user = "山田太郎".repeat(5);
        let table = render_policy_table(&json!({
            "items": [{"id": "p1", "dateCreated": "2021-01-01", "user": user}]
        }));
        let width = border('-').width();
        assert_eq!(width, 90);
        for line in table.lines() {
            assert_eq!(line.width(), width, "misaligned line: {line}");
        }
        assert!(table.lines().count() > 5);
    }

    #[test]
    fn cells_wrap_on_words_then_break_long_words() {
        let table = render_policy_table(&json!({
            "items": [{
                "id": "alpha beta gamma delta epsilon zeta",
                "dateCreated": "2021-01-01",
                "user": "x".repeat(40)
            }]
        }));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 6, "the row spans two lines");
        assert!(lines[3].contains(&"x".repeat(25)));
        assert!(lines[4].contains(&"x".repeat(15)));
        assert!(!lines[4].contains(&"x".repeat(16)));
        assert!(table.contains("alpha"));
        assert!(table.contains("zeta"));
    }

    #[test]
    fn json_is_indented_two_spaces() {
        let text = render_json(&json!({"a": 1})).expect("serialisable");
        assert_eq!(text, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn json_keeps_document_key_order() {
        let policy: Value =
            serde_json::from_str(r#"{"zoom": 1, "alpha": 2}"#).expect("valid JSON");
        let text = render_json(&policy).expect("serialisable");
        assert_eq!(text, "{\n  \"zoom\": 1,\n  \"alpha\": 2\n}");
    }
}
