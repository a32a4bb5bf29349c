use std::borrow::Cow;
use std::fmt::Write as _;

use crate::rules::RuleBook;

const HEADERS: [&str; 5] = ["#", "on", "search", "replace", "id"];

/// Renders the rule list as an elastic text table, in application order.
pub fn render_rules(book: &RuleBook) -> String {
    let rows: Vec<[String; 5]> = book
        .rules()
        .iter()
        .map(|rule| {
            [
                rule.order.to_string(),
                (if rule.is_enabled { "yes" } else { "no" }).to_string(),
                sanitize_cell(&rule.search_text).into_owned(),
                sanitize_cell(&rule.replace_text).into_owned(),
                rule.id.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let mut output = String::new();
    write_row(&mut output, &HEADERS.map(str::to_string), &widths);
    let separators = widths.map(|w| "-".repeat(w.max(3)));
    write_row(&mut output, &separators, &widths.map(|w| w.max(3)));
    for row in &rows {
        write_row(&mut output, row, &widths);
    }
    output
}

pub fn print_rules(book: &RuleBook) {
    print!("{}", render_rules(book));
}

fn write_row(output: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let mut line = String::new();
    for (idx, cell) in cells.iter().enumerate() {
        if idx > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        let padding = widths[idx].saturating_sub(cell.chars().count());
        if idx < cells.len() - 1 && padding > 0 {
            line.push_str(&" ".repeat(padding));
        }
    }
    while line.ends_with(' ') {
        line.pop();
    }
    let _ = writeln!(output, "{line}");
}

// Rule texts may legitimately hold newlines and tabs; flatten them so one
// rule stays on one display line.
fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(
            value
                .chars()
                .map(|ch| match ch {
                    '\n' | '\r' | '\t' => ' ',
                    other => other,
                })
                .collect(),
        )
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_rules_in_order_with_flattened_text() {
        let mut book = RuleBook::default();
        book.add("foo\nbar", "baz").unwrap();
        book.add("x", "").unwrap();
        let rendered = render_rules(&book);
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].starts_with("#"));
        assert!(lines[2].contains("foo bar"));
        assert!(lines[2].contains("yes"));
        assert!(lines[3].starts_with("1"));
    }

    #[test]
    fn empty_book_renders_header_only() {
        let rendered = render_rules(&RuleBook::default());
        assert_eq!(rendered.lines().count(), 2);
    }
}
