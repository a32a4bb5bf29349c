//! CSV tokenizer preserving the structural quirks of survey exports.
//!
//! Unlike a general CSV reader this scanner keeps ragged rows as-is and
//! accepts CR-only, LF-only, and CRLF terminators in one file, so that the
//! serializer can rebuild output matching the detected input convention.

/// Parses raw CSV text into rows of fields.
///
/// Quoting follows the doubled-quote convention: a `"` outside quotes opens
/// quoted mode, `""` inside quotes yields one literal quote, and a lone `"`
/// inside quotes closes the field. Quoted fields may embed commas and line
/// terminators. A `\r` immediately followed by `\n` counts as one
/// terminator. An unterminated quoted field is implicitly closed at end of
/// input.
///
/// Always returns at least one row; empty input yields a single row holding
/// one empty field. A trailing terminator does not produce an extra empty
/// row.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut inside_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if inside_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    inside_quotes = false;
                }
            } else {
                field.push(ch);
            }
            continue;
        }

        match ch {
            '"' => inside_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' | '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            other => field.push(other),
        }
    }

    row.push(field);
    rows.push(row);

    // A file ending in a terminator leaves one synthetic empty row behind.
    if rows.len() > 1
        && text.ends_with(['\r', '\n'])
        && rows.last().is_some_and(|last| last.len() == 1 && last[0].is_empty())
    {
        rows.pop();
    }

    rows
}
