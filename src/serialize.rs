//! Inverse of the tokenizer: rebuilds CSV text from rows.

/// Serializes rows back into CSV text.
///
/// A field is quoted iff it contains a comma, a quote, or a line
/// terminator; internal quotes are doubled. Rows are joined with the
/// supplied newline verbatim, so mixed-terminator inputs come out
/// normalized to one style. One trailing newline is appended iff
/// `trailing_newline` is set.
pub fn serialize_rows(rows: &[Vec<String>], newline: &str, trailing_newline: bool) -> String {
    let mut output = String::new();
    for (row_idx, row) in rows.iter().enumerate() {
        if row_idx > 0 {
            output.push_str(newline);
        }
        for (field_idx, field) in row.iter().enumerate() {
            if field_idx > 0 {
                output.push(',');
            }
            push_field(&mut output, field);
        }
    }
    if trailing_newline {
        output.push_str(newline);
    }
    output
}

fn push_field(output: &mut String, field: &str) {
    if !field.contains(['"', ',', '\r', '\n']) {
        output.push_str(field);
        return;
    }
    output.push('"');
    for ch in field.chars() {
        if ch == '"' {
            output.push('"');
        }
        output.push(ch);
    }
    output.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::parse_rows;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn plain_fields_pass_through_unquoted() {
        let out = serialize_rows(&rows(&[&["a", "b"], &["c", "d"]]), "\n", true);
        assert_eq!(out, "a,b\nc,d\n");
    }

    #[test]
    fn fields_needing_quotes_are_wrapped_and_doubled() {
        let out = serialize_rows(&rows(&[&["a,b", "say \"hi\"", "x\ny"]]), "\r\n", false);
        assert_eq!(out, "\"a,b\",\"say \"\"hi\"\"\",\"x\ny\"");
    }

    #[test]
    fn empty_fields_serialize_to_nothing() {
        let out = serialize_rows(&rows(&[&["", "", ""]]), "\n", false);
        assert_eq!(out, ",,");
    }

    #[test]
    fn quoting_round_trips_through_the_tokenizer() {
        let original = rows(&[&["a,b", "say \"hi\"", "line1\nline2", "plain"]]);
        let text = serialize_rows(&original, "\r\n", true);
        assert_eq!(parse_rows(&text), original);
    }

    #[test]
    fn quote_free_table_round_trips_byte_for_byte() {
        let table = rows(&[&["id", "name"], &["1", "Alice"], &["2", "Bob"]]);
        let once = serialize_rows(&table, "\n", true);
        let twice = serialize_rows(&parse_rows(&once), "\n", true);
        assert_eq!(once, twice);
    }
}
