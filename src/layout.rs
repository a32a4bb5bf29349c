//! Detection of the presentation details a round trip must preserve:
//! byte order mark, newline convention, and trailing-newline presence.

/// The BOM as it appears in decoded text.
pub const BOM: char = '\u{feff}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Newline {
    Lf,
    CrLf,
    Cr,
}

impl Newline {
    pub fn as_str(self) -> &'static str {
        match self {
            Newline::Lf => "\n",
            Newline::CrLf => "\r\n",
            Newline::Cr => "\r",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLayout {
    pub has_bom: bool,
    pub newline: Newline,
    pub trailing_newline: bool,
}

impl TextLayout {
    /// Re-applies the layout details that live outside the row data.
    pub fn finish(&self, body: String) -> String {
        if self.has_bom {
            let mut output = String::with_capacity(body.len() + BOM.len_utf8());
            output.push(BOM);
            output.push_str(&body);
            output
        } else {
            body
        }
    }
}

/// Splits content into its layout and the BOM-free body.
///
/// The newline convention is whichever terminator occurs first; files with
/// no terminator at all default to LF. Inconsistent styles within one file
/// are normalized to the first-detected style on output.
pub fn detect(content: &str) -> (TextLayout, &str) {
    let (has_bom, body) = match content.strip_prefix(BOM) {
        Some(rest) => (true, rest),
        None => (false, content),
    };
    let newline = first_newline(body).unwrap_or(Newline::Lf);
    let trailing_newline = body.ends_with(['\r', '\n']);
    (
        TextLayout {
            has_bom,
            newline,
            trailing_newline,
        },
        body,
    )
}

fn first_newline(body: &str) -> Option<Newline> {
    let idx = body.find(['\r', '\n'])?;
    let rest = &body[idx..];
    if rest.starts_with("\r\n") {
        Some(Newline::CrLf)
    } else if rest.starts_with('\r') {
        Some(Newline::Cr)
    } else {
        Some(Newline::Lf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_bom_and_strips_it_from_the_body() {
        let (layout, body) = detect("\u{feff}a,b\n");
        assert!(layout.has_bom);
        assert_eq!(body, "a,b\n");
    }

    #[test]
    fn first_terminator_wins_for_mixed_styles() {
        let (layout, _) = detect("a,b\r\nc,d\n");
        assert_eq!(layout.newline, Newline::CrLf);
        let (layout, _) = detect("a,b\nc,d\r\n");
        assert_eq!(layout.newline, Newline::Lf);
        let (layout, _) = detect("a,b\rc,d");
        assert_eq!(layout.newline, Newline::Cr);
    }

    #[test]
    fn terminator_free_content_defaults_to_lf_without_trailing() {
        let (layout, _) = detect("a,b");
        assert_eq!(layout.newline, Newline::Lf);
        assert!(!layout.trailing_newline);
        assert!(!layout.has_bom);
    }

    #[test]
    fn trailing_newline_flag_tracks_the_body() {
        assert!(detect("a\n").0.trailing_newline);
        assert!(detect("a\r").0.trailing_newline);
        assert!(!detect("a").0.trailing_newline);
    }

    #[test]
    fn finish_restores_the_bom() {
        let (layout, body) = detect("\u{feff}a,b");
        assert_eq!(layout.finish(body.to_string()), "\u{feff}a,b");
        let (layout, body) = detect("a,b");
        assert_eq!(layout.finish(body.to_string()), "a,b");
    }
}
