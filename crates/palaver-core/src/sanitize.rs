//! Text sanitization for storage.
//!
//! Runs after filtering and statistics, immediately before persistence,
//! so stored text is tidy while the reported statistics still describe
//! what the client sent.

/// C0 control characters (minus tab, LF, CR, which count as whitespace)
/// and DEL are dropped from sanitized output.
fn is_stripped_control(c: char) -> bool {
    matches!(
        c,
        '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{7F}'
    )
}

/// Trim the text, collapse every whitespace run to a single space, and
/// strip control characters. Printable Unicode passes through untouched.
pub fn sanitize_text(text: &str) -> String {
    let trimmed = text.trim();
    let mut out = String::with_capacity(trimmed.len());
    let mut in_whitespace = false;

    for c in trimmed.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push(' ');
            }
            in_whitespace = true;
        } else if is_stripped_control(c) {
            // A stripped control still terminates the whitespace run it
            // interrupts; only the control itself disappears.
            in_whitespace = false;
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_collapses_spaces() {
        assert_eq!(sanitize_text("  hello    world  "), "hello world");
    }

    #[test]
    fn test_newlines_and_tabs_fold_to_space() {
        assert_eq!(sanitize_text("one\ntwo\t\tthree\r\nfour"), "one two three four");
    }

    #[test]
    fn test_strips_control_characters() {
        assert_eq!(sanitize_text("ab\u{00}cd\u{07}ef"), "abcdef");
        assert_eq!(sanitize_text("del\u{7F}eted"), "deleted");
    }

    #[test]
    fn test_control_between_spaces_leaves_two_spaces() {
        // The control character interrupts the whitespace run, so the runs
        // on either side each collapse to one space.
        assert_eq!(sanitize_text("a \u{00} b"), "a  b");
    }

    #[test]
    fn test_preserves_unicode_text() {
        assert_eq!(sanitize_text("héllo — wörld 🎉"), "héllo — wörld 🎉");
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        assert_eq!(sanitize_text(""), "");
        assert_eq!(sanitize_text("   \n\t  "), "");
    }

    #[test]
    fn test_idempotent() {
        let once = sanitize_text("  a\u{00}b   c\nd  ");
        assert_eq!(sanitize_text(&once), once);
    }
}
