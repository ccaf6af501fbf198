//! Quoting of free text for use as an action argument.
//!
//! Text is left alone unless it contains a metacharacter, in which case it is
//! enclosed in double quotes with embedded quotes (and optionally backslashes)
//! escaped. CR, LF, BS, FF and TAB are then rewritten to their two-character
//! escapes, which also forces enclosure. Any other control character is
//! rejected.

use crate::error::{Error, Result};

/// Characters that force a string to be enclosed in double quotes.
const META_CHARS: &[char] = &[' ', ',', '"', '(', ')', '\\'];

/// Control characters with a protocol escape, and their escapes.
const ESCAPES: &[(char, &str)] = &[
    ('\r', "\\r"),
    ('\n', "\\n"),
    ('\u{8}', "\\b"),
    ('\u{c}', "\\f"),
    ('\t', "\\t"),
];

/// Quote `text` so it can be passed as a single action argument.
///
/// With `quote_backslashes` false, backslashes are passed through so the
/// emulator interprets them as its own escapes (e.g. `\n` as a newline).
pub fn quote(text: &str, quote_backslashes: bool) -> Result<String> {
    let enclosed = text.contains(META_CHARS);
    let mut quoted = if enclosed {
        let mut out = String::with_capacity(2 + 2 * text.len());
        out.push('"');
        for c in text.chars() {
            if c == '"' || (c == '\\' && quote_backslashes) {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('"');
        out
    } else {
        text.to_string()
    };

    if quoted.contains(|c: char| ESCAPES.iter().any(|(e, _)| *e == c)) {
        let mut out = String::with_capacity(quoted.len() + 8);
        for c in quoted.chars() {
            match ESCAPES.iter().find(|(e, _)| *e == c) {
                Some((_, escape)) => out.push_str(escape),
                None => out.push(c),
            }
        }
        quoted = if enclosed { out } else { format!("\"{out}\"") };
    }

    if quoted.chars().any(char::is_control) {
        return Err(Error::InvalidCharacter {
            text: text.to_string(),
        });
    }

    Ok(quoted)
}

/// True if `text` would be passed through [`quote`] unchanged.
pub fn is_bare(text: &str) -> bool {
    !text.contains(META_CHARS) && !text.chars().any(char::is_control)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(quote("xxx", true).unwrap(), "xxx");
        assert_eq!(quote("", true).unwrap(), "");
        assert!(is_bare("xxx"));
    }

    #[test]
    fn test_metachars_force_quotes() {
        assert_eq!(quote("hello there", true).unwrap(), "\"hello there\"");
        assert_eq!(quote("a,b", true).unwrap(), "\"a,b\"");
        assert_eq!(quote("a(b", true).unwrap(), "\"a(b\"");
        assert_eq!(quote("a)b", true).unwrap(), "\"a)b\"");
        assert!(!is_bare("a b"));
    }

    #[test]
    fn test_double_quote_escaped() {
        assert_eq!(quote("a\"b", true).unwrap(), "\"a\\\"b\"");
        assert_eq!(quote("a\"b", false).unwrap(), "\"a\\\"b\"");
    }

    #[test]
    fn test_backslash_escaping_is_optional() {
        assert_eq!(quote(r"a\nb", true).unwrap(), "\"a\\\\nb\"");
        assert_eq!(quote(r"a\nb", false).unwrap(), "\"a\\nb\"");
    }

    #[test]
    fn test_whole_string_scanned() {
        let s = quote("My, my (oh!) \"foo\"\\n", true).unwrap();
        assert_eq!(s, "\"My, my (oh!) \\\"foo\\\"\\\\n\"");
    }

    #[test]
    fn test_printable_ascii_untouched() {
        let ascii7: String = (33u8..127)
            .map(char::from)
            .filter(|c| !"\" ,()\\".contains(*c))
            .collect();
        assert_eq!(quote(&ascii7, true).unwrap(), ascii7);
    }

    #[test]
    fn test_known_controls_expanded_and_enclosed() {
        let s = quote("hello\r\n\u{c}\t\u{8}", true).unwrap();
        assert_eq!(s, "\"hello\\r\\n\\f\\t\\b\"");
    }

    #[test]
    fn test_known_controls_in_quoted_text_not_double_enclosed() {
        let s = quote("a b\n", true).unwrap();
        assert_eq!(s, "\"a b\\n\"");
    }

    #[test]
    fn test_lone_newline_gets_enclosed() {
        assert_eq!(quote("\n", true).unwrap(), "\"\\n\"");
    }

    #[test]
    fn test_other_controls_rejected() {
        assert!(matches!(
            quote("hello\u{7f}there", true),
            Err(Error::InvalidCharacter { .. })
        ));
        assert!(matches!(
            quote("bell\u{7}", false),
            Err(Error::InvalidCharacter { .. })
        ));
        assert!(matches!(
            quote("a b\u{1b}", true),
            Err(Error::InvalidCharacter { .. })
        ));
    }

    #[test]
    fn test_non_ascii_passes_through() {
        assert_eq!(quote("года", true).unwrap(), "года");
        assert_eq!(quote("六 cn", true).unwrap(), "\"六 cn\"");
    }
}
