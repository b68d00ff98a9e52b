//! Text helpers for node content and computed style values

use std::sync::LazyLock;

use regex::Regex;

static LEADING_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("leading integer pattern is valid"));

/// Visible text of a markup fragment
///
/// Tags are stripped, entities decoded, and tabs, newlines and carriage
/// returns removed before trimming. A `<` that does not open a well-formed
/// tag is kept as text.
pub fn inner_text(markup: &str) -> String {
    let stripped = MarkupScanner::new(markup).strip();
    let decoded = html_escape::decode_html_entities(&stripped);
    decoded
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Leading integer of a CSS value such as `"12px"` or `" -4.5em"`
///
/// Mirrors `parseInt(value, 10)`: fractional parts and units are ignored,
/// anything without leading digits yields `None`. Values beyond the `i64`
/// range keep their magnitude.
pub fn parse_leading_int(value: &str) -> Option<f64> {
    LEADING_INT
        .captures(value)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(f64::trunc)
}

/// Removes tags from markup, leaving text and entities untouched
struct MarkupScanner<'a> {
    input: &'a str,
    pos: usize,
    output: String,
}

impl<'a> MarkupScanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            output: String::with_capacity(input.len()),
        }
    }

    fn strip(mut self) -> String {
        while self.pos < self.input.len() {
            if self.peek() == Some('<') && self.skip_tag() {
                continue;
            }
            if let Some(ch) = self.next_char() {
                self.output.push(ch);
            }
        }
        self.output
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.input[self.pos..].chars().next()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Consume a tag at the cursor; rewinds and returns `false` if there is none
    fn skip_tag(&mut self) -> bool {
        let start = self.pos;
        self.next_char();

        let is_closing = self.peek() == Some('/');
        if is_closing {
            self.next_char();
        }

        // Tag names start with a letter
        if !self.peek().is_some_and(|ch| ch.is_ascii_alphabetic()) || !self.skip_name() {
            self.pos = start;
            return false;
        }
        self.skip_whitespace();

        if !is_closing {
            while self.skip_attribute() {
                self.skip_whitespace();
            }
        }

        if self.peek() == Some('/') {
            self.next_char();
        }

        if self.peek() != Some('>') {
            self.pos = start;
            return false;
        }
        self.next_char();
        true
    }

    fn skip_name(&mut self) -> bool {
        let name_start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '-' || ch == '_' || ch == ':' {
                self.next_char();
            } else {
                break;
            }
        }
        self.pos > name_start
    }

    /// Attribute with a quoted, unquoted or absent value
    fn skip_attribute(&mut self) -> bool {
        let start = self.pos;
        if !self.skip_name() {
            return false;
        }

        self.skip_whitespace();
        if self.peek() != Some('=') {
            return true;
        }
        self.next_char();
        self.skip_whitespace();

        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.next_char();
                while let Some(ch) = self.next_char() {
                    if ch == quote {
                        return true;
                    }
                }
                // Unterminated quote
                self.pos = start;
                false
            }
            Some(_) => {
                let value_start = self.pos;
                while let Some(ch) = self.peek() {
                    if ch.is_whitespace() || ch == '>' {
                        break;
                    }
                    self.next_char();
                }
                if self.pos == value_start {
                    self.pos = start;
                    return false;
                }
                true
            }
            None => {
                self.pos = start;
                false
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_text_strips_markup() {
        assert_eq!(inner_text("<span class=\"cf-label\">Red</span>"), "Red");
        assert_eq!(inner_text("  plain  "), "plain");
        assert_eq!(inner_text(""), "");
        assert_eq!(inner_text("<br/>Line<hr />"), "Line");
        assert_eq!(inner_text("<input disabled value=on>Tick</input>"), "Tick");
    }

    #[test]
    fn test_inner_text_decodes_entities_and_drops_control_whitespace() {
        assert_eq!(inner_text("Salt &amp; Pepper"), "Salt & Pepper");
        assert_eq!(inner_text("<b>Red</b>\n\t<i>dish</i>\r"), "Reddish");
        assert_eq!(inner_text("<p\nclass=\"x\">multi-line tag</p>"), "multi-line tag");
    }

    #[test]
    fn test_inner_text_keeps_literal_angle_brackets() {
        assert_eq!(inner_text("<span>1 < 2 and 3 > 2</span>"), "1 < 2 and 3 > 2");
        assert_eq!(inner_text("a<b"), "a<b");
        assert_eq!(inner_text("<3 you"), "<3 you");
        assert_eq!(inner_text("<3 you>"), "<3 you>");
        assert_eq!(inner_text("&lt;span&gt;"), "<span>");
    }

    #[test]
    fn test_inner_text_quoted_attribute_may_contain_gt() {
        assert_eq!(inner_text("<span title=\"a>b\">Red</span>"), "Red");
        assert_eq!(inner_text("<span title='x > y' data-k=\"<\">Blue</span>"), "Blue");
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("12px"), Some(12.0));
        assert_eq!(parse_leading_int(" -4.5em"), Some(-4.0));
        assert_eq!(parse_leading_int("+3"), Some(3.0));
        assert_eq!(parse_leading_int("0"), Some(0.0));
        assert_eq!(parse_leading_int("auto"), None);
        assert_eq!(parse_leading_int(""), None);
    }

    #[test]
    fn test_parse_leading_int_beyond_i64() {
        assert_eq!(parse_leading_int("99999999999999999999px"), Some(1e20));
        assert_eq!(parse_leading_int("-99999999999999999999"), Some(-1e20));
    }
}
