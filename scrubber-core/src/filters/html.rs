//! Markup filters.
//!
//! License: MIT OR APACHE 2.0

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::{map_str, Filter};
use crate::errors::SanitizerError;

// Comments first so a `>` inside a comment does not end the match early. A `<`
// followed by whitespace is a literal character, not a tag opener.
static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->|<[^\s>][^>]*>").expect("tag pattern is valid"));

/// Escapes `&`, `<`, `>`, `"` and `'` as HTML entities.
#[derive(Debug, Default, Clone, Copy)]
pub struct EscapeHtml;

impl Filter for EscapeHtml {
    fn apply(&self, value: Value, _options: &[String]) -> Result<Value, SanitizerError> {
        Ok(map_str(value, escape_html))
    }
}

fn escape_html(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#039;"),
            _ => output.push(c),
        }
    }
    output
}

/// Removes markup tags and comments, keeping the text between them.
#[derive(Debug, Default, Clone, Copy)]
pub struct StripTags;

impl Filter for StripTags {
    fn apply(&self, value: Value, _options: &[String]) -> Result<Value, SanitizerError> {
        Ok(map_str(value, |s| TAG_PATTERN.replace_all(s, "").into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape_html() {
        let result = EscapeHtml
            .apply(json!("<script>alert('x') & \"y\"</script>"), &[])
            .unwrap();
        assert_eq!(
            result,
            json!("&lt;script&gt;alert(&#039;x&#039;) &amp; &quot;y&quot;&lt;/script&gt;")
        );
    }

    #[test]
    fn test_escape_non_string_passthrough() {
        assert_eq!(EscapeHtml.apply(json!(3), &[]).unwrap(), json!(3));
    }

    #[test]
    fn test_strip_tags() {
        let result = StripTags
            .apply(json!("<p>Hello <b>World</b><!-- a > b --></p>"), &[])
            .unwrap();
        assert_eq!(result, json!("Hello World"));
    }

    #[test]
    fn test_strip_tags_plain_text_unchanged() {
        assert_eq!(StripTags.apply(json!("1 < 2"), &[]).unwrap(), json!("1 < 2"));
    }

    #[test]
    fn test_strip_tags_keeps_spaced_angle_brackets() {
        assert_eq!(StripTags.apply(json!("a < b > c"), &[]).unwrap(), json!("a < b > c"));
        assert_eq!(StripTags.apply(json!("a < b <i>c</i>"), &[]).unwrap(), json!("a < b c"));
    }
}
