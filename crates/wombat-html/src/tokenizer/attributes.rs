//! Attribute list parsing.
//!
//! Operates on the text of a start tag after the tag name, e.g. for
//! `<a href="/x" hidden>` the input is `href="/x" hidden`.

use wombat_dom::AttributesMap;

use super::character_reference::decode_character_references;

/// Where we are inside the attribute list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeState {
    /// Between attributes.
    Spaces,
    /// Inside an attribute name.
    Key,
    /// Whitespace after a name; a following `=` still belongs to it.
    AfterKey,
    /// After `=`, inside an unquoted value (or before the value starts).
    Value,
    /// Inside a quoted value; the payload is the quote that opened it.
    Quoted(char),
}

/// Parse an attribute list into a map with lowercased keys.
///
/// - `key` and `key=` yield an empty value
/// - values may be unquoted, `"double"` or `'single'` quoted; the other quote
///   character is literal inside a quoted value
/// - an unterminated quote runs to the end of the input
/// - later duplicates overwrite earlier ones
#[must_use]
pub fn parse_attributes(source: &str) -> AttributesMap {
    let mut attributes = AttributesMap::new();
    let mut state = AttributeState::Spaces;
    let mut key = String::new();
    let mut buffer = String::new();

    for c in source.chars() {
        match state {
            AttributeState::Spaces => {
                if !c.is_whitespace() {
                    buffer.push(c);
                    state = AttributeState::Key;
                }
            }
            AttributeState::Key => {
                if c.is_whitespace() {
                    state = AttributeState::AfterKey;
                } else if c == '=' {
                    key = std::mem::take(&mut buffer);
                    state = AttributeState::Value;
                } else {
                    buffer.push(c);
                }
            }
            AttributeState::AfterKey => {
                if c == '=' {
                    key = std::mem::take(&mut buffer);
                    state = AttributeState::Value;
                } else if !c.is_whitespace() {
                    commit(&mut attributes, &std::mem::take(&mut buffer), "");
                    buffer.push(c);
                    state = AttributeState::Key;
                }
            }
            AttributeState::Value => {
                if buffer.is_empty() && (c == '"' || c == '\'') {
                    state = AttributeState::Quoted(c);
                } else if c.is_whitespace() {
                    if !buffer.is_empty() {
                        commit(&mut attributes, &key, &std::mem::take(&mut buffer));
                        state = AttributeState::Spaces;
                    }
                } else {
                    buffer.push(c);
                }
            }
            AttributeState::Quoted(quote) => {
                if c == quote {
                    commit(&mut attributes, &key, &std::mem::take(&mut buffer));
                    state = AttributeState::Spaces;
                } else {
                    buffer.push(c);
                }
            }
        }
    }

    match state {
        AttributeState::Spaces => {}
        AttributeState::Key | AttributeState::AfterKey => commit(&mut attributes, &buffer, ""),
        AttributeState::Value | AttributeState::Quoted(_) => {
            commit(&mut attributes, &key, &buffer);
        }
    }
    attributes
}

fn commit(attributes: &mut AttributesMap, key: &str, value: &str) {
    if key.is_empty() {
        return;
    }
    let _ = attributes.insert(key.to_lowercase(), decode_character_references(value));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr<'a>(attrs: &'a AttributesMap, key: &str) -> Option<&'a str> {
        attrs.get(key).map(String::as_str)
    }

    #[test]
    fn test_unquoted_and_bare() {
        let attrs = parse_attributes("src=a.png hidden alt=x");
        assert_eq!(attr(&attrs, "src"), Some("a.png"));
        assert_eq!(attr(&attrs, "hidden"), Some(""));
        assert_eq!(attr(&attrs, "alt"), Some("x"));
    }

    #[test]
    fn test_other_quote_is_literal() {
        let attrs = parse_attributes("href='x\"y'");
        assert_eq!(attr(&attrs, "href"), Some("x\"y"));
        let attrs = parse_attributes("title=\"it's\"");
        assert_eq!(attr(&attrs, "title"), Some("it's"));
    }

    #[test]
    fn test_quoted_value_keeps_spaces() {
        let attrs = parse_attributes("class=\"links  main\"");
        assert_eq!(attr(&attrs, "class"), Some("links  main"));
    }

    #[test]
    fn test_spaces_around_equals() {
        let attrs = parse_attributes("id = \"top\" lang");
        assert_eq!(attr(&attrs, "id"), Some("top"));
        assert_eq!(attr(&attrs, "lang"), Some(""));
    }

    #[test]
    fn test_keys_lowercased_values_not() {
        let attrs = parse_attributes("HREF=Page.HTML");
        assert_eq!(attr(&attrs, "href"), Some("Page.HTML"));
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        let attrs = parse_attributes("alt=\"never closed");
        assert_eq!(attr(&attrs, "alt"), Some("never closed"));
    }

    #[test]
    fn test_empty_value_after_equals() {
        let attrs = parse_attributes("value=");
        assert_eq!(attr(&attrs, "value"), Some(""));
    }
}
