use strum_macros::Display;

use super::attributes::parse_attributes;
use super::character_reference::decode_character_references;
use super::token::Token;

/// Mode of the tokenizer while scanning input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerMode {
    /// Character data between tags. `>` is an ordinary character here.
    Text,
    /// Inside `<...>`, collecting the tag text.
    Tag,
    /// Inside `<!-- ... -->`; everything is discarded.
    Comment,
    /// Inside a `<script>` element: everything up to the literal `</script>`
    /// is text, including `<`.
    RawText,
}

/// Opening of a comment, matched right after a `<`.
const COMMENT_OPEN: &str = "!--";

/// The only end tag that leaves raw-text mode, matched right after a `<`.
const SCRIPT_CLOSE: &str = "/script>";

/// Splits HTML source into [`Token`]s.
///
/// Total: every input, including unterminated tags and comments, is
/// consumed without error.
pub struct HTMLTokenizer {
    input: Vec<char>,
    position: usize,
    mode: TokenizerMode,
    /// Text or tag text collected since the last boundary.
    buffer: String,
    /// Position of the first character inside the current comment.
    comment_start: usize,
    tokens: Vec<Token>,
}

impl HTMLTokenizer {
    /// Create a tokenizer over `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            mode: TokenizerMode::Text,
            buffer: String::new(),
            comment_start: 0,
            tokens: Vec::new(),
        }
    }

    /// Current mode, mostly useful for debugging.
    #[must_use]
    pub const fn mode(&self) -> TokenizerMode {
        self.mode
    }

    /// Tokenize the whole input.
    pub fn run(&mut self) {
        while let Some(&c) = self.input.get(self.position) {
            match self.mode {
                TokenizerMode::Text => self.text_char(c),
                TokenizerMode::Tag => self.tag_char(c),
                TokenizerMode::Comment => self.comment_char(c),
                TokenizerMode::RawText => self.raw_text_char(c),
            }
            self.position += 1;
        }

        // An unterminated tag or comment is dropped; pending text is kept.
        if matches!(self.mode, TokenizerMode::Text | TokenizerMode::RawText) {
            self.flush_text();
        }
    }

    /// Consume the tokenizer and return the tokens it produced.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Convenience: tokenize `input` in one call.
    #[must_use]
    pub fn tokenize(input: &str) -> Vec<Token> {
        let mut tokenizer = Self::new(input);
        tokenizer.run();
        tokenizer.into_tokens()
    }

    fn text_char(&mut self, c: char) {
        if c != '<' {
            self.buffer.push(c);
            return;
        }
        self.flush_text();
        if self.lookahead(COMMENT_OPEN) {
            self.position += COMMENT_OPEN.len();
            self.comment_start = self.position + 1;
            self.mode = TokenizerMode::Comment;
        } else {
            self.mode = TokenizerMode::Tag;
        }
    }

    fn tag_char(&mut self, c: char) {
        if c == '>' {
            self.emit_tag();
        } else {
            self.buffer.push(c);
        }
    }

    /// A comment ends at `-->` whose dashes are not the ones of `<!--`, so
    /// `<!-->` and `<!--->` stay open.
    fn comment_char(&mut self, c: char) {
        if c == '>'
            && self.position >= self.comment_start + 2
            && self.input[self.position - 1] == '-'
            && self.input[self.position - 2] == '-'
        {
            self.mode = TokenizerMode::Text;
        }
    }

    fn raw_text_char(&mut self, c: char) {
        if c == '<' && self.lookahead(SCRIPT_CLOSE) {
            let script = std::mem::take(&mut self.buffer);
            if !script.is_empty() {
                self.tokens.push(Token::Text(script));
            }
            self.mode = TokenizerMode::Tag;
        } else {
            self.buffer.push(c);
        }
    }

    /// Whether the characters right after the current position spell `word`.
    fn lookahead(&self, word: &str) -> bool {
        let start = self.position + 1;
        word.chars()
            .enumerate()
            .all(|(i, expected)| self.input.get(start + i) == Some(&expected))
    }

    fn flush_text(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.buffer);
        self.tokens
            .push(Token::Text(decode_character_references(&text)));
    }

    fn emit_tag(&mut self) {
        let raw = std::mem::take(&mut self.buffer);
        self.mode = TokenizerMode::Text;

        let trimmed = strip_self_closing(raw.trim());
        if trimmed.is_empty() {
            return;
        }

        let (name, rest) = trimmed
            .split_once(char::is_whitespace)
            .unwrap_or((trimmed, ""));
        let name = name.to_lowercase();

        if name.starts_with('!') {
            self.tokens.push(Token::Declaration(trimmed.to_string()));
        } else if let Some(end_name) = name.strip_prefix('/') {
            self.tokens.push(Token::EndTag {
                name: end_name.to_string(),
            });
        } else {
            if name == "script" {
                self.mode = TokenizerMode::RawText;
            }
            self.tokens.push(Token::StartTag {
                name,
                attributes: parse_attributes(rest),
            });
        }
    }
}

/// `<br/>`, `<img src="x"/>` and `<img src=x />` name the same elements as
/// without the slash. A slash that ends an unquoted value is part of it.
fn strip_self_closing(tag: &str) -> &str {
    let Some(rest) = tag.strip_suffix('/') else {
        return tag;
    };
    if rest.is_empty() {
        return tag;
    }
    let ends_name = !rest.contains(char::is_whitespace);
    let ends_list = rest.ends_with(|c: char| c.is_whitespace() || c == '"' || c == '\'');
    if ends_name || ends_list {
        rest.trim_end()
    } else {
        tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_tags() {
        let tokens = HTMLTokenizer::tokenize("<p>Hi</p>");
        assert_eq!(
            tokens,
            vec![
                Token::start("p"),
                Token::Text("Hi".to_string()),
                Token::end("p")
            ]
        );
    }

    #[test]
    fn test_comment_is_dropped() {
        let tokens = HTMLTokenizer::tokenize("a<!-- <b> -->c");
        assert_eq!(
            tokens,
            vec![Token::Text("a".to_string()), Token::Text("c".to_string())]
        );
    }

    #[test]
    fn test_comment_dashes_do_not_overlap_opening() {
        let tokens = HTMLTokenizer::tokenize("<!-->x-->y");
        assert_eq!(tokens, vec![Token::Text("y".to_string())]);
        let tokens = HTMLTokenizer::tokenize("<!--->x-->y");
        assert_eq!(tokens, vec![Token::Text("y".to_string())]);
        let tokens = HTMLTokenizer::tokenize("<!---->y");
        assert_eq!(tokens, vec![Token::Text("y".to_string())]);
    }

    #[test]
    fn test_script_is_raw_text() {
        let tokens = HTMLTokenizer::tokenize("<script>if (a < b) x();</script>z");
        assert_eq!(
            tokens,
            vec![
                Token::start("script"),
                Token::Text("if (a < b) x();".to_string()),
                Token::end("script"),
                Token::Text("z".to_string()),
            ]
        );
    }

    #[test]
    fn test_uppercase_tag_names_lowercased() {
        let tokens = HTMLTokenizer::tokenize("<DIV></Div>");
        assert_eq!(tokens, vec![Token::start("div"), Token::end("div")]);
    }

    #[test]
    fn test_unterminated_tag_dropped() {
        let tokens = HTMLTokenizer::tokenize("hello <b");
        assert_eq!(tokens, vec![Token::Text("hello ".to_string())]);
    }

    #[test]
    fn test_greater_than_in_text_is_literal() {
        let tokens = HTMLTokenizer::tokenize("a > b");
        assert_eq!(tokens, vec![Token::Text("a > b".to_string())]);
    }

    #[test]
    fn test_doctype_is_declaration() {
        let tokens = HTMLTokenizer::tokenize("<!doctype html>");
        assert_eq!(tokens, vec![Token::Declaration("!doctype html".to_string())]);
    }

    #[test]
    fn test_self_closing_slash_stripped() {
        let tokens = HTMLTokenizer::tokenize("<br/><hr />");
        assert_eq!(tokens, vec![Token::start("br"), Token::start("hr")]);
    }

    #[test]
    fn test_slash_ending_unquoted_value_is_kept() {
        let href = |html: &str| match HTMLTokenizer::tokenize(html).first() {
            Some(Token::StartTag { attributes, .. }) => attributes.get("href").cloned(),
            _ => None,
        };
        assert_eq!(href("<a href=/>"), Some("/".to_string()));
        assert_eq!(href("<a href=http://x/>"), Some("http://x/".to_string()));
        assert_eq!(href("<a href=http://x/ />"), Some("http://x/".to_string()));
        assert_eq!(href("<a href=\"/y\"/>"), Some("/y".to_string()));
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(TokenizerMode::RawText.to_string(), "RawText");
    }
}
