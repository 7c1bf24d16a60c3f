use thiserror::Error;
use wombat_common::warning::warn_once;

use crate::selector::Selector;

/// Why a rule or declaration could not be read.
///
/// These never escape the parser: the offending rule or declaration is
/// skipped and parsing resumes at the next `;` or `}`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A word (selector, property or value) was expected but none was found.
    #[error("expected a word at offset {position}")]
    ExpectedWord {
        /// Character offset into the style sheet.
        position: usize,
    },
    /// A specific punctuation character was expected.
    #[error("expected '{expected}' at offset {position}")]
    ExpectedLiteral {
        /// The character that should have been there.
        expected: char,
        /// Character offset into the style sheet.
        position: usize,
    },
}

/// Declarations of a rule body in insertion order.
///
/// Inserting a property that is already present replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declarations {
    entries: Vec<(String, String)>,
}

impl Declarations {
    /// Create an empty declaration block.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Set `property` to `value`, replacing an earlier value.
    pub fn insert(&mut self, property: &str, value: &str) {
        match self.entries.iter_mut().find(|(p, _)| p == property) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((property.to_string(), value.to_string())),
        }
    }

    /// Look up a property value.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over `(property, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the block is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A style rule: a selector and the declarations it applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Which nodes the rule applies to.
    pub selector: Selector,
    /// What it sets on them.
    pub declarations: Declarations,
}

/// Recursive-descent style sheet parser with error recovery.
///
/// ```text
/// sheet       := ( selector '{' body '}' )*
/// selector    := word ( word )*           words separated by whitespace
/// body        := ( word ':' value ';'? )*
/// word        := [alphanumeric # - . %]+
/// ```
pub struct CSSParser {
    input: Vec<char>,
    position: usize,
}

impl CSSParser {
    /// Create a parser over style sheet (or inline style) text.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            input: text.chars().collect(),
            position: 0,
        }
    }

    /// Parse a whole style sheet.
    ///
    /// A rule that cannot be read is skipped up to and including the next
    /// `}`; if there is none, parsing stops.
    pub fn parse(&mut self) -> Vec<Rule> {
        let mut rules = Vec::new();
        loop {
            self.whitespace();
            if self.at_end() {
                break;
            }
            match self.rule() {
                Ok(rule) => rules.push(rule),
                Err(err) => {
                    warn_once("CSS", &format!("skipped rule: {err}"));
                    if self.ignore_until(&['}']).is_none() {
                        break;
                    }
                    self.position += 1;
                }
            }
        }
        rules
    }

    /// Parse a declaration list without braces, as found in a `style`
    /// attribute. Stops at a `}` or the end of input.
    ///
    /// A declaration that cannot be read is skipped up to the next `;`. A
    /// declaration is kept even when the `;` after it is missing.
    pub fn parse_declarations(&mut self) -> Declarations {
        let mut declarations = Declarations::new();
        self.whitespace();
        while let Some(c) = self.peek()
            && c != '}'
        {
            match self.pair() {
                Ok((property, value)) => {
                    if property == "font" {
                        expand_font_shorthand(&value, &mut declarations);
                    } else {
                        declarations.insert(&property, &value);
                    }
                    if self.end_of_declaration().is_err() && !self.resync() {
                        break;
                    }
                }
                Err(err) => {
                    warn_once("CSS", &format!("dropped declaration: {err}"));
                    if !self.resync() {
                        break;
                    }
                }
            }
        }
        declarations
    }

    fn rule(&mut self) -> Result<Rule, ParseError> {
        let selector = self.selector()?;
        self.literal('{')?;
        self.whitespace();
        let declarations = self.parse_declarations();
        self.literal('}')?;
        Ok(Rule {
            selector,
            declarations,
        })
    }

    fn selector(&mut self) -> Result<Selector, ParseError> {
        let mut selector = Selector::from_word(&self.word()?);
        self.whitespace();
        while let Some(c) = self.peek()
            && c != '{'
        {
            let descendant = Selector::from_word(&self.word()?);
            selector = Selector::Descendant(Box::new(selector), Box::new(descendant));
            self.whitespace();
        }
        Ok(selector)
    }

    /// `property : value`, with the property lowercased.
    ///
    /// The value of `font` is the raw text up to the next `;` or `}`; every
    /// other value is a single word.
    fn pair(&mut self) -> Result<(String, String), ParseError> {
        let property = self.word()?.to_lowercase();
        self.whitespace();
        self.literal(':')?;
        self.whitespace();
        let value = if property == "font" {
            let start = self.position;
            let _ = self.ignore_until(&[';', '}']);
            self.input[start..self.position]
                .iter()
                .collect::<String>()
                .trim()
                .to_string()
        } else {
            self.word()?
        };
        Ok((property, value))
    }

    fn end_of_declaration(&mut self) -> Result<(), ParseError> {
        self.whitespace();
        self.literal(';')?;
        self.whitespace();
        Ok(())
    }

    /// Skip to the next `;` or `}`. Returns whether parsing of the current
    /// declaration list can continue (a `;` was found and consumed).
    fn resync(&mut self) -> bool {
        if self.ignore_until(&[';', '}']) == Some(';') {
            self.position += 1;
            self.whitespace();
            true
        } else {
            false
        }
    }

    fn word(&mut self) -> Result<String, ParseError> {
        let start = self.position;
        while let Some(c) = self.peek()
            && is_word_char(c)
        {
            self.position += 1;
        }
        if self.position == start {
            return Err(ParseError::ExpectedWord { position: start });
        }
        Ok(self.input[start..self.position].iter().collect())
    }

    fn literal(&mut self, expected: char) -> Result<(), ParseError> {
        if self.peek() != Some(expected) {
            return Err(ParseError::ExpectedLiteral {
                expected,
                position: self.position,
            });
        }
        self.position += 1;
        Ok(())
    }

    /// Skip whitespace and `/* ... */` comments.
    fn whitespace(&mut self) {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.position += 1;
            }
            if self.peek() == Some('/') && self.input.get(self.position + 1) == Some(&'*') {
                self.position += 2;
                while !self.at_end()
                    && !(self.peek() == Some('*') && self.input.get(self.position + 1) == Some(&'/'))
                {
                    self.position += 1;
                }
                self.position = (self.position + 2).min(self.input.len());
            } else {
                break;
            }
        }
    }

    /// Advance to the first of `stops`, leaving it unconsumed.
    fn ignore_until(&mut self, stops: &[char]) -> Option<char> {
        while let Some(c) = self.peek() {
            if stops.contains(&c) {
                return Some(c);
            }
            self.position += 1;
        }
        None
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '#' | '-' | '.' | '%')
}

/// Expand the `font` shorthand by token count:
///
/// | tokens | meaning |
/// |--------|---------|
/// | 1 | family |
/// | 2 | size family |
/// | 3 | (style if `italic`, else weight) size family |
/// | 4 | style weight size family |
/// | 5+ | style weight size, then the rest joined as the family |
pub fn expand_font_shorthand(value: &str, declarations: &mut Declarations) {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    match tokens.as_slice() {
        [] => {}
        [family] => declarations.insert("font-family", family),
        [size, family] => {
            declarations.insert("font-size", size);
            declarations.insert("font-family", family);
        }
        [first, size, family] => {
            let property = if *first == "italic" {
                "font-style"
            } else {
                "font-weight"
            };
            declarations.insert(property, first);
            declarations.insert("font-size", size);
            declarations.insert("font-family", family);
        }
        [style, weight, size, family @ ..] => {
            declarations.insert("font-style", style);
            declarations.insert("font-weight", weight);
            declarations.insert("font-size", size);
            declarations.insert("font-family", &family.join(" "));
        }
    }
}
