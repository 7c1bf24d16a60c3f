use wombat_dom::AttributesMap;

/// A token emitted by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<name attr=value ...>`; the name is lowercased.
    StartTag {
        /// Lowercased tag name.
        name: String,
        /// Attributes with lowercased keys.
        attributes: AttributesMap,
    },
    /// `</name>`; the name is lowercased and carries no leading `/`.
    EndTag {
        /// Lowercased tag name.
        name: String,
    },
    /// A run of character data between tags. May be whitespace only; the
    /// tree builder decides what to keep.
    Text(String),
    /// `<!DOCTYPE ...>` and other markup declarations. Recognized as a tag
    /// boundary but never turned into a node.
    Declaration(String),
}

impl Token {
    /// Convenience constructor for a start tag without attributes.
    #[must_use]
    pub fn start(name: &str) -> Self {
        Self::StartTag {
            name: name.to_string(),
            attributes: AttributesMap::new(),
        }
    }

    /// Convenience constructor for an end tag.
    #[must_use]
    pub fn end(name: &str) -> Self {
        Self::EndTag {
            name: name.to_string(),
        }
    }
}
