//! CSS selector matching.
//!
//! Three kinds of selector are understood: type (`p`), class (`.note`) and
//! descendant combinations of those (`nav .links a`).

use std::fmt;

use wombat_dom::{DomTree, NodeId};

/// A selector as written in a style sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `p`, `div`, ...
    Tag(String),
    /// `.name`
    Class(String),
    /// `ancestor descendant`
    Descendant(Box<Selector>, Box<Selector>),
}

impl Selector {
    /// Build a simple selector from one word of selector text.
    ///
    /// A leading `.` makes a class selector; anything else is a tag name,
    /// lowercased.
    #[must_use]
    pub fn from_word(word: &str) -> Self {
        match word.strip_prefix('.') {
            Some(class) => Self::Class(class.to_string()),
            None => Self::Tag(word.to_lowercase()),
        }
    }

    /// Cascade priority: tag 1, class 10, descendant the sum of its parts.
    ///
    /// Rules with a higher priority are applied later and so win.
    #[must_use]
    pub fn priority(&self) -> u32 {
        match self {
            Self::Tag(_) => 1,
            Self::Class(_) => 10,
            Self::Descendant(ancestor, descendant) => ancestor.priority() + descendant.priority(),
        }
    }

    /// Whether this selector matches `node`. Text nodes never match.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        match self {
            Self::Tag(tag) => tree.is_element(node, tag),
            Self::Class(class) => tree.as_element(node).is_some_and(|e| e.has_class(class)),
            Self::Descendant(ancestor, descendant) => {
                descendant.matches(tree, node)
                    && tree.ancestors(node).any(|a| ancestor.matches(tree, a))
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => write!(f, "{tag}"),
            Self::Class(class) => write!(f, ".{class}"),
            Self::Descendant(ancestor, descendant) => write!(f, "{ancestor} {descendant}"),
        }
    }
}
