//! HTML tokenizer and tree builder for the Wombat document engine.
//!
//! # Scope
//!
//! This crate implements a deliberately small, forgiving HTML front end:
//! - **HTML Tokenizer** - text, tag, comment and raw-text (`<script>`) modes,
//!   attribute parsing with single/double quote tracking, a handful of
//!   character references
//!
//! - **Tree Builder** - a stack of open elements with implicit
//!   `html`/`head`/`body` insertion, void (self-closing) elements and the
//!   paragraph auto-close quirk
//!
//! Parsing is total: every input, however malformed, produces a tree whose
//! root is an `html` element.
//!
//! # Not Implemented
//!
//! - The WHATWG tokenizer state machine and insertion modes
//! - Foster parenting, the adoption agency algorithm, tables
//! - Incremental/streaming parsing

/// HTML tree construction.
pub mod parser;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use parser::{HTMLParser, ParseIssue, format_tree, print_tree};
pub use tokenizer::{HTMLTokenizer, Token, TokenizerMode};

use wombat_dom::DomTree;

/// Parse an HTML document into a DOM tree rooted at an `html` element.
///
/// Never fails: malformed input is recovered, never rejected.
#[must_use]
pub fn parse(html: &str) -> DomTree {
    let mut tokenizer = HTMLTokenizer::new(html);
    tokenizer.run();
    HTMLParser::new(tokenizer.into_tokens()).run()
}
