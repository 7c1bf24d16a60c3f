//! HTML tokenizer module.
//!
//! Splits raw markup into text runs and tags. Comments are dropped here, so
//! the tree builder never sees them.

/// Attribute list parsing inside a start tag.
pub mod attributes;
/// Character reference decoding (`&amp;`, `&#38;`, ...).
pub mod character_reference;
/// The tokenizer itself.
pub mod lexer;
/// Token types produced by the tokenizer.
pub mod token;

pub use lexer::{HTMLTokenizer, TokenizerMode};
pub use token::Token;
