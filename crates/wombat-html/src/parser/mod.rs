//! HTML parser module for tree construction.

/// Stack-of-open-elements tree builder.
pub mod tree_builder;

pub use tree_builder::{HTMLParser, ParseIssue, format_tree, print_tree};
