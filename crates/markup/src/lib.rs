//! Markup tree for the binding layer.
//!
//! This crate owns the node model, stable node identity, a simplified
//! tokenizer/fragment builder, and the traversal and structural-edit
//! helpers the binding engine composes. It deliberately does not know
//! about controllers, coercion, or event routing.

pub mod edit;
pub mod traverse;

mod builder;
mod tokenizer;
mod types;

pub use crate::builder::parse_fragment;
pub use crate::tokenizer::tokenize;
pub use crate::types::{Id, Node, NodeId, Token};

/// Whether a content string should be treated as markup text rather than
/// an element identifier. Mirrors the "first non-blank char is `<`" rule
/// used by the placement operator.
pub fn is_markup(content: &str) -> bool {
    content.trim_start().starts_with('<')
}
