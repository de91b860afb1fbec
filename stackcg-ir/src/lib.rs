//! Tree Intermediate Representation
//! 
//! This crate defines the IR handed to a backend: a tree of [`Node`]s, each
//! carrying an [`OpType`], its owned children and a kind-specific payload.
//! Front-ends build trees with the constructors on [`Node`] or load them
//! from JSON with [`from_json`].
//! 
//! ## Architecture
//! 
//! - `ops` - Operation kinds, categories and arity contracts
//! - `addr` - Addressing descriptors for memory operands
//! - `node` - Tree nodes and construction helpers

pub use self::addr::{Addr, VALID_SCALES};
pub use self::node::Node;
pub use self::ops::{Arity, Category, OpType};

mod addr;
mod node;
mod ops;

/// Parse a tree from its JSON form
pub fn from_json(text: &str) -> Result<Node, serde_json::Error> {
    serde_json::from_str(text)
}

/// Render a tree as pretty-printed JSON
pub fn to_json(node: &Node) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(node)
}
