//! IR Nodes
//!
//! A [`Node`] is one operation in the tree handed to a backend. It owns its
//! children exclusively; the tree is built once by the caller and never
//! mutated by a generator.

use serde::{Deserialize, Serialize};
use crate::addr::Addr;
use crate::ops::OpType;

/// One IR operation and its owned subtree
///
/// Only the payload fields meaningful for the node's kind are read:
/// `value` for `Num`, `strval` for `Str`, `name` for labels, jumps, calls and
/// function roots, `addr` for `Lea` and for the destination child of `Mov`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "kind")]
    op: OpType,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kids: Vec<Node>,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub value: i64,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub strval: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Addr::is_empty")]
    pub addr: Addr,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

impl Node {
    /// Create a node of the given kind with every payload empty
    pub fn new(op: OpType) -> Self {
        Self {
            op,
            kids: Vec::new(),
            value: 0,
            strval: String::new(),
            name: String::new(),
            addr: Addr::default(),
        }
    }

    pub fn op(&self) -> OpType {
        self.op
    }

    pub fn kids(&self) -> &[Node] {
        &self.kids
    }

    pub fn push_kid(&mut self, kid: Node) {
        self.kids.push(kid);
    }

    pub fn with_kid(mut self, kid: Node) -> Self {
        self.kids.push(kid);
        self
    }

    pub fn with_kids(mut self, kids: impl IntoIterator<Item = Node>) -> Self {
        self.kids.extend(kids);
        self
    }

    pub fn with_value(mut self, value: i64) -> Self {
        self.value = value;
        self
    }

    pub fn with_str(mut self, s: impl Into<String>) -> Self {
        self.strval = s.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_addr(mut self, addr: Addr) -> Self {
        self.addr = addr;
        self
    }

    /// Textual target of a label, jump or call: `name`, else `strval`
    pub fn symbol(&self) -> &str {
        if self.name.is_empty() {
            &self.strval
        } else {
            &self.name
        }
    }

    /// Number of nodes in this subtree, including this one
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.kids.iter());
        }
        count
    }

    /// Length of the longest root-to-leaf path (a leaf has depth 1)
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.kids.iter().map(|kid| (kid, depth + 1)));
        }
        deepest
    }

    // ===== Convenience constructors =====

    /// Unnamed unit root holding a statement list
    pub fn root(kids: impl IntoIterator<Item = Node>) -> Self {
        Node::new(OpType::Root).with_kids(kids)
    }

    /// Unit root framed as the callable function `name`
    pub fn function(name: impl Into<String>, kids: impl IntoIterator<Item = Node>) -> Self {
        Node::root(kids).with_name(name)
    }

    pub fn num(value: i64) -> Self {
        Node::new(OpType::Num).with_value(value)
    }

    pub fn string(text: impl Into<String>) -> Self {
        Node::new(OpType::Str).with_str(text)
    }

    /// Binary node: `lhs` is evaluated first
    pub fn binary(op: OpType, lhs: Node, rhs: Node) -> Self {
        Node::new(op).with_kid(lhs).with_kid(rhs)
    }

    pub fn unary(op: OpType, operand: Node) -> Self {
        Node::new(op).with_kid(operand)
    }

    pub fn label(name: impl Into<String>) -> Self {
        Node::new(OpType::Label).with_name(name)
    }

    pub fn jump(op: OpType, target: impl Into<String>) -> Self {
        Node::new(op).with_name(target)
    }

    /// Call with arguments in declared order
    pub fn call(target: impl Into<String>, args: impl IntoIterator<Item = Node>) -> Self {
        Node::new(OpType::Call).with_name(target).with_kids(args)
    }

    pub fn ret(value: Option<Node>) -> Self {
        Node::new(OpType::Ret).with_kids(value)
    }

    pub fn lea(addr: Addr) -> Self {
        Node::new(OpType::Lea).with_addr(addr)
    }

    pub fn load(address: Node) -> Self {
        Node::unary(OpType::Load, address)
    }

    pub fn store(address: Node, value: Node) -> Self {
        Node::binary(OpType::Store, address, value)
    }

    /// Move `source` into the memory operand `dest`
    pub fn mov(dest: Addr, source: Node) -> Self {
        Node::binary(OpType::Mov, Node::lea(dest), source)
    }

    pub fn push(value: Node) -> Self {
        Node::unary(OpType::Push, value)
    }

    pub fn pop() -> Self {
        Node::new(OpType::Pop)
    }
}

// Tear the tree down iteratively so very deep trees do not exhaust the stack.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.kids);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.kids);
        }
    }
}
