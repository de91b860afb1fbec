//! IR Operations
//!
//! Defines the closed set of operation kinds a node can carry, the category
//! each kind belongs to, and the child-count contract of every kind.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation kind of an IR node
///
/// Kinds serialize as their snake_case name. Any name not listed here
/// deserializes to [`OpType::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OpType {
    // Structural
    Label,
    Root,

    // Immediates
    Num,
    Str,

    // Integer arithmetic
    IAdd, ISub, IMul, IDiv, IMod,

    // Floating arithmetic (double precision, stack resident)
    FAdd, FSub, FMul, FDiv, FMod,

    // Bitwise
    BAnd, BOr, BXor, BNot, BShl, BShr,

    // Comparison (set flags only)
    ICmp, FCmp, Test,

    // Memory
    Load, Store, Lea,

    // Control
    Call, Ret, Jmp,
    Je, Jne,
    Jl, Jle, Jg, Jge,   // Signed outcomes
    Ja, Jae, Jb, Jbe,   // Unsigned and floating outcomes

    // Stack
    Push, Pop,

    // Register move
    Mov,

    /// A kind tag this crate does not know about
    Unknown,
}

/// Broad grouping of operation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Structural,
    Immediate,
    IntArith,
    FloatArith,
    Bitwise,
    Compare,
    Memory,
    Control,
    Stack,
    Move,
    Unknown,
}

/// Number of children a kind requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtMost(usize),
    Any,
}

impl Arity {
    /// Check whether `count` children satisfy this arity
    pub fn admits(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::AtMost(n) => count <= n,
            Arity::Any => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "exactly {n}"),
            Arity::AtMost(n) => write!(f, "at most {n}"),
            Arity::Any => write!(f, "any number of"),
        }
    }
}

impl OpType {
    /// Every known kind, in declaration order
    pub const ALL: [OpType; 42] = [
        OpType::Label, OpType::Root,
        OpType::Num, OpType::Str,
        OpType::IAdd, OpType::ISub, OpType::IMul, OpType::IDiv, OpType::IMod,
        OpType::FAdd, OpType::FSub, OpType::FMul, OpType::FDiv, OpType::FMod,
        OpType::BAnd, OpType::BOr, OpType::BXor, OpType::BNot, OpType::BShl, OpType::BShr,
        OpType::ICmp, OpType::FCmp, OpType::Test,
        OpType::Load, OpType::Store, OpType::Lea,
        OpType::Call, OpType::Ret, OpType::Jmp,
        OpType::Je, OpType::Jne,
        OpType::Jl, OpType::Jle, OpType::Jg, OpType::Jge,
        OpType::Ja, OpType::Jae, OpType::Jb, OpType::Jbe,
        OpType::Push, OpType::Pop,
        OpType::Mov,
    ];

    /// Canonical snake_case name, as used in JSON documents
    pub fn name(self) -> &'static str {
        match self {
            OpType::Label => "label",
            OpType::Root => "root",
            OpType::Num => "num",
            OpType::Str => "str",
            OpType::IAdd => "iadd",
            OpType::ISub => "isub",
            OpType::IMul => "imul",
            OpType::IDiv => "idiv",
            OpType::IMod => "imod",
            OpType::FAdd => "fadd",
            OpType::FSub => "fsub",
            OpType::FMul => "fmul",
            OpType::FDiv => "fdiv",
            OpType::FMod => "fmod",
            OpType::BAnd => "band",
            OpType::BOr => "bor",
            OpType::BXor => "bxor",
            OpType::BNot => "bnot",
            OpType::BShl => "bshl",
            OpType::BShr => "bshr",
            OpType::ICmp => "icmp",
            OpType::FCmp => "fcmp",
            OpType::Test => "test",
            OpType::Load => "load",
            OpType::Store => "store",
            OpType::Lea => "lea",
            OpType::Call => "call",
            OpType::Ret => "ret",
            OpType::Jmp => "jmp",
            OpType::Je => "je",
            OpType::Jne => "jne",
            OpType::Jl => "jl",
            OpType::Jle => "jle",
            OpType::Jg => "jg",
            OpType::Jge => "jge",
            OpType::Ja => "ja",
            OpType::Jae => "jae",
            OpType::Jb => "jb",
            OpType::Jbe => "jbe",
            OpType::Push => "push",
            OpType::Pop => "pop",
            OpType::Mov => "mov",
            OpType::Unknown => "unknown",
        }
    }

    /// Look up a kind by its canonical name
    pub fn from_name(name: &str) -> OpType {
        OpType::ALL
            .iter()
            .copied()
            .find(|op| op.name() == name)
            .unwrap_or(OpType::Unknown)
    }

    pub fn category(self) -> Category {
        match self {
            OpType::Label | OpType::Root => Category::Structural,
            OpType::Num | OpType::Str => Category::Immediate,
            OpType::IAdd | OpType::ISub | OpType::IMul | OpType::IDiv | OpType::IMod => {
                Category::IntArith
            }
            OpType::FAdd | OpType::FSub | OpType::FMul | OpType::FDiv | OpType::FMod => {
                Category::FloatArith
            }
            OpType::BAnd | OpType::BOr | OpType::BXor | OpType::BNot | OpType::BShl | OpType::BShr => {
                Category::Bitwise
            }
            OpType::ICmp | OpType::FCmp | OpType::Test => Category::Compare,
            OpType::Load | OpType::Store | OpType::Lea => Category::Memory,
            OpType::Call | OpType::Ret | OpType::Jmp
            | OpType::Je | OpType::Jne
            | OpType::Jl | OpType::Jle | OpType::Jg | OpType::Jge
            | OpType::Ja | OpType::Jae | OpType::Jb | OpType::Jbe => Category::Control,
            OpType::Push | OpType::Pop => Category::Stack,
            OpType::Mov => Category::Move,
            OpType::Unknown => Category::Unknown,
        }
    }

    /// Child-count contract of this kind
    pub fn arity(self) -> Arity {
        match self {
            OpType::Num | OpType::Str | OpType::Label | OpType::Lea | OpType::Pop => Arity::Exact(0),
            _ if self.is_jump() => Arity::Exact(0),
            OpType::BNot | OpType::Load | OpType::Push => Arity::Exact(1),
            OpType::Ret => Arity::AtMost(1),
            OpType::Root | OpType::Call | OpType::Unknown => Arity::Any,
            // Binary arithmetic, bitwise, shifts, compares, store, mov
            _ => Arity::Exact(2),
        }
    }

    /// Unconditional or conditional jump
    pub fn is_jump(self) -> bool {
        matches!(
            self,
            OpType::Jmp
                | OpType::Je | OpType::Jne
                | OpType::Jl | OpType::Jle | OpType::Jg | OpType::Jge
                | OpType::Ja | OpType::Jae | OpType::Jb | OpType::Jbe
        )
    }

    /// Kinds that leave exactly one value on the evaluation stack
    pub fn produces_value(self) -> bool {
        match self.category() {
            Category::Immediate | Category::IntArith | Category::FloatArith | Category::Bitwise => true,
            Category::Memory => self != OpType::Store,
            _ => matches!(self, OpType::Call | OpType::Push),
        }
    }
}

impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<String> for OpType {
    fn from(name: String) -> Self {
        OpType::from_name(&name)
    }
}

impl From<OpType> for String {
    fn from(op: OpType) -> Self {
        op.name().to_string()
    }
}
