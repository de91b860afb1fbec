//! Common types shared across the backend crates

/// Identifier of a generator-minted local label (`.L<id>`)
pub type LabelId = u32;

/// Index of a string literal in a unit's literal pool (`.LC<index>`)
pub type LiteralId = usize;

/// Size in bytes of one evaluation stack slot on the target
pub const STACK_SLOT_BYTES: i64 = 8;
