//! Stack Codegen - Backend
//!
//! This crate turns IR trees into target assembly text. The [`Backend`]
//! trait is the architecture-neutral contract; [`X86_64`] is the one
//! implementation.
//!
//! ```ignore
//! let tree = Node::root([Node::binary(OpType::IAdd, Node::num(1), Node::num(2))]);
//! let asm = X86_64::new().generate(&tree)?;
//! ```

pub mod error;
pub mod literals;
pub mod naming;
pub mod options;
pub mod x86_64;

pub use error::CodegenError;
pub use literals::StringPool;
pub use naming::LabelGenerator;
pub use options::GeneratorOptions;
pub use x86_64::X86_64;

use stackcg_ir::Node;

/// Architecture-neutral code generation contract
pub trait Backend {
    /// Name of the target architecture
    fn target(&self) -> &'static str;

    /// Lower `node` and its subtree into the in-progress unit
    ///
    /// Used to compose a unit from several fragments. Either the whole
    /// subtree is lowered or, on error, nothing is.
    fn gen(&mut self, node: &Node) -> Result<(), CodegenError>;

    /// Produce a complete, self-contained unit for `node`
    ///
    /// Any in-progress unit is discarded first. A root with a non-empty name
    /// is framed as a callable function.
    fn generate(&mut self, node: &Node) -> Result<String, CodegenError>;
}

/// Names accepted by [`backend_for`]
pub const SUPPORTED_TARGETS: [&str; 3] = ["x86_64", "x86-64", "amd64"];

/// Create a backend for a target name
pub fn backend_for(target: &str, options: GeneratorOptions) -> Option<Box<dyn Backend>> {
    match target {
        "x86_64" | "x86-64" | "amd64" => Some(Box::new(X86_64::with_options(options))),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
