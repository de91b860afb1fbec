//! x86-64 code generator
//!
//! Lowers IR trees to GNU assembler source in AT&T syntax using an explicit
//! evaluation stack (the machine stack) instead of register allocation.
//!
//! A generator keeps two kinds of state. The in-progress unit (instructions
//! and literal pool) belongs to a single output and is replaced by every
//! [`Backend::generate`] call. The local label counter lives as long as the
//! generator, so labels stay unique across all units it produces.
//!
//! A generator is not meant to be shared between threads; use one per
//! thread.

mod address;
mod frame;
mod lower;

#[cfg(test)]
mod tests;

use crate::error::CodegenError;
use crate::literals::StringPool;
use crate::naming::LabelGenerator;
use crate::options::GeneratorOptions;
use crate::Backend;
use log::debug;
use lower::Lowerer;
use stackcg_codegen::{AsmInst, Emitter};
use stackcg_ir::Node;

/// Output under construction
#[derive(Debug, Default)]
struct Unit {
    insts: Vec<AsmInst>,
    pool: StringPool,
    framed: bool,
}

#[derive(Debug)]
pub struct X86_64 {
    options: GeneratorOptions,
    labels: LabelGenerator,
    unit: Unit,
}

impl X86_64 {
    pub const TARGET: &'static str = "x86_64";

    pub fn new() -> Self {
        Self::with_options(GeneratorOptions::default())
    }

    pub fn with_options(options: GeneratorOptions) -> Self {
        Self {
            options,
            labels: LabelGenerator::new(),
            unit: Unit::default(),
        }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Mint a local label that is unique for the lifetime of this generator
    pub fn new_label(&mut self) -> String {
        self.labels.next_label()
    }

    pub fn labels_minted(&self) -> u32 {
        self.labels.minted()
    }

    /// Instructions of the in-progress unit
    pub fn instructions(&self) -> &[AsmInst] {
        &self.unit.insts
    }

    /// Literal pool of the in-progress unit
    pub fn literals(&self) -> &[String] {
        self.unit.pool.entries()
    }

    /// Render the in-progress unit (code, then the literal section) and
    /// start a new empty one
    pub fn finish(&mut self) -> String {
        let unit = std::mem::take(&mut self.unit);
        let mut emitter = Emitter::new();
        emitter.emit_all(&unit.insts);
        emitter.emit_all(&unit.pool.render(self.options.rodata_align));
        debug!(
            "x86_64: unit complete, {} lines, {} literals",
            emitter.line_count(),
            unit.pool.len()
        );
        emitter.finish()
    }
}

impl Default for X86_64 {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for X86_64 {
    fn target(&self) -> &'static str {
        Self::TARGET
    }

    fn gen(&mut self, node: &Node) -> Result<(), CodegenError> {
        let lowered = Lowerer::new(
            &mut self.unit.pool,
            &mut self.labels,
            &self.options,
            self.unit.framed,
        )
        .lower_tree(node)?;
        self.unit.insts.extend(lowered);
        Ok(())
    }

    fn generate(&mut self, node: &Node) -> Result<String, CodegenError> {
        self.unit = Unit::default();

        let framed = !node.name.is_empty();
        if framed {
            debug!("x86_64: generating function '{}' ({} nodes)", node.name, node.size());
            self.unit.framed = true;
            self.unit.insts.extend(frame::function_header(&node.name, &self.options));
            self.unit.insts.extend(frame::prologue());
        } else {
            debug!("x86_64: generating unframed unit ({} nodes)", node.size());
        }

        if let Err(err) = self.gen(node) {
            self.unit = Unit::default();
            return Err(err);
        }

        if framed {
            self.unit.insts.extend(frame::epilogue());
        }
        Ok(self.finish())
    }
}
