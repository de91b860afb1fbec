//! Assembly text emission
//!
//! Turns instruction sequences into assembler source. Instructions are
//! indented by four spaces; labels and directives start in column zero.

use crate::asm::AsmInst;
use std::fmt::Write;

const INDENT: &str = "    ";

/// Incremental assembly text writer
#[derive(Debug, Default)]
pub struct Emitter {
    text: String,
    lines: usize,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one instruction as a line of text
    pub fn emit(&mut self, inst: &AsmInst) {
        if !inst.is_unindented() {
            self.text.push_str(INDENT);
        }
        // Writing into a String cannot fail
        let _ = writeln!(self.text, "{inst}");
        self.lines += 1;
    }

    pub fn emit_all<'a>(&mut self, insts: impl IntoIterator<Item = &'a AsmInst>) {
        for inst in insts {
            self.emit(inst);
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines
    }

    pub fn finish(self) -> String {
        self.text
    }
}
