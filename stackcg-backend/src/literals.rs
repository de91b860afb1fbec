//! String literal pool
//!
//! Every string immediate gets its own pool entry, even when the same text
//! was seen before. Entries are rendered once, after all code of the unit,
//! as a read-only data section.

use crate::naming::literal_label;
use stackcg_codegen::AsmInst;
use stackcg_common::LiteralId;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StringPool {
    entries: Vec<String>,
}

impl StringPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` and return its pool position
    pub fn add(&mut self, text: &str) -> LiteralId {
        self.entries.push(text.to_string());
        self.entries.len() - 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Drop entries added after the pool held `len` entries
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    /// The `.rodata` section holding every entry; empty when the pool is
    pub fn render(&self, align: u32) -> Vec<AsmInst> {
        if self.entries.is_empty() {
            return Vec::new();
        }

        let mut insts = vec![
            AsmInst::Section(".rodata".to_string()),
            AsmInst::Align(align),
        ];
        for (id, text) in self.entries.iter().enumerate() {
            insts.push(AsmInst::Label(literal_label(id)));
            insts.push(AsmInst::StringLit(text.clone()));
        }
        insts
    }
}
