//! Label naming for generated code
//!
//! Two label families exist: local labels minted by a per-generator counter
//! (`.L<n>`) and literal labels numbered by literal pool position
//! (`.LC<n>`). The two never collide.

use stackcg_common::{LabelId, LiteralId};

/// Mints unique local labels
///
/// The counter only grows. A generator keeps one instance for its whole
/// lifetime, so labels stay unique across every unit it produces.
#[derive(Debug, Default)]
pub struct LabelGenerator {
    next_label_id: LabelId,
}

impl LabelGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the next label ID and increment counter
    pub fn next_label_id(&mut self) -> LabelId {
        let id = self.next_label_id;
        self.next_label_id += 1;
        id
    }

    /// Mint a fresh local label name
    pub fn next_label(&mut self) -> String {
        let id = self.next_label_id();
        local_label(id)
    }

    /// Number of labels minted so far
    pub fn minted(&self) -> u32 {
        self.next_label_id
    }
}

pub fn local_label(id: LabelId) -> String {
    format!(".L{id}")
}

pub fn literal_label(id: LiteralId) -> String {
    format!(".LC{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_sequential() {
        let mut labels = LabelGenerator::new();
        assert_eq!(labels.next_label(), ".L0");
        assert_eq!(labels.next_label(), ".L1");
        assert_eq!(labels.next_label_id(), 2);
        assert_eq!(labels.minted(), 3);
    }

    #[test]
    fn test_label_families_differ() {
        assert_eq!(local_label(0), ".L0");
        assert_eq!(literal_label(0), ".LC0");
        assert_ne!(local_label(12), literal_label(12));
    }
}
