//! Generator options

use serde::{Deserialize, Serialize};

/// Options controlling the text a generator produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// `.align` emitted after `.section .text` in framed units
    pub text_align: u32,

    /// `.align` emitted after `.section .rodata`
    pub rodata_align: u32,

    /// Emit a `# <kind>` comment ahead of each node's own instructions
    pub annotate: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            text_align: 16,
            rodata_align: 8,
            annotate: false,
        }
    }
}

impl GeneratorOptions {
    pub fn with_annotations(mut self, annotate: bool) -> Self {
        self.annotate = annotate;
        self
    }

    pub fn with_text_align(mut self, align: u32) -> Self {
        self.text_align = align;
        self
    }

    pub fn with_rodata_align(mut self, align: u32) -> Self {
        self.rodata_align = align;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = GeneratorOptions::default();
        assert_eq!(options.text_align, 16);
        assert_eq!(options.rodata_align, 8);
        assert!(!options.annotate);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let options: GeneratorOptions = serde_json::from_str(r#"{ "annotate": true }"#).unwrap();
        assert!(options.annotate);
        assert_eq!(options.text_align, 16);
        assert_eq!(options.rodata_align, 8);
    }

    #[test]
    fn test_setters() {
        let options = GeneratorOptions::default()
            .with_annotations(true)
            .with_text_align(32)
            .with_rodata_align(16);
        assert_eq!(
            options,
            GeneratorOptions {
                text_align: 32,
                rodata_align: 16,
                annotate: true,
            }
        );
    }
}
