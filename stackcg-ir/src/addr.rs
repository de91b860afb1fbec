//! Addressing descriptors
//!
//! An [`Addr`] describes one memory operand: a constant offset plus an
//! optional base register and an optional scaled index register. Register
//! names are carried verbatim; rendering them is the backend's job.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scales accepted by the index component
pub const VALID_SCALES: [u8; 4] = [1, 2, 4, 8];

/// Memory operand description: `offset(base, index, scale)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Addr {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub offset: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,

    #[serde(default = "default_scale", skip_serializing_if = "is_unit_scale")]
    pub scale: u8,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

fn default_scale() -> u8 {
    1
}

fn is_unit_scale(s: &u8) -> bool {
    *s == 1
}

impl Default for Addr {
    fn default() -> Self {
        Self {
            offset: 0,
            base: None,
            index: None,
            scale: 1,
        }
    }
}

impl Addr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Address held in a base register
    pub fn reg(base: impl Into<String>) -> Self {
        Self {
            base: Some(base.into()),
            ..Self::default()
        }
    }

    /// Absolute address with no registers
    pub fn absolute(offset: i64) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }

    /// Set the base register
    pub fn base(mut self, reg: impl Into<String>) -> Self {
        self.base = Some(reg.into());
        self
    }

    /// Set the index register and its scale
    pub fn idx(mut self, reg: impl Into<String>, scale: u8) -> Self {
        self.index = Some(reg.into());
        self.scale = scale;
        self
    }

    /// Set the constant offset
    pub fn off(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// True when no component is present
    pub fn is_empty(&self) -> bool {
        self.offset == 0 && self.base.is_none() && self.index.is_none()
    }

    pub fn has_valid_scale(&self) -> bool {
        VALID_SCALES.contains(&self.scale)
    }
}

/// Architecture-neutral rendering, used in logs and error messages
impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        let mut first = true;
        if let Some(base) = &self.base {
            write!(f, "{base}")?;
            first = false;
        }
        if let Some(index) = &self.index {
            if !first {
                write!(f, " + ")?;
            }
            write!(f, "{index}*{}", self.scale)?;
            first = false;
        }
        if self.offset != 0 || first {
            if !first {
                write!(f, " + ")?;
            }
            write!(f, "{}", self.offset)?;
        }
        write!(f, "]")
    }
}
