//! Color tokens and room palettes.
//!
//! A palette is fixed at room creation and is the only valid alphabet for the
//! room's sequence. Tokens are opaque identifiers ("red", "#FF4444", ...);
//! rendering them is a client concern.

use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, ValidationKind};

/// One color in a room's palette. Opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorToken(String);

impl ColorToken {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ColorToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColorToken {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Ordered set of distinct color tokens, immutable for the room's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    colors: Vec<ColorToken>,
}

impl Palette {
    /// A one-color sequence is trivially memorable; two is the floor.
    pub const MIN_COLORS: usize = 2;

    /// Validate and fix a palette. Order is preserved; duplicates and
    /// undersized palettes are rejected.
    pub fn new(colors: Vec<ColorToken>) -> Result<Self, DomainError> {
        if colors.len() < Self::MIN_COLORS {
            return Err(DomainError::validation(
                ValidationKind::PaletteTooSmall,
                format!(
                    "palette needs at least {} colors, got {}",
                    Self::MIN_COLORS,
                    colors.len()
                ),
            ));
        }
        for (i, color) in colors.iter().enumerate() {
            if colors[..i].contains(color) {
                return Err(DomainError::validation(
                    ValidationKind::DuplicateColor,
                    format!("palette contains '{color}' more than once"),
                ));
            }
        }
        Ok(Self { colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn contains(&self, token: &ColorToken) -> bool {
        self.colors.contains(token)
    }

    pub fn get(&self, index: usize) -> Option<&ColorToken> {
        self.colors.get(index)
    }

    pub fn colors(&self) -> &[ColorToken] {
        &self.colors
    }
}
