//! Per-cell status and display colours

use super::vegetation::VegetationType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a single landscape cell.
///
/// Transitions are one-way: `Tree → Burning` through the spread rule and
/// `Burning → Empty` through fuel depletion. `Empty` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellStatus {
    /// Burned out, no fuel left
    Empty,
    /// Unburned and flammable
    #[default]
    Tree,
    /// Actively on fire
    Burning,
}

impl CellStatus {
    /// `true` for cells that are no longer unburned vegetation.
    ///
    /// This is the mask the fractal estimator runs over.
    #[inline]
    pub fn is_affected(self) -> bool {
        !matches!(self, CellStatus::Tree)
    }

    /// Display colour for this status under the selected vegetation.
    pub fn display_color(self, vegetation: &VegetationType) -> Rgb {
        match self {
            CellStatus::Empty => Rgb::BURNED_OUT,
            CellStatus::Tree => vegetation.color,
            CellStatus::Burning => Rgb::FLAME,
        }
    }

    /// Single character used by text renderers.
    pub fn glyph(self) -> char {
        match self {
            CellStatus::Empty => '.',
            CellStatus::Tree => '^',
            CellStatus::Burning => '*',
        }
    }
}

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Colour of burned-out ground (`#111111`)
    pub const BURNED_OUT: Rgb = Rgb::new(0x11, 0x11, 0x11);
    /// Colour of actively burning cells (`#ff8c00`)
    pub const FLAME: Rgb = Rgb::new(0xff, 0x8c, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a colour from a packed `0xRRGGBB` value.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::vegetation::VegetationCatalog;

    #[test]
    fn test_affected_mask() {
        assert!(CellStatus::Empty.is_affected());
        assert!(CellStatus::Burning.is_affected());
        assert!(!CellStatus::Tree.is_affected());
    }

    #[test]
    fn test_rgb_hex() {
        let c = Rgb::from_hex(0x22_8B_22);
        assert_eq!(c, Rgb::new(0x22, 0x8b, 0x22));
        assert_eq!(c.to_string(), "#228b22");
    }

    #[test]
    fn test_display_color_uses_vegetation() {
        let catalog = VegetationCatalog::standard();
        let pine = catalog.default_type();
        assert_eq!(CellStatus::Tree.display_color(pine), pine.color);
        assert_eq!(CellStatus::Burning.display_color(pine), Rgb::FLAME);
        assert_eq!(CellStatus::Empty.display_color(pine), Rgb::BURNED_OUT);
    }
}
