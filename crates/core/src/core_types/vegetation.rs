//! Vegetation catalog
//!
//! A fixed, ordered table of vegetation types. Each type scales the ignition
//! probability of the spread rule through its `spread_factor`; the colour is
//! only consumed by renderers.
//!
//! | Name     | Common name       | Spread factor |
//! |----------|-------------------|---------------|
//! | Çam      | Pine              | 0.7           |
//! | Meşe     | Oak               | 0.5           |
//! | Çınar    | Plane tree        | 1.2           |
//! | Kayın    | Beech             | 0.6           |
//! | Kavak    | Poplar            | 1.3           |
//! | Ardıç    | Juniper           | 0.9           |
//! | Zeytin   | Olive             | 0.8           |
//! | Akasya   | Acacia            | 1.0           |
//! | Maki     | Maquis shrubland  | 1.4           |
//! | Çalı     | Brush             | 1.6           |
//! | Karaışık | Mixed stand       | 1.0           |

use super::cell::Rgb;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::LazyLock;

/// Lower end of the expected spread factor range.
pub const MIN_SPREAD_FACTOR: f32 = 0.4;
/// Upper end of the expected spread factor range.
pub const MAX_SPREAD_FACTOR: f32 = 1.6;

/// Immutable vegetation record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VegetationType {
    /// Catalog key
    pub name: &'static str,
    /// English common name for client labels
    pub common_name: &'static str,
    /// Multiplier on ignition probability
    pub spread_factor: f32,
    /// Display colour for unburned cells
    pub color: Rgb,
}

impl VegetationType {
    const fn new(
        name: &'static str,
        common_name: &'static str,
        spread_factor: f32,
        color: u32,
    ) -> Self {
        Self {
            name,
            common_name,
            spread_factor,
            color: Rgb::from_hex(color),
        }
    }
}

const STANDARD_TYPES: [VegetationType; 11] = [
    VegetationType::new("Çam", "Pine", 0.7, 0x22_8B_22),
    VegetationType::new("Meşe", "Oak", 0.5, 0x00_64_00),
    VegetationType::new("Çınar", "Plane tree", 1.2, 0x00_FF_7F),
    VegetationType::new("Kayın", "Beech", 0.6, 0x2E_8B_57),
    VegetationType::new("Kavak", "Poplar", 1.3, 0x7F_FF_00),
    VegetationType::new("Ardıç", "Juniper", 0.9, 0x3C_B3_71),
    VegetationType::new("Zeytin", "Olive", 0.8, 0x55_6B_2F),
    VegetationType::new("Akasya", "Acacia", 1.0, 0x66_CD_AA),
    VegetationType::new("Maki", "Maquis shrubland", 1.4, 0x32_CD_32),
    VegetationType::new("Çalı", "Brush", 1.6, 0xAD_FF_2F),
    VegetationType::new("Karaışık", "Mixed stand", 1.0, 0x9A_CD_32),
];

static STANDARD_CATALOG: LazyLock<VegetationCatalog> =
    LazyLock::new(|| VegetationCatalog::from_types(STANDARD_TYPES.to_vec()));

/// Ordered vegetation table with O(1) lookup by name
#[derive(Debug, Clone)]
pub struct VegetationCatalog {
    types: Vec<VegetationType>,
    index: FxHashMap<&'static str, usize>,
}

impl VegetationCatalog {
    /// The process-wide standard catalog. Built once on first use.
    pub fn standard() -> &'static VegetationCatalog {
        &STANDARD_CATALOG
    }

    fn from_types(types: Vec<VegetationType>) -> Self {
        let index = types
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name, i))
            .collect();
        Self { types, index }
    }

    /// Look up a vegetation type by its catalog key.
    pub fn get(&self, name: &str) -> Option<&VegetationType> {
        self.index.get(name).map(|&i| &self.types[i])
    }

    /// Position of `name` in catalog order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// First entry in catalog order (Çam).
    pub fn default_type(&self) -> &VegetationType {
        &self.types[0]
    }

    /// All entries in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &VegetationType> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_and_size() {
        let catalog = VegetationCatalog::standard();
        assert_eq!(catalog.len(), 11);
        let names: Vec<_> = catalog.iter().map(|t| t.name).collect();
        assert_eq!(names[0], "Çam");
        assert_eq!(names[10], "Karaışık");
        assert_eq!(catalog.position("Maki"), Some(8));
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = VegetationCatalog::standard();
        let brush = catalog.get("Çalı").unwrap();
        assert_eq!(brush.spread_factor, 1.6);
        assert_eq!(brush.common_name, "Brush");
        assert!(catalog.get("Palm").is_none());
        assert!(catalog.get("çam").is_none(), "lookup is exact");
    }

    #[test]
    fn test_spread_factors_in_range() {
        for t in VegetationCatalog::standard().iter() {
            assert!(
                (MIN_SPREAD_FACTOR..=MAX_SPREAD_FACTOR).contains(&t.spread_factor),
                "{} has out-of-range spread factor {}",
                t.name,
                t.spread_factor
            );
        }
    }

    #[test]
    fn test_names_unique() {
        let catalog = VegetationCatalog::standard();
        for (i, t) in catalog.iter().enumerate() {
            assert_eq!(catalog.position(t.name), Some(i));
        }
    }
}
