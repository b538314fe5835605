//! Grid state for the forest landscape

pub mod field;
pub mod forest_grid;

// Re-export main types
pub use field::FieldData;
pub use forest_grid::{ForestGrid, GridSnapshot, DEFAULT_HUMIDITY_RANGE, DEFAULT_TEMPERATURE};
