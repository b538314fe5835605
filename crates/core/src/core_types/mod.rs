//! Core types and utilities

pub mod cell;
pub mod environment;
pub mod units;
pub mod vec2;
pub mod vegetation;

pub use cell::{CellStatus, Rgb};
pub use environment::EnvironmentParameters;
pub use units::{KilometersPerHour, Percent};
pub use vec2::Vec2;
pub use vegetation::{VegetationCatalog, VegetationType};
