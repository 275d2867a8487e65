//! Image to palette: extraction, role assignment, brightness classification
//! and brightness adjustment.

pub mod assign;
pub mod detect;
pub mod enhance;
pub mod extract;

pub use assign::{derive, Derivation};
pub use detect::is_bright;
