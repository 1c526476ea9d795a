// Pokemon Arena Schema - Shared type definitions
// This crate contains the static enums that every part of the battle engine
// agrees on: elemental types and move categories.

pub use move_types::*;
pub use pokemon_types::*;

pub mod move_types;
pub mod pokemon_types;
