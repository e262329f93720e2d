//src/model/mod.rs
pub mod elements;
pub mod structure;
pub mod symmetry;

// Re-exports for cleaner imports
pub use structure::{Atom, LatticeAxis, Structure};
