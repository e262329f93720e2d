// src/physics/mod.rs
pub mod field;
