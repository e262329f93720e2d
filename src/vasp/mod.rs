// src/vasp/mod.rs
pub mod incar;
pub mod input_set;
pub mod kpoints;
pub mod potcar;

pub use incar::{Incar, IncarValue};
pub use input_set::{IncarSettings, StaticSet};
pub use kpoints::Kpoints;
