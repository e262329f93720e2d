// src/vasp/potcar.rs

use crate::error::{Result, SweepError};
use crate::model::elements;
use crate::model::Structure;

/// POTCAR symbols, one per species block of the POSCAR.
///
/// Only the spec file is produced; the licensed POTCAR is assembled on the
/// cluster from these symbols.
pub fn potcar_symbols(structure: &Structure) -> Result<Vec<String>> {
  structure
    .species_blocks()
    .into_iter()
    .map(|(el, _)| {
      elements::lookup(&el)
        .map(|data| data.potcar.to_string())
        .ok_or(SweepError::UnknownElement(el))
    })
    .collect()
}

pub fn spec_string(symbols: &[String]) -> String {
  symbols.iter().map(|s| format!("{}\n", s)).collect()
}
