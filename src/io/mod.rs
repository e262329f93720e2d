// src/io/mod.rs
pub mod ids;
pub mod pmg_json;
pub mod poscar;

use crate::error::Result;
use crate::model::Structure;
use std::fs;
use std::path::Path;

/// Loads a structure from pymatgen JSON (`.json`) or POSCAR (anything else)
pub fn load_structure(path: &Path) -> Result<Structure> {
  let name = path
    .file_name()
    .and_then(|n| n.to_str())
    .unwrap_or_default()
    .to_lowercase();

  if name.ends_with(".json") {
    let label = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    pmg_json::parse_structure(&fs::read_to_string(path)?, label)
  } else {
    // POSCAR, CONTCAR, *.vasp
    poscar::parse(path)
  }
}
