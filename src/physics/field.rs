// src/physics/field.rs

use crate::error::Result;
use crate::model::{LatticeAxis, Structure};
use crate::utils::linalg;
use serde::{Deserialize, Serialize};

/// One point of a finite-field sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPoint {
  /// Field magnitude in eV/Å (signed)
  pub magnitude: f64,
  /// Cartesian field vector passed as EFIELD_PEAD
  pub vector: [f64; 3],
  /// Directory name, e.g. `E_0.0010_along_001`
  pub tag: String,
}

pub fn field_vector(unit: [f64; 3], magnitude: f64) -> [f64; 3] {
  linalg::scale(unit, magnitude)
}

pub fn field_tag(magnitude: f64, axis: LatticeAxis) -> String {
  format!("E_{:.4}_along_{}", magnitude, axis.miller_label())
}

/// Field points along `axis` for each magnitude, in input order
pub fn sweep_points(
  structure: &Structure,
  axis: LatticeAxis,
  magnitudes: &[f64],
) -> Result<(Vec<FieldPoint>, [f64; 3])> {
  let unit = structure.axis_unit_vector(axis)?;
  let points = magnitudes
    .iter()
    .map(|&e| FieldPoint {
      magnitude: e,
      vector: field_vector(unit, e),
      tag: field_tag(e, axis),
    })
    .collect();
  Ok((points, unit))
}
