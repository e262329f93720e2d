// src/io/pmg_json.rs

use crate::error::{Result, SweepError};
use crate::model::{Atom, Structure};
use crate::utils::linalg::frac_to_cart;
use serde::Deserialize;

const OCCUPANCY_TOL: f64 = 1e-6;

/// Structure in pymatgen's `as_dict()` layout, as served by Materials Project
#[derive(Debug, Clone, Deserialize)]
pub struct PmgStructure {
  pub lattice: PmgLattice,
  pub sites: Vec<PmgSite>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PmgLattice {
  pub matrix: [[f64; 3]; 3],
}

#[derive(Debug, Clone, Deserialize)]
pub struct PmgSite {
  pub species: Vec<PmgSpecies>,
  pub abc: [f64; 3],
  #[serde(default)]
  pub xyz: Option<[f64; 3]>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PmgSpecies {
  pub element: String,
  #[serde(default = "full_occupancy")]
  pub occu: f64,
}

fn full_occupancy() -> f64 {
  1.0
}

/// One document of a `/materials/...` response
#[derive(Debug, Clone, Deserialize)]
pub struct MaterialDoc {
  pub structure: PmgStructure,
}

/// `{"data": [...], "meta": {...}}` envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
  pub data: Vec<MaterialDoc>,
}

impl PmgStructure {
  pub fn into_structure(self) -> Result<Structure> {
    let lattice = self.lattice.matrix;
    let mut atoms = Vec::with_capacity(self.sites.len());
    for (index, site) in self.sites.into_iter().enumerate() {
      let species = match site.species.as_slice() {
        [single] if (single.occu - 1.0).abs() < OCCUPANCY_TOL => single.element.clone(),
        many => {
          let detail = many
            .iter()
            .map(|s| format!("{}:{}", s.element, s.occu))
            .collect::<Vec<_>>()
            .join(" ");
          return Err(SweepError::Disordered { index, detail });
        }
      };
      let position = site.xyz.unwrap_or_else(|| frac_to_cart(site.abc, lattice));
      atoms.push(Atom { element: species, position });
    }
    Ok(Structure::new(lattice, atoms))
  }
}

/// Parses either a bare structure dict or an API response envelope.
///
/// `material_id` names the structure in `NotFound` errors for an empty envelope.
pub fn parse_structure(text: &str, material_id: &str) -> Result<Structure> {
  let value: serde_json::Value = serde_json::from_str(text)?;
  if value.get("data").is_some() {
    let response: ApiResponse = serde_json::from_value(value)?;
    let doc = response
      .data
      .into_iter()
      .next()
      .ok_or_else(|| SweepError::NotFound(material_id.to_string()))?;
    doc.structure.into_structure()
  } else {
    let raw: PmgStructure = serde_json::from_value(value)?;
    raw.into_structure()
  }
}
