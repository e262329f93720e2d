// src/model/structure.rs

use crate::error::{Result, SweepError};
use crate::model::elements;
use crate::utils::linalg;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Atom {
  pub element: String,
  /// Cartesian position in Angstroms
  pub position: [f64; 3],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Structure {
  // Lattice vectors: [a_vec, b_vec, c_vec]
  pub lattice: [[f64; 3]; 3],
  pub atoms: Vec<Atom>,
  #[serde(default)]
  pub formula: String,
}

/// Lattice vector selecting the field direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LatticeAxis {
  A,
  B,
  C,
}

impl LatticeAxis {
  pub fn index(self) -> usize {
    match self {
      LatticeAxis::A => 0,
      LatticeAxis::B => 1,
      LatticeAxis::C => 2,
    }
  }

  /// Miller-style direction label, e.g. `001` for c
  pub fn miller_label(self) -> &'static str {
    match self {
      LatticeAxis::A => "100",
      LatticeAxis::B => "010",
      LatticeAxis::C => "001",
    }
  }
}

impl Structure {
  pub fn new(lattice: [[f64; 3]; 3], atoms: Vec<Atom>) -> Self {
    let mut s = Self { lattice, atoms, formula: String::new() };
    s.formula = s.reduced_formula();
    s
  }

  pub fn num_sites(&self) -> usize {
    self.atoms.len()
  }

  /// Element counts in electronegativity order
  pub fn composition(&self) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for atom in &self.atoms {
      *counts.entry(atom.element.as_str()).or_insert(0) += 1;
    }
    let mut symbols: Vec<&str> = counts.keys().copied().collect();
    elements::sort_by_electronegativity(&mut symbols);
    symbols.into_iter().map(|s| (s.to_string(), counts[s])).collect()
  }

  /// Formula with counts divided by their common divisor, e.g. `BaTiO3`
  pub fn reduced_formula(&self) -> String {
    let comp = self.composition();
    let divisor = comp.iter().fold(0, |acc, (_, n)| gcd(acc, *n)).max(1);
    comp
      .iter()
      .map(|(el, n)| match n / divisor {
        1 => el.clone(),
        k => format!("{}{}", el, k),
      })
      .collect()
  }

  /// Lattice vector along `axis` divided by its length
  pub fn axis_unit_vector(&self, axis: LatticeAxis) -> Result<[f64; 3]> {
    let v = self.lattice[axis.index()];
    linalg::unit_vector(v).ok_or_else(|| {
      SweepError::DegenerateLattice(format!("lattice vector {:?} has zero length", axis))
    })
  }

  pub fn frac_coords(&self) -> Result<Vec<[f64; 3]>> {
    self
      .atoms
      .iter()
      .map(|atom| {
        linalg::cart_to_frac(atom.position, self.lattice).ok_or_else(|| {
          SweepError::DegenerateLattice("lattice matrix is singular".to_string())
        })
      })
      .collect()
  }

  /// Copy with sites stably sorted by electronegativity, so every species
  /// forms one contiguous block
  pub fn sorted_by_electronegativity(&self) -> Structure {
    let mut atoms = self.atoms.clone();
    atoms.sort_by(|a, b| {
      elements::electronegativity(&a.element)
        .total_cmp(&elements::electronegativity(&b.element))
        .then_with(|| a.element.cmp(&b.element))
    });
    Structure { lattice: self.lattice, atoms, formula: self.formula.clone() }
  }

  /// Contiguous (species, count) blocks in site order
  pub fn species_blocks(&self) -> Vec<(String, usize)> {
    let mut blocks: Vec<(String, usize)> = Vec::new();
    for atom in &self.atoms {
      match blocks.last_mut() {
        Some((el, n)) if *el == atom.element => *n += 1,
        _ => blocks.push((atom.element.clone(), 1)),
      }
    }
    blocks
  }
}

fn gcd(a: usize, b: usize) -> usize {
  if b == 0 { a } else { gcd(b, a % b) }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use approx::assert_relative_eq;

  /// Cubic BaTiO3, a = 4.0 Å, atoms listed O-first to exercise sorting
  pub(crate) fn batio3() -> Structure {
    let a = 4.0;
    let lattice = [[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]];
    let frac = [
      ("O", [0.5, 0.5, 0.0]),
      ("Ba", [0.0, 0.0, 0.0]),
      ("O", [0.5, 0.0, 0.5]),
      ("Ti", [0.5, 0.5, 0.5]),
      ("O", [0.0, 0.5, 0.5]),
    ];
    let atoms = frac
      .iter()
      .map(|(el, f)| Atom {
        element: el.to_string(),
        position: linalg::frac_to_cart(*f, lattice),
      })
      .collect();
    Structure::new(lattice, atoms)
  }

  #[test]
  fn test_reduced_formula() {
    assert_eq!(batio3().reduced_formula(), "BaTiO3");

    let mut doubled = batio3();
    let extra = doubled.atoms.clone();
    doubled.atoms.extend(extra);
    assert_eq!(doubled.reduced_formula(), "BaTiO3");
  }

  #[test]
  fn test_axis_unit_vector_hexagonal() {
    let lattice = [[3.0, 0.0, 0.0], [-1.5, 2.598, 0.0], [0.0, 0.0, 7.5]];
    let s = Structure::new(lattice, vec![]);
    let c_hat = s.axis_unit_vector(LatticeAxis::C).unwrap();
    assert_relative_eq!(c_hat[2], 1.0, epsilon = 1e-12);
    let b_hat = s.axis_unit_vector(LatticeAxis::B).unwrap();
    assert_relative_eq!(b_hat[0] * b_hat[0] + b_hat[1] * b_hat[1], 1.0, epsilon = 1e-12);
  }

  #[test]
  fn test_zero_axis_is_error() {
    let lattice = [[3.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 0.0]];
    let s = Structure::new(lattice, vec![]);
    assert!(s.axis_unit_vector(LatticeAxis::C).is_err());
  }

  #[test]
  fn test_sorted_blocks() {
    let sorted = batio3().sorted_by_electronegativity();
    assert_eq!(
      sorted.species_blocks(),
      vec![("Ba".to_string(), 1), ("Ti".to_string(), 1), ("O".to_string(), 3)]
    );
  }

  #[test]
  fn test_frac_coords() {
    let frac = batio3().frac_coords().unwrap();
    assert_relative_eq!(frac[3][0], 0.5, epsilon = 1e-12);
  }
}
