// src/io/poscar.rs

use crate::error::{Result, SweepError};
use crate::model::{Atom, Structure};
use crate::utils::linalg::frac_to_cart;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

fn invalid(msg: &str) -> SweepError {
  SweepError::Poscar(msg.to_string())
}

fn parse_floats(line: &str, what: &str) -> Result<[f64; 3]> {
  let parts: Vec<&str> = line.split_whitespace().collect();
  if parts.len() < 3 {
    return Err(invalid(what));
  }
  let mut out = [0.0; 3];
  for (slot, part) in out.iter_mut().zip(&parts) {
    *slot = part.parse().map_err(|_| invalid(what))?;
  }
  Ok(out)
}

pub fn parse(path: &Path) -> Result<Structure> {
  let text = fs::read_to_string(path)?;
  parse_str(&text)
}

/// Parses VASP 5 POSCAR text (species line required)
pub fn parse_str(text: &str) -> Result<Structure> {
  let mut lines = text.lines();
  let mut next = |what: &str| lines.next().ok_or_else(|| invalid(what));

  let _comment = next("Unexpected EOF")?;

  let scale: f64 = next("Missing scale")?
    .trim()
    .parse()
    .map_err(|_| invalid("Invalid Scale"))?;

  let mut lattice = [[0.0; 3]; 3];
  for row in lattice.iter_mut() {
    let v = parse_floats(next("Missing Lattice")?, "Invalid Lattice Line")?;
    *row = [v[0] * scale, v[1] * scale, v[2] * scale];
  }

  let elements_line = next("Missing Elements")?;
  if !elements_line.trim().starts_with(|c: char| c.is_alphabetic()) {
    return Err(invalid("Species line is required"));
  }
  let element_names: Vec<&str> = elements_line.split_whitespace().collect();
  let counts: Vec<usize> = next("Missing Counts")?
    .split_whitespace()
    .map(|x| x.parse().map_err(|_| invalid("Invalid Counts")))
    .collect::<Result<_>>()?;
  if counts.len() != element_names.len() {
    return Err(invalid("Species and counts lines differ in length"));
  }

  let mut mode_line = next("Missing Mode")?.trim().to_lowercase();
  if mode_line.starts_with('s') {
    // Selective dynamics
    mode_line = next("Missing Mode")?.trim().to_lowercase();
  }
  let is_direct = mode_line.starts_with('d');

  let mut atoms = Vec::new();
  for (name, &count) in element_names.iter().zip(&counts) {
    for _ in 0..count {
      let p = parse_floats(next("Missing Atom Pos")?, "Invalid Atom Pos")?;
      let position = if is_direct {
        frac_to_cart(p, lattice)
      } else {
        [p[0] * scale, p[1] * scale, p[2] * scale]
      };
      atoms.push(Atom { element: name.to_string(), position });
    }
  }

  Ok(Structure::new(lattice, atoms))
}

/// POSCAR text with one block per species in site order.
///
/// Callers sort the structure first when the site order interleaves species.
pub fn to_string(structure: &Structure) -> Result<String> {
  let blocks = structure.species_blocks();
  let frac = structure.frac_coords()?;
  let mut out = String::new();

  // 1. Header
  let _ = writeln!(out, "{}", structure.reduced_formula());
  let _ = writeln!(out, "1.0");

  // 2. Lattice Vectors
  for vec in &structure.lattice {
    let _ = writeln!(out, "{:22.16}{:22.16}{:22.16}", vec[0], vec[1], vec[2]);
  }

  // 3. Species and counts
  let names: Vec<&str> = blocks.iter().map(|(el, _)| el.as_str()).collect();
  let counts: Vec<String> = blocks.iter().map(|(_, n)| n.to_string()).collect();
  let _ = writeln!(out, "{}", names.join(" "));
  let _ = writeln!(out, "{}", counts.join(" "));

  // 4. Atomic Positions (Direct/Fractional)
  let _ = writeln!(out, "direct");
  for (atom, f) in structure.atoms.iter().zip(&frac) {
    let _ = writeln!(out, "{:22.16}{:22.16}{:22.16} {}", f[0], f[1], f[2], atom.element);
  }

  Ok(out)
}

pub fn write(path: &Path, structure: &Structure) -> Result<()> {
  fs::write(path, to_string(structure)?)?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::structure::tests::batio3;
  use approx::assert_relative_eq;

  const BATIO3: &str = "BaTiO3
1.0
4.0 0.0 0.0
0.0 4.0 0.0
0.0 0.0 4.0
Ba Ti O
1 1 3
Direct
0.0 0.0 0.0
0.5 0.5 0.5
0.5 0.5 0.0
0.5 0.0 0.5
0.0 0.5 0.5
";

  #[test]
  fn parse_direct() {
    let s = parse_str(BATIO3).unwrap();
    assert_eq!(s.atoms.len(), 5);
    assert_eq!(s.formula, "BaTiO3");
    assert_relative_eq!(s.atoms[1].position[2], 2.0, epsilon = 1e-12);
  }

  #[test]
  fn parse_rejects_truncated_file() {
    let truncated: String = BATIO3.lines().take(10).collect::<Vec<_>>().join("\n");
    assert!(parse_str(&truncated).is_err());
  }

  #[test]
  fn parse_cartesian_with_scale() {
    let text = "x\n2.0\n1 0 0\n0 1 0\n0 0 1\nSi\n1\nCartesian\n0.25 0.25 0.25\n";
    let s = parse_str(text).unwrap();
    assert_relative_eq!(s.lattice[0][0], 2.0);
    assert_relative_eq!(s.atoms[0].position[0], 0.5);
  }

  #[test]
  fn write_groups_sorted_species() {
    let text = to_string(&batio3().sorted_by_electronegativity()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "BaTiO3");
    assert_eq!(lines[5], "Ba Ti O");
    assert_eq!(lines[6], "1 1 3");
    assert_eq!(lines[7], "direct");
    assert!(lines[8].ends_with(" Ba"));
    assert_eq!(lines.len(), 13);

    let back = parse_str(&text).unwrap();
    assert_eq!(back.species_blocks(), batio3().sorted_by_electronegativity().species_blocks());
  }
}
