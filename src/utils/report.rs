// src/utils/report.rs

use crate::model::Structure;

/// Site table for a fetched structure, logged at debug level
pub fn structure_summary(structure: &Structure, material_id: &str) -> String {
  let formula_str: String = structure
    .composition()
    .iter()
    .map(|(el, count)| format!("{}{}", el, count))
    .collect::<Vec<_>>()
    .join(" ");

  let mut out = String::new();
  out.push_str(&format!("Material: {}\n", material_id));
  out.push_str(&format!("Formula: {}\n", formula_str));
  for (label, v) in ["a", "b", "c"].iter().zip(&structure.lattice) {
    out.push_str(&format!("{}: {:>10.4} {:>10.4} {:>10.4}\n", label, v[0], v[1], v[2]));
  }
  out.push_str("--------------------------------------------------\n");
  out.push_str(&format!(
    "{:<8} {:<8} {:<10} {:<10} {:<10}\n",
    "Index", "Element", "X", "Y", "Z"
  ));
  out.push_str("--------------------------------------------------\n");

  for (i, atom) in structure.atoms.iter().take(20).enumerate() {
    out.push_str(&format!(
      "{:<8} {:<8} {:<10.4} {:<10.4} {:<10.4}\n",
      i, atom.element, atom.position[0], atom.position[1], atom.position[2]
    ));
  }

  if structure.atoms.len() > 20 {
    out.push_str(&format!("... and {} more atoms.\n", structure.atoms.len() - 20));
  }

  out
}

/// Percentage of successes; 0 when nothing was processed
pub fn success_rate(success: usize, failed: usize) -> f64 {
  let total = success + failed;
  if total == 0 {
    0.0
  } else {
    success as f64 / total as f64 * 100.0
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::structure::tests::batio3;

  #[test]
  fn summary_lists_composition_and_sites() {
    let text = structure_summary(&batio3(), "mp-2998");
    assert!(text.starts_with("Material: mp-2998\nFormula: Ba1 Ti1 O3\n"));
    assert_eq!(text.lines().filter(|l| l.contains(" O ")).count(), 3);
  }

  #[test]
  fn rate() {
    assert_eq!(success_rate(3, 1), 75.0);
    assert_eq!(success_rate(0, 0), 0.0);
  }
}
