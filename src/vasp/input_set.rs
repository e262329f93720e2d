// src/vasp/input_set.rs

use crate::error::{Result, SweepError};
use crate::io::poscar;
use crate::model::{elements, Structure};
use crate::vasp::incar::{Incar, IncarValue};
use crate::vasp::kpoints::Kpoints;
use crate::vasp::potcar;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// User INCAR settings; a `None` value deletes the tag from the generated set.
pub type IncarSettings = BTreeMap<String, Option<IncarValue>>;

const EDIFF_PER_ATOM: f64 = 5e-5;

/// Anions that switch on +U for the transition metals in the element table
const U_ANIONS: [&str; 2] = ["O", "F"];

fn relax_defaults() -> Incar {
  let mut incar = Incar::new();
  incar
    .set("ALGO", "Fast")
    .set("ENCUT", 520)
    .set("IBRION", 2)
    .set("ISIF", 3)
    .set("ISMEAR", -5)
    .set("ISPIN", 2)
    .set("LASPH", true)
    .set("LORBIT", 11)
    .set("LREAL", "Auto")
    .set("LWAVE", false)
    .set("NELM", 100)
    .set("NSW", 99)
    .set("PREC", "Accurate")
    .set("SIGMA", 0.05);
  incar
}

fn static_overrides() -> Incar {
  let mut incar = Incar::new();
  incar
    .set("ALGO", "Normal")
    .set("ICHARG", 0)
    .set("ISMEAR", -5)
    .set("LAECHG", true)
    .set("LCHARG", true)
    .set("LORBIT", 11)
    .set("LVHAR", true)
    .set("LWAVE", false)
    .set("NSW", 0);
  incar
}

/// Static single-point input set in the Materials Project convention.
///
/// Sites are sorted by electronegativity on construction so that POSCAR,
/// POTCAR.spec and the per-species INCAR lists share one species order.
#[derive(Debug, Clone)]
pub struct StaticSet {
  structure: Structure,
  user_incar: IncarSettings,
  kpoints: Kpoints,
}

impl StaticSet {
  pub fn new(structure: &Structure, user_incar: IncarSettings, kpoints: Kpoints) -> Self {
    Self {
      structure: structure.sorted_by_electronegativity(),
      user_incar,
      kpoints,
    }
  }

  pub fn with_setting<V: Into<IncarValue>>(mut self, tag: &str, value: V) -> Self {
    self.user_incar.insert(tag.to_uppercase(), Some(value.into()));
    self
  }

  pub fn incar(&self) -> Result<Incar> {
    let mut incar = relax_defaults();
    incar.merge(&static_overrides());
    incar.set("EDIFF", EDIFF_PER_ATOM * self.structure.num_sites() as f64);

    let magmom = self
      .structure
      .atoms
      .iter()
      .map(|atom| {
        elements::lookup(&atom.element)
          .map(|e| e.magmom)
          .ok_or_else(|| SweepError::UnknownElement(atom.element.clone()))
      })
      .collect::<Result<Vec<f64>>>()?;
    incar.set("MAGMOM", magmom);

    self.apply_hubbard_u(&mut incar);

    incar.apply_overrides(&self.user_incar);
    Ok(incar)
  }

  fn apply_hubbard_u(&self, incar: &mut Incar) {
    let blocks = self.structure.species_blocks();
    let anion = match blocks.last() {
      Some((el, _)) if U_ANIONS.contains(&el.as_str()) => el,
      _ => return,
    };
    let u_values: Vec<f64> = blocks
      .iter()
      .map(|(el, _)| elements::lookup(el).map(|e| e.hubbard_u).unwrap_or(0.0))
      .collect();
    if u_values.iter().all(|&u| u == 0.0) {
      return;
    }
    log::debug!("+U on {} for {}", anion, self.structure.formula);

    let l_values: Vec<i64> = u_values.iter().map(|&u| if u > 0.0 { 2 } else { 0 }).collect();
    incar
      .set("LDAU", true)
      .set("LDAUTYPE", 2)
      .set("LDAUPRINT", 1)
      .set("LDAUL", l_values)
      .set("LDAUJ", vec![0.0; u_values.len()])
      .set("LDAUU", u_values)
      .set("LMAXMIX", 4);
  }

  /// Writes INCAR, KPOINTS, POSCAR and POTCAR.spec into `dir`, creating it
  /// if needed and overwriting existing files
  pub fn write_input(&self, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join("INCAR"), self.incar()?.to_string())?;
    fs::write(dir.join("KPOINTS"), self.kpoints.to_string())?;
    poscar::write(&dir.join("POSCAR"), &self.structure)?;
    let symbols = potcar::potcar_symbols(&self.structure)?;
    fs::write(dir.join("POTCAR.spec"), potcar::spec_string(&symbols))?;
    log::debug!("wrote input set to {}", dir.display());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::structure::tests::batio3;
  use crate::model::Atom;
  use crate::utils::test_dir;
  use approx::assert_relative_eq;

  fn mesh() -> Kpoints {
    Kpoints::gamma_automatic([8, 8, 8])
  }

  #[test]
  fn static_defaults() {
    let set = StaticSet::new(&batio3(), IncarSettings::new(), mesh());
    let incar = set.incar().unwrap();
    assert_eq!(incar.get("NSW"), Some(&IncarValue::Int(0)));
    assert_eq!(incar.get("ALGO"), Some(&IncarValue::Str("Normal".into())));
    assert_eq!(incar.get("LVHAR"), Some(&IncarValue::Bool(true)));
    match incar.get("EDIFF") {
      Some(IncarValue::Float(x)) => assert_relative_eq!(*x, 2.5e-4, epsilon = 1e-15),
      other => panic!("unexpected EDIFF {:?}", other),
    }
    // no U for Ti
    assert!(!incar.contains("LDAU"));
  }

  #[test]
  fn user_settings_win_and_none_removes() {
    let mut user = IncarSettings::new();
    user.insert("ISMEAR".into(), Some(IncarValue::Int(0)));
    user.insert("LVHAR".into(), None);
    let set = StaticSet::new(&batio3(), user, mesh()).with_setting("SKIP_EDOTP", true);
    let incar = set.incar().unwrap();
    assert_eq!(incar.get("ISMEAR"), Some(&IncarValue::Int(0)));
    assert!(!incar.contains("LVHAR"));
    assert_eq!(incar.get("SKIP_EDOTP"), Some(&IncarValue::Bool(true)));
  }

  #[test]
  fn oxide_with_iron_gets_plus_u() {
    let lattice = [[4.3, 0.0, 0.0], [0.0, 4.3, 0.0], [0.0, 0.0, 4.3]];
    let s = Structure::new(
      lattice,
      vec![
        Atom { element: "O".into(), position: [2.15, 0.0, 0.0] },
        Atom { element: "Fe".into(), position: [0.0, 0.0, 0.0] },
      ],
    );
    let incar = StaticSet::new(&s, IncarSettings::new(), mesh()).incar().unwrap();
    assert_eq!(incar.get("LDAU"), Some(&IncarValue::Bool(true)));
    assert_eq!(incar.get("LDAUL"), Some(&IncarValue::from(vec![2i64, 0])));
    assert_eq!(incar.get("LDAUU"), Some(&IncarValue::from(vec![5.3, 0.0])));
    assert_eq!(incar.get("MAGMOM"), Some(&IncarValue::from(vec![5.0, 0.6])));
  }

  #[test]
  fn write_input_files() {
    let dir = test_dir("input_set_write");
    let set = StaticSet::new(&batio3(), IncarSettings::new(), mesh());
    set.write_input(&dir.join("E0_ref")).unwrap();

    for name in ["INCAR", "KPOINTS", "POSCAR", "POTCAR.spec"] {
      assert!(dir.join("E0_ref").join(name).is_file(), "{} missing", name);
    }
    let spec = fs::read_to_string(dir.join("E0_ref/POTCAR.spec")).unwrap();
    assert_eq!(spec, "Ba_sv\nTi_pv\nO\n");
    let incar = fs::read_to_string(dir.join("E0_ref/INCAR")).unwrap();
    assert!(incar.contains("MAGMOM = 5*0.6\n"));
    let _ = fs::remove_dir_all(&dir);
  }
}
