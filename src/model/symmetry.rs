// src/model/symmetry.rs

use crate::model::elements::get_atomic_number;
use crate::model::Structure;
use crate::utils::linalg::lattice_matrix;
use moyo::base::{AngleTolerance, Cell, Lattice};
use moyo::data::Setting;
use moyo::MoyoDataset;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

const SYMPREC: f64 = 1e-4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymmetryInfo {
  pub number: i32,
  pub symbol: String,
  pub system: String,
}

/// Space group of the structure as found by moyo
pub fn analyze(structure: &Structure) -> Result<SymmetryInfo, String> {
  let lattice_mat = lattice_matrix(structure.lattice);
  let inv_mat = lattice_mat.try_inverse().ok_or("Invalid lattice")?;

  let mut positions = Vec::with_capacity(structure.atoms.len());
  let mut numbers = Vec::with_capacity(structure.atoms.len());
  for atom in &structure.atoms {
    let v_cart = Vector3::new(atom.position[0], atom.position[1], atom.position[2]);
    positions.push(inv_mat.transpose() * v_cart);

    let z = get_atomic_number(&atom.element);
    numbers.push(if z == 0 { 1 } else { z });
  }

  let cell = Cell::new(Lattice::new(lattice_mat), positions, numbers);
  let dataset = MoyoDataset::new(&cell, SYMPREC, AngleTolerance::Default, Setting::Spglib, true)
    .map_err(|e| format!("Symmetry search failed: {:?}", e))?;

  Ok(SymmetryInfo {
    number: dataset.number,
    symbol: space_group_symbol(dataset.number).to_string(),
    system: crystal_system(dataset.number).to_string(),
  })
}

pub fn crystal_system(number: i32) -> &'static str {
  match number {
    1..=2 => "Triclinic",
    3..=15 => "Monoclinic",
    16..=74 => "Orthorhombic",
    75..=142 => "Tetragonal",
    143..=167 => "Trigonal",
    168..=194 => "Hexagonal",
    195..=230 => "Cubic",
    _ => "Unknown",
  }
}

pub fn space_group_symbol(number: i32) -> &'static str {
  if (1..=230).contains(&number) {
    SG_SYMBOLS[number as usize]
  } else {
    "Unknown"
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::structure::tests::batio3;

  #[test]
  fn cubic_perovskite_is_pm3m() {
    let info = analyze(&batio3()).unwrap();
    assert_eq!(info.number, 221);
    assert_eq!(info.symbol, "Pm-3m");
    assert_eq!(info.system, "Cubic");
  }

  #[test]
  fn symbol_table_edges() {
    assert_eq!(space_group_symbol(1), "P1");
    assert_eq!(space_group_symbol(214), "I4_132");
    assert_eq!(space_group_symbol(230), "Ia-3d");
    assert_eq!(space_group_symbol(0), "Unknown");
  }
}

// Hermann-Mauguin symbols indexed by space group number
const SG_SYMBOLS: [&str; 231] = ["","P1", "P-1", "P121", "P12_11", "C121", "P1m1", "P1c1", "C1m1", "C1c1", "P12/m1", "P12_1/m1", "C12/m1", "P12/c1", "P12_1/c1", "C12/c1", "P222", "P222_1", "P2_12_12", "P2_12_12_1", "C222_1", "C222", "F222", "I222", "I2_12_12_1", "Pmm2", "Pmc2_1", "Pcc2", "Pma2", "Pca2_1", "Pnc2", "Pmn2_1", "Pba2", "Pna2_1", "Pnn2", "Cmm2", "Cmc2_1", "Ccc2", "Amm2", "Aem2", "Ama2", "Aea2", "Fmm2", "Fdd2", "Imm2", "Iba2", "Ima2", "Pmmm", "Pnnn", "Pccm", "Pban", "Pmma", "Pnna", "Pmna", "Pcca", "Pbam", "Pccn", "Pbcm", "Pnnm", "Pmmn", "Pbcn", "Pbca", "Pnma", "Cmcm", "Cmce", "Cmmm", "Cccm", "Cmme", "Ccce", "Fmmm", "Fddd", "Immm", "Ibam", "Ibca", "Imma", "P4", "P4_1", "P4_2", "P4_3", "I4", "I4_1", "P-4", "I-4", "P4/m", "P4_2/m", "P4/n", "P4_2/n", "I4/m", "I4_1/a", "P422", "P42_12", "P4_122", "P4_12_12", "P4_222", "P4_22_12", "P4_322", "P4_32_12", "I422", "I4_122", "P4mm", "P4bm", "P4_2cm", "P4_2nm", "P4cc", "P4nc", "P4_2mc", "P4_2bc", "I4mm", "I4cm", "I4_1md", "I4_1cd", "P-42m", "P42c", "P-42_1m", "P-42_1c", "P-4m2", "P-4c2", "P-4b2", "P-4n2", "I-4m2", "I-4c2", "I-42m", "I-42d", "P4/mmm", "P4/mcc", "P4/nbm", "P4/nnc", "P4/mbm", "P4/mnc", "P4/nmm", "P4/ncc", "P4_2/mmc", "P4_2/mcm", "P4_2/nbc", "P4_2/nnm", "P4_2/mbc", "P4_2/mnm", "P4_2/nmc", "P4_2/ncm", "I4/mmm", "I4/mcm", "I4_1/amd", "I4_1/acd", "P3", "P3_1", "P3_2", "R3", "P-3", "R-3", "P312", "P321", "P3_112", "P3_121", "P3_212", "P3_221", "R32", "P3m1", "P31m", "P3c1", "P31c", "R3m", "R3c", "P-31m", "P-31c", "P-3m1", "P-3c1", "R-3m", "R-3c", "P6", "P6_1", "P6_5", "P6_2", "P6_4", "P6_3", "P-6", "P6/m", "P6_3/m", "P622", "P6_122", "P6_522", "P6_222", "P6_422", "P6_322", "P6mm", "P6cc", "P6_3cm", "P6_3mc", "P-6m2", "P-6c2", "P-62m", "P-62c", "P6/mmm", "P6/mcc", "P6_3/mcm", "P6_3/mmc", "P23", "F23", "I23", "P2_13", "I2_13", "Pm-3", "Pn-3", "Fm-3", "Fd-3", "Im-3", "Pa-3", "Ia-3", "P432", "P4_232", "F432", "F4_132", "I432", "P4_332", "P4_132", "I4_132", "P-43m", "F-43m", "I-43m", "P-43n", "F-43c", "I-43d", "Pm-3m", "Pn-3n", "Pm-3n", "Pn-3m", "Fm-3m", "Fm-3c", "Fd-3m", "Fd-3c", "Im-3m", "Ia-3d"];
