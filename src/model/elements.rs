// src/model/elements.rs

/// Per-element data needed to build a VASP input set.
///
/// Electronegativities are Pauling values; noble gases without one sort last.
/// POTCAR symbols, default moments and +U values follow the Materials Project
/// parameter set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementData {
  pub symbol: &'static str,
  pub z: u8,
  pub electronegativity: f64,
  pub potcar: &'static str,
  pub magmom: f64,
  /// U (eV) applied on d states when the anion is O or F
  pub hubbard_u: f64,
}

const NO_X: f64 = f64::INFINITY;
const MAGMOM_DEFAULT: f64 = 0.6;

macro_rules! el {
  ($sym:expr, $z:expr, $x:expr, $pot:expr) => {
    el!($sym, $z, $x, $pot, MAGMOM_DEFAULT, 0.0)
  };
  ($sym:expr, $z:expr, $x:expr, $pot:expr, $mag:expr) => {
    el!($sym, $z, $x, $pot, $mag, 0.0)
  };
  ($sym:expr, $z:expr, $x:expr, $pot:expr, $mag:expr, $u:expr) => {
    ElementData {
      symbol: $sym,
      z: $z,
      electronegativity: $x,
      potcar: $pot,
      magmom: $mag,
      hubbard_u: $u,
    }
  };
}

static ELEMENTS: &[ElementData] = &[
  // --- Period 1 ---
  el!("H", 1, 2.20, "H"),
  el!("He", 2, NO_X, "He"),
  // --- Period 2 ---
  el!("Li", 3, 0.98, "Li_sv"),
  el!("Be", 4, 1.57, "Be_sv"),
  el!("B", 5, 2.04, "B"),
  el!("C", 6, 2.55, "C"),
  el!("N", 7, 3.04, "N"),
  el!("O", 8, 3.44, "O"),
  el!("F", 9, 3.98, "F"),
  el!("Ne", 10, NO_X, "Ne"),
  // --- Period 3 ---
  el!("Na", 11, 0.93, "Na_pv"),
  el!("Mg", 12, 1.31, "Mg_pv"),
  el!("Al", 13, 1.61, "Al"),
  el!("Si", 14, 1.90, "Si"),
  el!("P", 15, 2.19, "P"),
  el!("S", 16, 2.58, "S"),
  el!("Cl", 17, 3.16, "Cl"),
  el!("Ar", 18, NO_X, "Ar"),
  // --- Period 4 ---
  el!("K", 19, 0.82, "K_sv"),
  el!("Ca", 20, 1.00, "Ca_sv"),
  el!("Sc", 21, 1.36, "Sc_sv"),
  el!("Ti", 22, 1.54, "Ti_pv"),
  el!("V", 23, 1.63, "V_pv", 5.0, 3.25),
  el!("Cr", 24, 1.66, "Cr_pv", 5.0, 3.7),
  el!("Mn", 25, 1.55, "Mn_pv", 5.0, 3.9),
  el!("Fe", 26, 1.83, "Fe_pv", 5.0, 5.3),
  el!("Co", 27, 1.88, "Co", 0.6, 3.32),
  el!("Ni", 28, 1.91, "Ni_pv", 5.0, 6.2),
  el!("Cu", 29, 1.90, "Cu_pv"),
  el!("Zn", 30, 1.65, "Zn"),
  el!("Ga", 31, 1.81, "Ga_d"),
  el!("Ge", 32, 2.01, "Ge_d"),
  el!("As", 33, 2.18, "As"),
  el!("Se", 34, 2.55, "Se"),
  el!("Br", 35, 2.96, "Br"),
  el!("Kr", 36, 3.00, "Kr"),
  // --- Period 5 ---
  el!("Rb", 37, 0.82, "Rb_sv"),
  el!("Sr", 38, 0.95, "Sr_sv"),
  el!("Y", 39, 1.22, "Y_sv"),
  el!("Zr", 40, 1.33, "Zr_sv"),
  el!("Nb", 41, 1.60, "Nb_pv"),
  el!("Mo", 42, 2.16, "Mo_pv", 5.0, 4.38),
  el!("Tc", 43, 1.90, "Tc_pv"),
  el!("Ru", 44, 2.20, "Ru_pv"),
  el!("Rh", 45, 2.28, "Rh_pv"),
  el!("Pd", 46, 2.20, "Pd"),
  el!("Ag", 47, 1.93, "Ag"),
  el!("Cd", 48, 1.69, "Cd"),
  el!("In", 49, 1.78, "In_d"),
  el!("Sn", 50, 1.96, "Sn_d"),
  el!("Sb", 51, 2.05, "Sb"),
  el!("Te", 52, 2.10, "Te"),
  el!("I", 53, 2.66, "I"),
  el!("Xe", 54, 2.60, "Xe"),
  // --- Period 6 ---
  el!("Cs", 55, 0.79, "Cs_sv"),
  el!("Ba", 56, 0.89, "Ba_sv"),
  el!("La", 57, 1.10, "La"),
  el!("Ce", 58, 1.12, "Ce", 5.0),
  el!("Pr", 59, 1.13, "Pr_3"),
  el!("Nd", 60, 1.14, "Nd_3"),
  el!("Pm", 61, 1.13, "Pm_3"),
  el!("Sm", 62, 1.17, "Sm_3"),
  el!("Eu", 63, 1.20, "Eu", 10.0),
  el!("Gd", 64, 1.20, "Gd"),
  el!("Tb", 65, 1.10, "Tb_3"),
  el!("Dy", 66, 1.22, "Dy_3"),
  el!("Ho", 67, 1.23, "Ho_3"),
  el!("Er", 68, 1.24, "Er_3"),
  el!("Tm", 69, 1.25, "Tm_3"),
  el!("Yb", 70, 1.10, "Yb_2"),
  el!("Lu", 71, 1.27, "Lu_3"),
  el!("Hf", 72, 1.30, "Hf_pv"),
  el!("Ta", 73, 1.50, "Ta_pv"),
  el!("W", 74, 2.36, "W_pv", 5.0, 6.2),
  el!("Re", 75, 1.90, "Re_pv"),
  el!("Os", 76, 2.20, "Os_pv"),
  el!("Ir", 77, 2.20, "Ir"),
  el!("Pt", 78, 2.28, "Pt"),
  el!("Au", 79, 2.54, "Au"),
  el!("Hg", 80, 2.00, "Hg"),
  el!("Tl", 81, 1.62, "Tl_d"),
  el!("Pb", 82, 2.33, "Pb_d"),
  el!("Bi", 83, 2.02, "Bi_d"),
  // --- Actinides ---
  el!("Ac", 89, 1.10, "Ac"),
  el!("Th", 90, 1.30, "Th"),
  el!("Pa", 91, 1.50, "Pa"),
  el!("U", 92, 1.38, "U"),
  el!("Np", 93, 1.36, "Np"),
  el!("Pu", 94, 1.28, "Pu"),
];

pub fn lookup(symbol: &str) -> Option<&'static ElementData> {
  ELEMENTS.iter().find(|e| e.symbol == symbol)
}

/// Returns the atomic number for a symbol, 0 when unknown.
pub fn get_atomic_number(symbol: &str) -> i32 {
  lookup(symbol).map(|e| e.z as i32).unwrap_or(0)
}

pub fn electronegativity(symbol: &str) -> f64 {
  lookup(symbol).map(|e| e.electronegativity).unwrap_or(NO_X)
}

/// Species symbols in pymatgen's electronegativity order (ties broken by symbol).
pub fn sort_by_electronegativity<S: AsRef<str>>(symbols: &mut [S]) {
  symbols.sort_by(|a, b| {
    electronegativity(a.as_ref())
      .total_cmp(&electronegativity(b.as_ref()))
      .then_with(|| a.as_ref().cmp(b.as_ref()))
  });
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn known_and_unknown_symbols() {
    assert_eq!(get_atomic_number("Ti"), 22);
    assert_eq!(get_atomic_number("Xx"), 0);
    assert_eq!(lookup("Ba").unwrap().potcar, "Ba_sv");
    assert!(lookup("Po").is_none());
  }

  #[test]
  fn mp_relax_potcar_choices() {
    for (el, potcar) in [("Bi", "Bi_d"), ("Pb", "Pb_d"), ("Fe", "Fe_pv"), ("Yb", "Yb_2")] {
      assert_eq!(lookup(el).unwrap().potcar, potcar, "{}", el);
    }
  }

  #[test]
  fn perovskite_species_order() {
    let mut species = vec!["O", "Ti", "Ba"];
    sort_by_electronegativity(&mut species);
    assert_eq!(species, vec!["Ba", "Ti", "O"]);
  }

  #[test]
  fn noble_gas_sorts_last() {
    let mut species = vec!["Ar", "F", "Na"];
    sort_by_electronegativity(&mut species);
    assert_eq!(species, vec!["Na", "F", "Ar"]);
  }

  #[test]
  fn u_values_only_on_transition_metals() {
    assert_eq!(lookup("Fe").unwrap().hubbard_u, 5.3);
    assert_eq!(lookup("Ti").unwrap().hubbard_u, 0.0);
  }
}
