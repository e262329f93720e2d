// src/vasp/kpoints.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Automatic Γ-centred Monkhorst-Pack mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kpoints {
  pub mesh: [u32; 3],
}

impl Kpoints {
  pub fn gamma_automatic(mesh: [u32; 3]) -> Self {
    Self { mesh }
  }
}

impl fmt::Display for Kpoints {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Automatic kpoint scheme")?;
    writeln!(f, "0")?;
    writeln!(f, "Gamma")?;
    writeln!(f, "{} {} {}", self.mesh[0], self.mesh[1], self.mesh[2])
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn gamma_mesh_text() {
    let k = Kpoints::gamma_automatic([8, 8, 8]);
    assert_eq!(k.to_string(), "Automatic kpoint scheme\n0\nGamma\n8 8 8\n");
  }
}
