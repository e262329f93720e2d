// src/source/mod.rs
pub mod mp_rester;

use crate::error::{Result, SweepError};
use crate::io;
use crate::model::Structure;
use std::path::PathBuf;

pub use mp_rester::MpRester;

/// Where crystal structures come from
pub trait StructureSource: Sync {
  fn fetch(&self, material_id: &str) -> Result<Structure>;
}

/// Structures already on disk, named after their material id:
/// `<id>.json`, `<id>.vasp` or `<id>/POSCAR`
#[derive(Debug, Clone)]
pub struct LocalStore {
  dir: PathBuf,
}

impl LocalStore {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  fn candidates(&self, material_id: &str) -> [PathBuf; 3] {
    [
      self.dir.join(format!("{}.json", material_id)),
      self.dir.join(format!("{}.vasp", material_id)),
      self.dir.join(material_id).join("POSCAR"),
    ]
  }
}

impl StructureSource for LocalStore {
  fn fetch(&self, material_id: &str) -> Result<Structure> {
    let path = self
      .candidates(material_id)
      .into_iter()
      .find(|p| p.is_file())
      .ok_or_else(|| SweepError::NotFound(material_id.to_string()))?;
    log::debug!("loading {} from {}", material_id, path.display());
    io::load_structure(&path)
  }
}
