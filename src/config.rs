// src/config.rs

use crate::error::{Result, SweepError};
use crate::model::LatticeAxis;
use crate::vasp::{IncarSettings, IncarValue};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

pub const DEFAULT_ENDPOINT: &str = "https://api.materialsproject.org";
pub const MAX_RETRIES: u32 = 10;

/// Finite-field INCAR shared by the reference and every field point
pub fn default_common_incar() -> IncarSettings {
  let entries: [(&str, IncarValue); 16] = [
    ("LCALCEPS", false.into()),
    ("LCALCPOL", true.into()),
    ("ISMEAR", 0.into()),
    ("SIGMA", 0.05.into()),
    ("EDIFF", 1e-6.into()),
    ("PREC", "Accurate".into()),
    ("ADDGRID", true.into()),
    ("LREAL", false.into()),
    ("LCHARG", false.into()),
    ("LWAVE", false.into()),
    ("ENCUT", 520.into()),
    ("NSW", 0.into()),
    ("IBRION", (-1).into()),
    // the field breaks the crystal symmetry
    ("ISYM", 0.into()),
    ("SYMPREC", 1e-8.into()),
    ("LASPH", true.into()),
  ];
  entries.into_iter().map(|(k, v)| (k.to_string(), Some(v))).collect()
}

/// Tags added on top of the common INCAR for field points only
pub fn default_field_incar() -> IncarSettings {
  [("SKIP_EDOTP".to_string(), Some(IncarValue::Bool(true)))].into_iter().collect()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
  /// Materials Project API base URL
  pub endpoint: String,
  pub timeout_secs: u64,
  /// Retries on HTTP 429 and 5xx
  pub max_retries: u32,

  pub output_root: PathBuf,
  pub max_materials: usize,
  /// Field strengths in eV/Å
  pub field_magnitudes: Vec<f64>,
  pub axis: LatticeAxis,
  pub kmesh: [u32; 3],
  /// Materials processed concurrently
  pub jobs: usize,

  pub common_incar: IncarSettings,
  pub field_incar: IncarSettings,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      endpoint: DEFAULT_ENDPOINT.to_string(),
      timeout_secs: 60,
      max_retries: 2,
      output_root: PathBuf::from("."),
      max_materials: 256,
      field_magnitudes: vec![-0.003, -0.001, 0.001, 0.003],
      axis: LatticeAxis::C,
      kmesh: [8, 8, 8],
      jobs: 1,
      common_incar: default_common_incar(),
      field_incar: default_field_incar(),
    }
  }
}

impl Config {
  /// Loads config from standard OS location (e.g., ~/.config/efield-sweep/settings.json)
  pub fn load() -> (Self, String) {
    let path = Self::get_path();
    if path.exists() {
      match Self::load_from(&path) {
        Ok(cfg) => (cfg, format!("Config loaded from {:?}", path)),
        Err(e) => (Self::default(), format!("Error reading config: {}", e)),
      }
    } else {
      (
        Self::default(),
        "No config found. Using defaults.".to_string(),
      )
    }
  }

  pub fn load_from(path: &Path) -> Result<Self> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
  }

  pub fn save_to(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, self)?;
    Ok(())
  }

  pub fn validate(&self) -> Result<()> {
    let fail = |msg: String| Err(SweepError::Config(msg));
    if self.field_magnitudes.is_empty() {
      return fail("field_magnitudes is empty".into());
    }
    if let Some(e) = self.field_magnitudes.iter().find(|e| !e.is_finite()) {
      return fail(format!("field magnitude {} is not finite", e));
    }
    if self.kmesh.contains(&0) {
      return fail(format!("k-mesh {:?} has a zero component", self.kmesh));
    }
    if self.jobs == 0 {
      return fail("jobs must be at least 1".into());
    }
    if self.max_materials == 0 {
      return fail("max_materials must be at least 1".into());
    }
    if self.max_retries > MAX_RETRIES {
      return fail(format!("max_retries {} exceeds {}", self.max_retries, MAX_RETRIES));
    }
    Ok(())
  }

  pub fn get_path() -> PathBuf {
    if let Some(proj) = ProjectDirs::from("org", "mavensgroup", "efield-sweep") {
      proj.config_dir().join("settings.json")
    } else {
      PathBuf::from("settings.json")
    }
  }
}
