// src/error.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SweepError {
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),

  #[error("Spreadsheet error: {0}")]
  Spreadsheet(String),

  #[error("Network error: {0}")]
  Network(#[from] reqwest::Error),

  #[error("HTTP {status} from {url}: {body}")]
  Http { status: u16, url: String, body: String },

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("Set MP_API_KEY (or PMG_MAPI_KEY) in your environment.")]
  MissingApiKey,

  #[error("No structure found for {0}")]
  NotFound(String),

  #[error("Site {index} is disordered ({detail}); VASP needs an ordered structure")]
  Disordered { index: usize, detail: String },

  #[error("Unknown element symbol: {0}")]
  UnknownElement(String),

  #[error("Degenerate lattice: {0}")]
  DegenerateLattice(String),

  #[error("Invalid POSCAR: {0}")]
  Poscar(String),

  #[error("Invalid configuration: {0}")]
  Config(String),
}

pub type Result<T> = std::result::Result<T, SweepError>;
