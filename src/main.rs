use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod physics;
pub mod source;
pub mod sweep;
pub mod utils;
pub mod vasp;

use config::Config;
use error::Result;
use model::LatticeAxis;
use source::{LocalStore, MpRester, StructureSource};

#[derive(Parser, Debug)]
#[command(
  name = "efield-sweep",
  version,
  about = "Write VASP finite electric-field sweeps for Materials Project structures"
)]
struct Cli {
  /// CSV or spreadsheet with a `material_id` column
  #[arg(required_unless_present = "write_config")]
  ids: Option<PathBuf>,
  /// Directory receiving the finite_field_sweep_<id> trees
  #[arg(short, long)]
  output: Option<PathBuf>,
  /// JSON settings file (defaults to the user config directory)
  #[arg(short, long)]
  config: Option<PathBuf>,
  /// Only the first N ids are processed
  #[arg(long)]
  max_materials: Option<usize>,
  /// Field magnitude in eV/A; repeat for a sweep
  #[arg(long = "field", allow_negative_numbers = true)]
  fields: Vec<f64>,
  /// Lattice vector giving the field direction
  #[arg(long, value_enum)]
  axis: Option<LatticeAxis>,
  /// Gamma-centred k-point mesh
  #[arg(long, num_args = 3, value_names = ["N1", "N2", "N3"])]
  kmesh: Option<Vec<u32>>,
  /// Read <id>.json / <id>.vasp / <id>/POSCAR from this directory instead of the API
  #[arg(long)]
  structures: Option<PathBuf>,
  /// Materials processed concurrently
  #[arg(short, long)]
  jobs: Option<usize>,
  /// More output (repeatable)
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,
  /// Less output (repeatable)
  #[arg(short, long, action = clap::ArgAction::Count)]
  quiet: u8,
  /// Save the effective settings to the user config directory and exit
  #[arg(long)]
  write_config: bool,
}

impl Cli {
  fn apply_to(&self, config: &mut Config) {
    if let Some(dir) = &self.output {
      config.output_root = dir.clone();
    }
    if let Some(n) = self.max_materials {
      config.max_materials = n;
    }
    if !self.fields.is_empty() {
      config.field_magnitudes = self.fields.clone();
    }
    if let Some(axis) = self.axis {
      config.axis = axis;
    }
    if let Some(k) = &self.kmesh {
      if let [a, b, c] = k.as_slice() {
        config.kmesh = [*a, *b, *c];
      }
    }
    if let Some(jobs) = self.jobs {
      config.jobs = jobs;
    }
  }
}

fn load_config(cli: &Cli) -> Result<Config> {
  let mut config = match &cli.config {
    Some(path) => {
      let cfg = Config::load_from(path)?;
      log::info!("Config loaded from {:?}", path);
      cfg
    }
    None => {
      let (cfg, msg) = Config::load();
      log::info!("{}", msg);
      cfg
    }
  };
  cli.apply_to(&mut config);
  config.validate()?;
  Ok(config)
}

/// Writes to `--config` when given, else to the user config directory
fn save_config(cli: &Cli, config: &Config) -> Result<PathBuf> {
  let path = cli.config.clone().unwrap_or_else(Config::get_path);
  config.save_to(&path)?;
  Ok(path)
}

fn build_source(cli: &Cli, config: &Config) -> Result<Box<dyn StructureSource>> {
  match &cli.structures {
    Some(dir) => {
      log::info!("Reading structures from {}", dir.display());
      Ok(Box::new(LocalStore::new(dir)))
    }
    None => {
      let api_key = source::mp_rester::api_key_from_env()?;
      let rester = MpRester::new(
        &config.endpoint,
        api_key,
        Duration::from_secs(config.timeout_secs),
        config.max_retries,
      )?;
      Ok(Box::new(rester))
    }
  }
}

fn run(cli: &Cli) -> Result<()> {
  let config = load_config(cli)?;

  if cli.write_config {
    let path = save_config(cli, &config)?;
    log::info!("Config saved to {:?}", path);
    return Ok(());
  }

  log::info!("Settings:");
  log::info!("  - max materials: {}", config.max_materials);
  log::info!("  - field magnitudes: {:?} eV/A", config.field_magnitudes);
  log::info!("  - field direction: [{}]", config.axis.miller_label());

  let source = build_source(cli, &config)?;
  let ids = match &cli.ids {
    Some(path) => io::ids::read_material_ids(path)?,
    None => Vec::new(),
  };
  sweep::run(&ids, source.as_ref(), &config);
  Ok(())
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  let level = utils::logger::level_from_verbosity(cli.verbose, cli.quiet);
  if let Err(e) = utils::logger::init(level) {
    eprintln!("logger init failed: {}", e);
  }

  match run(&cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      log::error!("{}", e);
      ExitCode::FAILURE
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flags_override_config() {
    let cli = Cli::parse_from([
      "efield-sweep",
      "ids.csv",
      "--field",
      "-0.002",
      "--field",
      "0.002",
      "--axis",
      "a",
      "--kmesh",
      "6",
      "6",
      "4",
      "-j",
      "4",
      "-vv",
    ]);
    let mut config = Config::default();
    cli.apply_to(&mut config);
    assert_eq!(config.field_magnitudes, vec![-0.002, 0.002]);
    assert_eq!(config.axis, LatticeAxis::A);
    assert_eq!(config.kmesh, [6, 6, 4]);
    assert_eq!(config.jobs, 4);
    assert_eq!(cli.verbose, 2);
    assert_eq!(config.max_materials, 256);
  }

  #[test]
  fn ids_required_unless_writing_config() {
    assert!(Cli::try_parse_from(["efield-sweep"]).is_err());
    assert!(Cli::try_parse_from(["efield-sweep", "--write-config"]).is_ok());
  }

  #[test]
  fn write_config_failure_is_an_error() {
    let dir = utils::test_dir("main_write_config");
    let blocker = dir.join("not_a_dir");
    std::fs::write(&blocker, "").unwrap();
    let target = blocker.join("settings.json");
    let cli = Cli::parse_from([
      "efield-sweep",
      "--write-config",
      "--config",
      target.to_str().unwrap(),
    ]);
    assert!(save_config(&cli, &Config::default()).is_err());

    let good = dir.join("settings.json");
    let cli =
      Cli::parse_from(["efield-sweep", "--write-config", "--config", good.to_str().unwrap()]);
    assert_eq!(save_config(&cli, &Config::default()).unwrap(), good);
    assert_eq!(Config::load_from(&good).unwrap(), Config::default());
    let _ = std::fs::remove_dir_all(&dir);
  }

  #[test]
  fn cli_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
  }
}
