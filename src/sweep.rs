// src/sweep.rs

use crate::config::Config;
use crate::error::Result;
use crate::model::symmetry::{self, SymmetryInfo};
use crate::model::LatticeAxis;
use crate::physics::field::{self, FieldPoint};
use crate::source::StructureSource;
use crate::utils::report;
use crate::vasp::{IncarSettings, Kpoints, StaticSet};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const REFERENCE_DIR: &str = "E0_ref";
pub const MANIFEST: &str = "sweep.json";

/// Everything needed to lay out one material's sweep
#[derive(Debug, Clone)]
pub struct SweepPlan {
  pub axis: LatticeAxis,
  pub magnitudes: Vec<f64>,
  pub kpoints: Kpoints,
  pub common_incar: IncarSettings,
  pub field_incar: IncarSettings,
}

impl SweepPlan {
  pub fn from_config(config: &Config) -> Self {
    Self {
      axis: config.axis,
      magnitudes: config.field_magnitudes.clone(),
      kpoints: Kpoints::gamma_automatic(config.kmesh),
      common_incar: config.common_incar.clone(),
      field_incar: config.field_incar.clone(),
    }
  }
}

/// Written to `<root>/sweep.json` for post-processing
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
  pub material_id: String,
  pub formula: String,
  pub space_group: Option<SymmetryInfo>,
  pub axis: LatticeAxis,
  pub unit_vector: [f64; 3],
  pub kmesh: [u32; 3],
  pub reference: String,
  pub fields: Vec<FieldPoint>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
  pub success: usize,
  pub failed: usize,
}

impl SweepSummary {
  pub fn success_rate(&self) -> f64 {
    report::success_rate(self.success, self.failed)
  }
}

pub fn material_root(output_root: &Path, material_id: &str) -> PathBuf {
  output_root.join(format!("finite_field_sweep_{}", material_id))
}

/// Fetches one structure and writes its reference and field-point decks
pub fn generate_material(
  source: &dyn StructureSource,
  plan: &SweepPlan,
  output_root: &Path,
  material_id: &str,
) -> Result<Manifest> {
  let structure = source.fetch(material_id)?;
  log::info!("Structure loaded: {}", structure.formula);
  log::debug!("\n{}", report::structure_summary(&structure, material_id));

  let space_group = match symmetry::analyze(&structure) {
    Ok(info) => {
      log::info!("Space group: {} (#{}, {})", info.symbol, info.number, info.system);
      Some(info)
    }
    Err(e) => {
      log::warn!("{}: {}", material_id, e);
      None
    }
  };

  let root = material_root(output_root, material_id);
  fs::create_dir_all(&root)?;
  let k = plan.kpoints.mesh;
  log::info!("k-points: Gamma-centred {}x{}x{} mesh", k[0], k[1], k[2]);

  StaticSet::new(&structure, plan.common_incar.clone(), plan.kpoints)
    .write_input(&root.join(REFERENCE_DIR))?;
  log::info!("Zero-field reference written: {}", REFERENCE_DIR);

  let (points, unit) = field::sweep_points(&structure, plan.axis, &plan.magnitudes)?;
  log::info!(
    "{}-axis unit vector: [{:.4}, {:.4}, {:.4}]",
    format!("{:?}", plan.axis).to_lowercase(),
    unit[0],
    unit[1],
    unit[2]
  );

  for point in &points {
    let mut settings = plan.common_incar.clone();
    settings.extend(plan.field_incar.clone());
    StaticSet::new(&structure, settings, plan.kpoints)
      .with_setting("EFIELD_PEAD", point.vector)
      .write_input(&root.join(&point.tag))?;
    log::info!("{} written", point.tag);
  }

  let manifest = Manifest {
    material_id: material_id.to_string(),
    formula: structure.formula.clone(),
    space_group,
    axis: plan.axis,
    unit_vector: unit,
    kmesh: plan.kpoints.mesh,
    reference: REFERENCE_DIR.to_string(),
    fields: points,
  };
  fs::write(root.join(MANIFEST), serde_json::to_string_pretty(&manifest)?)?;

  log::info!(
    "{} done: {} directories (1 zero-field, {} along [{}])",
    material_id,
    manifest.fields.len() + 1,
    manifest.fields.len(),
    plan.axis.miller_label()
  );
  Ok(manifest)
}

fn process_one(
  source: &dyn StructureSource,
  plan: &SweepPlan,
  output_root: &Path,
  index: usize,
  total: usize,
  material_id: &str,
) -> bool {
  log::info!("{}/{}: processing {}", index, total, material_id);
  match generate_material(source, plan, output_root, material_id) {
    Ok(_) => true,
    Err(e) => {
      log::error!("{} failed: {}", material_id, e);
      false
    }
  }
}

/// Generates sweeps for the first `max_materials` ids.
///
/// A failing material is logged and counted; the rest still run.
pub fn run(ids: &[String], source: &dyn StructureSource, config: &Config) -> SweepSummary {
  if ids.is_empty() {
    log::error!("No material ids to process");
    return SweepSummary::default();
  }

  let selected = &ids[..ids.len().min(config.max_materials)];
  let total = selected.len();
  let plan = SweepPlan::from_config(config);
  let output_root = config.output_root.as_path();
  log::info!("Generating field sweeps for {} materials", total);
  log::info!(
    "Field magnitudes {:?} eV/A along [{}]",
    plan.magnitudes,
    plan.axis.miller_label()
  );

  let work = |(i, id): (usize, &String)| process_one(source, &plan, output_root, i + 1, total, id);

  let outcomes: Vec<bool> = if config.jobs > 1 {
    match rayon::ThreadPoolBuilder::new().num_threads(config.jobs).build() {
      Ok(pool) => pool.install(|| selected.par_iter().enumerate().map(work).collect()),
      Err(e) => {
        log::warn!("Falling back to sequential run: {}", e);
        selected.iter().enumerate().map(work).collect()
      }
    }
  } else {
    selected.iter().enumerate().map(work).collect()
  };

  let success = outcomes.iter().filter(|ok| **ok).count();
  let summary = SweepSummary { success, failed: total - success };
  log::info!("All done");
  log::info!("Succeeded: {}", summary.success);
  log::info!("Failed: {}", summary.failed);
  log::info!("Success rate: {:.1}%", summary.success_rate());
  summary
}
