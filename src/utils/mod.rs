// src/utils/mod.rs
pub mod linalg;
pub mod logger;
pub mod report;

/// Fresh scratch directory under the system temp dir
#[cfg(test)]
pub(crate) fn test_dir(name: &str) -> std::path::PathBuf {
  let dir = std::env::temp_dir().join(format!("efield-sweep-{}-{}", name, std::process::id()));
  let _ = std::fs::remove_dir_all(&dir);
  std::fs::create_dir_all(&dir).expect("create test dir");
  dir
}
