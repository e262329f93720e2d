// src/io/ids.rs

use crate::error::{Result, SweepError};
use calamine::{open_workbook_auto, Reader};
use std::path::Path;

pub const ID_COLUMN: &str = "material_id";

/// Reads material ids from a CSV or spreadsheet, keeping file order.
///
/// The first row is the header. Blank or missing `material_id` cells are
/// skipped and kept values are trimmed.
pub fn read_material_ids(path: &Path) -> Result<Vec<String>> {
  let ext = path
    .extension()
    .and_then(|e| e.to_str())
    .map(|e| e.to_lowercase())
    .unwrap_or_default();

  let ids = match ext.as_str() {
    "xlsx" | "xlsm" | "xls" | "ods" => read_spreadsheet(path)?,
    _ => read_csv(csv::ReaderBuilder::new().flexible(true).from_path(path)?)?,
  };

  log::info!("Read {} material ids from {}", ids.len(), path.display());
  log::info!("First 5 ids: {:?}", &ids[..ids.len().min(5)]);
  Ok(ids)
}

fn collect_column<I, S>(header: &[String], rows: I) -> Vec<String>
where
  I: IntoIterator<Item = Vec<S>>,
  S: AsRef<str>,
{
  let Some(col) = header.iter().position(|h| h.trim() == ID_COLUMN) else {
    log::warn!("No '{}' column in header {:?}", ID_COLUMN, header);
    return Vec::new();
  };
  rows
    .into_iter()
    .filter_map(|row| row.get(col).map(|cell| cell.as_ref().trim().to_string()))
    .filter(|id| !id.is_empty())
    .collect()
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<String>> {
  let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
  let mut rows = Vec::new();
  for record in reader.records() {
    let record = record?;
    rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
  }
  Ok(collect_column(&header, rows))
}

fn read_spreadsheet(path: &Path) -> Result<Vec<String>> {
  let mut workbook =
    open_workbook_auto(path).map_err(|e| SweepError::Spreadsheet(e.to_string()))?;
  let range = workbook
    .worksheet_range_at(0)
    .ok_or_else(|| SweepError::Spreadsheet(format!("{} has no worksheets", path.display())))?
    .map_err(|e| SweepError::Spreadsheet(e.to_string()))?;

  let mut rows = range
    .rows()
    .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>());
  let Some(header) = rows.next() else {
    return Ok(Vec::new());
  };
  Ok(collect_column(&header, rows))
}
