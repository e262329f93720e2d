// src/vasp/incar.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single INCAR tag value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IncarValue {
  Bool(bool),
  Int(i64),
  Float(f64),
  Str(String),
  List(Vec<IncarValue>),
}

impl From<bool> for IncarValue {
  fn from(v: bool) -> Self {
    IncarValue::Bool(v)
  }
}

impl From<i64> for IncarValue {
  fn from(v: i64) -> Self {
    IncarValue::Int(v)
  }
}

impl From<i32> for IncarValue {
  fn from(v: i32) -> Self {
    IncarValue::Int(v as i64)
  }
}

impl From<f64> for IncarValue {
  fn from(v: f64) -> Self {
    IncarValue::Float(v)
  }
}

impl From<&str> for IncarValue {
  fn from(v: &str) -> Self {
    IncarValue::Str(v.to_string())
  }
}

impl From<[f64; 3]> for IncarValue {
  fn from(v: [f64; 3]) -> Self {
    IncarValue::List(v.iter().map(|&x| IncarValue::Float(x)).collect())
  }
}

impl From<Vec<f64>> for IncarValue {
  fn from(v: Vec<f64>) -> Self {
    IncarValue::List(v.into_iter().map(IncarValue::Float).collect())
  }
}

impl From<Vec<i64>> for IncarValue {
  fn from(v: Vec<i64>) -> Self {
    IncarValue::List(v.into_iter().map(IncarValue::Int).collect())
  }
}

/// Float text in Python `repr` style: `0.05`, `520.0`, `1e-06`, `-0.0`
pub fn format_float(x: f64) -> String {
  if x == 0.0 {
    // keep the sign of -0.0, as numpy-derived field vectors carry it
    return if x.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
  }
  let ax = x.abs();
  if ax < 1e-4 || ax >= 1e16 {
    let s = format!("{:e}", x);
    match s.split_once('e') {
      Some((mantissa, exp)) => {
        let (sign, digits) = match exp.strip_prefix('-') {
          Some(d) => ('-', d),
          None => ('+', exp),
        };
        format!("{}e{}{:0>2}", mantissa, sign, digits)
      }
      None => s,
    }
  } else {
    let s = format!("{}", x);
    if s.contains('.') || s.contains("inf") || s.contains("NaN") {
      s
    } else {
      format!("{}.0", s)
    }
  }
}

impl fmt::Display for IncarValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      IncarValue::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
      IncarValue::Int(i) => write!(f, "{}", i),
      IncarValue::Float(x) => write!(f, "{}", format_float(*x)),
      IncarValue::Str(s) => write!(f, "{}", s),
      IncarValue::List(items) => {
        let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
        write!(f, "{}", parts.join(" "))
      }
    }
  }
}

/// INCAR parameters, rendered with tags in alphabetical order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Incar {
  params: BTreeMap<String, IncarValue>,
}

impl Incar {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set<V: Into<IncarValue>>(&mut self, tag: &str, value: V) -> &mut Self {
    self.params.insert(tag.to_uppercase(), value.into());
    self
  }

  pub fn get(&self, tag: &str) -> Option<&IncarValue> {
    self.params.get(&tag.to_uppercase())
  }

  pub fn contains(&self, tag: &str) -> bool {
    self.params.contains_key(&tag.to_uppercase())
  }

  pub fn remove(&mut self, tag: &str) -> Option<IncarValue> {
    self.params.remove(&tag.to_uppercase())
  }

  /// Overlay `other`; its tags win
  pub fn merge(&mut self, other: &Incar) -> &mut Self {
    for (tag, value) in &other.params {
      self.params.insert(tag.clone(), value.clone());
    }
    self
  }

  /// Overlay settings where `None` deletes the tag
  pub fn apply_overrides<'a, I>(&mut self, overrides: I) -> &mut Self
  where
    I: IntoIterator<Item = (&'a String, &'a Option<IncarValue>)>,
  {
    for (tag, value) in overrides {
      match value {
        Some(v) => {
          self.set(tag, v.clone());
        }
        None => {
          self.remove(tag);
        }
      }
    }
    self
  }
}

fn magmom_line(items: &[IncarValue]) -> String {
  let mut groups: Vec<(usize, String)> = Vec::new();
  for item in items {
    let text = item.to_string();
    match groups.last_mut() {
      Some((n, last)) if *last == text => *n += 1,
      _ => groups.push((1, text)),
    }
  }
  groups
    .iter()
    .map(|(n, v)| format!("{}*{}", n, v))
    .collect::<Vec<_>>()
    .join(" ")
}

impl fmt::Display for Incar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (tag, value) in &self.params {
      match (tag.as_str(), value) {
        ("MAGMOM", IncarValue::List(items)) => writeln!(f, "{} = {}", tag, magmom_line(items))?,
        _ => writeln!(f, "{} = {}", tag, value)?,
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn float_formatting_matches_python_repr() {
    assert_eq!(format_float(0.05), "0.05");
    assert_eq!(format_float(520.0), "520.0");
    assert_eq!(format_float(1e-6), "1e-06");
    assert_eq!(format_float(1e-8), "1e-08");
    assert_eq!(format_float(-0.003), "-0.003");
    assert_eq!(format_float(0.0), "0.0");
    assert_eq!(format_float(-0.0), "-0.0");
    assert_eq!(format_float(0.0006), "0.0006");
    assert_eq!(format_float(0.00006), "6e-05");
  }

  #[test]
  fn render_sorted_tags() {
    let mut incar = Incar::new();
    incar.set("prec", "Accurate").set("ISYM", 0).set("LCALCPOL", true).set("EDIFF", 1e-6);
    assert_eq!(
      incar.to_string(),
      "EDIFF = 1e-06\nISYM = 0\nLCALCPOL = True\nPREC = Accurate\n"
    );
  }

  #[test]
  fn merge_overrides_and_null_removes() {
    let mut base = Incar::new();
    base.set("ISMEAR", -5).set("LVHAR", true);

    let mut over = Incar::new();
    over.set("ISMEAR", 0);
    base.merge(&over);
    assert_eq!(base.get("ismear"), Some(&IncarValue::Int(0)));

    let overrides: BTreeMap<String, Option<IncarValue>> =
      [("LVHAR".to_string(), None)].into_iter().collect();
    base.apply_overrides(&overrides);
    assert!(!base.contains("LVHAR"));
  }

  #[test]
  fn field_vector_list() {
    let mut incar = Incar::new();
    incar.set("EFIELD_PEAD", [0.0, 0.0, 0.001]);
    assert_eq!(incar.to_string(), "EFIELD_PEAD = 0.0 0.0 0.001\n");

    // negative field along c of an orthogonal cell
    incar.set("EFIELD_PEAD", crate::utils::linalg::scale([0.0, 0.0, 1.0], -0.003));
    assert_eq!(incar.to_string(), "EFIELD_PEAD = -0.0 -0.0 -0.003\n");
  }

  #[test]
  fn magmom_is_run_length_encoded() {
    let mut incar = Incar::new();
    incar.set("MAGMOM", vec![5.0, 0.6, 0.6, 0.6, 5.0]);
    assert_eq!(incar.to_string(), "MAGMOM = 1*5.0 3*0.6 1*5.0\n");
  }

  #[test]
  fn deserialize_from_json_settings() {
    let incar: BTreeMap<String, IncarValue> =
      serde_json::from_str(r#"{"ENCUT": 520, "SIGMA": 0.05, "LREAL": false, "ALGO": "Normal"}"#)
        .unwrap();
    assert_eq!(incar["ENCUT"], IncarValue::Int(520));
    assert_eq!(incar["SIGMA"], IncarValue::Float(0.05));
    assert_eq!(incar["LREAL"], IncarValue::Bool(false));
    assert_eq!(incar["ALGO"], IncarValue::Str("Normal".into()));
  }
}
