// src/utils/linalg.rs

use nalgebra::{Matrix3, Vector3};

/// Lattice rows [[ax, ay, az], [bx, by, bz], [cx, cy, cz]] as a row matrix
pub fn lattice_matrix(lattice: [[f64; 3]; 3]) -> Matrix3<f64> {
  Matrix3::from_row_slice(&[
    lattice[0][0],
    lattice[0][1],
    lattice[0][2],
    lattice[1][0],
    lattice[1][1],
    lattice[1][2],
    lattice[2][0],
    lattice[2][1],
    lattice[2][2],
  ])
}

/// Convert fractional coordinates to Cartesian using lattice matrix
///
/// # Formula
/// ```text
/// Cartesian = Lattice^T × Fractional
/// ```
pub fn frac_to_cart(frac: [f64; 3], lattice: [[f64; 3]; 3]) -> [f64; 3] {
  let cart_vec = lattice_matrix(lattice).transpose() * Vector3::from(frac);
  [cart_vec.x, cart_vec.y, cart_vec.z]
}

/// Convert Cartesian coordinates to fractional using lattice matrix
///
/// Returns None if the lattice is singular.
///
/// # Formula
/// ```text
/// Fractional = (Lattice^T)^-1 × Cartesian
/// ```
pub fn cart_to_frac(cart: [f64; 3], lattice: [[f64; 3]; 3]) -> Option<[f64; 3]> {
  let inv_lat = lattice_matrix(lattice).transpose().try_inverse()?;
  let frac_vec = inv_lat * Vector3::from(cart);
  Some([frac_vec.x, frac_vec.y, frac_vec.z])
}

/// `v / |v|`, or None for a zero-length vector
pub fn unit_vector(v: [f64; 3]) -> Option<[f64; 3]> {
  let v = Vector3::from(v);
  let norm = v.norm();
  if !norm.is_finite() || norm < 1e-12 {
    return None;
  }
  let u = v / norm;
  Some([u.x, u.y, u.z])
}

pub fn scale(v: [f64; 3], s: f64) -> [f64; 3] {
  [v[0] * s, v[1] * s, v[2] * s]
}

#[cfg(test)]
mod tests {
  use super::*;
  use approx::assert_relative_eq;

  #[test]
  fn test_cubic_lattice() {
    let lattice = [[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]];
    let cart = frac_to_cart([0.5, 0.5, 0.5], lattice);
    for x in cart {
      assert_relative_eq!(x, 2.5, epsilon = 1e-10);
    }
  }

  #[test]
  fn test_roundtrip() {
    // Non-orthogonal lattice
    let lattice = [[4.0, 0.0, 0.0], [2.0, 3.46, 0.0], [0.0, 0.0, 5.0]];

    let frac_orig = [0.333, 0.667, 0.25];
    let cart = frac_to_cart(frac_orig, lattice);
    let frac_back = cart_to_frac(cart, lattice).unwrap();

    for i in 0..3 {
      assert_relative_eq!(frac_back[i], frac_orig[i], epsilon = 1e-10);
    }
  }

  #[test]
  fn test_singular_lattice() {
    let lattice = [[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 5.0]];
    assert!(cart_to_frac([1.0, 1.0, 1.0], lattice).is_none());
  }

  #[test]
  fn test_unit_vector() {
    let u = unit_vector([3.0, 0.0, 4.0]).unwrap();
    assert_relative_eq!(u[0], 0.6, epsilon = 1e-12);
    assert_relative_eq!(u[2], 0.8, epsilon = 1e-12);
    assert!(unit_vector([0.0, 0.0, 0.0]).is_none());
  }
}
