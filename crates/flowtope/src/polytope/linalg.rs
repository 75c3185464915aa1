//! Dense linear-algebra helpers for the polytope reduction.
//!
//! Everything here works on `nalgebra` dynamic matrices at the small sizes
//! this crate sees (ambient dimension = edge count of a hand-sized DAG).

use nalgebra::{DMatrix, DVector};

use super::NumericError;

fn add_scaled_row(m: &mut DMatrix<f64>, add_to: usize, add_from: usize, scalar: f64) {
    for c in 0..m.ncols() {
        m[(add_to, c)] += m[(add_from, c)] * scalar;
    }
}

fn scale_row(m: &mut DMatrix<f64>, row: usize, scalar: f64) {
    for c in 0..m.ncols() {
        m[(row, c)] *= scalar;
    }
}

/// Gauss-Jordan elimination of the matrix whose columns are `basis`, with the
/// row operations accumulated into an `ambient × ambient` matrix `E`. `E`
/// maps each basis vector to a standard basis vector, so its first
/// `basis.len()` rows project ambient points onto basis coordinates.
pub fn basis_projection(
    basis: &[DVector<f64>],
    ambient: usize,
    eps_pivot: f64,
) -> Result<DMatrix<f64>, NumericError> {
    let mut a = DMatrix::from_columns(basis);
    let mut e = DMatrix::identity(ambient, ambient);

    for c in 0..a.ncols() {
        if a[(c, c)].abs() <= eps_pivot {
            let swap = (c + 1..a.nrows()).find(|&r| a[(r, c)].abs() > eps_pivot);
            match swap {
                Some(r) => {
                    a.swap_rows(c, r);
                    e.swap_rows(c, r);
                }
                None => return Err(NumericError::DegenerateBasis { column: c }),
            }
        }
        let inv_pivot = 1.0 / a[(c, c)];
        scale_row(&mut a, c, inv_pivot);
        scale_row(&mut e, c, inv_pivot);
        for i in 0..a.nrows() {
            if i == c {
                continue;
            }
            let factor = -a[(i, c)];
            add_scaled_row(&mut a, i, c, factor);
            add_scaled_row(&mut e, i, c, factor);
        }
    }
    Ok(e)
}

/// In-place reduced row-echelon form; returns the pivot columns in order.
pub fn rref(m: &mut DMatrix<f64>, eps_pivot: f64) -> Vec<usize> {
    let mut pivots = Vec::new();
    let mut row = 0;
    for col in 0..m.ncols() {
        if row >= m.nrows() {
            break;
        }
        let best = (row..m.nrows())
            .max_by(|&a, &b| {
                m[(a, col)]
                    .abs()
                    .partial_cmp(&m[(b, col)].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .expect("row range is non-empty");
        if m[(best, col)].abs() <= eps_pivot {
            continue;
        }
        m.swap_rows(row, best);
        let inv_pivot = 1.0 / m[(row, col)];
        scale_row(m, row, inv_pivot);
        for r in 0..m.nrows() {
            if r == row {
                continue;
            }
            let factor = -m[(r, col)];
            add_scaled_row(m, r, row, factor);
        }
        pivots.push(col);
        row += 1;
    }
    pivots
}

/// Basis of the null space of `m`, read off its reduced row-echelon form:
/// one vector per free column, with the pivot coordinates back-substituted.
pub fn null_space_basis(m: &DMatrix<f64>, eps_pivot: f64) -> Vec<DVector<f64>> {
    let mut reduced = m.clone();
    let pivots = rref(&mut reduced, eps_pivot);
    let free: Vec<usize> = (0..m.ncols()).filter(|c| !pivots.contains(c)).collect();

    let mut basis = Vec::with_capacity(free.len());
    for &f in &free {
        let mut v = DVector::zeros(m.ncols());
        v[f] = 1.0;
        for (row, &p) in pivots.iter().enumerate() {
            v[p] = -reduced[(row, f)];
        }
        basis.push(v);
    }
    basis
}

/// Gram-Schmidt orthonormalization, dropping directions that collapse below
/// `eps_zero` (dependent inputs are expected, not an error).
pub fn orthonormalize(vectors: &[DVector<f64>], eps_zero: f64) -> Vec<DVector<f64>> {
    let mut basis: Vec<DVector<f64>> = Vec::new();
    for v in vectors {
        let mut u = v.clone();
        for b in &basis {
            let coeff = v.dot(b);
            u -= b * coeff;
        }
        let norm = u.norm();
        if norm > eps_zero {
            basis.push(u / norm);
        }
    }
    basis
}

/// Orthogonal projection of `v` onto the span of an orthonormal `basis`.
pub fn project_onto_span(v: &DVector<f64>, basis: &[DVector<f64>]) -> DVector<f64> {
    let mut out = DVector::zeros(v.len());
    for b in basis {
        out += b * v.dot(b);
    }
    out
}
