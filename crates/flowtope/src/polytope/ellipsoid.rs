//! Minimum-volume bounding ellipsoid and the shape normalization built on it.
//!
//! The fit is the Khachiyan multiplicative-weights iteration: keep a weight
//! distribution over the points, repeatedly shift weight toward the point
//! whose lifted Mahalanobis score is largest, stop when the weight update
//! stalls. Purely cosmetic downstream (it rounds a squashed projection into
//! something worth rendering), so the default tolerance is loose.

use nalgebra::{Cholesky, DMatrix, DVector};

use super::{NumCfg, NumericError};

/// Fitted ellipsoid `(x - center)^T matrix (x - center) = 1`.
#[derive(Clone, Debug)]
pub struct Ellipsoid {
    pub matrix: DMatrix<f64>,
    pub center: DVector<f64>,
}

/// Khachiyan-type minimum bounding ellipsoid of `points`.
pub fn min_bounding_ellipsoid(
    points: &[DVector<f64>],
    tolerance: f64,
) -> Result<Ellipsoid, NumericError> {
    let num = points.len();
    let d = points[0].len();
    let n = (d + 1) as f64;

    // Lifted point matrix: each column is a point with an appended 1.
    let mut q = DMatrix::zeros(d + 1, num);
    for (i, p) in points.iter().enumerate() {
        for r in 0..d {
            q[(r, i)] = p[r];
        }
        q[(d, i)] = 1.0;
    }

    let mut u = DVector::from_element(num, 1.0 / num as f64);
    loop {
        let x = &q * DMatrix::from_diagonal(&u) * q.transpose();
        let x_inv = x
            .try_inverse()
            .ok_or(NumericError::SingularMatrix { what: "ellipsoid weight matrix" })?;
        // Diagonal of Q^T X^{-1} Q, one score per point.
        let mut max_score = f64::NEG_INFINITY;
        let mut max_loc = 0;
        for i in 0..num {
            let qi = q.column(i);
            let score = (qi.transpose() * &x_inv * qi)[(0, 0)];
            if score > max_score {
                max_score = score;
                max_loc = i;
            }
        }

        let step = (max_score - n) / (n * (max_score - 1.0));
        let mut next = &u * (1.0 - step);
        next[max_loc] += step;
        let err = (&next - &u).norm();
        u = next;
        if err < tolerance {
            break;
        }
    }

    let mut p = DMatrix::zeros(d, num);
    for (i, pt) in points.iter().enumerate() {
        p.set_column(i, pt);
    }
    let center = &p * &u;
    let spread = &p * DMatrix::from_diagonal(&u) * p.transpose() - &center * center.transpose();
    let matrix = spread
        .try_inverse()
        .ok_or(NumericError::SingularMatrix { what: "ellipsoid spread" })?
        / d as f64;

    Ok(Ellipsoid { matrix, center })
}

/// Map `points` so the fitted bounding ellipsoid becomes the unit ball, then
/// shrink by `SHRINK` to keep a margin inside it. With `B` the Cholesky
/// factor of `A^{-1}` we have `B^T A B = I`, so `x -> B^{-1}(x - c)` is the
/// required map.
pub fn normalize_shape(points: &mut [DVector<f64>], cfg: &NumCfg) -> Result<(), NumericError> {
    const SHRINK: f64 = 0.95;
    if points.is_empty() {
        return Ok(());
    }
    let ellipsoid = min_bounding_ellipsoid(points, cfg.ellipsoid_tol)?;
    let a_inv = ellipsoid
        .matrix
        .clone()
        .try_inverse()
        .ok_or(NumericError::SingularMatrix { what: "ellipsoid matrix" })?;
    let b = Cholesky::new(a_inv)
        .ok_or(NumericError::SingularMatrix { what: "ellipsoid Cholesky factor" })?
        .l();
    let b_inv = b
        .try_inverse()
        .ok_or(NumericError::SingularMatrix { what: "ellipsoid chart" })?;
    for p in points.iter_mut() {
        *p = &b_inv * (&*p - &ellipsoid.center) * SHRINK;
    }
    Ok(())
}
