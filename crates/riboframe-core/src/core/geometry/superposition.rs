//! Rigid best-fit rotation between two ordered point sets (Kabsch).

use nalgebra::{Matrix3, Point3, SVD, Vector3};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuperpositionError {
    #[error("point sets differ in length ({first} vs {second})")]
    LengthMismatch { first: usize, second: usize },
    #[error("cannot superpose empty point sets")]
    Empty,
    #[error("singular value decomposition did not converge")]
    DecompositionFailed,
}

/// The result of superposing two point sets.
///
/// `rotation` maps coordinates expressed in the second (reference) set's
/// frame onto the first set's frame, with `det ≈ +1` guaranteed. The fitted
/// sets are the centered inputs rotated into the common frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Superposition {
    pub rotation: Matrix3<f64>,
    pub fitted_first: Vec<Point3<f64>>,
    pub fitted_second: Vec<Point3<f64>>,
    pub centroid_first: Point3<f64>,
    pub centroid_second: Point3<f64>,
    pub rmsd: f64,
}

/// Tolerance for recognizing a reflection in the decomposition.
const REFLECTION_EPS: f64 = 1e-6;

/// Computes the rotation that optimally superimposes `second` onto `first`.
///
/// Both sets must have the same length and at least one point; meaningful
/// results require three or more non-degenerate points. When the
/// decomposition yields a reflection, the last singular value and the last
/// column of the left factor are negated to force a proper rotation.
///
/// # Errors
///
/// Returns an error when the sets differ in length or are empty.
pub fn best_transformation(
    first: &[Point3<f64>],
    second: &[Point3<f64>],
) -> Result<Superposition, SuperpositionError> {
    if first.len() != second.len() {
        return Err(SuperpositionError::LengthMismatch {
            first: first.len(),
            second: second.len(),
        });
    }
    if first.is_empty() {
        return Err(SuperpositionError::Empty);
    }
    let length = first.len() as f64;

    let centroid_first = centroid(first);
    let centroid_second = centroid(second);
    let deviations_first: Vec<Vector3<f64>> =
        first.iter().map(|p| p - centroid_first).collect();
    let deviations_second: Vec<Vector3<f64>> =
        second.iter().map(|p| p - centroid_second).collect();

    // Sum of squared deviations of both sets from their own centroids,
    // used only for the residual.
    let e0: f64 = deviations_first
        .iter()
        .chain(deviations_second.iter())
        .map(|d| d.norm_squared())
        .sum();

    // Cross-covariance: centered second transposed times centered first.
    let mut covariance = Matrix3::zeros();
    for (dev_first, dev_second) in deviations_first.iter().zip(&deviations_second) {
        covariance += dev_second * dev_first.transpose();
    }

    let svd = SVD::new(covariance, true, true);
    let mut v = svd.u.ok_or(SuperpositionError::DecompositionFailed)?;
    let w_t = svd.v_t.ok_or(SuperpositionError::DecompositionFailed)?;
    let mut singular_values = svd.singular_values;

    let reflect = v.determinant() * w_t.determinant();
    if (reflect + 1.0).abs() < REFLECTION_EPS {
        singular_values[2] = -singular_values[2];
        for row in 0..3 {
            v[(row, 2)] = -v[(row, 2)];
        }
    }

    let rotation = v * w_t;

    let rmsd = ((e0 - 2.0 * singular_values.sum()).abs() / length).sqrt();

    // Row-vector products dev · R, expressed on column vectors.
    let fitted_first = deviations_first
        .iter()
        .map(|d| Point3::from(rotation.transpose() * d))
        .collect();
    let fitted_second = deviations_second
        .iter()
        .map(|d| Point3::from(rotation.transpose() * d))
        .collect();

    Ok(Superposition {
        rotation,
        fitted_first,
        fitted_second,
        centroid_first,
        centroid_second,
        rmsd,
    })
}

fn centroid(points: &[Point3<f64>]) -> Point3<f64> {
    let sum: Vector3<f64> = points.iter().map(|p| p.coords).sum();
    Point3::from(sum / points.len() as f64)
}
