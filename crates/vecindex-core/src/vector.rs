//! Vector value type and L2 normalization.

use crate::error::IndexError;

/// A dense `f32` vector.
///
/// `Vector` is a plain value: it carries no id and is only meaningful next
/// to an index of matching dimension.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vector {
    pub values: Vec<f32>,
}

impl Vector {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Number of components.
    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// Euclidean (L2) norm.
    pub fn norm(&self) -> f32 {
        l2_norm(&self.values)
    }

    /// Return the unit-length form of this vector.
    ///
    /// A zero vector has no direction and is returned unchanged.
    pub fn normalized(mut self) -> Self {
        normalize_in_place(&mut self.values);
        self
    }

    /// Cosine similarity of the two vectors before normalization.
    ///
    /// Returns 0.0 when either side has zero norm or the lengths differ.
    pub fn cosine_similarity(&self, other: &Vector) -> f32 {
        if self.values.len() != other.values.len() {
            return 0.0;
        }
        let denom = self.norm() * other.norm();
        if denom == 0.0 {
            return 0.0;
        }
        dot(&self.values, &other.values) / denom
    }

    /// Check that the vector has `dimension` components, all finite.
    pub(crate) fn validate(&self, dimension: usize) -> Result<(), IndexError> {
        if self.values.len() != dimension {
            return Err(IndexError::DimensionMismatch {
                expected: dimension,
                actual: self.values.len(),
            });
        }
        if let Some(pos) = self.values.iter().position(|v| !v.is_finite()) {
            return Err(IndexError::invalid(format!(
                "component {} is not a finite number",
                pos
            )));
        }
        Ok(())
    }
}

impl From<Vec<f32>> for Vector {
    fn from(values: Vec<f32>) -> Self {
        Self::new(values)
    }
}

impl AsRef<[f32]> for Vector {
    fn as_ref(&self) -> &[f32] {
        &self.values
    }
}

// Accumulated in f64 so large finite components cannot overflow the norm.
fn l2_norm_f64(values: &[f32]) -> f64 {
    values
        .iter()
        .map(|&x| f64::from(x) * f64::from(x))
        .sum::<f64>()
        .sqrt()
}

pub(crate) fn l2_norm(values: &[f32]) -> f32 {
    l2_norm_f64(values) as f32
}

/// Scale `values` to unit length. Zero-norm input is left untouched.
pub(crate) fn normalize_in_place(values: &mut [f32]) {
    let norm = l2_norm_f64(values);
    if norm > 0.0 {
        for v in values.iter_mut() {
            *v = (f64::from(*v) / norm) as f32;
        }
    }
}

/// Dot product. Starts from `+0.0` so an all-zero side yields `+0.0`.
pub(crate) fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).fold(0.0, |acc, (x, y)| acc + x * y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_has_unit_norm() {
        let v = Vector::new(vec![3.0, 4.0]).normalized();
        assert!((v.values[0] - 0.6).abs() < 1e-6);
        assert!((v.values[1] - 0.8).abs() < 1e-6);
        assert!((v.norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_stays_zero() {
        let v = Vector::new(vec![0.0, 0.0, 0.0]).normalized();
        assert_eq!(v.values, vec![0.0, 0.0, 0.0]);
        assert_eq!(v.cosine_similarity(&v), 0.0);
    }

    #[test]
    fn test_cosine_similarity_ignores_magnitude() {
        let a = Vector::new(vec![1.0, 1.0]);
        let b = Vector::new(vec![10.0, 10.0]);
        assert!((a.cosine_similarity(&b) - 1.0).abs() < 1e-6);

        let c = Vector::new(vec![-1.0, -1.0]);
        assert!((a.cosine_similarity(&c) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_validate() {
        let v = Vector::new(vec![1.0, 2.0]);
        assert!(v.validate(2).is_ok());
        assert_eq!(
            v.validate(3),
            Err(IndexError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        );

        let nan = Vector::new(vec![1.0, f32::NAN]);
        assert!(matches!(
            nan.validate(2),
            Err(IndexError::InvalidArgument(_))
        ));
    }
}
