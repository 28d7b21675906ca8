use serde::{Deserialize, Serialize};

/// A dense embedding vector of floating point numbers.
///
/// All similarity in FaceSeek is cosine similarity between L2-normalized
/// vectors, so the cosine of two unit vectors reduces to their inner
/// product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn from_slice(data: &[f32]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    fn dot(&self, other: &Vector) -> f32 {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    #[inline]
    #[must_use]
    pub fn norm(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// Compute cosine similarity with another vector.
    ///
    /// Returns 0.0 for mismatched dimensions or zero-norm inputs.
    #[inline]
    pub fn cosine_similarity(&self, other: &Vector) -> f32 {
        if self.dim() != other.dim() {
            return 0.0;
        }

        let dot_product = self.dot(other);
        let norm_a = self.norm();
        let norm_b = other.norm();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }

    /// Inner product; equals cosine similarity when both sides are unit
    /// length.
    #[inline]
    pub fn unit_dot(&self, other: &Vector) -> f32 {
        if self.dim() != other.dim() {
            return 0.0;
        }
        self.dot(other)
    }

    /// Normalize the vector to unit length in place.
    #[inline]
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > f32::EPSILON {
            let inv_norm = 1.0 / norm;
            for x in &mut self.data {
                *x *= inv_norm;
            }
        }
    }

    /// Get a normalized copy.
    #[inline]
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut v = self.clone();
        v.normalize();
        v
    }

    #[inline]
    pub fn is_normalized(&self) -> bool {
        (self.norm() - 1.0).abs() < 1e-3
    }

    /// Re-normalized mean of a set of vectors: the cluster centroid.
    ///
    /// Normalization is reapplied whenever a vector is derived by averaging
    /// others, so the result never leaves this function un-unit. Returns
    /// `None` for an empty set.
    pub fn centroid<'a, I>(vectors: I) -> Option<Vector>
    where
        I: IntoIterator<Item = &'a Vector>,
    {
        let mut iter = vectors.into_iter();
        let first = iter.next()?;
        let mut sum = first.data.clone();
        let mut count = 1usize;

        for v in iter {
            debug_assert_eq!(v.dim(), sum.len());
            for (acc, x) in sum.iter_mut().zip(v.data.iter()) {
                *acc += x;
            }
            count += 1;
        }

        let inv = 1.0 / count as f32;
        for x in &mut sum {
            *x *= inv;
        }

        let mut c = Vector::new(sum);
        c.normalize();
        Some(c)
    }
}
