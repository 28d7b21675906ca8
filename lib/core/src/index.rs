use crate::{Error, Result, Vector};
use serde::{Deserialize, Serialize};

/// Per-identity representative vector, precomputed offline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityCentroid {
    pub identity_id: String,
    pub vector: Vector,
}

/// Read-only top-K cosine nearest-neighbor structure over identity
/// centroids.
///
/// A brute-force scan: the centroid set is one entry per enrolled identity,
/// small enough that a linear pass beats index maintenance.
pub struct IdentityIndex {
    centroids: Vec<IdentityCentroid>,
}

impl IdentityIndex {
    #[must_use]
    pub fn new(centroids: Vec<IdentityCentroid>) -> Self {
        Self { centroids }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.centroids.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.centroids.is_empty()
    }

    /// Top-k identities by cosine similarity to `query`, descending.
    ///
    /// Ties break on load order (stable sort) for deterministic results.
    /// Fails with [`Error::EmptyIndex`] when no centroids are loaded.
    pub fn search(&self, query: &Vector, k: usize) -> Result<Vec<(String, f32)>> {
        if self.centroids.is_empty() {
            return Err(Error::EmptyIndex);
        }

        let mut scored: Vec<(usize, f32)> = self
            .centroids
            .iter()
            .enumerate()
            .map(|(i, c)| (i, c.vector.cosine_similarity(query)))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(i, sim)| (self.centroids[i].identity_id.clone(), sim))
            .collect())
    }
}
