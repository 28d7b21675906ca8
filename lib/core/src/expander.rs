use crate::{EmbeddingGallery, Flag, Vector};
use ahash::AHashSet;

/// A gallery record pulled into the match set during expansion.
///
/// `similarity` is the cosine against the running centroid at the
/// iteration that first pulled the record in; deduplication keeps the
/// first occurrence.
#[derive(Debug, Clone, Copy)]
pub struct ClusterMember {
    pub slot: usize,
    pub similarity: f32,
}

/// Output of one cluster expansion run.
#[derive(Debug, Clone)]
pub struct Expansion {
    pub members: Vec<ClusterMember>,
    pub flagged: bool,
    pub reasons: Vec<Flag>,
    pub iterations: usize,
}

/// Tuning for the iterative expansion loop.
#[derive(Debug, Clone, Copy)]
pub struct ExpanderConfig {
    /// Hard cap on candidate searches; termination is guaranteed by this
    /// cap independent of convergence.
    pub max_iterations: usize,
    /// Candidate ranking truncation per iteration.
    pub pool_size: usize,
    /// Minimum similarity for a strong anchor.
    pub strong_threshold: f32,
    /// Minimum similarity for a weak companion.
    pub weak_threshold: f32,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self {
            max_iterations: 3,
            pool_size: 800,
            strong_threshold: 0.60,
            weak_threshold: 0.45,
        }
    }
}

/// Iteratively grows a within-identity match set from a query vector.
///
/// A single nearest-neighbor pass underestimates true identity membership
/// across pose and lighting variation; re-estimating the centroid from the
/// accumulated set pulls in genuine variants, while the strong/weak gate
/// aborts before the centroid can drift toward an unrelated identity.
pub struct ClusterExpander {
    config: ExpanderConfig,
}

impl Default for ClusterExpander {
    fn default() -> Self {
        Self::new(ExpanderConfig::default())
    }
}

impl ClusterExpander {
    #[must_use]
    pub fn new(config: ExpanderConfig) -> Self {
        Self { config }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &ExpanderConfig {
        &self.config
    }

    /// Records of `identity_id` ranked by similarity to `centroid`,
    /// descending, stable tie-break on load order, truncated to the pool
    /// size.
    fn ranked_candidates(
        &self,
        gallery: &EmbeddingGallery,
        identity_id: &str,
        centroid: &Vector,
    ) -> Vec<ClusterMember> {
        let mut candidates: Vec<ClusterMember> = gallery
            .slots_for_identity(identity_id)
            .iter()
            .map(|&slot| ClusterMember {
                slot,
                similarity: gallery.record(slot).embedding.unit_dot(centroid),
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates.truncate(self.config.pool_size);
        candidates
    }

    /// Expand the match set for `identity_id` starting from `query`.
    ///
    /// Stops on empty candidates (`no_hits_for_identity`), on an iteration
    /// with no strong anchor (`no_strong_matches`, discarding that
    /// iteration in full), on size convergence, or at the iteration cap.
    /// The accumulated set only ever grows.
    pub fn expand(
        &self,
        gallery: &EmbeddingGallery,
        query: &Vector,
        identity_id: &str,
    ) -> Expansion {
        let mut centroid = query.normalized();
        let mut accumulated: Vec<ClusterMember> = Vec::new();
        let mut seen: AHashSet<usize> = AHashSet::new();
        let mut flagged = false;
        let mut reasons = Vec::new();
        let mut previous_size = 0usize;
        let mut iterations = 0usize;

        for _ in 0..self.config.max_iterations {
            iterations += 1;
            let candidates = self.ranked_candidates(gallery, identity_id, &centroid);

            if candidates.is_empty() {
                flagged = true;
                reasons.push(Flag::NoHitsForIdentity);
                break;
            }

            let strong: Vec<ClusterMember> = candidates
                .iter()
                .filter(|m| m.similarity >= self.config.strong_threshold)
                .copied()
                .collect();
            let weak: Vec<ClusterMember> = candidates
                .iter()
                .filter(|m| {
                    m.similarity >= self.config.weak_threshold
                        && m.similarity < self.config.strong_threshold
                })
                .copied()
                .collect();

            if strong.is_empty() {
                // No strong anchor: discard the whole iteration, weak
                // companions included.
                flagged = true;
                reasons.push(Flag::NoStrongMatches);
                break;
            }

            for member in strong.into_iter().chain(weak) {
                if seen.insert(member.slot) {
                    accumulated.push(member);
                }
            }

            centroid = Vector::centroid(
                accumulated
                    .iter()
                    .map(|m| &gallery.record(m.slot).embedding),
            )
            .unwrap_or(centroid);

            if accumulated.len() == previous_size {
                break; // converged
            }
            previous_size = accumulated.len();
        }

        Expansion {
            members: accumulated,
            flagged,
            reasons,
            iterations,
        }
    }
}
