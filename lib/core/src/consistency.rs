use crate::{ClusterMember, EmbeddingGallery, Flag, RoutingStatus, Vector};

/// A member that survived the consistency filter, with its similarity to
/// the final cluster centroid.
#[derive(Debug, Clone, Copy)]
pub struct FilteredMember {
    pub slot: usize,
    /// Similarity from the expansion iteration that first matched it.
    pub expansion_similarity: f32,
    /// Similarity to the filter's own centroid.
    pub centroid_similarity: f32,
}

/// Outcome of the consistency filter: the pruned set plus reliability
/// diagnostics.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub members: Vec<FilteredMember>,
    /// Fraction of survivors enrolled under the routed identity. A
    /// self-consistency proxy, not ground truth.
    pub precision: f32,
    /// Mean similarity of the input set to its own centroid.
    pub cohesion: f32,
    /// The adaptive threshold that was applied.
    pub threshold: f32,
    pub flagged: bool,
    pub reasons: Vec<Flag>,
}

/// Tuning for the adaptive pruning pass.
#[derive(Debug, Clone, Copy)]
pub struct FilterConfig {
    /// Threshold forced by an uncertain routing.
    pub uncertain_threshold: f32,
    /// Threshold for high-cohesion clusters.
    pub tight_threshold: f32,
    /// Threshold for medium-cohesion clusters.
    pub medium_threshold: f32,
    /// Threshold for everything looser; lower cohesion raises the bar.
    pub loose_threshold: f32,
    /// Cohesion above this selects `tight_threshold`.
    pub tight_cohesion: f32,
    /// Cohesion above this selects `medium_threshold`.
    pub medium_cohesion: f32,
    /// Centroid similarity that counts a survivor as strong.
    pub strong_bar: f32,
    /// Minimum strong survivors before the result is flagged.
    pub min_strong: usize,
    /// Precision below this flags the result.
    pub min_precision: f32,
    /// Cohesion below this flags the result.
    pub min_cohesion: f32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            uncertain_threshold: 0.55,
            tight_threshold: 0.45,
            medium_threshold: 0.48,
            loose_threshold: 0.50,
            tight_cohesion: 0.80,
            medium_cohesion: 0.70,
            strong_bar: 0.55,
            min_strong: 5,
            min_precision: 0.50,
            min_cohesion: 0.50,
        }
    }
}

/// Prunes an expanded match set against its own centroid and estimates how
/// reliable the remainder is.
pub struct ConsistencyFilter {
    config: FilterConfig,
}

impl Default for ConsistencyFilter {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}

impl ConsistencyFilter {
    #[must_use]
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Threshold selection: uncertain routing always takes the strict bar;
    /// otherwise the bar relaxes as cohesion rises.
    fn choose_threshold(&self, cohesion: f32, status: RoutingStatus) -> f32 {
        if status.is_uncertain() {
            self.config.uncertain_threshold
        } else if cohesion > self.config.tight_cohesion {
            self.config.tight_threshold
        } else if cohesion > self.config.medium_cohesion {
            self.config.medium_threshold
        } else {
            self.config.loose_threshold
        }
    }

    /// Filter a non-empty expanded set.
    ///
    /// The orchestrator guarantees a non-empty input; the output is always
    /// a subset of it.
    pub fn filter(
        &self,
        gallery: &EmbeddingGallery,
        members: &[ClusterMember],
        identity_id: &str,
        status: RoutingStatus,
    ) -> FilterOutcome {
        debug_assert!(!members.is_empty(), "filter input must be non-empty");

        let centroid = Vector::centroid(
            members
                .iter()
                .map(|m| &gallery.record(m.slot).embedding),
        )
        .expect("non-empty member set");

        let centroid_sims: Vec<f32> = members
            .iter()
            .map(|m| gallery.record(m.slot).embedding.unit_dot(&centroid))
            .collect();
        let cohesion = centroid_sims.iter().sum::<f32>() / centroid_sims.len() as f32;

        let threshold = self.choose_threshold(cohesion, status);

        let filtered: Vec<FilteredMember> = members
            .iter()
            .zip(centroid_sims.iter())
            .filter(|(_, &sim)| sim >= threshold)
            .map(|(m, &sim)| FilteredMember {
                slot: m.slot,
                expansion_similarity: m.similarity,
                centroid_similarity: sim,
            })
            .collect();

        if filtered.is_empty() {
            return FilterOutcome {
                members: filtered,
                precision: 0.0,
                cohesion,
                threshold,
                flagged: true,
                reasons: vec![Flag::EmptyAfterFilter],
            };
        }

        let matching = filtered
            .iter()
            .filter(|m| gallery.record(m.slot).belongs_to(identity_id))
            .count();
        let precision = matching as f32 / filtered.len() as f32;

        let strong_count = filtered
            .iter()
            .filter(|m| m.centroid_similarity >= self.config.strong_bar)
            .count();

        let flagged = precision < self.config.min_precision
            || strong_count < self.config.min_strong
            || cohesion < self.config.min_cohesion;

        let mut reasons = Vec::new();
        if precision < self.config.min_precision {
            reasons.push(Flag::LowPrecision);
        }
        if strong_count < self.config.min_strong {
            reasons.push(Flag::FewStrongMatches);
        }
        if cohesion < self.config.min_cohesion {
            reasons.push(Flag::WeakCentroid);
        }
        if status == RoutingStatus::GrayZone {
            // Informational: does not flip the flag on its own.
            reasons.push(Flag::LowConfidenceIdentityAssignment);
        }

        FilterOutcome {
            members: filtered,
            precision,
            cohesion,
            threshold,
            flagged,
            reasons,
        }
    }
}
