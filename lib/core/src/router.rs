use crate::{IdentityIndex, Result, Vector};
use serde::{Deserialize, Serialize};

/// Routing verdict for a query embedding, fixed priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingStatus {
    /// Strong best match with enough margin over the runner-up.
    Accepted,
    /// Strong best match but the runner-up is too close.
    Ambiguous,
    /// Borderline best match, worth a guarded expansion.
    GrayZone,
    /// Nothing in the index is close enough.
    NewIdentity,
}

impl RoutingStatus {
    /// Gray-zone and ambiguous routings force the strict filter threshold.
    #[inline]
    #[must_use]
    pub fn is_uncertain(&self) -> bool {
        matches!(self, RoutingStatus::GrayZone | RoutingStatus::Ambiguous)
    }
}

/// Per-query routing record. Ephemeral, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub status: RoutingStatus,
    pub identity_id: String,
    pub best_sim: f32,
    pub second_sim: f32,
    pub margin: f32,
}

/// Thresholds for the routing classification.
#[derive(Debug, Clone, Copy)]
pub struct RouterConfig {
    /// Minimum best similarity for an accepted verdict.
    pub min_accept: f32,
    /// Minimum best similarity for an ambiguous verdict.
    pub min_gray: f32,
    /// Minimum best similarity for a gray-zone verdict (and for the
    /// pipeline's fallback retry of a new-identity verdict).
    pub min_retry: f32,
    /// Required margin over the runner-up for an accepted verdict.
    pub margin_req: f32,
    /// Number of identity centroids inspected per query.
    pub top_k: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            min_accept: 0.60,
            min_gray: 0.55,
            min_retry: 0.50,
            margin_req: 0.05,
            top_k: 5,
        }
    }
}

/// Classifies a query vector against the identity index.
pub struct IdentityRouter {
    config: RouterConfig,
}

impl Default for IdentityRouter {
    fn default() -> Self {
        Self::new(RouterConfig::default())
    }
}

impl IdentityRouter {
    #[must_use]
    pub fn new(config: RouterConfig) -> Self {
        Self { config }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Route a normalized query vector to an enrolled identity.
    ///
    /// Pure function of the top-k centroid similarities; the only failure
    /// is an empty index. `second_sim` is -1.0 when fewer than two
    /// centroids exist.
    pub fn route(&self, index: &IdentityIndex, query: &Vector) -> Result<RoutingDecision> {
        let hits = index.search(query, self.config.top_k)?;

        let (best_id, best_sim) = hits[0].clone();
        let second_sim = hits.get(1).map(|(_, sim)| *sim).unwrap_or(-1.0);
        let margin = best_sim - second_sim;

        let status = if best_sim >= self.config.min_accept && margin >= self.config.margin_req {
            RoutingStatus::Accepted
        } else if best_sim >= self.config.min_gray {
            RoutingStatus::Ambiguous
        } else if best_sim >= self.config.min_retry {
            RoutingStatus::GrayZone
        } else {
            RoutingStatus::NewIdentity
        };

        Ok(RoutingDecision {
            status,
            identity_id: best_id,
            best_sim,
            second_sim,
            margin,
        })
    }
}
