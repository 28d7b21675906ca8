use crate::{
    ActivityLog, ClusterExpander, ConsistencyFilter, EmbeddingGallery, Error, Flag,
    IdentityIndex, IdentityRouter, QueryCache, Result, RoutingDecision, RoutingStatus,
    SearchEvent, Vector,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Cluster reliability diagnostics attached to a search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterDiagnostics {
    /// Mean member similarity to the cluster centroid (cohesion).
    pub centroid_similarity: f32,
    pub threshold_used: f32,
    pub precision_estimate: f32,
    pub flagged_unreliable: bool,
    pub flags: Vec<Flag>,
}

/// Confidence band for a surviving member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceGroup {
    HighConfidence,
    Borderline,
}

/// One ranked match in the final result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRow {
    pub face_id: String,
    pub photo_ref: String,
    pub cosine_similarity: f32,
    pub centroid_similarity: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_id: Option<String>,
    pub group: ConfidenceGroup,
}

/// Assembled per-query result. The face_id list portion is retained in the
/// query-result cache under `query_id` until evicted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub query_id: String,
    pub routing: RoutingDecision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<ClusterDiagnostics>,
    pub results: Vec<ResultRow>,
}

/// Orchestrates routing, expansion, filtering and result assembly.
///
/// Gallery and index are read-only at query time and shared across
/// unlimited concurrent readers; the cache and activity log are the only
/// shared mutable stores, passed in by handle.
pub struct SearchPipeline {
    gallery: Arc<EmbeddingGallery>,
    index: Arc<IdentityIndex>,
    router: IdentityRouter,
    expander: ClusterExpander,
    filter: ConsistencyFilter,
    cache: Arc<QueryCache>,
    activity: Arc<ActivityLog>,
}

impl SearchPipeline {
    pub fn new(
        gallery: Arc<EmbeddingGallery>,
        index: Arc<IdentityIndex>,
        cache: Arc<QueryCache>,
        activity: Arc<ActivityLog>,
    ) -> Self {
        Self {
            gallery,
            index,
            router: IdentityRouter::default(),
            expander: ClusterExpander::default(),
            filter: ConsistencyFilter::default(),
            cache,
            activity,
        }
    }

    /// Pipeline with default-capacity cache and activity stores.
    pub fn with_defaults(gallery: Arc<EmbeddingGallery>, index: Arc<IdentityIndex>) -> Self {
        Self::new(
            gallery,
            index,
            Arc::new(QueryCache::default()),
            Arc::new(ActivityLog::default()),
        )
    }

    #[inline]
    pub fn gallery(&self) -> &Arc<EmbeddingGallery> {
        &self.gallery
    }

    #[inline]
    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    #[inline]
    pub fn activity(&self) -> &Arc<ActivityLog> {
        &self.activity
    }

    /// Run a full search for a query embedding.
    ///
    /// Quality problems never abort: the result always carries flags and
    /// reasons instead. The only hard failures are a missing/mis-sized
    /// query vector and an empty index.
    pub fn search(&self, query: &Vector) -> Result<SearchResult> {
        if query.is_empty() {
            return Err(Error::NoFaceDetected);
        }
        if query.dim() != self.gallery.dim() {
            return Err(Error::InvalidDimension {
                expected: self.gallery.dim(),
                actual: query.dim(),
            });
        }

        let query = query.normalized();
        let decision = self.router.route(&self.index, &query)?;

        let mut routing_flagged = false;
        let mut routing_reasons: Vec<Flag> = Vec::new();
        // The response keeps the router's original decision; the effective
        // status drives expansion, filtering and logging.
        let mut status = decision.status;

        if status == RoutingStatus::Ambiguous {
            routing_flagged = true;
            routing_reasons.push(Flag::AmbiguousIdentityRouting);
        }

        if status == RoutingStatus::NewIdentity {
            let retryable = decision.best_sim >= self.router.config().min_retry
                && !decision.identity_id.is_empty();
            if retryable {
                status = RoutingStatus::GrayZone;
                routing_flagged = true;
                routing_reasons.push(Flag::FallbackRetryLowConfidence);
            } else {
                debug!(
                    best_sim = decision.best_sim,
                    "query routed as new identity, short-circuiting"
                );
                return Ok(SearchResult {
                    query_id: Uuid::new_v4().to_string(),
                    routing: decision,
                    cluster: None,
                    results: Vec::new(),
                });
            }
        }

        let expansion = self
            .expander
            .expand(&self.gallery, &query, &decision.identity_id);

        let (rows, diagnostics) = if expansion.members.is_empty() {
            let mut flags = expansion.reasons.clone();
            flags.extend(routing_reasons.iter().copied());
            (
                Vec::new(),
                ClusterDiagnostics {
                    centroid_similarity: 0.0,
                    threshold_used: 0.0,
                    precision_estimate: 0.0,
                    flagged_unreliable: true,
                    flags,
                },
            )
        } else {
            let outcome =
                self.filter
                    .filter(&self.gallery, &expansion.members, &decision.identity_id, status);

            let strong_bar = self.filter.config().strong_bar;
            let rows: Vec<ResultRow> = outcome
                .members
                .iter()
                .map(|m| {
                    let record = self.gallery.record(m.slot);
                    ResultRow {
                        face_id: record.face_id.clone(),
                        photo_ref: record.photo_ref.clone(),
                        cosine_similarity: m.expansion_similarity,
                        centroid_similarity: m.centroid_similarity,
                        identity_id: record.identity_id.clone(),
                        group: if m.centroid_similarity >= strong_bar {
                            ConfidenceGroup::HighConfidence
                        } else {
                            ConfidenceGroup::Borderline
                        },
                    }
                })
                .collect();

            // Reason order is fixed for determinism: expander, filter,
            // routing.
            let mut flags = expansion.reasons.clone();
            flags.extend(outcome.reasons.iter().copied());
            flags.extend(routing_reasons.iter().copied());

            (
                rows,
                ClusterDiagnostics {
                    centroid_similarity: outcome.cohesion,
                    threshold_used: outcome.threshold,
                    precision_estimate: outcome.precision,
                    flagged_unreliable: routing_flagged || expansion.flagged || outcome.flagged,
                    flags,
                },
            )
        };

        let query_id = Uuid::new_v4().to_string();
        self.cache.insert(
            query_id.clone(),
            rows.iter().map(|r| r.face_id.clone()).collect(),
        );

        self.activity.record(SearchEvent {
            timestamp: Utc::now(),
            status,
            identity_id: Some(decision.identity_id.clone()),
            precision: diagnostics.precision_estimate,
            flagged: diagnostics.flagged_unreliable,
        });

        debug!(
            query_id = %query_id,
            identity = %decision.identity_id,
            matches = rows.len(),
            flagged = diagnostics.flagged_unreliable,
            "search completed"
        );

        Ok(SearchResult {
            query_id,
            routing: decision,
            cluster: Some(diagnostics),
            results: rows,
        })
    }

    /// Ordered face_id list for a previous query, or `UnknownQueryId`.
    pub fn lookup_cached_ids(&self, query_id: &str) -> Result<Vec<String>> {
        self.cache.lookup(query_id)
    }
}
