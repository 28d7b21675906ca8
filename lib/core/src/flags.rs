use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic reason attached to a search result.
///
/// Reasons never abort a search; the pipeline always returns a structured
/// best-effort result carrying them. Wire spellings match the stable
/// diagnostic vocabulary consumed by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flag {
    /// The routed identity has no records in the gallery.
    #[serde(rename = "no_hits_for_identity")]
    NoHitsForIdentity,
    /// An expansion iteration produced no strong anchors and was discarded.
    #[serde(rename = "no_strong_matches")]
    NoStrongMatches,
    /// The consistency filter pruned every member.
    #[serde(rename = "empty_after_filter")]
    EmptyAfterFilter,
    /// Under half of the filtered set carries the routed identity.
    #[serde(rename = "precision<0.5")]
    LowPrecision,
    /// Fewer than five members cleared the strong centroid bar.
    #[serde(rename = "few_strong_matches")]
    FewStrongMatches,
    /// Cluster cohesion below 0.5.
    #[serde(rename = "weak_centroid")]
    WeakCentroid,
    /// Routing landed in the gray zone; informational only.
    #[serde(rename = "low_confidence_identity_assignment")]
    LowConfidenceIdentityAssignment,
    /// Router saw a strong best match without enough margin.
    #[serde(rename = "ambiguous_identity_routing")]
    AmbiguousIdentityRouting,
    /// A new-identity verdict was retried as gray-zone.
    #[serde(rename = "fallback_retry_low_confidence")]
    FallbackRetryLowConfidence,
}

impl Flag {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::NoHitsForIdentity => "no_hits_for_identity",
            Flag::NoStrongMatches => "no_strong_matches",
            Flag::EmptyAfterFilter => "empty_after_filter",
            Flag::LowPrecision => "precision<0.5",
            Flag::FewStrongMatches => "few_strong_matches",
            Flag::WeakCentroid => "weak_centroid",
            Flag::LowConfidenceIdentityAssignment => "low_confidence_identity_assignment",
            Flag::AmbiguousIdentityRouting => "ambiguous_identity_routing",
            Flag::FallbackRetryLowConfidence => "fallback_retry_low_confidence",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
