use crate::vector::Vector;
use serde::{Deserialize, Serialize};

/// An enrolled face: one embedding extracted from one photo.
///
/// Records are immutable after load and owned exclusively by the
/// [`EmbeddingGallery`](crate::gallery::EmbeddingGallery).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceRecord {
    /// Unique key for this face crop.
    pub face_id: String,
    /// Enrolled identity, absent for unlabeled records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_id: Option<String>,
    /// L2-normalized embedding vector.
    pub embedding: Vector,
    /// Opaque locator for the source photo.
    pub photo_ref: String,
}

impl FaceRecord {
    #[inline]
    #[must_use]
    pub fn new(
        face_id: impl Into<String>,
        identity_id: Option<String>,
        embedding: Vector,
        photo_ref: impl Into<String>,
    ) -> Self {
        Self {
            face_id: face_id.into(),
            identity_id,
            embedding,
            photo_ref: photo_ref.into(),
        }
    }

    /// True when this record is enrolled under the given identity.
    #[inline]
    pub fn belongs_to(&self, identity_id: &str) -> bool {
        self.identity_id.as_deref() == Some(identity_id)
    }
}
