use crate::{Error, FaceRecord, Result};
use ahash::AHashMap;

/// Read-only store of enrolled face records, loaded once at startup.
///
/// Keeps a bijective `face_id -> slot` map and a secondary index
/// `identity_id -> slots` built at load time, so "records of this identity"
/// is answered in time proportional to the subset size rather than by
/// scanning the whole table.
pub struct EmbeddingGallery {
    records: Vec<FaceRecord>,
    slot_by_face_id: AHashMap<String, usize>,
    slots_by_identity: AHashMap<String, Vec<usize>>,
    dim: usize,
}

impl EmbeddingGallery {
    /// Build a gallery from loaded records.
    ///
    /// Fails on an empty record set, a dimension mismatch against the first
    /// record, or a duplicate `face_id`.
    pub fn new(records: Vec<FaceRecord>) -> Result<Self> {
        let dim = records
            .first()
            .map(|r| r.embedding.dim())
            .ok_or(Error::EmptyGallery)?;

        let mut slot_by_face_id = AHashMap::with_capacity(records.len());
        let mut slots_by_identity: AHashMap<String, Vec<usize>> = AHashMap::new();

        for (slot, record) in records.iter().enumerate() {
            if record.embedding.dim() != dim {
                return Err(Error::InvalidDimension {
                    expected: dim,
                    actual: record.embedding.dim(),
                });
            }
            if slot_by_face_id
                .insert(record.face_id.clone(), slot)
                .is_some()
            {
                return Err(Error::DuplicateFaceId(record.face_id.clone()));
            }
            if let Some(identity) = &record.identity_id {
                slots_by_identity
                    .entry(identity.clone())
                    .or_default()
                    .push(slot);
            }
        }

        Ok(Self {
            records,
            slot_by_face_id,
            slots_by_identity,
            dim,
        })
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Look up a record by face id.
    #[inline]
    pub fn get(&self, face_id: &str) -> Option<&FaceRecord> {
        self.slot_by_face_id
            .get(face_id)
            .map(|&slot| &self.records[slot])
    }

    /// Record at a storage slot. Slots come from this gallery's own
    /// indexes, so out-of-range access is a caller bug.
    #[inline]
    #[must_use]
    pub fn record(&self, slot: usize) -> &FaceRecord {
        &self.records[slot]
    }

    /// Slots of all records enrolled under an identity, in load order.
    #[inline]
    pub fn slots_for_identity(&self, identity_id: &str) -> &[usize] {
        self.slots_by_identity
            .get(identity_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct enrolled identities.
    #[inline]
    #[must_use]
    pub fn identity_count(&self) -> usize {
        self.slots_by_identity.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FaceRecord> {
        self.records.iter()
    }
}
