use faceseek_core::{
    EmbeddingGallery, Error, FaceRecord, IdentityCentroid, IdentityIndex, Result, Vector,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// On-disk gallery manifest: `gallery.json`.
#[derive(Debug, Deserialize)]
struct GalleryFile {
    /// Declared embedding dimension; every vector is checked against it.
    dim: usize,
    records: Vec<RecordEntry>,
}

#[derive(Debug, Deserialize)]
struct RecordEntry {
    face_id: String,
    #[serde(default)]
    identity_id: Option<String>,
    embedding: Vec<f32>,
    photo_ref: String,
}

/// On-disk centroid set: `identity_centroids.json`.
#[derive(Debug, Deserialize)]
struct CentroidFile {
    centroids: Vec<CentroidEntry>,
}

#[derive(Debug, Deserialize)]
struct CentroidEntry {
    identity_id: String,
    vector: Vec<f32>,
}

/// Load-once holder for the read-only query-time assets.
///
/// Both stores are shared behind `Arc` and never mutated after load, so
/// any number of concurrent readers can hold them without locking.
pub struct GalleryStore {
    gallery: Arc<EmbeddingGallery>,
    index: Arc<IdentityIndex>,
    data_dir: PathBuf,
}

impl GalleryStore {
    /// Load gallery records and identity centroids from a data directory.
    ///
    /// Expects `gallery.json` and `identity_centroids.json`. Vectors whose
    /// norm drifted from 1.0 are re-normalized on the way in; a zero
    /// vector, a dimension mismatch, a duplicate face_id, or an empty
    /// record/centroid set is a hard failure.
    pub fn load<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();

        let gallery_file: GalleryFile = read_json(&data_dir.join("gallery.json"))?;
        let centroid_file: CentroidFile = read_json(&data_dir.join("identity_centroids.json"))?;

        let dim = gallery_file.dim;

        let mut records = Vec::with_capacity(gallery_file.records.len());
        for entry in gallery_file.records {
            let embedding = unit_vector(entry.embedding, dim, &entry.face_id)?;
            records.push(FaceRecord::new(
                entry.face_id,
                entry.identity_id,
                embedding,
                entry.photo_ref,
            ));
        }
        let gallery = EmbeddingGallery::new(records)?;

        if centroid_file.centroids.is_empty() {
            return Err(Error::EmptyIndex);
        }
        let mut centroids = Vec::with_capacity(centroid_file.centroids.len());
        for entry in centroid_file.centroids {
            let vector = unit_vector(entry.vector, dim, &entry.identity_id)?;
            centroids.push(IdentityCentroid {
                identity_id: entry.identity_id,
                vector,
            });
        }
        let index = IdentityIndex::new(centroids);

        info!(
            records = gallery.len(),
            identities = index.len(),
            dim,
            data_dir = %data_dir.display(),
            "gallery assets loaded"
        );

        Ok(Self {
            gallery: Arc::new(gallery),
            index: Arc::new(index),
            data_dir,
        })
    }

    #[inline]
    pub fn gallery(&self) -> Arc<EmbeddingGallery> {
        self.gallery.clone()
    }

    #[inline]
    pub fn index(&self) -> Arc<IdentityIndex> {
        self.index.clone()
    }

    #[inline]
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw)
        .map_err(|e| Error::Serialization(format!("{}: {e}", path.display())))
}

/// Validate dimension and return a unit-length vector, re-normalizing
/// drifted inputs.
fn unit_vector(data: Vec<f32>, dim: usize, key: &str) -> Result<Vector> {
    if data.len() != dim {
        return Err(Error::InvalidDimension {
            expected: dim,
            actual: data.len(),
        });
    }
    let v = Vector::new(data);
    if v.norm() <= f32::EPSILON {
        return Err(Error::Load(format!("zero-norm vector for {key}")));
    }
    if v.is_normalized() {
        Ok(v)
    } else {
        Ok(v.normalized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_assets(dir: &Path, gallery: &str, centroids: &str) {
        fs::write(dir.join("gallery.json"), gallery).unwrap();
        fs::write(dir.join("identity_centroids.json"), centroids).unwrap();
    }

    const GALLERY_OK: &str = r#"{
        "dim": 3,
        "records": [
            {"face_id": "f1", "identity_id": "id1", "embedding": [1.0, 0.0, 0.0], "photo_ref": "photos/f1.jpg"},
            {"face_id": "f2", "identity_id": "id1", "embedding": [2.0, 0.0, 0.0], "photo_ref": "photos/f2.jpg"},
            {"face_id": "f3", "embedding": [0.0, 1.0, 0.0], "photo_ref": "photos/f3.jpg"}
        ]
    }"#;

    const CENTROIDS_OK: &str = r#"{
        "centroids": [
            {"identity_id": "id1", "vector": [1.0, 0.0, 0.0]}
        ]
    }"#;

    #[test]
    fn test_load_and_normalize() {
        let dir = tempfile::tempdir().unwrap();
        write_assets(dir.path(), GALLERY_OK, CENTROIDS_OK);

        let store = GalleryStore::load(dir.path()).unwrap();
        let gallery = store.gallery();
        assert_eq!(gallery.len(), 3);
        assert_eq!(gallery.identity_count(), 1);

        // f2 was stored with norm 2.0 and must come back unit length.
        let f2 = gallery.get("f2").unwrap();
        assert!(f2.embedding.is_normalized());

        // Unlabeled record is loaded but not indexed by identity.
        assert!(gallery.get("f3").unwrap().identity_id.is_none());
        assert_eq!(gallery.slots_for_identity("id1").len(), 2);

        assert_eq!(store.index().len(), 1);
    }

    #[test]
    fn test_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            GalleryStore::load(dir.path()),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_malformed_json_errors() {
        let dir = tempfile::tempdir().unwrap();
        write_assets(dir.path(), "{not json", CENTROIDS_OK);
        assert!(matches!(
            GalleryStore::load(dir.path()),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_dimension_mismatch_errors() {
        let dir = tempfile::tempdir().unwrap();
        let bad = r#"{
            "dim": 3,
            "records": [
                {"face_id": "f1", "identity_id": "id1", "embedding": [1.0, 0.0], "photo_ref": "p"}
            ]
        }"#;
        write_assets(dir.path(), bad, CENTROIDS_OK);
        assert!(matches!(
            GalleryStore::load(dir.path()),
            Err(Error::InvalidDimension {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_empty_centroids_errors() {
        let dir = tempfile::tempdir().unwrap();
        write_assets(dir.path(), GALLERY_OK, r#"{"centroids": []}"#);
        assert!(matches!(
            GalleryStore::load(dir.path()),
            Err(Error::EmptyIndex)
        ));
    }

    #[test]
    fn test_empty_gallery_errors() {
        let dir = tempfile::tempdir().unwrap();
        write_assets(
            dir.path(),
            r#"{"dim": 3, "records": []}"#,
            CENTROIDS_OK,
        );
        assert!(matches!(
            GalleryStore::load(dir.path()),
            Err(Error::EmptyGallery)
        ));
    }

    #[test]
    fn test_zero_vector_errors() {
        let dir = tempfile::tempdir().unwrap();
        let bad = r#"{
            "dim": 3,
            "records": [
                {"face_id": "f1", "identity_id": "id1", "embedding": [0.0, 0.0, 0.0], "photo_ref": "p"}
            ]
        }"#;
        write_assets(dir.path(), bad, CENTROIDS_OK);
        assert!(matches!(GalleryStore::load(dir.path()), Err(Error::Load(_))));
    }
}
