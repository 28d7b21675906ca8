// Integration tests for FaceSeek
use faceseek_core::{
    ActivityLog, ConfidenceGroup, EmbeddingGallery, FaceRecord, Flag, IdentityCentroid,
    IdentityIndex, QueryCache, RoutingStatus, SearchPipeline, Vector,
};
use faceseek_gallery::GalleryStore;
use std::sync::Arc;

fn gallery_of(records: Vec<(&str, Option<&str>, Vec<f32>)>) -> Arc<EmbeddingGallery> {
    Arc::new(
        EmbeddingGallery::new(
            records
                .into_iter()
                .map(|(face_id, identity, v)| {
                    FaceRecord::new(
                        face_id,
                        identity.map(String::from),
                        Vector::new(v).normalized(),
                        format!("photos/{face_id}.jpg"),
                    )
                })
                .collect(),
        )
        .unwrap(),
    )
}

fn index_of(centroids: Vec<(&str, Vec<f32>)>) -> Arc<IdentityIndex> {
    Arc::new(IdentityIndex::new(
        centroids
            .into_iter()
            .map(|(id, v)| IdentityCentroid {
                identity_id: id.to_string(),
                vector: Vector::new(v).normalized(),
            })
            .collect(),
    ))
}

#[test]
fn test_tight_identity_accepted_clean() {
    // Ten near-identical embeddings under one identity: accepted routing,
    // one-growth-pass convergence, relaxed threshold, nothing flagged.
    let records: Vec<(String, Vec<f32>)> = (0..10)
        .map(|i| (format!("f{i}"), vec![1.0, 0.001 * i as f32, 0.0]))
        .collect();
    let gallery = gallery_of(
        records
            .iter()
            .map(|(id, v)| (id.as_str(), Some("id1"), v.clone()))
            .collect(),
    );
    let index = index_of(vec![
        ("id1", vec![1.0, 0.0, 0.0]),
        ("id2", vec![0.0, 1.0, 0.0]),
    ]);
    let pipeline = SearchPipeline::with_defaults(gallery, index);

    let result = pipeline.search(&Vector::new(vec![1.0, 0.0, 0.0])).unwrap();

    assert_eq!(result.routing.status, RoutingStatus::Accepted);
    assert!((result.routing.best_sim - 1.0).abs() < 1e-4);
    assert!(result.routing.margin >= 0.05);

    let cluster = result.cluster.expect("full pipeline ran");
    assert!(!cluster.flagged_unreliable);
    assert!(cluster.flags.is_empty());
    assert!((cluster.precision_estimate - 1.0).abs() < 1e-6);
    assert!(cluster.centroid_similarity > 0.99);
    assert_eq!(cluster.threshold_used, 0.45);

    assert_eq!(result.results.len(), 10);
    for row in &result.results {
        assert_eq!(row.group, ConfidenceGroup::HighConfidence);
        assert!(row.centroid_similarity >= 0.55);
        assert!((-1.0..=1.0).contains(&row.cosine_similarity));
    }
}

#[test]
fn test_gray_zone_few_strong_matches() {
    let gallery = gallery_of(vec![
        ("f1", Some("id1"), vec![1.0, 0.0, 0.0]),
        ("f2", Some("id1"), vec![0.95, 0.1, 0.0]),
    ]);
    let index = index_of(vec![
        ("id1", vec![0.52, 0.854, 0.0]),
        ("id2", vec![0.10, -0.99, 0.0]),
    ]);
    let pipeline = SearchPipeline::with_defaults(gallery, index);

    let result = pipeline.search(&Vector::new(vec![1.0, 0.0, 0.0])).unwrap();

    assert_eq!(result.routing.status, RoutingStatus::GrayZone);
    let cluster = result.cluster.unwrap();
    assert!(cluster.flagged_unreliable);
    assert!(cluster.flags.contains(&Flag::FewStrongMatches));
    assert!(cluster
        .flags
        .contains(&Flag::LowConfidenceIdentityAssignment));
    assert_eq!(cluster.threshold_used, 0.55);
}

#[test]
fn test_new_identity_short_circuit() {
    let gallery = gallery_of(vec![("f1", Some("id1"), vec![1.0, 0.0, 0.0])]);
    let index = index_of(vec![
        ("id1", vec![0.40, 0.9165, 0.0]),
        ("id2", vec![-1.0, 0.0, 0.0]),
    ]);
    let pipeline = SearchPipeline::with_defaults(gallery, index);

    let result = pipeline.search(&Vector::new(vec![1.0, 0.0, 0.0])).unwrap();

    assert_eq!(result.routing.status, RoutingStatus::NewIdentity);
    assert!(result.cluster.is_none());
    assert!(result.results.is_empty());
}

#[test]
fn test_unknown_routed_identity_empty_result() {
    let gallery = gallery_of(vec![("f1", Some("other"), vec![1.0, 0.0, 0.0])]);
    let index = index_of(vec![
        ("ghost", vec![1.0, 0.0, 0.0]),
        ("other", vec![0.0, 1.0, 0.0]),
    ]);
    let pipeline = SearchPipeline::with_defaults(gallery, index);

    let result = pipeline.search(&Vector::new(vec![1.0, 0.0, 0.0])).unwrap();

    assert!(result.results.is_empty());
    let cluster = result.cluster.unwrap();
    assert!(cluster.flagged_unreliable);
    assert_eq!(cluster.flags, vec![Flag::NoHitsForIdentity]);
}

#[test]
fn test_cached_lookup_round_trip() {
    let records: Vec<(String, Vec<f32>)> = (0..6)
        .map(|i| (format!("f{i}"), vec![1.0, 0.002 * i as f32, 0.0]))
        .collect();
    let gallery = gallery_of(
        records
            .iter()
            .map(|(id, v)| (id.as_str(), Some("id1"), v.clone()))
            .collect(),
    );
    let index = index_of(vec![
        ("id1", vec![1.0, 0.0, 0.0]),
        ("id2", vec![0.0, 1.0, 0.0]),
    ]);
    let pipeline = SearchPipeline::new(
        gallery,
        index,
        Arc::new(QueryCache::new(8)),
        Arc::new(ActivityLog::default()),
    );

    let result = pipeline.search(&Vector::new(vec![1.0, 0.0, 0.0])).unwrap();
    let cached = pipeline.lookup_cached_ids(&result.query_id).unwrap();

    let returned: Vec<String> = result.results.iter().map(|r| r.face_id.clone()).collect();
    assert_eq!(cached, returned);

    assert!(pipeline.lookup_cached_ids("not-a-query").is_err());
}

#[test]
fn test_activity_stats_after_searches() {
    let records: Vec<(String, Vec<f32>)> = (0..6)
        .map(|i| (format!("f{i}"), vec![1.0, 0.002 * i as f32, 0.0]))
        .collect();
    let gallery = gallery_of(
        records
            .iter()
            .map(|(id, v)| (id.as_str(), Some("id1"), v.clone()))
            .collect(),
    );
    let index = index_of(vec![
        ("id1", vec![1.0, 0.0, 0.0]),
        ("id2", vec![0.0, 1.0, 0.0]),
    ]);
    let pipeline = SearchPipeline::with_defaults(gallery, index);

    for _ in 0..3 {
        pipeline.search(&Vector::new(vec![1.0, 0.0, 0.0])).unwrap();
    }

    let stats = pipeline.activity().stats(chrono::Duration::days(30));
    assert_eq!(stats.total_queries, 3);
    assert_eq!(stats.distinct_identities, 1);
    assert!((stats.avg_precision - 1.0).abs() < 1e-6);
    assert_eq!(pipeline.activity().recent().len(), 3);
}

#[test]
fn test_pipeline_over_loaded_assets() {
    // Full path: write assets to disk, load them, search them.
    let dir = tempfile::tempdir().unwrap();

    let records: Vec<serde_json::Value> = (0..8)
        .map(|i| {
            serde_json::json!({
                "face_id": format!("f{i}"),
                "identity_id": "id1",
                "embedding": [1.0, 0.001 * i as f64, 0.0],
                "photo_ref": format!("photos/f{i}.jpg"),
            })
        })
        .collect();
    let gallery_json = serde_json::json!({ "dim": 3, "records": records });
    let centroids_json = serde_json::json!({
        "centroids": [
            { "identity_id": "id1", "vector": [1.0, 0.0, 0.0] },
            { "identity_id": "id2", "vector": [0.0, 1.0, 0.0] },
        ]
    });
    std::fs::write(
        dir.path().join("gallery.json"),
        serde_json::to_string(&gallery_json).unwrap(),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("identity_centroids.json"),
        serde_json::to_string(&centroids_json).unwrap(),
    )
    .unwrap();

    let store = GalleryStore::load(dir.path()).unwrap();
    let pipeline = SearchPipeline::with_defaults(store.gallery(), store.index());

    let result = pipeline.search(&Vector::new(vec![1.0, 0.0, 0.0])).unwrap();
    assert_eq!(result.routing.status, RoutingStatus::Accepted);
    assert_eq!(result.results.len(), 8);
    assert_eq!(result.results[0].photo_ref, "photos/f0.jpg");
}

#[test]
fn test_result_serialization_shape() {
    let gallery = gallery_of(vec![
        ("f1", Some("id1"), vec![1.0, 0.0, 0.0]),
        ("f2", Some("id1"), vec![0.99, 0.01, 0.0]),
    ]);
    let index = index_of(vec![
        ("id1", vec![1.0, 0.0, 0.0]),
        ("id2", vec![0.0, 1.0, 0.0]),
    ]);
    let pipeline = SearchPipeline::with_defaults(gallery, index);

    let result = pipeline.search(&Vector::new(vec![1.0, 0.0, 0.0])).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["routing"]["status"], "accepted");
    assert!(json["query_id"].is_string());
    let flags = json["cluster"]["flags"].as_array().unwrap();
    assert!(flags.contains(&serde_json::json!("few_strong_matches")));
    assert_eq!(json["results"][0]["group"], "high_confidence");
}
