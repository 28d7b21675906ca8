//! # FaceSeek
//!
//! Face embedding identity search: routes a query embedding to an
//! enrolled identity, expands the within-identity match set by iterative
//! centroid re-estimation, prunes it with a cohesion-adaptive threshold
//! and returns a ranked, diagnostics-carrying result.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! faceseek --data-dir ./data --http-port 8600
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use faceseek::prelude::*;
//! use std::sync::Arc;
//!
//! let store = GalleryStore::load("./data").unwrap();
//! let pipeline = SearchPipeline::with_defaults(store.gallery(), store.index());
//!
//! let result = pipeline.search(&Vector::new(vec![0.1, 0.2, 0.3])).unwrap();
//! for row in &result.results {
//!     println!("{} {:.3}", row.face_id, row.centroid_similarity);
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - `faceseek-core` - Decision engine (routing, expansion, filtering, pipeline)
//! - `faceseek-gallery` - Load-once gallery and centroid assets
//! - `faceseek-api` - REST API

// Re-export core types
pub use faceseek_core::{
    ActivityLog, ActivityStats, ClusterDiagnostics, ClusterExpander, ConfidenceGroup,
    ConsistencyFilter, EmbeddingGallery, Error, ExpanderConfig, FaceRecord, FilterConfig, Flag,
    IdentityCentroid, IdentityIndex, IdentityRouter, QueryCache, Result, ResultRow, RouterConfig,
    RoutingDecision, RoutingStatus, SearchEvent, SearchPipeline, SearchResult, Vector,
};

// Re-export gallery loading
pub use faceseek_gallery::GalleryStore;

// Re-export API
pub use faceseek_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ActivityLog, ClusterDiagnostics, ConfidenceGroup, EmbeddingGallery, Error, FaceRecord,
        Flag, GalleryStore, IdentityCentroid, IdentityIndex, QueryCache, Result, ResultRow,
        RestApi, RoutingDecision, RoutingStatus, SearchPipeline, SearchResult, Vector,
    };
}
