//! # FaceSeek Core
//!
//! Core decision engine for the FaceSeek identity search service.
//!
//! This crate provides the fundamental data structures and algorithms:
//!
//! - [`Vector`] - Dense embedding vector with cosine/centroid operations
//! - [`FaceRecord`] / [`EmbeddingGallery`] - Enrolled faces with identity indexes
//! - [`IdentityIndex`] - Top-K cosine search over identity centroids
//! - [`IdentityRouter`] - Query-to-identity routing classification
//! - [`ClusterExpander`] - Iterative within-identity cluster expansion
//! - [`ConsistencyFilter`] - Cohesion-adaptive pruning with diagnostics
//! - [`SearchPipeline`] - Orchestration and result assembly
//! - [`QueryCache`] / [`ActivityLog`] - Bounded shared stores
//!
//! ## Example
//!
//! ```rust
//! use faceseek_core::{
//!     EmbeddingGallery, FaceRecord, IdentityCentroid, IdentityIndex,
//!     SearchPipeline, Vector,
//! };
//! use std::sync::Arc;
//!
//! let gallery = Arc::new(EmbeddingGallery::new(vec![FaceRecord::new(
//!     "f1",
//!     Some("id1".to_string()),
//!     Vector::new(vec![1.0, 0.0, 0.0]),
//!     "photos/f1.jpg",
//! )]).unwrap());
//!
//! let index = Arc::new(IdentityIndex::new(vec![IdentityCentroid {
//!     identity_id: "id1".to_string(),
//!     vector: Vector::new(vec![1.0, 0.0, 0.0]),
//! }]));
//!
//! let pipeline = SearchPipeline::with_defaults(gallery, index);
//! let result = pipeline.search(&Vector::new(vec![1.0, 0.0, 0.0])).unwrap();
//! ```

pub mod activity;
pub mod cache;
pub mod consistency;
pub mod error;
pub mod expander;
pub mod flags;
pub mod gallery;
pub mod index;
pub mod pipeline;
pub mod record;
pub mod router;
pub mod vector;

pub use activity::{ActivityLog, ActivityStats, SearchEvent, DEFAULT_ACTIVITY_CAPACITY};
pub use cache::{QueryCache, DEFAULT_CACHE_CAPACITY};
pub use consistency::{ConsistencyFilter, FilterConfig, FilterOutcome, FilteredMember};
pub use error::{Error, Result};
pub use expander::{ClusterExpander, ClusterMember, Expansion, ExpanderConfig};
pub use flags::Flag;
pub use gallery::EmbeddingGallery;
pub use index::{IdentityCentroid, IdentityIndex};
pub use pipeline::{
    ClusterDiagnostics, ConfidenceGroup, ResultRow, SearchPipeline, SearchResult,
};
pub use record::FaceRecord;
pub use router::{IdentityRouter, RouterConfig, RoutingDecision, RoutingStatus};
pub use vector::Vector;
