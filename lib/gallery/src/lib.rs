//! Gallery asset loading for FaceSeek.
//!
//! Reads the enrolled record set and the precomputed identity centroids
//! from a data directory once at startup and shares them as read-only
//! stores.

pub mod loader;

pub use loader::GalleryStore;
