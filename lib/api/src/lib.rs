//! REST API surface for FaceSeek.
//!
//! Embeddings arrive pre-extracted from an upstream face detector; an
//! absent or empty embedding is reported as `no_face_detected`.

pub mod rest;

pub use rest::RestApi;
