use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Identity index holds no centroids")]
    EmptyIndex,

    #[error("Gallery holds no records")]
    EmptyGallery,

    #[error("No face detected in query input")]
    NoFaceDetected,

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Duplicate face id: {0}")]
    DuplicateFaceId(String),

    #[error("Unknown query id: {0}")]
    UnknownQueryId(String),

    #[error("Load error: {0}")]
    Load(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
