use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Dimension mismatch: catalog has {catalog} books, similarity matrix is {matrix}x{matrix}")]
    DimensionMismatch { catalog: usize, matrix: usize },

    #[error("Position {position} out of range for {len} books")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("Invalid similarity matrix: {0}")]
    InvalidMatrix(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
