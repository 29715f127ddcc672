//! Error types for meshforge

use thiserror::Error;

/// Main error type for meshforge operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("material index {index} out of range (materials: {count})")]
    MaterialOutOfRange { index: usize, count: usize },

    #[error("triangle {triangle} references vertex {vertex} out of range (vertices: {count})")]
    IndexOutOfRange {
        triangle: usize,
        vertex: u32,
        count: usize,
    },
}

/// Result type alias for meshforge operations
pub type Result<T> = std::result::Result<T, Error>;
