use thiserror::Error;

use super::types::PageId;

/// Storage core error types
#[derive(Error, Debug)]
pub enum BurrowError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Page {0} not found")]
    PageNotFound(PageId),

    #[error("Index {index} out of range for node of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("Invalid node state: {0}")]
    InvalidNodeState(&'static str),

    #[error("Channel error: {0}")]
    Channel(String),
}

pub type Result<T> = std::result::Result<T, BurrowError>;
