use thiserror::Error;

use crate::domain::ProductId;

/// Why a single catalog record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("malformed product record at index {index}: {reason}")]
    Malformed { index: usize, reason: String },
    #[error("product {id} has a negative price")]
    NegativePrice { id: ProductId },
    #[error("product {id} appears more than once")]
    DuplicateId { id: ProductId },
}
