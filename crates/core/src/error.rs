//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures. Every operation
/// that returns one of these has left state untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The referenced product is not registered.
    #[error("product not found: {0}")]
    NotFound(String),

    /// Registration reused an existing product id.
    #[error("product already exists: {0}")]
    DuplicateProduct(String),

    /// An input was rejected before any computation or mutation.
    #[error("{0}")]
    InvalidArgument(String),
}

impl DomainError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn duplicate(id: impl Into<String>) -> Self {
        Self::DuplicateProduct(id.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Stable machine-readable code, used by boundaries that serialize errors.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::NotFound(_) => "not_found",
            DomainError::DuplicateProduct(_) => "duplicate_product",
            DomainError::InvalidArgument(_) => "invalid_argument",
        }
    }
}
