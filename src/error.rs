// ⚠️ Error taxonomy for the catalog engine
//
// Validation and index errors are always recoverable: the caller reports
// them and the user re-enters input. StructuralInvariant means a caller bug.

use crate::product::ProductId;
use std::path::PathBuf;
use thiserror::Error;

/// Rejected user input for a product field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Product's name can't be an empty string")]
    EmptyName,

    #[error("Product's price can't be less than 0 ({0} < 0)")]
    NegativePrice(i64),

    #[error("Can't convert '{0}' to a valid price (digits only)")]
    InvalidPriceFormat(String),

    #[error("Price '{0}' is too large")]
    PriceOutOfRange(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Index {index} is out of range (catalog has {len} products)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Product {0} is no longer in the catalog")]
    UnknownProduct(ProductId),

    #[error("Choice set has {keys} keys but {labels} labels")]
    StructuralInvariant { keys: usize, labels: usize },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Terminal I/O failed: {0}")]
    Terminal(#[source] std::io::Error),

    #[error("Malformed catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid record '{key}': {reason}")]
    InvalidRecord { key: String, reason: ValidationError },
}

impl CatalogError {
    /// Everything except a broken programming contract (or a dead terminal)
    /// can be reported and retried.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            CatalogError::StructuralInvariant { .. } | CatalogError::Terminal(_)
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
