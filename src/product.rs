// 🏷️ Product Entity - Stable identity + validated values
//
// "Product name and price are VALUES (can change), ProductId is IDENTITY (never changes)"
//
// - Name is whitespace-normalized and never empty
// - Price is a non-negative integer
// - ProductId is assigned at construction/decoding and is never persisted

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// PRODUCT ID
// ============================================================================

/// Opaque handle that survives reordering and removal of other products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(uuid::Uuid);

impl ProductId {
    pub fn new() -> Self {
        ProductId(uuid::Uuid::new_v4())
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// PRODUCT
// ============================================================================

/// One named, priced catalog record.
///
/// Fields are private so every write goes through validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ProductRecord", into = "ProductRecord")]
pub struct Product {
    id: ProductId,
    name: String,
    price: u64,
}

/// On-disk shape of a product: `{"name": ..., "price": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProductRecord {
    name: String,
    price: i64,
}

impl Product {
    /// Create a product with a fresh identity.
    pub fn new(name: &str, price: i64) -> Result<Self, ValidationError> {
        Ok(Product {
            id: ProductId::new(),
            name: normalize_name(name)?,
            price: validate_price(price)?,
        })
    }

    /// Create from an already-parsed price (see `parse_price`).
    pub fn with_price(name: &str, price: u64) -> Result<Self, ValidationError> {
        Product::new(name, price_to_i64(price)?)
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), ValidationError> {
        self.name = normalize_name(name)?;
        Ok(())
    }

    pub fn set_price(&mut self, price: i64) -> Result<(), ValidationError> {
        self.price = validate_price(price)?;
        Ok(())
    }

    /// Compare values only, ignoring identity.
    pub fn same_value(&self, other: &Product) -> bool {
        self.name == other.name && self.price == other.price
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.price)
    }
}

impl TryFrom<ProductRecord> for Product {
    type Error = ValidationError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        Product::new(&record.name, record.price)
    }
}

impl From<Product> for ProductRecord {
    fn from(product: Product) -> Self {
        ProductRecord {
            name: product.name,
            // Prices come from i64 input, so they always fit back
            price: i64::try_from(product.price).unwrap_or(i64::MAX),
        }
    }
}

// ============================================================================
// VALIDATION HELPERS
// ============================================================================

/// Collapse internal whitespace runs to single spaces and trim the ends.
///
/// Example: "  a   b " → "a b"
pub fn normalize_name(raw: &str) -> Result<String, ValidationError> {
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(normalized)
}

fn validate_price(price: i64) -> Result<u64, ValidationError> {
    u64::try_from(price).map_err(|_| ValidationError::NegativePrice(price))
}

/// Prices must stay representable as a signed JSON integer.
pub(crate) fn price_to_i64(price: u64) -> Result<i64, ValidationError> {
    i64::try_from(price).map_err(|_| ValidationError::PriceOutOfRange(price.to_string()))
}

/// Parse typed price text.
///
/// All whitespace is stripped first ("1 000" → 1000); what remains must be
/// decimal digits only, so signs and decimal points are rejected.
pub fn parse_price(raw: &str) -> Result<u64, ValidationError> {
    let digits: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidPriceFormat(raw.trim().to_string()));
    }

    let value = digits
        .parse::<u64>()
        .map_err(|_| ValidationError::PriceOutOfRange(digits.clone()))?;
    price_to_i64(value).map(|_| value)
}

// ============================================================================
// TESTS
// ============================================================================
