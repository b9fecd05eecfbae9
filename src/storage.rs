// 💾 Persistence port - load/save the catalog as a flat JSON file
//
// Current format: [{"name": "Milk", "price": 20}, ...]
// Early format:   {"Milk": 20, ...}   (read-only, upgraded on next save)

use crate::error::{CatalogError, Result, ValidationError};
use crate::product::{parse_price, Product};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_CATALOG_PATH: &str = "price_list.json";

pub trait CatalogStore {
    /// `Ok(None)` when there is nothing stored yet.
    fn load(&self) -> Result<Option<Vec<Product>>>;

    fn save(&self, products: &[Product]) -> Result<()>;
}

// ============================================================================
// CODEC
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredCatalog {
    List(Vec<Value>),
    Legacy(serde_json::Map<String, Value>),
}

/// Serialize products as a pretty JSON array with a trailing newline.
pub fn encode_products(products: &[Product]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(products)?;
    json.push('\n');
    Ok(json)
}

/// Parse either file format, validating every record.
pub fn decode_products(json: &str) -> Result<Vec<Product>> {
    match serde_json::from_str::<StoredCatalog>(json)? {
        StoredCatalog::List(records) => records
            .into_iter()
            .enumerate()
            .map(|(i, record)| {
                serde_json::from_value::<Product>(record).map_err(|e| invalid_record(i, e))
            })
            .collect(),
        StoredCatalog::Legacy(map) => map
            .into_iter()
            .map(|(name, price)| decode_legacy_entry(&name, &price))
            .collect(),
    }
}

fn invalid_record(position: usize, error: serde_json::Error) -> CatalogError {
    warn!(position, %error, "rejecting stored product");
    CatalogError::Json(error)
}

fn decode_legacy_entry(name: &str, price: &Value) -> Result<Product> {
    let invalid = |reason: ValidationError| CatalogError::InvalidRecord {
        key: name.to_string(),
        reason,
    };

    // Early files stored the price exactly as typed after '='
    match price {
        Value::String(raw) => {
            let price = parse_price(raw).map_err(invalid)?;
            Product::with_price(name, price).map_err(invalid)
        }
        _ => {
            let price = price
                .as_i64()
                .ok_or_else(|| invalid(ValidationError::InvalidPriceFormat(price.to_string())))?;
            Product::new(name, price).map_err(invalid)
        }
    }
}

// ============================================================================
// JSON FILE STORE
// ============================================================================

/// Writes products in the order it is given; ordering policy belongs to the session.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogStore for JsonFileStore {
    fn load(&self) -> Result<Option<Vec<Product>>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CatalogError::io(&self.path, e)),
        };

        let products = decode_products(&json)?;
        info!(path = %self.path.display(), count = products.len(), "catalog loaded");
        Ok(Some(products))
    }

    fn save(&self, products: &[Product]) -> Result<()> {
        let json = encode_products(products)?;

        fs::write(&self.path, json).map_err(|e| CatalogError::io(&self.path, e))?;
        info!(path = %self.path.display(), count = products.len(), "catalog saved");
        Ok(())
    }
}

/// Load stored products, treating a missing store as an empty catalog.
///
/// With `create_if_missing`, an empty catalog is written straight away.
pub fn load_or_bootstrap(store: &dyn CatalogStore, create_if_missing: bool) -> Result<Vec<Product>> {
    match store.load()? {
        Some(products) => Ok(products),
        None => {
            info!(create_if_missing, "no stored catalog, starting empty");
            if create_if_missing {
                store.save(&[])?;
            }
            Ok(Vec::new())
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
