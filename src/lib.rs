// Price Catalog - Core Library
// Similarity lookup, merge-or-create disambiguation and JSON persistence
// for a small list of named, priced products.

pub mod error;
pub mod product;
pub mod similarity;
pub mod catalog;
pub mod disambiguation;
pub mod interaction;
pub mod editor;
pub mod storage;
pub mod config;
pub mod command;
pub mod session;

// Re-export commonly used types
pub use error::{CatalogError, ValidationError};
pub use product::{normalize_name, parse_price, Product, ProductId};
pub use similarity::{
    fold_to_ascii, lcs_len, lcs_len_naive, token_set_ratio,
    LcsScorer, Score, SimilarityScorer, TokenSetScorer,
};
pub use catalog::{CandidateMatch, Catalog};
pub use disambiguation::{
    resolve_edit_choice, resolve_match_choice,
    Choice, ChoiceSet, Decision, EditAction,
};
pub use interaction::{LinePrompter, Prompter};
pub use editor::{AddOutcome, CatalogEditor, EditSeed, ModifyOutcome};
pub use storage::{
    decode_products, encode_products, load_or_bootstrap,
    CatalogStore, JsonFileStore, DEFAULT_CATALOG_PATH,
};
pub use config::{CatalogConfig, ScorerKind};
pub use command::{parse_command, Command};
pub use session::Session;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
