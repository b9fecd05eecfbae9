// ⚙️ Configuration - optional TOML file, overridden by CLI flags
//
// Example catalog.toml:
//
//   path = "price_list.json"
//   scorer = "token-set"
//   token_threshold = 50
//   token_window = 20
//   sort_on_save = true
//   create_if_missing = true

use crate::similarity::{LcsScorer, SimilarityScorer, TokenSetScorer};
use crate::storage::{JsonFileStore, DEFAULT_CATALOG_PATH};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Which similarity strategy the catalog searches with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ScorerKind {
    /// Longest common subsequence, all exact-max ties surfaced
    #[default]
    Lcs,
    /// Token-set ratio with a near-tie window
    TokenSet,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    pub path: PathBuf,
    pub scorer: ScorerKind,
    pub token_threshold: u32,
    pub token_window: u32,
    pub sort_on_save: bool,
    pub create_if_missing: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let token = TokenSetScorer::default();
        CatalogConfig {
            path: PathBuf::from(DEFAULT_CATALOG_PATH),
            scorer: ScorerKind::default(),
            token_threshold: token.threshold,
            token_window: token.window,
            sort_on_save: true,
            create_if_missing: true,
        }
    }
}

impl CatalogConfig {
    /// Read a TOML config file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: CatalogConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn build_scorer(&self) -> Box<dyn SimilarityScorer> {
        match self.scorer {
            ScorerKind::Lcs => Box::new(LcsScorer),
            ScorerKind::TokenSet => Box::new(TokenSetScorer {
                threshold: self.token_threshold,
                window: self.token_window,
            }),
        }
    }

    pub fn build_store(&self) -> JsonFileStore {
        JsonFileStore::new(self.path.clone())
    }
}
