// 📚 Catalog Index - ordered products + ranked similarity search
//
// Positions are a display-time projection. Mutations go through ProductId,
// so a position captured before a removal can't hit the wrong product.

use crate::error::{CatalogError, Result};
use crate::product::{price_to_i64, Product, ProductId};
use crate::similarity::{LcsScorer, Score, SimilarityScorer};
use tracing::{debug, info};

// ============================================================================
// CANDIDATE MATCH
// ============================================================================

/// Transient search hit, rebuilt on every query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateMatch {
    /// Display position at the time of the search
    pub index: usize,

    pub id: ProductId,

    pub name: String,

    pub score: Score,
}

// ============================================================================
// CATALOG
// ============================================================================

pub struct Catalog {
    products: Vec<Product>,
    scorer: Box<dyn SimilarityScorer>,
}

impl Catalog {
    /// Create an empty catalog searched with the given strategy.
    pub fn new(scorer: Box<dyn SimilarityScorer>) -> Self {
        Catalog {
            products: Vec::new(),
            scorer,
        }
    }

    pub fn with_products(scorer: Box<dyn SimilarityScorer>, products: Vec<Product>) -> Self {
        Catalog { products, scorer }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn scorer_name(&self) -> &'static str {
        self.scorer.name()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Product)> {
        self.products.iter().enumerate()
    }

    // ========================================================================
    // LOOKUPS
    // ========================================================================

    pub fn get(&self, index: usize) -> Result<&Product> {
        self.products.get(index).ok_or(CatalogError::IndexOutOfRange {
            index,
            len: self.products.len(),
        })
    }

    /// Resolve a user-facing position to a stable id.
    pub fn id_at(&self, index: usize) -> Result<ProductId> {
        self.get(index).map(Product::id)
    }

    pub fn position_of(&self, id: ProductId) -> Option<usize> {
        self.products.iter().position(|p| p.id() == id)
    }

    pub fn get_by_id(&self, id: ProductId) -> Result<&Product> {
        self.products
            .iter()
            .find(|p| p.id() == id)
            .ok_or(CatalogError::UnknownProduct(id))
    }

    fn get_mut_by_id(&mut self, id: ProductId) -> Result<&mut Product> {
        self.products
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or(CatalogError::UnknownProduct(id))
    }

    // ========================================================================
    // SEARCH
    // ========================================================================

    /// Positions of the products whose names best match `query`.
    pub fn search(&self, query: &str) -> Vec<usize> {
        let scores: Vec<Score> = self
            .products
            .iter()
            .map(|p| self.scorer.score(query, p.name()))
            .collect();

        let selected = self.scorer.select(&scores);
        debug!(
            query,
            scorer = self.scorer.name(),
            matches = selected.len(),
            "catalog search"
        );
        selected
    }

    /// Same as `search`, with ids, names and scores attached.
    pub fn search_matches(&self, query: &str) -> Vec<CandidateMatch> {
        self.search(query)
            .into_iter()
            .map(|index| {
                let product = &self.products[index];
                CandidateMatch {
                    index,
                    id: product.id(),
                    name: product.name().to_string(),
                    score: self.scorer.score(query, product.name()),
                }
            })
            .collect()
    }

    // ========================================================================
    // PROJECTIONS
    // ========================================================================

    /// Products at `indices` (or all when `None`). Fails if any index is invalid.
    pub fn entries(&self, indices: Option<&[usize]>) -> Result<Vec<&Product>> {
        match indices {
            None => Ok(self.products.iter().collect()),
            Some(indices) => indices.iter().map(|&i| self.get(i)).collect(),
        }
    }

    pub fn names(&self, indices: Option<&[usize]>) -> Result<Vec<&str>> {
        Ok(self.entries(indices)?.into_iter().map(Product::name).collect())
    }

    pub fn prices(&self, indices: Option<&[usize]>) -> Result<Vec<u64>> {
        Ok(self.entries(indices)?.into_iter().map(Product::price).collect())
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Append a product; returns its id.
    pub fn insert(&mut self, product: Product) -> ProductId {
        let id = product.id();
        info!(%id, product = %product, "product added");
        self.products.push(product);
        id
    }

    pub fn rename(&mut self, id: ProductId, name: &str) -> Result<()> {
        let product = self.get_mut_by_id(id)?;
        product.set_name(name)?;
        info!(%id, name = product.name(), "product renamed");
        Ok(())
    }

    pub fn reprice(&mut self, id: ProductId, price: u64) -> Result<()> {
        let product = self.get_mut_by_id(id)?;
        product.set_price(price_to_i64(price)?)?;
        info!(%id, price, "product repriced");
        Ok(())
    }

    /// Remove by position. Out of range leaves the catalog untouched.
    pub fn remove(&mut self, index: usize) -> Result<Product> {
        let id = self.id_at(index)?;
        self.remove_by_id(id)
    }

    pub fn remove_by_id(&mut self, id: ProductId) -> Result<Product> {
        let index = self
            .position_of(id)
            .ok_or(CatalogError::UnknownProduct(id))?;
        let removed = self.products.remove(index);
        info!(%id, product = %removed, "product removed");
        Ok(removed)
    }

    /// Reorder by (name, price) so saved files diff cleanly.
    pub fn sort_by_name_price(&mut self) {
        self.products
            .sort_by(|a, b| a.name().cmp(b.name()).then(a.price().cmp(&b.price())));
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::new(Box::new(LcsScorer))
    }
}

// ============================================================================
// TESTS
// ============================================================================
