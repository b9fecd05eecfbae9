// ✏️ Catalog Editor - add / modify / remove workflows
//
// add() searches first and asks before creating a near-duplicate.
// Every field write re-validates through Product; interactive prompts loop
// until the input is valid or the input stream closes.

use crate::catalog::Catalog;
use crate::disambiguation::{
    resolve_edit_choice, resolve_match_choice, ChoiceSet, Decision, EditAction,
};
use crate::error::Result;
use crate::interaction::Prompter;
use crate::product::{normalize_name, parse_price, Product, ProductId};
use tracing::{info, warn};

// ============================================================================
// OUTCOMES
// ============================================================================

/// Values to apply without prompting (used when an add merges into an existing product).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSeed {
    pub name: Option<String>,
    pub price: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifyOutcome {
    Renamed,
    Repriced,
    /// Name and price both changed
    Updated,
    Deleted,
    Skipped,
    /// Input closed mid-prompt; pending field left as it was
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Created(ProductId),
    Merged(ModifyOutcome),
    Skipped,
}

// ============================================================================
// EDITOR
// ============================================================================

pub struct CatalogEditor<'a, P: Prompter> {
    catalog: &'a mut Catalog,
    prompter: &'a mut P,
}

impl<'a, P: Prompter> CatalogEditor<'a, P> {
    pub fn new(catalog: &'a mut Catalog, prompter: &'a mut P) -> Self {
        CatalogEditor { catalog, prompter }
    }

    /// Add a product, asking first when similar names already exist.
    pub fn add(&mut self, name: &str, price: u64) -> Result<AddOutcome> {
        let product = Product::with_price(name, price)?;
        let matches = self.catalog.search_matches(product.name());

        if matches.is_empty() {
            return Ok(AddOutcome::Created(self.catalog.insert(product)));
        }

        let choices = ChoiceSet::for_matches(&matches)?;
        let token = self.prompter.choose(&choices)?;

        match resolve_match_choice(&matches, token.as_deref()) {
            Decision::CreateNew => Ok(AddOutcome::Created(self.catalog.insert(product))),
            Decision::MergeInto(id) => {
                info!(%id, incoming = %product, "merging into existing product");
                let seed = EditSeed {
                    name: Some(product.name().to_string()),
                    price: Some(product.price()),
                };
                Ok(AddOutcome::Merged(self.modify_by_id(id, seed)?))
            }
            Decision::Skip => {
                self.prompter.report("Skipped")?;
                Ok(AddOutcome::Skipped)
            }
        }
    }

    /// Edit the product currently shown at `index`.
    pub fn modify(&mut self, index: usize, seed: EditSeed) -> Result<ModifyOutcome> {
        let id = self.catalog.id_at(index)?;
        self.modify_by_id(id, seed)
    }

    pub fn modify_by_id(&mut self, id: ProductId, seed: EditSeed) -> Result<ModifyOutcome> {
        let chosen = self.catalog.get_by_id(id)?.to_string();
        self.prompter.report(&format!("Chosen product: {}", chosen))?;

        let choices = ChoiceSet::edit_actions()?;
        let token = self.prompter.choose(&choices)?;

        let outcome = match resolve_edit_choice(token.as_deref()) {
            EditAction::Rename => {
                if !self.apply_name(id, seed.name)? {
                    return Ok(ModifyOutcome::Aborted);
                }
                ModifyOutcome::Renamed
            }
            EditAction::Reprice => {
                if !self.apply_price(id, seed.price)? {
                    return Ok(ModifyOutcome::Aborted);
                }
                ModifyOutcome::Repriced
            }
            EditAction::RenameAndReprice => {
                if !self.apply_name(id, seed.name)? || !self.apply_price(id, seed.price)? {
                    return Ok(ModifyOutcome::Aborted);
                }
                ModifyOutcome::Updated
            }
            EditAction::Delete => {
                self.catalog.remove_by_id(id)?;
                ModifyOutcome::Deleted
            }
            EditAction::Skip => {
                self.prompter.report("Skipped")?;
                ModifyOutcome::Skipped
            }
        };

        Ok(outcome)
    }

    pub fn remove(&mut self, index: usize) -> Result<Product> {
        self.catalog.remove(index)
    }

    /// Ask for an index, then remove it. `None` when nothing was removed.
    pub fn remove_interactive(&mut self) -> Result<Option<Product>> {
        let line = match self.prompter.prompt("Enter product's index: ")? {
            Some(line) => line,
            None => return Ok(None),
        };

        match line.trim().parse::<usize>() {
            Ok(index) => self.remove(index).map(Some),
            Err(_) => {
                self.prompter.report("Invalid index")?;
                Ok(None)
            }
        }
    }

    // ========================================================================
    // FIELD HELPERS
    // ========================================================================

    /// Returns false if the user closed input before giving a name.
    fn apply_name(&mut self, id: ProductId, seeded: Option<String>) -> Result<bool> {
        let name = match seeded {
            Some(name) => name,
            None => match self.read_name(id)? {
                Some(name) => name,
                None => return Ok(false),
            },
        };
        self.catalog.rename(id, &name)?;
        Ok(true)
    }

    fn apply_price(&mut self, id: ProductId, seeded: Option<u64>) -> Result<bool> {
        let price = match seeded {
            Some(price) => price,
            None => match self.read_price(id)? {
                Some(price) => price,
                None => return Ok(false),
            },
        };
        self.catalog.reprice(id, price)?;
        Ok(true)
    }

    fn read_name(&mut self, id: ProductId) -> Result<Option<String>> {
        let current = self.catalog.get_by_id(id)?.name().to_string();
        loop {
            let line = match self.prompter.prompt(&format!("New name [{}]: ", current))? {
                Some(line) => line,
                None => return Ok(None),
            };
            match normalize_name(&line) {
                Ok(name) => return Ok(Some(name)),
                Err(e) => {
                    warn!(input = %line, error = %e, "rejected product name");
                    self.prompter.report(&e.to_string())?;
                }
            }
        }
    }

    fn read_price(&mut self, id: ProductId) -> Result<Option<u64>> {
        let current = self.catalog.get_by_id(id)?.price();
        loop {
            let line = match self.prompter.prompt(&format!("New price [{}]: ", current))? {
                Some(line) => line,
                None => return Ok(None),
            };
            match parse_price(&line) {
                Ok(price) => return Ok(Some(price)),
                Err(e) => {
                    warn!(input = %line, error = %e, "rejected product price");
                    self.prompter.report(&e.to_string())?;
                }
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CatalogError, ValidationError};
    use crate::interaction::LinePrompter;
    use crate::similarity::{LcsScorer, TokenSetScorer};
    use std::io::Cursor;

    type TestPrompter = LinePrompter<Cursor<Vec<u8>>, Vec<u8>>;

    fn prompter(input: &str) -> TestPrompter {
        LinePrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn catalog_with(items: &[(&str, i64)]) -> Catalog {
        let products = items
            .iter()
            .map(|(name, price)| Product::new(name, *price).unwrap())
            .collect();
        Catalog::with_products(Box::new(LcsScorer), products)
    }

    fn rows(catalog: &Catalog) -> Vec<String> {
        catalog.products().iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_add_to_empty_catalog_never_prompts() {
        let mut catalog = Catalog::default();
        let mut p = prompter("");

        let outcome = CatalogEditor::new(&mut catalog, &mut p).add("Milk", 20).unwrap();

        assert!(matches!(outcome, AddOutcome::Created(_)));
        assert_eq!(rows(&catalog), vec!["Milk = 20"]);
        assert!(p.into_output().is_empty());
    }

    #[test]
    fn test_add_merge_updates_price_without_duplicate() {
        let mut catalog = catalog_with(&[("Milk", 20)]);
        // pick existing index 0, then "update price"
        let mut p = prompter("0\np\n");

        let outcome = CatalogEditor::new(&mut catalog, &mut p).add("Milk", 25).unwrap();

        assert_eq!(outcome, AddOutcome::Merged(ModifyOutcome::Repriced));
        assert_eq!(catalog.len(), 1);
        assert_eq!(rows(&catalog), vec!["Milk = 25"]);
    }

    #[test]
    fn test_add_merge_can_rename_and_reprice() {
        let mut catalog = catalog_with(&[("Milk", 20), ("Bread", 15)]);
        let mut p = prompter("0\nb\n");

        let outcome = CatalogEditor::new(&mut catalog, &mut p)
            .add("  Whole   milk ", 30)
            .unwrap();

        assert_eq!(outcome, AddOutcome::Merged(ModifyOutcome::Updated));
        assert_eq!(rows(&catalog), vec!["Whole milk = 30", "Bread = 15"]);
    }

    #[test]
    fn test_add_as_new_appends() {
        let mut catalog = catalog_with(&[("Milk", 20)]);
        let mut p = prompter("n\n");

        let outcome = CatalogEditor::new(&mut catalog, &mut p).add("Milkshake", 35).unwrap();

        assert!(matches!(outcome, AddOutcome::Created(_)));
        assert_eq!(rows(&catalog), vec!["Milk = 20", "Milkshake = 35"]);
    }

    #[test]
    fn test_add_cancel_or_garbage_skips() {
        for input in ["c\n", "zzz\n", "7\n", ""] {
            let mut catalog = catalog_with(&[("Milk", 20)]);
            let mut p = prompter(input);

            let outcome = CatalogEditor::new(&mut catalog, &mut p).add("Milk", 99).unwrap();

            assert_eq!(outcome, AddOutcome::Skipped, "input {:?}", input);
            assert_eq!(rows(&catalog), vec!["Milk = 20"]);
        }
    }

    #[test]
    fn test_add_lists_every_tied_match() {
        let mut catalog = catalog_with(&[("Milk", 20), ("Milkshake", 35), ("Bread", 15)]);
        let mut p = prompter("c\n");

        CatalogEditor::new(&mut catalog, &mut p).add("milk", 1).unwrap();

        let shown = String::from_utf8(p.into_output()).unwrap();
        assert!(shown.contains("    0) Milk\n"));
        assert!(shown.contains("    1) Milkshake\n"));
        assert!(!shown.contains("Bread"));
        assert!(shown.contains("    n) Add as new product\n"));
    }

    #[test]
    fn test_add_rejects_blank_name_before_searching() {
        let mut catalog = catalog_with(&[("Milk", 20)]);
        let mut p = prompter("");

        let err = CatalogEditor::new(&mut catalog, &mut p).add("   ", 5).unwrap_err();

        assert!(matches!(err, CatalogError::Validation(ValidationError::EmptyName)));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_add_with_token_set_scorer() {
        let products = vec![Product::new("Crème brûlée", 40).unwrap()];
        let mut catalog = Catalog::with_products(Box::new(TokenSetScorer::new()), products);
        let mut p = prompter("0\np\n");

        let outcome = CatalogEditor::new(&mut catalog, &mut p)
            .add("creme brulee", 45)
            .unwrap();

        assert_eq!(outcome, AddOutcome::Merged(ModifyOutcome::Repriced));
        assert_eq!(rows(&catalog), vec!["Crème brûlée = 45"]);
    }

    #[test]
    fn test_modify_out_of_range_is_reported_not_fatal() {
        let mut catalog = catalog_with(&[("Milk", 20)]);
        let mut p = prompter("");

        let err = CatalogEditor::new(&mut catalog, &mut p)
            .modify(4, EditSeed::default())
            .unwrap_err();

        assert!(matches!(err, CatalogError::IndexOutOfRange { index: 4, len: 1 }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_modify_name_reprompts_until_non_empty() {
        let mut catalog = catalog_with(&[("Milk", 20)]);
        let mut p = prompter("r\n\n   \n Oat   milk \n");

        let outcome = CatalogEditor::new(&mut catalog, &mut p)
            .modify(0, EditSeed::default())
            .unwrap();

        assert_eq!(outcome, ModifyOutcome::Renamed);
        assert_eq!(rows(&catalog), vec!["Oat milk = 20"]);

        let shown = String::from_utf8(p.into_output()).unwrap();
        assert_eq!(shown.matches("New name [Milk]: ").count(), 3);
        assert!(shown.contains("Chosen product: Milk = 20"));
    }

    #[test]
    fn test_modify_price_reprompts_until_valid() {
        let mut catalog = catalog_with(&[("Milk", 20)]);
        let mut p = prompter("p\n-5\n12a\n1 000\n");

        let outcome = CatalogEditor::new(&mut catalog, &mut p)
            .modify(0, EditSeed::default())
            .unwrap();

        assert_eq!(outcome, ModifyOutcome::Repriced);
        assert_eq!(rows(&catalog), vec!["Milk = 1000"]);
    }

    #[test]
    fn test_modify_aborts_when_input_closes() {
        let mut catalog = catalog_with(&[("Milk", 20)]);
        let mut p = prompter("b\nSkim milk\n");

        let outcome = CatalogEditor::new(&mut catalog, &mut p)
            .modify(0, EditSeed::default())
            .unwrap();

        // Name was committed before the price prompt ran out of input
        assert_eq!(outcome, ModifyOutcome::Aborted);
        assert_eq!(rows(&catalog), vec!["Skim milk = 20"]);
    }

    #[test]
    fn test_modify_delete() {
        let mut catalog = catalog_with(&[("Milk", 20), ("Bread", 15)]);
        let mut p = prompter("d\n");

        let outcome = CatalogEditor::new(&mut catalog, &mut p)
            .modify(0, EditSeed::default())
            .unwrap();

        assert_eq!(outcome, ModifyOutcome::Deleted);
        assert_eq!(rows(&catalog), vec!["Bread = 15"]);
    }

    #[test]
    fn test_modify_skip() {
        let mut catalog = catalog_with(&[("Milk", 20)]);
        let mut p = prompter("whatever\n");

        let outcome = CatalogEditor::new(&mut catalog, &mut p)
            .modify(0, EditSeed::default())
            .unwrap();

        assert_eq!(outcome, ModifyOutcome::Skipped);
        assert_eq!(rows(&catalog), vec!["Milk = 20"]);
    }

    #[test]
    fn test_remove() {
        let mut catalog = catalog_with(&[("Milk", 20), ("Bread", 15)]);
        let mut p = prompter("");
        let mut editor = CatalogEditor::new(&mut catalog, &mut p);

        assert_eq!(editor.remove(1).unwrap().name(), "Bread");
        assert!(matches!(editor.remove(1), Err(CatalogError::IndexOutOfRange { .. })));
        assert_eq!(rows(&catalog), vec!["Milk = 20"]);
    }

    #[test]
    fn test_remove_interactive() {
        let mut catalog = catalog_with(&[("Milk", 20), ("Bread", 15)]);
        let mut p = prompter("abc\n0\n");
        let mut editor = CatalogEditor::new(&mut catalog, &mut p);

        assert!(editor.remove_interactive().unwrap().is_none());
        assert_eq!(editor.remove_interactive().unwrap().unwrap().name(), "Milk");
        assert!(editor.remove_interactive().unwrap().is_none());
        assert_eq!(rows(&catalog), vec!["Bread = 15"]);
    }
}
