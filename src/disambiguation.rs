// 🔀 Disambiguation - turn near-duplicate matches + a typed token into a decision
//
// Pure logic only: building the choice set and resolving the token.
// Reading the token is the Prompter's job.

use crate::catalog::CandidateMatch;
use crate::error::{CatalogError, Result};
use crate::product::ProductId;

pub const NEW_KEY: &str = "n";
pub const CANCEL_KEY: &str = "c";

// ============================================================================
// CHOICE SET
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub key: String,
    pub label: String,
}

/// Labelled options presented to the user in one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceSet {
    title: String,
    options: Vec<Choice>,
}

impl ChoiceSet {
    /// Pair keys with labels.
    ///
    /// A length mismatch is a caller bug, so it fails before anything is shown.
    pub fn new(title: &str, keys: Vec<String>, labels: Vec<String>) -> Result<Self> {
        if keys.len() != labels.len() {
            return Err(CatalogError::StructuralInvariant {
                keys: keys.len(),
                labels: labels.len(),
            });
        }

        let options = keys
            .into_iter()
            .zip(labels)
            .map(|(key, label)| Choice { key, label })
            .collect();

        Ok(ChoiceSet {
            title: title.to_string(),
            options,
        })
    }

    /// Matched products (keyed by display index), then "add as new", then cancel.
    pub fn for_matches(matches: &[CandidateMatch]) -> Result<Self> {
        let mut keys: Vec<String> = matches.iter().map(|m| m.index.to_string()).collect();
        let mut labels: Vec<String> = matches.iter().map(|m| m.name.clone()).collect();

        keys.push(NEW_KEY.to_string());
        labels.push("Add as new product".to_string());
        keys.push(CANCEL_KEY.to_string());
        labels.push("Cancel".to_string());

        ChoiceSet::new("Similar products", keys, labels)
    }

    /// Sub-menu shown when editing one product.
    pub fn edit_actions() -> Result<Self> {
        let keys = ["r", "p", "b", "d", CANCEL_KEY];
        let labels = [
            "Update name",
            "Update price",
            "Update name and price",
            "Delete this product",
            "Skip",
        ];

        ChoiceSet::new(
            "Options",
            keys.iter().map(|k| k.to_string()).collect(),
            labels.iter().map(|l| l.to_string()).collect(),
        )
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn options(&self) -> &[Choice] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.options.iter().any(|c| c.key == key)
    }
}

// ============================================================================
// DECISIONS
// ============================================================================

/// Outcome of the add-path disambiguation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Leave the catalog alone
    Skip,

    /// Append as a separate product
    CreateNew,

    /// Route into the edit flow of an existing product
    MergeInto(ProductId),
}

/// Resolve a typed token against the presented matches.
///
/// `None` (no input) and anything unrecognized resolve to `Skip`.
pub fn resolve_match_choice(matches: &[CandidateMatch], token: Option<&str>) -> Decision {
    let token = match token.map(normalize_token) {
        Some(token) => token,
        None => return Decision::Skip,
    };

    if token == NEW_KEY {
        return Decision::CreateNew;
    }

    matches
        .iter()
        .find(|m| m.index.to_string() == token)
        .map(|m| Decision::MergeInto(m.id))
        .unwrap_or(Decision::Skip)
}

/// What to do with a single product once it's been picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Rename,
    Reprice,
    RenameAndReprice,
    Delete,
    Skip,
}

pub fn resolve_edit_choice(token: Option<&str>) -> EditAction {
    match token.map(normalize_token).as_deref() {
        Some("r") => EditAction::Rename,
        Some("p") => EditAction::Reprice,
        Some("b") => EditAction::RenameAndReprice,
        Some("d") => EditAction::Delete,
        _ => EditAction::Skip,
    }
}

fn normalize_token(token: &str) -> String {
    token.trim().to_lowercase()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::Score;

    fn candidate(index: usize, name: &str) -> CandidateMatch {
        CandidateMatch {
            index,
            id: ProductId::new(),
            name: name.to_string(),
            score: Score::default(),
        }
    }

    #[test]
    fn test_mismatched_keys_and_labels_fail_fast() {
        let err = ChoiceSet::new("x", vec!["a".into(), "b".into()], vec!["A".into()]).unwrap_err();

        assert!(matches!(err, CatalogError::StructuralInvariant { keys: 2, labels: 1 }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_choice_set_for_matches() {
        let matches = vec![candidate(0, "Milk"), candidate(4, "Milkshake")];
        let choices = ChoiceSet::for_matches(&matches).unwrap();

        let keys: Vec<&str> = choices.options().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["0", "4", "n", "c"]);
        assert_eq!(choices.options()[1].label, "Milkshake");
        assert_eq!(choices.title(), "Similar products");
    }

    #[test]
    fn test_resolve_new_and_cancel() {
        let matches = vec![candidate(0, "Milk")];

        assert_eq!(resolve_match_choice(&matches, Some("n")), Decision::CreateNew);
        assert_eq!(resolve_match_choice(&matches, Some(" N ")), Decision::CreateNew);
        assert_eq!(resolve_match_choice(&matches, Some("c")), Decision::Skip);
        assert_eq!(resolve_match_choice(&matches, None), Decision::Skip);
    }

    #[test]
    fn test_resolve_presented_index_only() {
        let matches = vec![candidate(2, "Milk"), candidate(5, "Milkshake")];

        assert_eq!(
            resolve_match_choice(&matches, Some("5")),
            Decision::MergeInto(matches[1].id)
        );
        // Index 3 exists in the catalog maybe, but wasn't offered
        assert_eq!(resolve_match_choice(&matches, Some("3")), Decision::Skip);
        assert_eq!(resolve_match_choice(&matches, Some("milk")), Decision::Skip);
        assert_eq!(resolve_match_choice(&matches, Some("")), Decision::Skip);
    }

    #[test]
    fn test_resolve_edit_choice() {
        assert_eq!(resolve_edit_choice(Some("r")), EditAction::Rename);
        assert_eq!(resolve_edit_choice(Some("P")), EditAction::Reprice);
        assert_eq!(resolve_edit_choice(Some("b")), EditAction::RenameAndReprice);
        assert_eq!(resolve_edit_choice(Some(" d")), EditAction::Delete);
        assert_eq!(resolve_edit_choice(Some("x")), EditAction::Skip);
        assert_eq!(resolve_edit_choice(None), EditAction::Skip);
    }

    #[test]
    fn test_edit_actions_menu() {
        let choices = ChoiceSet::edit_actions().unwrap();
        assert_eq!(choices.len(), 5);
        assert!(choices.contains("d"));
        assert!(!choices.contains("n"));
    }
}
