// 🔍 Similarity Scorer - rank product names against a free-text query
// Two strategies: LCS length (exact-max ties) and token-set ratio (near-tie window)

use std::collections::BTreeSet;
use tracing::debug;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// SCORE
// ============================================================================

/// Comparable similarity score, higher = more similar.
///
/// Ordering is lexicographic: `primary` first, `secondary` as tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Score {
    pub primary: u32,
    pub secondary: u32,
}

// ============================================================================
// SCORER TRAIT
// ============================================================================

/// Pluggable similarity strategy.
///
/// Scoring and acceptance live together because each strategy has its own
/// notion of which near-ties get surfaced.
pub trait SimilarityScorer {
    fn name(&self) -> &'static str;

    /// Score one candidate against the query.
    fn score(&self, query: &str, candidate: &str) -> Score;

    /// Positions (into `scores`) that should be surfaced, in display order.
    fn select(&self, scores: &[Score]) -> Vec<usize>;
}

// ============================================================================
// LCS SCORER
// ============================================================================

/// Length of the longest common subsequence of the lowercased strings.
///
/// Every entry tied at the maximum is surfaced; a maximum of 0 means no match.
#[derive(Debug, Clone, Copy, Default)]
pub struct LcsScorer;

impl SimilarityScorer for LcsScorer {
    fn name(&self) -> &'static str {
        "lcs"
    }

    fn score(&self, query: &str, candidate: &str) -> Score {
        let len = lcs_len(&query.to_lowercase(), &candidate.to_lowercase());
        Score {
            primary: len as u32,
            secondary: 0,
        }
    }

    fn select(&self, scores: &[Score]) -> Vec<usize> {
        let max = scores.iter().map(|s| s.primary).max().unwrap_or(0);
        if max == 0 {
            return Vec::new();
        }

        scores
            .iter()
            .enumerate()
            .filter(|(_, s)| s.primary == max)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Longest common subsequence length via the (n+1)×(m+1) DP table.
///
/// Works on chars, not bytes, so multi-byte names score per character.
pub fn lcs_len(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (n, m) = (a.len(), b.len());

    if n == 0 || m == 0 {
        return 0;
    }

    // Row 0 and column 0 stay at zero
    let mut table = vec![vec![0usize; m + 1]; n + 1];

    for i in 1..=n {
        for j in 1..=m {
            table[i][j] = if a[i - 1] == b[j - 1] {
                table[i - 1][j - 1] + 1
            } else {
                table[i - 1][j].max(table[i][j - 1])
            };
        }
    }

    table[n][m]
}

/// Exponential recursive LCS. Reference only; re-derives overlapping
/// subproblems, so never call it on real catalog names.
pub fn lcs_len_naive(a: &str, b: &str) -> usize {
    fn go(a: &[char], b: &[char]) -> usize {
        match (a.split_last(), b.split_last()) {
            (Some((x, a_rest)), Some((y, b_rest))) => {
                if x == y {
                    1 + go(a_rest, b_rest)
                } else {
                    go(a_rest, b).max(go(a, b_rest))
                }
            }
            _ => 0,
        }
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    go(&a, &b)
}

// ============================================================================
// TOKEN-SET SCORER
// ============================================================================

/// Token-set overlap ratio (0-100) on raw and ASCII-folded text.
///
/// A candidate qualifies when either ratio reaches `threshold`; every
/// qualifying candidate within `window` points of the best raw ratio is
/// surfaced, best first.
#[derive(Debug, Clone, Copy)]
pub struct TokenSetScorer {
    /// Minimum ratio (raw or folded) for a candidate to qualify (default: 50)
    pub threshold: u32,

    /// Near-tie window below the best raw ratio (default: 20)
    pub window: u32,
}

impl TokenSetScorer {
    pub fn new() -> Self {
        TokenSetScorer {
            threshold: 50,
            window: 20,
        }
    }

    fn qualifies(&self, score: &Score) -> bool {
        score.primary >= self.threshold || score.secondary >= self.threshold
    }
}

impl Default for TokenSetScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityScorer for TokenSetScorer {
    fn name(&self) -> &'static str {
        "token-set"
    }

    fn score(&self, query: &str, candidate: &str) -> Score {
        Score {
            primary: token_set_ratio(&process(query), &process(candidate)),
            secondary: token_set_ratio(
                &process(&fold_to_ascii(query)),
                &process(&fold_to_ascii(candidate)),
            ),
        }
    }

    fn select(&self, scores: &[Score]) -> Vec<usize> {
        let qualifying: Vec<usize> = (0..scores.len())
            .filter(|&i| self.qualifies(&scores[i]))
            .collect();

        let best = match qualifying.iter().map(|&i| scores[i].primary).max() {
            Some(best) => best,
            None => return Vec::new(),
        };
        let floor = best.saturating_sub(self.window);

        let mut accepted: Vec<usize> = qualifying
            .into_iter()
            .filter(|&i| scores[i].primary >= floor)
            .collect();

        // Best first; equal scores keep catalog order
        accepted.sort_by(|&a, &b| scores[b].cmp(&scores[a]).then(a.cmp(&b)));
        accepted
    }
}

/// Token-set ratio between two already processed strings.
///
/// Common tokens are compared against each side's leftovers:
/// max(r(I, I+A), r(I, I+B), r(I+A, I+B)).
pub fn token_set_ratio(a: &str, b: &str) -> u32 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0;
    }

    let common: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let only_a: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let only_b: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    let t0 = common.join(" ");
    let t1 = common.iter().chain(only_a.iter()).copied().collect::<Vec<_>>().join(" ");
    let t2 = common.iter().chain(only_b.iter()).copied().collect::<Vec<_>>().join(" ");

    let ratios = [indel_ratio(&t0, &t1), indel_ratio(&t0, &t2), indel_ratio(&t1, &t2)];
    debug!(a, b, ?ratios, "token-set ratio");
    ratios.into_iter().max().unwrap_or(0)
}

/// Normalized InDel similarity: 200·lcs / (|a| + |b|), rounded.
fn indel_ratio(a: &str, b: &str) -> u32 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let total = (a.chars().count() + b.chars().count()) as u32;
    let common = lcs_len(a, b) as u32;
    (200 * common + total / 2) / total
}

/// Lowercase and turn every non-alphanumeric char into a token break.
fn process(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect()
}

/// Strip diacritics, spell out letters NFKD leaves alone, then drop
/// whatever is still non-ASCII.
///
/// Example: "Crème brûlée" → "Creme brulee", "Đường" → "Duong"
pub fn fold_to_ascii(s: &str) -> String {
    let mut folded = String::with_capacity(s.len());
    for c in s.nfkd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii() {
            folded.push(c);
        } else if let Some(spelled) = spell_letter(c) {
            folded.push_str(spelled);
        }
    }
    folded
}

/// Latin letters with no canonical decomposition.
fn spell_letter(c: char) -> Option<&'static str> {
    let spelled = match c {
        'đ' | 'ð' => "d",
        'Đ' | 'Ð' => "D",
        'ø' => "o",
        'Ø' => "O",
        'ß' => "ss",
        'ẞ' => "SS",
        'æ' => "ae",
        'Æ' => "AE",
        'œ' => "oe",
        'Œ' => "OE",
        'ł' => "l",
        'Ł' => "L",
        'ı' => "i",
        'þ' => "th",
        'Þ' => "TH",
        _ => return None,
    };
    Some(spelled)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn scores_for(scorer: &dyn SimilarityScorer, query: &str, names: &[&str]) -> Vec<Score> {
        names.iter().map(|name| scorer.score(query, name)).collect()
    }

    #[test]
    fn test_lcs_known_values() {
        assert_eq!(lcs_len("abcde", "ace"), 3);
        assert_eq!(lcs_len("milk", "milkshake"), 4);
        assert_eq!(lcs_len("AGGTAB", "GXTXAYB"), 4);
        assert_eq!(lcs_len("", "abc"), 0);
    }

    #[test]
    fn test_lcs_symmetry() {
        let pairs = [("milk", "bread"), ("kitten", "sitting"), ("abc", ""), ("ÉclaIR", "clair")];
        for (a, b) in pairs {
            assert_eq!(lcs_len(a, b), lcs_len(b, a), "{} / {}", a, b);
        }
    }

    #[test]
    fn test_lcs_self_is_length() {
        for s in ["", "a", "milk", "crème brûlée", "aaaa"] {
            assert_eq!(lcs_len(s, s), s.chars().count());
        }
    }

    #[test]
    fn test_lcs_disjoint_is_zero() {
        assert_eq!(lcs_len("abc", "xyz"), 0);
        assert_eq!(LcsScorer.score("milk", "bread").primary, 0);
    }

    #[test]
    fn test_dp_matches_naive_reference() {
        let words = ["milk", "milkshake", "bread", "kilm", "almond milk", "lime"];
        for a in words {
            for b in words {
                assert_eq!(lcs_len(a, b), lcs_len_naive(a, b), "{} / {}", a, b);
            }
        }
    }

    #[test]
    fn test_lcs_scorer_is_case_insensitive() {
        assert_eq!(LcsScorer.score("MILK", "milk").primary, 4);
    }

    #[test]
    fn test_lcs_select_returns_all_ties() {
        let names = ["Milk", "Milkshake", "Bread"];
        let scores = scores_for(&LcsScorer, "milk", &names);
        assert_eq!(LcsScorer.select(&scores), vec![0, 1]);
    }

    #[test]
    fn test_lcs_select_empty_when_nothing_shared() {
        let scores = scores_for(&LcsScorer, "xyz", &["Milk", "Bread"]);
        assert!(LcsScorer.select(&scores).is_empty());
        assert!(LcsScorer.select(&[]).is_empty());
    }

    #[test]
    fn test_token_set_ratio_basics() {
        assert_eq!(token_set_ratio("milk", "milk"), 100);
        assert_eq!(token_set_ratio("whole milk", "milk whole"), 100);
        // Subset of tokens scores full marks
        assert_eq!(token_set_ratio("milk", "whole milk"), 100);
        assert_eq!(token_set_ratio("milk", "bread"), 0);
        assert_eq!(token_set_ratio("", "bread"), 0);
        // 200 * 4 / 13 rounded
        assert_eq!(token_set_ratio("milk", "milkshake"), 62);
    }

    #[test]
    fn test_token_set_symmetry() {
        let pairs = [("whole milk", "milk"), ("rye bread", "bread rye loaf"), ("tea", "coffee")];
        for (a, b) in pairs {
            assert_eq!(token_set_ratio(a, b), token_set_ratio(b, a));
        }
    }

    #[test]
    fn test_token_set_ignores_punctuation_and_case() {
        let scorer = TokenSetScorer::new();
        assert_eq!(scorer.score("Milk, whole", "whole-MILK").primary, 100);
    }

    #[test]
    fn test_fold_to_ascii() {
        assert_eq!(fold_to_ascii("Crème brûlée"), "Creme brulee");
        assert_eq!(fold_to_ascii("Phở bò"), "Pho bo");
        assert_eq!(fold_to_ascii("plain"), "plain");
        assert_eq!(fold_to_ascii("Đường"), "Duong");
        assert_eq!(fold_to_ascii("Straße"), "Strasse");
        assert_eq!(fold_to_ascii("Smørbrød"), "Smorbrod");
        // Non-Latin scripts still drop out
        assert_eq!(fold_to_ascii("tea 茶"), "tea ");
    }

    #[test]
    fn test_folded_ratio_handles_stroked_d() {
        let score = TokenSetScorer::new().score("duong", "Đường");
        assert_eq!(score.secondary, 100);
    }

    #[test]
    fn test_folded_ratio_qualifies_accented_names() {
        let scorer = TokenSetScorer::new();
        let score = scorer.score("pho bo", "Phở bò");
        assert_eq!(score.secondary, 100);
        assert!(score.primary < score.secondary);
        assert_eq!(scorer.select(&[score]), vec![0]);
    }

    #[test]
    fn test_token_select_threshold() {
        let scorer = TokenSetScorer::new();
        let scores = scores_for(&scorer, "tea", &["Coffee", "Milk"]);
        assert!(scorer.select(&scores).is_empty());
    }

    #[test]
    fn test_token_select_near_tie_window() {
        let scorer = TokenSetScorer::new();
        let scores = vec![
            Score { primary: 62, secondary: 62 },
            Score { primary: 100, secondary: 100 },
            Score { primary: 85, secondary: 85 },
            Score { primary: 80, secondary: 90 },
            Score { primary: 79, secondary: 100 },
        ];
        // 79 is one point outside the window even though it qualifies
        assert_eq!(scorer.select(&scores), vec![1, 2, 3]);
    }

    #[test]
    fn test_token_select_orders_by_raw_then_folded() {
        let scorer = TokenSetScorer::new();
        let scores = vec![
            Score { primary: 90, secondary: 60 },
            Score { primary: 90, secondary: 95 },
            Score { primary: 90, secondary: 60 },
        ];
        assert_eq!(scorer.select(&scores), vec![1, 0, 2]);
    }

    #[test]
    fn test_token_select_milk_example() {
        let scorer = TokenSetScorer::new();
        let scores = scores_for(&scorer, "milk", &["Milk", "Milkshake", "Bread"]);
        // Milkshake (62) falls outside the 20-point window below Milk (100)
        assert_eq!(scorer.select(&scores), vec![0]);
    }

    #[test]
    fn test_custom_window_widens_results() {
        let scorer = TokenSetScorer { threshold: 50, window: 40 };
        let scores = scores_for(&scorer, "milk", &["Milk", "Milkshake", "Bread"]);
        assert_eq!(scorer.select(&scores), vec![0, 1]);
    }
}
