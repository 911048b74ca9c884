use tracing::debug;

use crate::entry::Entry;
use crate::fuzzy::{PartialRatio, Scorer};
use crate::query::{Operator, tokenize};

/// Minimum similarity a term needs to count as a match.
pub const DEFAULT_THRESHOLD: u8 = 70;

/// Filters entries by fuzzy multi-term matching.
#[derive(Debug, Clone)]
pub struct SearchEngine<S = PartialRatio> {
    threshold: u8,
    scorer: S,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl SearchEngine {
    pub fn new(threshold: u8) -> Self {
        Self::with_scorer(threshold, PartialRatio)
    }
}

impl<S: Scorer> SearchEngine<S> {
    pub fn with_scorer(threshold: u8, scorer: S) -> Self {
        Self { threshold, scorer }
    }

    /// Whether `entry` satisfies `terms` under `operator`. No terms always matches.
    pub fn matches(&self, entry: &Entry, terms: &[String], operator: Operator) -> bool {
        if terms.is_empty() {
            return true;
        }
        let text = entry.searchable_text();
        let hit = |term: &String| self.scorer.score(&term.to_lowercase(), &text) >= self.threshold;
        match operator {
            Operator::And => terms.iter().all(hit),
            Operator::Or => terms.iter().any(hit),
        }
    }

    /// Stable filter of `entries` by the terms of `raw_query`.
    pub fn search<'a, I>(&self, entries: I, raw_query: &str, operator: Operator) -> Vec<&'a Entry>
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        let terms = tokenize(raw_query);
        let results: Vec<&Entry> = entries
            .into_iter()
            .filter(|e| self.matches(e, &terms, operator))
            .collect();
        debug!(
            terms = terms.len(),
            %operator,
            threshold = self.threshold,
            results = results.len(),
            "search"
        );
        results
    }
}

/// Row predicate with the default scorer.
pub fn matches(entry: &Entry, terms: &[String], operator: Operator, threshold: u8) -> bool {
    SearchEngine::new(threshold).matches(entry, terms, operator)
}

/// Search with the default scorer and threshold.
pub fn search<'a, I>(entries: I, raw_query: &str, operator: Operator) -> Vec<&'a Entry>
where
    I: IntoIterator<Item = &'a Entry>,
{
    SearchEngine::default().search(entries, raw_query, operator)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn terms(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn framework_entry() -> Entry {
        Entry {
            definition: Some("Climate resilience framework".into()),
            ..Entry::default()
        }
    }

    #[test]
    fn typo_tolerant_and() {
        let e = framework_entry();
        assert!(matches(&e, &terms(&["climat", "framwork"]), Operator::And, 70));
    }

    #[test]
    fn strict_threshold_rejects_typo() {
        let e = framework_entry();
        assert!(!matches(&e, &terms(&["climat", "framwork"]), Operator::And, 99));
    }

    #[test]
    fn nonsense_term_never_matches() {
        let e = framework_entry();
        assert!(!matches(&e, &terms(&["zzz"]), Operator::And, 70));
        assert!(!matches(&e, &terms(&["zzz"]), Operator::Or, 70));
    }

    #[test]
    fn or_needs_one_term() {
        let e = framework_entry();
        assert!(matches(&e, &terms(&["zzz", "resilience"]), Operator::Or, 70));
        assert!(!matches(&e, &terms(&["zzz", "resilience"]), Operator::And, 70));
    }

    #[test]
    fn empty_terms_vacuously_true() {
        assert!(matches(&Entry::default(), &[], Operator::And, 100));
        assert!(matches(&Entry::default(), &[], Operator::Or, 100));
    }

    #[test]
    fn terms_are_case_folded() {
        let e = framework_entry();
        assert!(matches(&e, &terms(&["CLIMATE"]), Operator::And, 100));
    }

    #[test]
    fn matches_across_every_searchable_field() {
        let e = Entry {
            source: Some("IPCC".into()),
            category: Some("Hazard".into()),
            code: Some("H-12".into()),
            link: Some("http://example.org/flood".into()),
            ..Entry::default()
        };
        for term in ["ipcc", "hazard", "h-12"] {
            assert!(matches(&e, &terms(&[term]), Operator::And, 100), "{term}");
        }
        // Link is display-only.
        assert!(!matches(&e, &terms(&["example.org"]), Operator::And, 100));
    }

    #[test]
    fn empty_query_returns_everything_in_order() {
        let data = vec![framework_entry(), Entry::default()];
        let all = search(&data, "", Operator::And);
        assert_eq!(all, data.iter().collect::<Vec<_>>());
        assert_eq!(search(&data, "   ", Operator::Or).len(), 2);
    }

    #[test]
    fn search_is_a_stable_filter() {
        let data: Vec<Entry> = ["alpha risk", "beta", "gamma risk"]
            .iter()
            .map(|d| Entry {
                definition: Some(d.to_string()),
                ..Entry::default()
            })
            .collect();
        let found = search(&data, "risk", Operator::And);
        let defs: Vec<_> = found.iter().map(|e| e.definition.as_deref().unwrap()).collect();
        assert_eq!(defs, vec!["alpha risk", "gamma risk"]);
        assert_eq!(search(found.iter().copied(), "risk", Operator::And), found);
        assert_eq!(search(found.iter().copied(), "", Operator::And), found);
    }

    struct Always(u8);

    impl Scorer for Always {
        fn score(&self, _term: &str, _haystack: &str) -> u8 {
            self.0
        }
    }

    #[test]
    fn custom_scorer_and_threshold() {
        let e = Entry::default();
        let t = terms(&["anything"]);
        assert!(SearchEngine::with_scorer(50, Always(50)).matches(&e, &t, Operator::And));
        assert!(!SearchEngine::with_scorer(51, Always(50)).matches(&e, &t, Operator::And));
    }
}
