use std::collections::BTreeSet;

use crate::entry::Entry;

/// Default cap on the number of suggestions shown.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;

/// Definition words that start with `partial_query`, ignoring case.
///
/// Words are deduplicated, sorted ascending and truncated to `max_results`.
/// An empty query yields no suggestions.
pub fn suggest<'a, I>(partial_query: &str, entries: I, max_results: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a Entry>,
{
    if partial_query.is_empty() {
        return Vec::new();
    }
    let prefix = partial_query.to_lowercase();

    entries
        .into_iter()
        .filter_map(|e| e.definition.as_deref())
        .flat_map(str::split_whitespace)
        .filter(|word| word.to_lowercase().starts_with(&prefix))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .take(max_results)
        .map(str::to_string)
        .collect()
}
