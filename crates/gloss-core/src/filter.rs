use std::collections::BTreeSet;

use crate::entry::Entry;

/// Label of the catch-all classification option.
pub const ALL_SOURCES: &str = "All Sources";

/// Which classification system (`Source`) to restrict entries to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SourceFilter {
    #[default]
    All,
    Only(String),
}

impl SourceFilter {
    /// `"All Sources"` selects everything; any other value is an exact source.
    pub fn from_label(label: &str) -> Self {
        if label == ALL_SOURCES {
            Self::All
        } else {
            Self::Only(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_SOURCES,
            Self::Only(source) => source,
        }
    }

    /// Exact, case-sensitive comparison against the entry's source.
    pub fn admits(&self, entry: &Entry) -> bool {
        match self {
            Self::All => true,
            Self::Only(source) => entry.source.as_deref() == Some(source.as_str()),
        }
    }
}

/// Keep the entries whose source matches `selected`, in their original order.
pub fn filter_by_source<'a, I>(entries: I, selected: &SourceFilter) -> Vec<&'a Entry>
where
    I: IntoIterator<Item = &'a Entry>,
{
    entries.into_iter().filter(|e| selected.admits(e)).collect()
}

/// Sorted distinct sources; entries without a source are left out.
pub fn sources<'a, I>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Entry>,
{
    entries
        .into_iter()
        .filter_map(|e| e.source.as_deref())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
