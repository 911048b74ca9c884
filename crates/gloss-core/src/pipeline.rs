//! The pure view computation the front end re-runs on every state change.
//!
//! [`ViewState`] is everything the user has chosen so far; [`render`] turns
//! it and a loaded [`Glossary`] into a [`View`]. Nothing here holds state
//! between calls.

use crate::entry::{Entry, Glossary};
use crate::filter::{self, SourceFilter};
use crate::fuzzy::Scorer;
use crate::query::{Operator, tokenize};
use crate::search::SearchEngine;
use crate::suggest::suggest;

/// User-selected inputs for one render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub source: SourceFilter,
    pub query: String,
    pub operator: Operator,
    pub show_table: bool,
}

impl ViewState {
    /// Replace the query, e.g. after a suggestion was picked.
    pub fn with_query(self, query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..self
        }
    }

    pub fn with_source(self, source: SourceFilter) -> Self {
        Self { source, ..self }
    }

    pub fn with_operator(self, operator: Operator) -> Self {
        Self { operator, ..self }
    }

    pub fn with_table(self, show_table: bool) -> Self {
        Self { show_table, ..self }
    }
}

/// Everything the front end needs to draw one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    /// Selectable sources, sorted, without the "All Sources" option.
    pub sources: Vec<String>,
    /// Number of entries left after the source filter.
    pub scoped: usize,
    /// Indices into the glossary of the matching entries, in dataset order.
    pub results: Vec<usize>,
    /// Completions for the current query, drawn from the scoped entries.
    pub suggestions: Vec<String>,
}

impl View {
    pub fn entries<'a>(&'a self, glossary: &'a Glossary) -> impl Iterator<Item = &'a Entry> + 'a {
        self.results.iter().filter_map(move |&i| glossary.get(i))
    }
}

/// Source filter, then search, then suggestions over the filtered entries.
pub fn render<S: Scorer>(
    glossary: &Glossary,
    state: &ViewState,
    engine: &SearchEngine<S>,
    max_suggestions: usize,
) -> View {
    let scoped: Vec<(usize, &Entry)> = glossary
        .entries()
        .iter()
        .enumerate()
        .filter(|(_, e)| state.source.admits(e))
        .collect();

    let terms = tokenize(&state.query);
    let results = scoped
        .iter()
        .filter(|(_, e)| engine.matches(e, &terms, state.operator))
        .map(|&(i, _)| i)
        .collect();

    View {
        sources: filter::sources(glossary.entries()),
        scoped: scoped.len(),
        results,
        suggestions: suggest(&state.query, scoped.iter().map(|&(_, e)| e), max_suggestions),
    }
}
