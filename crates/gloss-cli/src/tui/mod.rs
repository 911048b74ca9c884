mod app;
mod view;

use gloss_core::cache::DatasetCache;
use gloss_core::config::Config;
use gloss_core::filter::SourceFilter;
use gloss_core::search::SearchEngine;

/// Run the interactive glossary browser on stderr.
pub fn run_browser(
    cache: &mut DatasetCache,
    engine: &SearchEngine,
    config: &Config,
    source: SourceFilter,
    query: Option<String>,
) -> color_eyre::Result<()> {
    app::run_browser(cache, engine, config, source, query)
}
