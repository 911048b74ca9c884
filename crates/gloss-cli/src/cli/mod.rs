pub mod args;

use color_eyre::Section;
use colored::Colorize;
use prettytable::{Table, row};

use gloss_core::cache::DatasetCache;
use gloss_core::config::Config;
use gloss_core::entry::{Entry, Glossary};
use gloss_core::error::GlossError;
use gloss_core::filter::{self, SourceFilter};
use gloss_core::query::Operator;
use gloss_core::search::SearchEngine;
use gloss_core::suggest;

use crate::display::{clean, clean_or};

use self::args::{Cli, Command};

pub const NO_RESULTS: &str = "No results found. Try adjusting your filters or search terms.";

pub fn run(cli: Cli) -> color_eyre::Result<()> {
    let mut config = Config::load()?;
    if let Some(data) = cli.data {
        config.dataset_path = data;
    }
    if let Some(sheet) = cli.sheet {
        config.sheet = sheet;
    }
    if let Some(threshold) = cli.threshold {
        config.threshold = threshold;
    }
    config.validate()?;

    let mut cache =
        DatasetCache::new(config.dataset_path.clone()).with_sheet(config.sheet.clone());
    let engine = SearchEngine::new(config.threshold);

    match cli.command {
        None => cmd_browse(&config, &mut cache, &engine, None, None)?,
        Some(Command::Browse { source, query }) => {
            cmd_browse(&config, &mut cache, &engine, source, query)?
        }
        Some(Command::Search {
            terms,
            source,
            operator,
            json,
            table,
        }) => {
            let glossary = load(&mut cache)?;
            let operator = operator.unwrap_or(config.operator);
            cmd_search(glossary, &engine, &terms, source.as_deref(), operator, json, table)?
        }
        Some(Command::Suggest {
            prefix,
            source,
            limit,
        }) => {
            let glossary = load(&mut cache)?;
            let limit = limit.unwrap_or(config.max_suggestions);
            cmd_suggest(glossary, &prefix, source.as_deref(), limit);
        }
        Some(Command::Sources { json }) => cmd_sources(load(&mut cache)?, json)?,
    }

    Ok(())
}

/// Load the glossary, attaching a hint when the file is missing.
fn load(cache: &mut DatasetCache) -> color_eyre::Result<&Glossary> {
    let path = cache.path().display().to_string();
    match cache.get() {
        Ok(glossary) => Ok(glossary),
        Err(e @ GlossError::DatasetNotFound(_)) => Err(color_eyre::Report::new(e).suggestion(
            format!(
                "The file '{path}' was not found. Pass --data or set dataset_path in {}",
                config_hint()
            ),
        )),
        Err(e) => Err(e.into()),
    }
}

fn config_hint() -> String {
    Config::config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "config.toml".to_string())
}

fn source_filter(source: Option<&str>) -> SourceFilter {
    source.map(SourceFilter::from_label).unwrap_or_default()
}

fn cmd_browse(
    config: &Config,
    cache: &mut DatasetCache,
    engine: &SearchEngine,
    source: Option<String>,
    query: Option<String>,
) -> color_eyre::Result<()> {
    // A missing dataset must fail before the terminal is taken over.
    let glossary = load(cache)?;
    if glossary.is_empty() {
        eprintln!("The glossary at {} has no entries.", cache.path().display());
        return Ok(());
    }
    crate::tui::run_browser(cache, engine, config, source_filter(source.as_deref()), query)
}

fn cmd_search(
    glossary: &Glossary,
    engine: &SearchEngine,
    terms: &[String],
    source: Option<&str>,
    operator: Operator,
    json: bool,
    table: bool,
) -> color_eyre::Result<()> {
    let scoped = filter::filter_by_source(glossary.entries(), &source_filter(source));
    let results = engine.search(scoped, &terms.join(" "), operator);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }
    if results.is_empty() {
        eprintln!("{NO_RESULTS}");
        return Ok(());
    }
    if table {
        print_table(&results);
    } else {
        for entry in &results {
            print_card(entry);
        }
    }
    eprintln!("{} of {} entries", results.len(), glossary.len());
    Ok(())
}

fn print_card(entry: &Entry) {
    println!("{}", clean_or(entry.category.as_deref(), "-").bold());
    if let Some(definition) = &entry.definition {
        println!("{}", clean(definition));
    }
    let mut footer = format!(
        "{} {}",
        "Classification System:".bold(),
        clean_or(entry.source.as_deref(), "-")
    );
    if let Some(link) = &entry.link {
        footer.push_str(&format!(" | Learn more: {}", clean(link).underline()));
    }
    println!("{}", footer.dimmed());
    println!();
}

fn print_table(entries: &[&Entry]) {
    let mut table = Table::new();
    table.set_titles(row![b => "Source", "Category", "Definition", "Code", "Link"]);
    for entry in entries {
        table.add_row(row![
            clean_or(entry.source.as_deref(), "-"),
            clean_or(entry.category.as_deref(), "-"),
            clean_or(entry.definition.as_deref(), "-"),
            clean_or(entry.code.as_deref(), "-"),
            clean_or(entry.link.as_deref(), "-"),
        ]);
    }
    table.printstd();
}

fn cmd_suggest(glossary: &Glossary, prefix: &str, source: Option<&str>, limit: usize) {
    let scoped = filter::filter_by_source(glossary.entries(), &source_filter(source));
    for word in suggest::suggest(prefix, scoped, limit) {
        println!("{}", clean(&word));
    }
}

fn cmd_sources(glossary: &Glossary, json: bool) -> color_eyre::Result<()> {
    let sources = filter::sources(glossary.entries());
    if json {
        println!("{}", serde_json::to_string_pretty(&sources)?);
        return Ok(());
    }
    if sources.is_empty() {
        eprintln!("No classification systems found.");
        return Ok(());
    }
    for source in &sources {
        println!("{}", clean(source));
    }
    Ok(())
}
