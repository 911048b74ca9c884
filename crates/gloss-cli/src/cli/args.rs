use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gloss_core::query::Operator;

#[derive(Parser)]
#[command(name = "gloss", about = "Browse and fuzzy-search a glossary", version)]
pub struct Cli {
    /// Glossary file (.csv, .json, .toml or .xlsx); overrides the config
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Worksheet to read from an .xlsx glossary
    #[arg(long, global = true)]
    pub sheet: Option<String>,

    /// Minimum fuzzy similarity (0-100) for a term to match
    #[arg(long, global = true, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub threshold: Option<u8>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Interactive glossary browser (default)
    Browse {
        /// Start with this classification system selected
        #[arg(long)]
        source: Option<String>,
        /// Start with this query
        #[arg(long)]
        query: Option<String>,
    },

    /// Print entries matching the search terms
    Search {
        /// Search terms (all terms must match unless --op or)
        terms: Vec<String>,
        /// Restrict to one classification system
        #[arg(long)]
        source: Option<String>,
        /// Logical operator combining the terms (and, or)
        #[arg(long = "op")]
        operator: Option<Operator>,
        /// Output as JSON
        #[arg(long, conflicts_with = "table")]
        json: bool,
        /// Output as a table
        #[arg(long)]
        table: bool,
    },

    /// Print completions for a partial word
    Suggest {
        /// Partial word to complete
        prefix: String,
        /// Restrict to one classification system
        #[arg(long)]
        source: Option<String>,
        /// Maximum number of suggestions
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List the classification systems in the glossary
    Sources {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
