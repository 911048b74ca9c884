//! Core library for `gloss` — a glossary lookup tool.
//!
//! Provides dataset loading and caching, classification filtering, fuzzy
//! multi-term search, prefix suggestions, and the pure render pipeline the
//! terminal front end drives.

pub mod cache;
pub mod config;
pub mod entry;
pub mod error;
pub mod filter;
pub mod fuzzy;
pub mod pipeline;
pub mod query;
pub mod search;
pub mod suggest;
