//! healthpack core library.
//!
//! Evaluates a support packet (server facts plus sanitized configuration)
//! against a catalog of health checks and produces a deterministic report.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `models`: Results, catalog schema, and bundle data.
//! - `catalog`: Catalog loading, validation, persistence, and authoring.
//! - `bundle`: Support packet directory loading.
//! - `checks`: Compiled check predicates and their registry.
//! - `engine`: Group evaluation and result collection.
//! - `version`: Server version parsing and range matching.
//! - `output`: Human/JSON printers.
//! - `utils`: Supporting helpers.
pub mod bundle;
pub mod catalog;
pub mod checks;
pub mod cli;
pub mod config;
pub mod engine;
pub mod models;
pub mod output;
pub mod utils;
pub mod version;
