//! Catalog loading, validation, and persistence.
//!
//! The catalog is read once per run and never mutated during evaluation.
//! A default catalog covering every built-in check is compiled into the
//! binary; `--catalog` or `catalog = "..."` in config points at another file.

pub mod editor;

use crate::models::catalog::{Catalog, Group};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Catalog shipped with the binary.
pub const BUILTIN: &str = include_str!("../../checks.yaml");

static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z])(\d{3,})$").expect("check id pattern compiles"));

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write catalog {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("catalog is not valid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("check id '{id}' in group {group} is invalid (expected a letter and at least three digits, e.g. h006)")]
    InvalidId { id: String, group: Group },
    #[error("check id '{id}' is defined in both {first} and {second}")]
    DuplicateId {
        id: String,
        first: Group,
        second: Group,
    },
    #[error("checks registered without a catalog entry: {}", .0.join(", "))]
    MissingChecks(Vec<String>),
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("no check ids left for prefix '{0}'")]
    IdSpaceExhausted(char),
}

/// Split an ID like `h006` into its prefix letter and sequence number.
pub fn parse_id(id: &str) -> Option<(char, u32)> {
    let caps = ID_PATTERN.captures(id)?;
    let prefix = caps.get(1)?.as_str().chars().next()?;
    let seq = caps.get(2)?.as_str().parse().ok()?;
    Some((prefix, seq))
}

/// Parse and validate catalog YAML.
pub fn parse(yaml: &str) -> Result<Catalog, CatalogError> {
    let mut catalog: Catalog = serde_yaml::from_str(yaml)?;
    catalog.stamp_ids();
    validate(&catalog)?;
    Ok(catalog)
}

pub fn builtin() -> Result<Catalog, CatalogError> {
    parse(BUILTIN)
}

pub fn load(path: &Path) -> Result<Catalog, CatalogError> {
    let s = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&s)
}

/// Load from `path` when given, otherwise the built-in catalog.
pub fn load_or_builtin(path: Option<&Path>) -> Result<Catalog, CatalogError> {
    match path {
        Some(p) => load(p),
        None => builtin(),
    }
}

/// IDs must be well-formed and unique across all groups.
pub fn validate(catalog: &Catalog) -> Result<(), CatalogError> {
    let mut seen: HashMap<&str, Group> = HashMap::new();
    for (group, checks) in &catalog.groups {
        for id in checks.keys() {
            if parse_id(id).is_none() {
                return Err(CatalogError::InvalidId {
                    id: id.clone(),
                    group: *group,
                });
            }
            if let Some(first) = seen.insert(id.as_str(), *group) {
                return Err(CatalogError::DuplicateId {
                    id: id.clone(),
                    first,
                    second: *group,
                });
            }
        }
    }
    Ok(())
}

/// Persist the catalog. Groups and IDs are written in sorted order.
pub fn store(catalog: &Catalog, path: &Path) -> Result<(), CatalogError> {
    let yaml = serde_yaml::to_string(catalog)?;
    fs::write(path, yaml).map_err(|source| CatalogError::Write {
        path: path.to_path_buf(),
        source,
    })
}
