//! Configuration discovery and effective settings resolution.
//!
//! healthpack reads `healthpack.toml|yaml|yml` from the working root (or the
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config. Defaults:
//! - `catalog`: the catalog compiled into the binary
//! - `output`: `human`
//! - `groups`: every registered group
//! - `versions.supported`: `[">=10.0.0"]`, `versions.esr`: `"~9.11"`
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::models::catalog::Group;
use crate::version::VersionPolicy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_NAMES: [&str; 3] = ["healthpack.toml", "healthpack.yaml", "healthpack.yml"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{} is not valid TOML: {source}", .path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("{} is not valid YAML: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("unknown output mode '{0}' (expected human|json)")]
    Output(String),
    #[error("{0}")]
    Group(String),
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `healthpack.toml|yaml`.
pub struct HealthpackConfig {
    pub catalog: Option<String>,
    pub output: Option<String>,
    pub groups: Option<Vec<String>>,
    pub versions: Option<VersionPolicy>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(OutputMode::Human),
            "json" => Ok(OutputMode::Json),
            other => Err(ConfigError::Output(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub root: PathBuf,
    /// `None` means the built-in catalog.
    pub catalog: Option<PathBuf>,
    pub output: OutputMode,
    /// Empty means every registered group.
    pub groups: Vec<Group>,
    pub versions: VersionPolicy,
    pub config_found: bool,
}

/// Walk upward from `start` to detect the working root.
///
/// Stops when a `healthpack.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_NAMES.iter().any(|n| cur.join(n).exists()) {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `HealthpackConfig` from `healthpack.toml` or `healthpack.yaml|yml` if present.
pub fn load_config(root: &Path) -> Result<Option<HealthpackConfig>, ConfigError> {
    let toml_path = root.join(CONFIG_NAMES[0]);
    if toml_path.exists() {
        let s = read(&toml_path)?;
        let cfg = toml::from_str(&s).map_err(|source| ConfigError::Toml {
            path: toml_path,
            source,
        })?;
        return Ok(Some(cfg));
    }
    for yml in &CONFIG_NAMES[1..] {
        let p = root.join(yml);
        if p.exists() {
            let s = read(&p)?;
            let cfg = serde_yaml::from_str(&s)
                .map_err(|source| ConfigError::Yaml { path: p, source })?;
            return Ok(Some(cfg));
        }
    }
    Ok(None)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_groups(names: &[String]) -> Result<Vec<Group>, ConfigError> {
    names
        .iter()
        .map(|n| n.parse::<Group>().map_err(ConfigError::Group))
        .collect()
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_root: Option<&str>,
    cli_catalog: Option<&str>,
    cli_output: Option<&str>,
    cli_groups: &[String],
) -> Result<Effective, ConfigError> {
    let start = PathBuf::from(cli_root.unwrap_or("."));
    let root = detect_root(&start);
    let loaded = load_config(&root)?;
    let config_found = loaded.is_some();
    let cfg = loaded.unwrap_or_default();

    // CLI paths are taken as given; config paths are relative to the root.
    let catalog = match cli_catalog {
        Some(c) => Some(PathBuf::from(c)),
        None => cfg.catalog.as_ref().map(|c| root.join(c)),
    };

    let output = match cli_output.map(str::to_string).or(cfg.output) {
        Some(s) => OutputMode::parse(&s)?,
        None => OutputMode::Human,
    };

    let groups = if !cli_groups.is_empty() {
        parse_groups(cli_groups)?
    } else {
        parse_groups(&cfg.groups.unwrap_or_default())?
    };

    Ok(Effective {
        root,
        catalog,
        output,
        groups,
        versions: cfg.versions.unwrap_or_default(),
        config_found,
    })
}
