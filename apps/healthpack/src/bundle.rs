//! Support packet loading.
//!
//! A packet directory holds `support_packet.yaml` and `sanitized_config.json`.
//! Both are required; absent keys inside them fall back to sentinels.

use crate::models::bundle::{Bundle, ServerConfig, SupportPacket};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const PACKET_FILE: &str = "support_packet.yaml";
pub const CONFIG_FILE: &str = "sanitized_config.json";

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("packet path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{} is not valid YAML: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("{} is not valid JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Load a bundle from a support packet directory.
pub fn load_dir(dir: &Path) -> Result<Bundle, BundleError> {
    if !dir.is_dir() {
        return Err(BundleError::NotADirectory(dir.to_path_buf()));
    }
    let packet_path = dir.join(PACKET_FILE);
    let config_path = dir.join(CONFIG_FILE);
    let packet_yaml = read(&packet_path)?;
    let config_json = read(&config_path)?;

    let bundle = parse(&packet_yaml, &packet_path, &config_json, &config_path)?;
    debug!(
        "loaded bundle from {} (server {})",
        dir.display(),
        bundle.packet.server_version
    );
    Ok(bundle)
}

fn parse(
    packet_yaml: &str,
    packet_path: &Path,
    config_json: &str,
    config_path: &Path,
) -> Result<Bundle, BundleError> {
    let packet: SupportPacket =
        serde_yaml::from_str(packet_yaml).map_err(|source| BundleError::Yaml {
            path: packet_path.to_path_buf(),
            source,
        })?;
    let config: ServerConfig =
        serde_json::from_str(config_json).map_err(|source| BundleError::Json {
            path: config_path.to_path_buf(),
            source,
        })?;
    Ok(Bundle { packet, config })
}

fn read(path: &Path) -> Result<String, BundleError> {
    fs::read_to_string(path).map_err(|source| BundleError::Read {
        path: path.to_path_buf(),
        source,
    })
}
