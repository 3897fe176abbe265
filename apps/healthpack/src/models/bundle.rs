//! Diagnostic bundle: support packet plus the server's sanitized config.
//!
//! The packet side mirrors `support_packet.yaml` (snake_case keys); the config
//! side mirrors `sanitized_config.json` (PascalCase keys). Nulls and absent
//! keys collapse to explicit sentinels: empty lists, `false` flags, and
//! `Count::Unavailable` for counts.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Bundle {
    pub packet: SupportPacket,
    pub config: ServerConfig,
}

/// A numeric count that the packet may report as unavailable (`-1`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Count {
    Known(u64),
    #[default]
    Unavailable,
}

impl Count {
    pub fn known(&self) -> Option<u64> {
        match self {
            Count::Known(n) => Some(*n),
            Count::Unavailable => None,
        }
    }
}

impl From<i64> for Count {
    fn from(raw: i64) -> Self {
        if raw < 0 {
            Count::Unavailable
        } else {
            Count::Known(raw as u64)
        }
    }
}

impl<'de> Deserialize<'de> for Count {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(Option::<i64>::deserialize(d)?
            .map(Count::from)
            .unwrap_or(Count::Unavailable))
    }
}

impl Serialize for Count {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Count::Known(n) => s.serialize_u64(*n),
            Count::Unavailable => s.serialize_i64(-1),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Job {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
}

impl Job {
    pub fn succeeded(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SupportPacket {
    #[serde(deserialize_with = "null_as_default")]
    pub server_version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub database_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub server_os: String,
    pub total_posts: Count,
    #[serde(deserialize_with = "null_as_default")]
    pub elastic_server_plugins: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub ldap_sync_jobs: Vec<Job>,
    #[serde(deserialize_with = "null_as_default")]
    pub message_export_jobs: Vec<Job>,
    #[serde(deserialize_with = "null_as_default")]
    pub migration_jobs: Vec<Job>,
    #[serde(deserialize_with = "null_as_default")]
    pub data_retention_jobs: Vec<Job>,
    #[serde(deserialize_with = "null_as_default")]
    pub elastic_post_indexing_jobs: Vec<Job>,
    #[serde(deserialize_with = "null_as_default")]
    pub elastic_post_aggregation_jobs: Vec<Job>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "PascalCase")]
pub struct ServerConfig {
    #[serde(deserialize_with = "null_as_default")]
    pub elasticsearch_settings: ElasticsearchSettings,
    #[serde(deserialize_with = "null_as_default")]
    pub ldap_settings: LdapSettings,
    #[serde(deserialize_with = "null_as_default")]
    pub message_export_settings: MessageExportSettings,
    #[serde(deserialize_with = "null_as_default")]
    pub data_retention_settings: DataRetentionSettings,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "PascalCase")]
pub struct ElasticsearchSettings {
    #[serde(deserialize_with = "null_as_default")]
    pub enable_indexing: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub enable_searching: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub enable_autocomplete: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "PascalCase")]
pub struct LdapSettings {
    #[serde(deserialize_with = "null_as_default")]
    pub enable: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "PascalCase")]
pub struct MessageExportSettings {
    #[serde(deserialize_with = "null_as_default")]
    pub enable_export: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "PascalCase")]
pub struct DataRetentionSettings {
    #[serde(deserialize_with = "null_as_default")]
    pub enable_message_deletion: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub enable_file_deletion: bool,
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_count_is_unavailable() {
        let p: SupportPacket = serde_yaml::from_str("total_posts: -1").unwrap();
        assert_eq!(p.total_posts, Count::Unavailable);
        let p: SupportPacket = serde_yaml::from_str("total_posts: 3000000").unwrap();
        assert_eq!(p.total_posts.known(), Some(3_000_000));
    }

    #[test]
    fn test_missing_fields_take_sentinels() {
        let p: SupportPacket = serde_yaml::from_str("server_os: linux").unwrap();
        assert_eq!(p.total_posts, Count::Unavailable);
        assert!(p.ldap_sync_jobs.is_empty());
        assert!(p.database_type.is_empty());
    }

    #[test]
    fn test_null_lists_and_flags_collapse() {
        let p: SupportPacket =
            serde_yaml::from_str("ldap_sync_jobs: null\nelastic_server_plugins: ~").unwrap();
        assert!(p.ldap_sync_jobs.is_empty());
        assert!(p.elastic_server_plugins.is_empty());

        let c: ServerConfig = serde_json::from_str(
            r#"{"ElasticsearchSettings":{"EnableIndexing":null,"EnableSearching":true},"LdapSettings":null}"#,
        )
        .unwrap();
        assert!(!c.elasticsearch_settings.enable_indexing);
        assert!(c.elasticsearch_settings.enable_searching);
        assert!(!c.ldap_settings.enable);
    }

    #[test]
    fn test_job_success_is_exact_match() {
        let ok = Job { status: "success".into() };
        let pending = Job { status: "pending".into() };
        let upper = Job { status: "SUCCESS".into() };
        assert!(ok.succeeded());
        assert!(!pending.succeeded());
        assert!(!upper.succeeded());
    }
}
