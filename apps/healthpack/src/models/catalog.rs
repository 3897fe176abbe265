//! Catalog schema: human-authored metadata and message templates per check.
//!
//! The YAML layout is `group -> id -> check`:
//!
//! ```yaml
//! environment:
//!   h007:
//!     name: Database Type
//!     description: The database should be Postgres.
//!     severity: high
//!     type: health
//!     messages:
//!       pass: "{}"
//!       fail: "Database type is {}"
//! ```
//!
//! Templates use `{}` placeholders, filled positionally when rendered.

use super::Status;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Urgent,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Urgent => "urgent",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "urgent" => Ok(Severity::Urgent),
            "high" => Ok(Severity::High),
            "medium" => Ok(Severity::Medium),
            "low" => Ok(Severity::Low),
            other => Err(format!(
                "unknown severity '{}' (expected urgent|high|medium|low)",
                other
            )),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CheckType {
    Proactive,
    Health,
    Adoption,
}

impl CheckType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckType::Proactive => "proactive",
            CheckType::Health => "health",
            CheckType::Adoption => "adoption",
        }
    }

    /// Leading letter used for generated check IDs.
    pub fn id_prefix(&self) -> char {
        match self {
            CheckType::Proactive => 'p',
            CheckType::Health => 'h',
            CheckType::Adoption => 'a',
        }
    }
}

impl FromStr for CheckType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "proactive" => Ok(CheckType::Proactive),
            "health" => Ok(CheckType::Health),
            "adoption" => Ok(CheckType::Adoption),
            other => Err(format!(
                "unknown check type '{}' (expected proactive|health|adoption)",
                other
            )),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
/// Named rule group. Each group has its own predicate module.
pub enum Group {
    Environment,
    Packet,
}

impl Group {
    pub const ALL: [Group; 2] = [Group::Environment, Group::Packet];

    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Environment => "environment",
            Group::Packet => "packet",
        }
    }

    /// Source file holding this group's predicates.
    pub fn module_path(&self) -> &'static str {
        match self {
            Group::Environment => "apps/healthpack/src/checks/environment.rs",
            Group::Packet => "apps/healthpack/src/checks/packet.rs",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Group {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "environment" => Ok(Group::Environment),
            "packet" => Ok(Group::Packet),
            other => Err(format!(
                "unknown group '{}' (expected environment|packet)",
                other
            )),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
/// Message templates, one per reachable status. Warn renders with `pass`.
pub struct Messages {
    pub pass: String,
    pub fail: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ignore: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
}

impl Messages {
    pub fn template(&self, status: Status) -> &str {
        match status {
            Status::Pass | Status::Warn => &self.pass,
            Status::Fail => &self.fail,
            Status::Ignore => &self.ignore,
            Status::Error => &self.error,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
/// One catalog entry. `id` is the map key in the file.
pub struct Check {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    pub description: String,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub check_type: CheckType,
    pub messages: Messages,
}

impl Check {
    /// Render the template selected by `status` with positional arguments.
    pub fn render(&self, status: Status, args: &[&str]) -> String {
        render_template(self.messages.template(status), args)
    }
}

/// Substitute `{}` placeholders left to right.
///
/// Unused arguments are dropped; surplus placeholders stay literal. An empty
/// template renders the arguments joined with ", ".
pub fn render_template(template: &str, args: &[&str]) -> String {
    if template.is_empty() {
        return args.join(", ");
    }
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut args = args.iter();
    while let Some(pos) = rest.find("{}") {
        out.push_str(&rest[..pos]);
        match args.next() {
            Some(a) => out.push_str(a),
            None => out.push_str("{}"),
        }
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
/// Group -> id -> check. BTreeMaps keep the persisted file sorted by ID.
pub struct Catalog {
    pub groups: BTreeMap<Group, BTreeMap<String, Check>>,
}

impl Catalog {
    pub fn group(&self, group: Group) -> Option<&BTreeMap<String, Check>> {
        self.groups.get(&group)
    }

    pub fn get(&self, group: Group, id: &str) -> Option<&Check> {
        self.groups.get(&group)?.get(id)
    }

    /// Insert a check under `group`, keyed by its `id`.
    pub fn insert(&mut self, group: Group, check: Check) {
        self.groups
            .entry(group)
            .or_default()
            .insert(check.id.clone(), check);
    }

    /// All IDs across groups.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.groups.values().flat_map(|g| g.keys().map(String::as_str))
    }

    /// Copy each map key into its check's `id` after deserialization.
    pub(crate) fn stamp_ids(&mut self) {
        for checks in self.groups.values_mut() {
            for (id, check) in checks.iter_mut() {
                check.id = id.clone();
            }
        }
    }
}
