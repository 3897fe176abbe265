//! Shared data models for check results, the catalog, and the diagnostic bundle.

pub mod bundle;
pub mod catalog;

use catalog::{Check, CheckType, Group, Severity};
use serde::Serialize;
use std::fmt;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
/// Outcome of a single check. Declaration order is the display order.
pub enum Status {
    Pass,
    Warn,
    Fail,
    Ignore,
    Error,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Pass,
        Status::Warn,
        Status::Fail,
        Status::Ignore,
        Status::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "pass",
            Status::Warn => "warn",
            Status::Fail => "fail",
            Status::Ignore => "ignore",
            Status::Error => "error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
/// Result of evaluating one check against the bundle.
pub struct CheckResult {
    pub id: String,
    pub name: String,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub check_type: CheckType,
    pub status: Status,
    pub message: String,
}

impl CheckResult {
    /// Start a result from catalog metadata with the given default status.
    ///
    /// Predicates overwrite `status` and `message` on the paths that resolve
    /// to something else, so every return carries a status.
    pub fn pending(check: &Check, default: Status) -> Self {
        Self {
            id: check.id.clone(),
            name: check.name.clone(),
            severity: check.severity,
            check_type: check.check_type,
            status: default,
            message: String::new(),
        }
    }

    /// Result for a registered check whose catalog entry is missing.
    pub fn missing_entry(id: &str, group: Group) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            severity: Severity::Urgent,
            check_type: CheckType::Health,
            status: Status::Error,
            message: format!("No catalog entry for check {} in group {}", id, group),
        }
    }

    pub fn resolve(&mut self, status: Status, message: impl Into<String>) {
        self.status = status;
        self.message = message.into();
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
/// Ordered results of one group.
pub struct GroupReport {
    pub group: Group,
    pub results: Vec<CheckResult>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
/// Status counts across a report, used by printers and exit codes.
pub struct Summary {
    pub pass: usize,
    pub warn: usize,
    pub fail: usize,
    pub ignore: usize,
    pub error: usize,
    pub total: usize,
}

impl Summary {
    pub fn tally<'a>(results: impl IntoIterator<Item = &'a CheckResult>) -> Self {
        let mut s = Summary::default();
        for r in results {
            match r.status {
                Status::Pass => s.pass += 1,
                Status::Warn => s.warn += 1,
                Status::Fail => s.fail += 1,
                Status::Ignore => s.ignore += 1,
                Status::Error => s.error += 1,
            }
            s.total += 1;
        }
        s
    }

    /// True when any check failed or could not be evaluated.
    pub fn has_problems(&self) -> bool {
        self.fail > 0 || self.error > 0
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
/// Full evaluation report.
pub struct Report {
    pub groups: Vec<GroupReport>,
    pub summary: Summary,
}

impl Report {
    pub fn new(groups: Vec<GroupReport>) -> Self {
        let summary = Summary::tally(groups.iter().flat_map(|g| g.results.iter()));
        Self { groups, summary }
    }
}
