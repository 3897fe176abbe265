//! Compiled check predicates and the registry that maps IDs to them.
//!
//! A predicate reads the bundle and its own catalog entry and returns one
//! `CheckResult`. Branching logic lives here; the catalog only supplies
//! names, severities, and message templates.

pub mod environment;
pub mod packet;

use crate::catalog::CatalogError;
use crate::models::bundle::{Bundle, Job};
use crate::models::catalog::{Catalog, Check, Group};
use crate::models::{CheckResult, Status};
use crate::version::VersionPolicy;
use std::collections::{BTreeMap, HashMap};

/// Read-only inputs shared by every predicate in a run.
pub struct CheckContext<'a> {
    pub bundle: &'a Bundle,
    pub versions: &'a VersionPolicy,
}

pub type CheckFn = fn(&Check, &CheckContext) -> CheckResult;

/// Predicates keyed by ID, per group.
///
/// Lookup within a group is a hash map, so invocation order is arbitrary;
/// ordering is applied afterwards by the engine.
pub struct Registry {
    groups: BTreeMap<Group, HashMap<&'static str, CheckFn>>,
}

impl Registry {
    /// Registry with every built-in check.
    pub fn builtin() -> Self {
        let mut groups = BTreeMap::new();
        groups.insert(Group::Environment, environment::checks());
        groups.insert(Group::Packet, packet::checks());
        Self { groups }
    }

    pub fn empty() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, group: Group, id: &'static str, check: CheckFn) {
        self.groups.entry(group).or_default().insert(id, check);
    }

    pub fn group(&self, group: Group) -> Option<&HashMap<&'static str, CheckFn>> {
        self.groups.get(&group)
    }

    pub fn groups(&self) -> impl Iterator<Item = Group> + '_ {
        self.groups.keys().copied()
    }

    /// Ensure every registered check has a catalog entry in its group.
    pub fn validate(&self, catalog: &Catalog) -> Result<(), CatalogError> {
        let mut missing = Vec::new();
        for (group, checks) in &self.groups {
            for id in checks.keys() {
                if catalog.get(*group, id).is_none() {
                    missing.push(format!("{}/{}", group, id));
                }
            }
        }
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort();
        Err(CatalogError::MissingChecks(missing))
    }
}

/// Field-equals-literal check: Fail with the observed value, Pass with the
/// canonical spelling.
pub(crate) fn expect_literal(
    check: &Check,
    observed: &str,
    expected: &str,
    canonical: &str,
) -> CheckResult {
    let mut result = CheckResult::pending(check, Status::Fail);
    result.message = check.render(Status::Fail, &[observed]);
    if observed == expected {
        result.resolve(Status::Pass, check.render(Status::Pass, &[canonical]));
    }
    result
}

/// Feature-gated job scan: Ignore when the feature is off, Fail on the first
/// job that did not succeed, Pass otherwise (including an empty history).
pub(crate) fn gated_jobs(check: &Check, enabled: bool, jobs: &[Job]) -> CheckResult {
    let mut result = CheckResult::pending(check, Status::Pass);
    result.message = check.render(Status::Pass, &[]);
    if !enabled {
        result.resolve(Status::Ignore, check.render(Status::Ignore, &[]));
        return result;
    }
    scan_jobs(check, result, jobs)
}

pub(crate) fn scan_jobs(check: &Check, mut result: CheckResult, jobs: &[Job]) -> CheckResult {
    if jobs.iter().any(|job| !job.succeeded()) {
        result.resolve(Status::Fail, check.render(Status::Fail, &[]));
    }
    result
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_builtin_registry_validates_against_builtin_catalog() {
        let catalog = crate::catalog::builtin().unwrap();
        Registry::builtin().validate(&catalog).unwrap();
    }

    #[test]
    fn test_validate_reports_missing_entries_sorted() {
        let mut registry = Registry::empty();
        registry.register(Group::Packet, "h999", |c, _| CheckResult::pending(c, Status::Pass));
        registry.register(Group::Environment, "h998", |c, _| {
            CheckResult::pending(c, Status::Pass)
        });
        let err = registry.validate(&Catalog::default()).unwrap_err();
        match err {
            CatalogError::MissingChecks(ids) => {
                assert_eq!(ids, vec!["environment/h998", "packet/h999"])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_gated_jobs_ignores_when_disabled_even_with_failures() {
        let c = check("h900", "ok", "failed", "off", "");
        let r = gated_jobs(&c, false, &jobs(&["failed", "error"]));
        assert_eq!(r.status, Status::Ignore);
        assert_eq!(r.message, "off");
    }

    #[test]
    fn test_gated_jobs_empty_history_passes() {
        let c = check("h900", "ok", "failed", "off", "");
        let r = gated_jobs(&c, true, &[]);
        assert_eq!(r.status, Status::Pass);
        assert_eq!(r.message, "ok");
    }

    #[test]
    fn test_gated_jobs_any_failure_fails() {
        let c = check("h900", "ok", "failed", "off", "");
        for order in [
            ["failed", "success", "success"],
            ["success", "failed", "success"],
            ["success", "success", "failed"],
        ] {
            let r = gated_jobs(&c, true, &jobs(&order));
            assert_eq!(r.status, Status::Fail, "order {:?}", order);
            assert_eq!(r.message, "failed");
        }
    }

    #[test]
    fn test_expect_literal_uses_canonical_on_pass() {
        let c = check("h901", "{}", "{}", "", "");
        assert_eq!(expect_literal(&c, "linux", "linux", "Linux").message, "Linux");
        let r = expect_literal(&c, "windows", "linux", "Linux");
        assert_eq!((r.status, r.message.as_str()), (Status::Fail, "windows"));
    }
}
