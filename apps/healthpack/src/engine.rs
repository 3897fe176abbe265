//! Check runner: evaluates each registered group against the bundle and
//! collects the results into a report.
//!
//! Predicates run in whatever order the registry yields them. Results are
//! then sorted by ID (type letter, then numeric sequence, so `h999` precedes
//! `h1000`) and the report is identical across runs.

use crate::catalog::parse_id;
use crate::checks::{CheckContext, CheckFn, Registry};
use crate::models::catalog::{Catalog, Group};
use crate::models::{CheckResult, GroupReport, Report};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// Run every check in `checks`, stamp each result with its ID, and order them.
///
/// A check with no catalog entry yields an Error result; its siblings still run.
pub fn evaluate_group(
    group: Group,
    checks: &HashMap<&'static str, CheckFn>,
    catalog: &Catalog,
    ctx: &CheckContext,
) -> Vec<CheckResult> {
    let mut results = Vec::with_capacity(checks.len());
    for (id, check_fn) in checks {
        let result = match catalog.get(group, id) {
            Some(entry) => {
                let mut r = check_fn(entry, ctx);
                r.id = id.to_string();
                r
            }
            None => CheckResult::missing_entry(id, group),
        };
        debug!("{}/{} -> {}", group, id, result.status);
        results.push(result);
    }
    sort_results(&mut results);
    results
}

/// Deterministic display order: ID, then name.
pub fn sort_results(results: &mut [CheckResult]) {
    results.sort_by(|a, b| cmp_ids(&a.id, &b.id).then_with(|| a.name.cmp(&b.name)));
}

/// Well-formed IDs compare by prefix and sequence and sort before malformed
/// ones, which compare as text.
pub fn cmp_ids(a: &str, b: &str) -> Ordering {
    let key = |id: &str| match parse_id(id) {
        Some((prefix, seq)) => (false, prefix, seq),
        None => (true, '\0', 0),
    };
    key(a).cmp(&key(b)).then_with(|| a.cmp(b))
}

/// Evaluate the selected groups (all registered groups when `only` is empty).
pub fn run_checks(
    registry: &Registry,
    catalog: &Catalog,
    ctx: &CheckContext,
    only: &[Group],
) -> Report {
    let mut groups = Vec::new();
    for group in registry.groups() {
        if !only.is_empty() && !only.contains(&group) {
            continue;
        }
        let Some(checks) = registry.group(group) else {
            continue;
        };
        let results = evaluate_group(group, checks, catalog, ctx);
        groups.push(GroupReport { group, results });
    }
    Report::new(groups)
}
