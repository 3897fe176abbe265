//! Packet checks: background job history gated by the owning feature.

use super::{gated_jobs, scan_jobs, CheckContext, CheckFn};
use crate::models::catalog::Check;
use crate::models::{CheckResult, Status};
use std::collections::HashMap;

pub fn checks() -> HashMap<&'static str, CheckFn> {
    let mut checks: HashMap<&'static str, CheckFn> = HashMap::new();
    checks.insert("h012", h012);
    checks.insert("h013", h013);
    checks.insert("h014", h014);
    checks.insert("h015", h015);
    checks.insert("h016", h016);
    checks.insert("h017", h017);
    checks
}

/// LDAP sync jobs.
pub fn h012(check: &Check, ctx: &CheckContext) -> CheckResult {
    gated_jobs(
        check,
        ctx.bundle.config.ldap_settings.enable,
        &ctx.bundle.packet.ldap_sync_jobs,
    )
}

/// Message export jobs.
pub fn h013(check: &Check, ctx: &CheckContext) -> CheckResult {
    gated_jobs(
        check,
        ctx.bundle.config.message_export_settings.enable_export,
        &ctx.bundle.packet.message_export_jobs,
    )
}

/// Migration jobs. No feature flag; an empty history means nothing to judge.
pub fn h014(check: &Check, ctx: &CheckContext) -> CheckResult {
    let jobs = &ctx.bundle.packet.migration_jobs;
    let mut result = CheckResult::pending(check, Status::Pass);
    result.message = check.render(Status::Pass, &[]);
    if jobs.is_empty() {
        result.resolve(Status::Ignore, check.render(Status::Ignore, &[]));
        return result;
    }
    scan_jobs(check, result, jobs)
}

/// Data retention jobs, when either message or file deletion is on.
pub fn h015(check: &Check, ctx: &CheckContext) -> CheckResult {
    let retention = &ctx.bundle.config.data_retention_settings;
    gated_jobs(
        check,
        retention.enable_message_deletion || retention.enable_file_deletion,
        &ctx.bundle.packet.data_retention_jobs,
    )
}

/// Elasticsearch post indexing jobs.
pub fn h016(check: &Check, ctx: &CheckContext) -> CheckResult {
    gated_jobs(
        check,
        ctx.bundle.config.elasticsearch_settings.enable_indexing,
        &ctx.bundle.packet.elastic_post_indexing_jobs,
    )
}

/// Elasticsearch post aggregation jobs.
pub fn h017(check: &Check, ctx: &CheckContext) -> CheckResult {
    gated_jobs(
        check,
        ctx.bundle.config.elasticsearch_settings.enable_indexing,
        &ctx.bundle.packet.elastic_post_aggregation_jobs,
    )
}
