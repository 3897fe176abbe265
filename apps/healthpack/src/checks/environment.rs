//! Environment checks: server version, database, OS, and search at scale.

use super::{expect_literal, CheckContext, CheckFn};
use crate::models::catalog::Check;
use crate::models::{CheckResult, Status};
use crate::version::{parse_version, VersionRange};
use std::collections::HashMap;
use tracing::warn;

/// Posts above which Elasticsearch is expected.
pub const POST_THRESHOLD: u64 = 2_500_000;

pub fn checks() -> HashMap<&'static str, CheckFn> {
    let mut checks: HashMap<&'static str, CheckFn> = HashMap::new();
    checks.insert("h006", h006);
    checks.insert("h007", h007);
    checks.insert("h008", h008);
    checks.insert("h009", h009);
    checks.insert("h011", h011);
    checks
}

/// Server version is in a supported range (Pass) or the ESR range (Warn).
pub fn h006(check: &Check, ctx: &CheckContext) -> CheckResult {
    let observed = ctx.bundle.packet.server_version.as_str();
    let mut result = CheckResult::pending(check, Status::Fail);
    result.message = check.render(Status::Fail, &[observed]);

    let version = match parse_version(observed) {
        Ok(v) => v,
        Err(e) => {
            result.resolve(Status::Error, check.render(Status::Error, &[&e.to_string()]));
            return result;
        }
    };

    for expr in &ctx.versions.supported {
        let range: VersionRange = match expr.parse() {
            Ok(r) => r,
            Err(e) => {
                warn!("{}: {}", check.id, e);
                return result;
            }
        };
        if range.matches(&version) {
            result.resolve(Status::Pass, check.render(Status::Pass, &[observed]));
            return result;
        }
    }

    let esr: VersionRange = match ctx.versions.esr.parse() {
        Ok(r) => r,
        Err(e) => {
            warn!("{}: {}", check.id, e);
            return result;
        }
    };
    // ESR releases are still supported, just flagged.
    if esr.matches(&version) {
        result.resolve(Status::Warn, check.render(Status::Pass, &[observed]));
    }
    result
}

/// Database is Postgres.
pub fn h007(check: &Check, ctx: &CheckContext) -> CheckResult {
    expect_literal(check, &ctx.bundle.packet.database_type, "postgres", "Postgres")
}

/// Server OS is Linux.
pub fn h008(check: &Check, ctx: &CheckContext) -> CheckResult {
    expect_literal(check, &ctx.bundle.packet.server_os, "linux", "Linux")
}

/// Elasticsearch is fully enabled once the post count passes the threshold.
///
/// Fully enabled always passes, even below the threshold.
pub fn h009(check: &Check, ctx: &CheckContext) -> CheckResult {
    let es = &ctx.bundle.config.elasticsearch_settings;
    let mut result = CheckResult::pending(check, Status::Fail);
    result.message = check.render(Status::Fail, &[]);

    let Some(posts) = ctx.bundle.packet.total_posts.known() else {
        warn!(
            "{}: total post count unavailable. Usually because MaxUsersForStatistics is set lower than the actual number of users.",
            check.id
        );
        result.resolve(Status::Error, check.render(Status::Error, &[]));
        return result;
    };

    if es.enable_indexing && es.enable_searching && es.enable_autocomplete {
        result.resolve(Status::Pass, check.render(Status::Pass, &[]));
        return result;
    }
    if posts < POST_THRESHOLD {
        result.resolve(Status::Ignore, check.render(Status::Ignore, &[]));
    }
    result
}

/// The ICU analysis plugin is installed when indexing is on.
pub fn h011(check: &Check, ctx: &CheckContext) -> CheckResult {
    let mut result = CheckResult::pending(check, Status::Fail);
    result.message = check.render(Status::Fail, &[]);

    if !ctx.bundle.config.elasticsearch_settings.enable_indexing {
        result.resolve(Status::Ignore, check.render(Status::Ignore, &[]));
        return result;
    }
    if ctx
        .bundle
        .packet
        .elastic_server_plugins
        .iter()
        .any(|p| p == "analysis-icu")
    {
        result.resolve(Status::Pass, check.render(Status::Pass, &[]));
    }
    result
}
