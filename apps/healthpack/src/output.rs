//! Output rendering for `check` and `list`.
//!
//! Supports `human` (default) and `json`. The JSON report carries every
//! result grouped by rule group plus a top-level summary.

use crate::config::OutputMode;
use crate::models::catalog::Catalog;
use crate::models::{Report, Status};
use crate::utils::use_colors;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn status_tag(status: Status, color: bool) -> String {
    let tag = format!("⟦{}⟧", status);
    if !color {
        return tag;
    }
    match status {
        Status::Pass => tag.green().bold().to_string(),
        Status::Warn => tag.yellow().bold().to_string(),
        Status::Fail => tag.red().bold().to_string(),
        Status::Ignore => tag.bright_black().to_string(),
        Status::Error => tag.magenta().bold().to_string(),
    }
}

fn status_icon(status: Status, color: bool) -> String {
    let icon = match status {
        Status::Pass => "✔",
        Status::Warn => "▲",
        Status::Fail => "✖",
        Status::Ignore => "○",
        Status::Error => "!",
    };
    if !color {
        return icon.to_string();
    }
    match status {
        Status::Pass => icon.green().to_string(),
        Status::Warn => icon.yellow().to_string(),
        Status::Fail => icon.red().to_string(),
        Status::Ignore => icon.bright_black().to_string(),
        Status::Error => icon.magenta().to_string(),
    }
}

/// Render a report as human-readable lines (no trailing newline).
pub fn render_report_human(report: &Report, color: bool) -> String {
    let mut lines = Vec::new();
    for g in &report.groups {
        let header = format!("[{}]", g.group);
        lines.push(if color {
            header.bold().to_string()
        } else {
            header
        });
        for r in &g.results {
            lines.push(format!(
                "{} {} ❲{}❳ {} ({}): {}",
                status_icon(r.status, color),
                status_tag(r.status, color),
                r.id,
                r.name,
                r.severity.as_str(),
                r.message
            ));
        }
    }
    let s = &report.summary;
    let summary = format!(
        "Summary: pass={} warn={} fail={} ignore={} error={} total={}",
        s.pass, s.warn, s.fail, s.ignore, s.error, s.total
    );
    lines.push(if color {
        summary.bold().to_string()
    } else {
        summary
    });
    lines.join("\n")
}

/// Print a report in the requested format.
pub fn print_report(report: &Report, output: OutputMode) -> Result<(), serde_json::Error> {
    match output {
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(&compose_report_json(report)?)?)
        }
        OutputMode::Human => println!("{}", render_report_human(report, use_colors(false))),
    }
    Ok(())
}

/// Compose the report JSON object (pure) for testing/snapshot purposes.
pub fn compose_report_json(report: &Report) -> Result<JsonVal, serde_json::Error> {
    serde_json::to_value(report)
}

/// Compose the catalog listing: one flat entry per check, ordered by group then ID.
pub fn compose_catalog_json(catalog: &Catalog) -> JsonVal {
    let items: Vec<_> = catalog
        .groups
        .iter()
        .flat_map(|(group, checks)| {
            checks.iter().map(move |(id, c)| {
                json!({
                    "group": group,
                    "id": id,
                    "name": c.name,
                    "description": c.description,
                    "severity": c.severity,
                    "type": c.check_type,
                })
            })
        })
        .collect();
    let total = items.len();
    json!({ "checks": items, "total": total })
}

/// Print the catalog for `list`.
pub fn print_catalog(catalog: &Catalog, output: OutputMode) -> Result<(), serde_json::Error> {
    match output {
        OutputMode::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&compose_catalog_json(catalog))?
            )
        }
        OutputMode::Human => {
            let color = use_colors(false);
            for (group, checks) in &catalog.groups {
                let header = format!("[{}]", group);
                if color {
                    println!("{}", header.bold());
                } else {
                    println!("{}", header);
                }
                for (id, c) in checks {
                    println!(
                        "  {} {} ({}, {}): {}",
                        id,
                        c.name,
                        c.check_type.as_str(),
                        c.severity.as_str(),
                        c.description
                    );
                }
            }
        }
    }
    Ok(())
}
