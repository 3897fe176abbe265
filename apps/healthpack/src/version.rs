//! Server version parsing and range matching for the version compliance check.
//!
//! Range expressions:
//! - A bare version (`6.0.0`, `v6.0`) matches exactly that version.
//! - Operators (`=`, `>`, `>=`, `<`, `<=`, `~`, `^`, wildcards) follow semver
//!   requirement syntax; comma-separated comparators must all hold. A `v`
//!   after the operator is accepted.
//! - `~>` is `~`, `!=x` is `<x || >x`, and `a - b` is `>=a, <=b`.
//! - `||` separates alternatives; any alternative may match.
//!
//! Versions may carry a leading `v` and may omit minor/patch (`9.5` -> `9.5.0`).

use semver::{Version, VersionReq};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("invalid version '{input}': {reason}")]
    Version { input: String, reason: String },
    #[error("invalid version range '{input}': {reason}")]
    Range { input: String, reason: String },
}

/// Supported releases and the extended support range, from `[versions]`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct VersionPolicy {
    #[serde(default = "default_supported")]
    pub supported: Vec<String>,
    #[serde(default = "default_esr")]
    pub esr: String,
}

fn default_supported() -> Vec<String> {
    vec![">=10.0.0".to_string()]
}

fn default_esr() -> String {
    "~9.11".to_string()
}

impl Default for VersionPolicy {
    fn default() -> Self {
        Self {
            supported: default_supported(),
            esr: default_esr(),
        }
    }
}

/// Parse a server version leniently (leading `v`, missing minor/patch).
pub fn parse_version(input: &str) -> Result<Version, VersionError> {
    let s = input.trim();
    let s = s.strip_prefix('v').unwrap_or(s);
    let split = s.find(&['-', '+'][..]).unwrap_or(s.len());
    let (core, tail) = s.split_at(split);
    let padded = match core.matches('.').count() {
        0 if !core.is_empty() => format!("{}.0.0{}", core, tail),
        1 => format!("{}.0{}", core, tail),
        _ => s.to_string(),
    };
    Version::parse(&padded).map_err(|e| VersionError::Version {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

#[derive(Debug, Clone)]
pub struct VersionRange {
    source: String,
    alternatives: Vec<VersionReq>,
}

impl VersionRange {
    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }
}

impl FromStr for VersionRange {
    type Err = VersionError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let err = |reason: String| VersionError::Range {
            input: input.to_string(),
            reason,
        };
        let mut alternatives = Vec::new();
        for alt in input.split("||") {
            for conj in conjunctions(alt) {
                if conj.is_empty() {
                    return Err(err("empty range".to_string()));
                }
                let req = VersionReq::parse(&conj.join(", ")).map_err(|e| err(e.to_string()))?;
                alternatives.push(req);
            }
        }
        Ok(Self {
            source: input.trim().to_string(),
            alternatives,
        })
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// Longest first so `>=` is not read as `>`.
const OPERATORS: [&str; 9] = ["~>", ">=", "<=", "!=", "=", ">", "<", "~", "^"];

/// Split a comparator into its operator (empty when bare) and version.
fn split_operator(comparator: &str) -> (&str, &str) {
    let c = comparator.trim();
    let op = OPERATORS
        .iter()
        .copied()
        .find(|op| c.starts_with(*op))
        .unwrap_or("");
    let version = c[op.len()..].trim_start();
    (op, version.strip_prefix('v').unwrap_or(version))
}

/// `a - b`, inclusive at both ends. Both ends must be bare versions.
fn hyphen_range(comparator: &str) -> Option<(&str, &str)> {
    fn bare(side: &str) -> Option<&str> {
        let (op, version) = split_operator(side);
        let plain = op.is_empty() && !version.is_empty() && !version.contains(' ');
        plain.then_some(version)
    }
    let (low, high) = comparator.split_once(" - ")?;
    Some((bare(low)?, bare(high)?))
}

/// Rewrite one `||` alternative into semver comparator lists, any of which
/// may match. `!=` splits every list into a below and an above branch.
fn conjunctions(alt: &str) -> Vec<Vec<String>> {
    let mut out: Vec<Vec<String>> = vec![Vec::new()];
    for raw in alt.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        if let Some((low, high)) = hyphen_range(raw) {
            for conj in &mut out {
                conj.push(format!(">={}", low));
                conj.push(format!("<={}", high));
            }
            continue;
        }
        let (op, version) = split_operator(raw);
        if op == "!=" {
            out = out
                .into_iter()
                .flat_map(|conj| {
                    let mut below = conj.clone();
                    below.push(format!("<{}", version));
                    let mut above = conj;
                    above.push(format!(">{}", version));
                    [below, above]
                })
                .collect();
            continue;
        }
        let comparator = match op {
            // semver reads a bare `1.2.3` as `^1.2.3`; a bare version here means exact.
            "" if !version.contains(&['*', 'x', 'X'][..]) => format!("={}", version),
            "~>" => format!("~{}", version),
            _ => format!("{}{}", op, version),
        };
        for conj in &mut out {
            conj.push(comparator.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(s: &str) -> VersionRange {
        s.parse().unwrap()
    }

    #[test]
    fn test_bare_version_is_exact() {
        let r = range("6.0.0");
        assert!(r.matches(&parse_version("6.0.0").unwrap()));
        assert!(!r.matches(&parse_version("6.1.0").unwrap()));
        assert!(!r.matches(&parse_version("6.0.1").unwrap()));
    }

    #[test]
    fn test_operators_and_alternatives() {
        let r = range(">=9.5.0, <9.6.0 || ~10.1");
        assert!(r.matches(&parse_version("9.5.3").unwrap()));
        assert!(r.matches(&parse_version("10.1.7").unwrap()));
        assert!(!r.matches(&parse_version("9.6.0").unwrap()));
        assert!(!r.matches(&parse_version("10.2.0").unwrap()));

        let v = |s: &str| parse_version(s).unwrap();
        assert!(range(">=v6.0.0").matches(&v("6.1.0")));
        assert!(range(">= 6.0.0, < 7.0.0").matches(&v("6.1.0")));

        let pessimistic = range("~>6.0");
        assert!(pessimistic.matches(&v("6.0.5")));
        assert!(!pessimistic.matches(&v("6.1.0")));

        let hyphen = range("6.0.0 - 6.2.0");
        assert!(hyphen.matches(&v("6.0.0")));
        assert!(hyphen.matches(&v("6.2.0")));
        assert!(!hyphen.matches(&v("6.2.1")));
        assert!(!hyphen.matches(&v("5.9.9")));
    }

    #[test]
    fn test_not_equal_excludes_one_version() {
        let v = |s: &str| parse_version(s).unwrap();
        let r = range("!=6.0.0");
        assert!(!r.matches(&v("6.0.0")));
        assert!(r.matches(&v("5.9.0")));
        assert!(r.matches(&v("6.0.1")));

        // Every other comparator in the alternative still applies.
        let r = range(">=6.0.0, !=6.1.0, <7.0.0");
        assert!(r.matches(&v("6.0.5")));
        assert!(r.matches(&v("6.2.0")));
        assert!(!r.matches(&v("6.1.0")));
        assert!(!r.matches(&v("7.0.0")));
        assert!(!r.matches(&v("5.0.0")));
    }

    #[test]
    fn test_tilde_minor_range() {
        let r = range("~9.11");
        assert!(r.matches(&parse_version("9.11.4").unwrap()));
        assert!(!r.matches(&parse_version("9.12.0").unwrap()));
    }

    #[test]
    fn test_lenient_version_parsing() {
        assert_eq!(parse_version("v9.5").unwrap(), Version::new(9, 5, 0));
        assert_eq!(parse_version("10").unwrap(), Version::new(10, 0, 0));
        assert_eq!(parse_version(" 9.5.1 ").unwrap(), Version::new(9, 5, 1));
        assert!(parse_version("9.5.0-rc1").unwrap().pre.as_str() == "rc1");
    }

    #[test]
    fn test_invalid_inputs_are_errors() {
        assert!(matches!(
            parse_version("not-a-version"),
            Err(VersionError::Version { .. })
        ));
        assert!(parse_version("").is_err());
        assert!(matches!(
            "bogus".parse::<VersionRange>(),
            Err(VersionError::Range { .. })
        ));
        assert!(" || ".parse::<VersionRange>().is_err());
    }
}
