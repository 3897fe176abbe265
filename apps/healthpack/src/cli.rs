//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "healthpack",
    version,
    about = "Health checks for support packets",
    long_about = "healthpack evaluates a support packet against a catalog of health checks and reports pass/warn/fail/ignore/error per check.\n\nConfiguration precedence: CLI > healthpack.toml > defaults.",
    after_help = "Examples:\n  healthpack check ./support-packet\n  healthpack check ./support-packet --group packet --output json\n  healthpack list --catalog checks.yaml\n  healthpack add --catalog checks.yaml --group packet --type health --severity high \\\n      --name \"plugin jobs\" --description \"Plugin jobs succeed\" --pass ok --fail \"{}\"",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current healthpack version.")]
    Version,
    /// Evaluate a support packet
    #[command(
        about = "Run health checks",
        long_about = "Evaluate every registered check against a support packet directory. Exits 1 when any check fails or errors.",
        after_help = "Examples:\n  healthpack check ./packet\n  healthpack check ./packet --output json --group environment"
    )]
    Check {
        #[arg(help = "Support packet directory (support_packet.yaml + sanitized_config.json)")]
        packet: String,
        #[arg(long, help = "Working root for config discovery (default: current dir)")]
        root: Option<String>,
        #[arg(long, help = "Catalog YAML (default: built-in catalog)")]
        catalog: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long = "group", help = "Only run this group (repeatable): environment|packet")]
        groups: Vec<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Log per-check outcomes to stderr")]
        verbose: bool,
    },
    /// Add a check to a catalog file
    #[command(
        about = "Add a check",
        long_about = "Append a new check to a catalog file. The ID is generated from the check type and the highest existing sequence across all groups.",
        after_help = "Examples:\n  healthpack add --catalog checks.yaml --group environment --type proactive --severity low \\\n      --name \"tls enabled\" --description \"TLS is on\" --pass ok --fail \"TLS is off\""
    )]
    Add {
        #[arg(long, help = "Working root for config discovery (default: current dir)")]
        root: Option<String>,
        #[arg(long, help = "Catalog YAML to edit (default: `catalog` from config)")]
        catalog: Option<String>,
        #[arg(long, help = "Group: environment|packet")]
        group: String,
        #[arg(long = "type", help = "Check type: proactive|health|adoption")]
        check_type: String,
        #[arg(long, help = "Severity: urgent|high|medium|low")]
        severity: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long, help = "Pass message template")]
        pass: String,
        #[arg(long, help = "Fail message template")]
        fail: String,
        #[arg(long, default_value = "", help = "Ignore message template")]
        ignore: String,
        #[arg(long, default_value = "", help = "Error message template")]
        error: String,
    },
    /// List checks in a catalog
    #[command(about = "List checks", long_about = "Print the catalog's checks per group, sorted by ID.")]
    List {
        #[arg(long, help = "Working root for config discovery (default: current dir)")]
        root: Option<String>,
        #[arg(long, help = "Catalog YAML (default: built-in catalog)")]
        catalog: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_with_repeated_groups() {
        let cli = Cli::try_parse_from([
            "healthpack",
            "check",
            "./packet",
            "--group",
            "environment",
            "--group",
            "packet",
            "--output",
            "json",
        ])
        .unwrap();
        match cli.cmd {
            Commands::Check {
                packet,
                groups,
                output,
                verbose,
                ..
            } => {
                assert_eq!(packet, "./packet");
                assert_eq!(groups, vec!["environment", "packet"]);
                assert_eq!(output.as_deref(), Some("json"));
                assert!(!verbose);
            }
            _ => panic!("expected check"),
        }
    }

    #[test]
    fn test_add_requires_messages() {
        let res = Cli::try_parse_from([
            "healthpack",
            "add",
            "--group",
            "packet",
            "--type",
            "health",
            "--severity",
            "high",
            "--name",
            "n",
            "--description",
            "d",
        ]);
        assert!(res.is_err());
    }
}
