//! healthpack CLI binary entry point.
//! Resolves config, runs the requested command, and maps outcomes to exit codes.

use anyhow::{bail, Context, Result};
use clap::Parser;
use healthpack::bundle;
use healthpack::catalog::{self, editor};
use healthpack::checks::{CheckContext, Registry};
use healthpack::cli::{Cli, Commands};
use healthpack::config;
use healthpack::engine;
use healthpack::models::catalog::{CheckType, Group, Severity};
use healthpack::output;
use healthpack::utils::{error_prefix, info_prefix, note_prefix};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Any check failed or errored.
const EXIT_PROBLEMS: i32 = 1;
/// Configuration, catalog, or I/O defect.
const EXIT_USAGE: i32 = 2;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let verbose = matches!(cli.cmd, Commands::Check { verbose: true, .. });
    init_logging(verbose);
    let code = match run(cli.cmd) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", error_prefix(), e);
            EXIT_USAGE
        }
    };
    std::process::exit(code);
}

fn run(cmd: Commands) -> Result<i32> {
    match cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(0)
        }
        Commands::Check {
            packet,
            root,
            catalog,
            output,
            groups,
            verbose: _,
        } => {
            let eff = config::resolve_effective(
                root.as_deref(),
                catalog.as_deref(),
                output.as_deref(),
                &groups,
            )?;
            if !eff.config_found && eff.output == config::OutputMode::Human {
                eprintln!(
                    "{} No healthpack.toml found; using defaults.",
                    note_prefix()
                );
            }
            let catalog = load_catalog(eff.catalog.as_deref())?;
            let registry = Registry::builtin();
            registry.validate(&catalog)?;

            let bundle = bundle::load_dir(Path::new(&packet))?;
            let ctx = CheckContext {
                bundle: &bundle,
                versions: &eff.versions,
            };
            let report = engine::run_checks(&registry, &catalog, &ctx, &eff.groups);
            info!(
                "evaluated {} checks in {} groups",
                report.summary.total,
                report.groups.len()
            );
            output::print_report(&report, eff.output).context("failed to render report")?;
            Ok(if report.summary.has_problems() {
                EXIT_PROBLEMS
            } else {
                0
            })
        }
        Commands::List {
            root,
            catalog,
            output,
        } => {
            let eff =
                config::resolve_effective(root.as_deref(), catalog.as_deref(), output.as_deref(), &[])?;
            let catalog = load_catalog(eff.catalog.as_deref())?;
            output::print_catalog(&catalog, eff.output).context("failed to render catalog")?;
            Ok(0)
        }
        Commands::Add {
            root,
            catalog,
            group,
            check_type,
            severity,
            name,
            description,
            pass,
            fail,
            ignore,
            error,
        } => {
            let eff = config::resolve_effective(root.as_deref(), catalog.as_deref(), None, &[])?;
            let Some(path) = eff.catalog else {
                bail!("no catalog file to edit: pass --catalog or set `catalog` in healthpack.toml");
            };
            let draft = editor::NewCheck {
                group: group.parse::<Group>().map_err(anyhow::Error::msg)?,
                check_type: check_type.parse::<CheckType>().map_err(anyhow::Error::msg)?,
                severity: severity.parse::<Severity>().map_err(anyhow::Error::msg)?,
                name,
                description,
                pass,
                fail,
                ignore,
                error,
            };
            let group = draft.group;
            let mut cat = if path.exists() {
                catalog::load(&path)?
            } else {
                eprintln!(
                    "{} {} does not exist; starting from the built-in catalog.",
                    info_prefix(),
                    path.display()
                );
                catalog::builtin()?
            };
            let id = editor::add_check(&mut cat, draft)?;
            catalog::store(&cat, &path)?;
            println!(
                "Check {} added successfully. Edit {} to build the check.",
                id,
                group.module_path()
            );
            Ok(0)
        }
    }
}

fn load_catalog(path: Option<&Path>) -> Result<healthpack::models::catalog::Catalog> {
    let shown: PathBuf = path.map(Path::to_path_buf).unwrap_or_else(|| "<built-in>".into());
    catalog::load_or_builtin(path)
        .with_context(|| format!("failed to load catalog {}", shown.display()))
}
