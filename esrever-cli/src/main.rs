//! esrever CLI - Reversed-name wrappers for your shell
//!
//! This binary provides command-line interfaces for:
//! - install: scan the search path and write the wrapper block
//! - uninstall: remove the wrapper block
//! - plan: show what install would do
//! - status: report whether a block is installed

mod config;

use chrono::{SecondsFormat, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use config::{home_dir, Config, Shell};
use esrever_format::constants::EXIT_USAGE;
use esrever_io::{
    block_status, default_search_path, execute_install, execute_uninstall, split_search_path,
    AnyResolver, BlockStatus, EsreverError, InstallOutcome, InstallRequest, InstallSummary,
    PlanRequest, Resolver, Result, SafetyPolicy, SearchPathResolver, ShellResolver, SkipReason,
    UninstallOutcome, UninstallRequest, UninstallSummary, WrapperPlan,
};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "esrever")]
#[command(about = "Install reversed-name wrappers for your commands (cat -> tac)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Colon-separated directories to scan (default: $PATH)
    #[arg(long, global = true, value_name = "DIRS")]
    path: Option<String>,
    /// Startup file to edit (default: ~/.bashrc or ~/.zshrc)
    #[arg(long, global = true, value_name = "FILE")]
    rc_file: Option<PathBuf>,
    /// Shell whose startup file is the default target
    #[arg(long, global = true, value_enum)]
    shell: Option<Shell>,
    /// Configuration file (default: $XDG_CONFIG_HOME/esrever/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Output format for reports
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    /// Report without touching any file
    #[arg(long, global = true)]
    dry_run: bool,
    #[command(flatten)]
    plan: PlanArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan, filter and write the wrapper block into the startup file
    ///
    /// Examples:
    ///   esrever install
    ///   esrever install --dry-run --format json
    ///   esrever install --force-sensitive --confirm I-UNDERSTAND-THE-RISK
    Install,
    /// Remove the wrapper block from the startup file
    Uninstall,
    /// Show the wrappers install would write (same as install --dry-run)
    Plan,
    /// Report whether a wrapper block is installed
    Status,
}

#[derive(Args)]
struct PlanArgs {
    /// Allow blocklisted commands (requires --confirm)
    #[arg(long, global = true)]
    force_sensitive: bool,
    /// Confirmation token required by --force-sensitive
    #[arg(long, global = true, value_name = "TOKEN")]
    confirm: Option<String>,
    /// Do not append cd, exit, pushd, popd, dirs and help to the scan
    #[arg(long, global = true)]
    no_builtins: bool,
    /// Also ask $SHELL whether reversed names already exist
    #[arg(long, global = true)]
    probe_shell: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Settings after merging flags over the config file.
struct Settings {
    search_path: String,
    rc_file: PathBuf,
    config: Config,
    format: OutputFormat,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_tracing(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("esrever: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = if verbose > 0 || quiet {
        EnvFilter::new(default_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    let settings = resolve_settings(&cli)?;
    debug!(
        rc_file = %settings.rc_file.display(),
        search_path = %settings.search_path,
        "resolved settings"
    );

    match cli.command {
        Commands::Install => handle_install(&settings, &cli.plan, cli.dry_run),
        Commands::Plan => handle_install(&settings, &cli.plan, true),
        Commands::Uninstall => handle_uninstall(&settings, cli.dry_run),
        Commands::Status => handle_status(&settings),
    }
}

fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let config = Config::load(cli.config.as_deref())?;

    let search_path = cli
        .path
        .clone()
        .or_else(|| config.search_path.clone())
        .unwrap_or_else(default_search_path);

    let rc_file = match cli.rc_file.clone().or_else(|| config.rc_file.clone()) {
        Some(path) => path,
        None => {
            let shell = cli.shell.or(config.shell).unwrap_or_else(Shell::detect);
            let home = home_dir().ok_or_else(|| {
                EsreverError::Config("HOME is not set; pass --rc-file".to_string())
            })?;
            home.join(shell.rc_file_name())
        }
    };

    Ok(Settings {
        search_path,
        rc_file,
        config,
        format: cli.format,
    })
}

fn build_policy(config: &Config, args: &PlanArgs) -> Result<SafetyPolicy> {
    let policy = SafetyPolicy::new().with_extra_blocklist(config.extra_blocklist.iter().cloned());
    if args.force_sensitive {
        policy.force_sensitive(args.confirm.as_deref())
    } else {
        Ok(policy)
    }
}

fn build_resolver(settings: &Settings, dirs: &[PathBuf], probe_shell: bool) -> Box<dyn Resolver> {
    let search = SearchPathResolver::new(dirs.to_vec());
    if probe_shell {
        let shell = ShellResolver::from_env().with_search_path(settings.search_path.clone());
        debug!(shell = %shell.shell().display(), "probing shell for collisions");
        Box::new(AnyResolver::new().with(search).with(shell))
    } else {
        Box::new(search)
    }
}

fn handle_install(settings: &Settings, args: &PlanArgs, dry_run: bool) -> Result<()> {
    // Checked before any scanning so a bad token never reaches the file.
    let policy = build_policy(&settings.config, args)?;
    let forced = policy.is_forced();
    if forced {
        warn!("blocklisted commands may be wrapped");
    }
    let dirs = split_search_path(&settings.search_path);
    let resolver = build_resolver(
        settings,
        &dirs,
        args.probe_shell || settings.config.probe_shell,
    );

    let request = InstallRequest {
        plan: PlanRequest {
            search_dirs: dirs,
            include_builtins: !args.no_builtins && settings.config.include_builtins,
            policy,
        },
        rc_file: settings.rc_file.clone(),
        installed_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        dry_run,
    };

    let summary = execute_install(request, resolver.as_ref())?;
    report_install(settings, &summary, forced)
}

fn handle_uninstall(settings: &Settings, dry_run: bool) -> Result<()> {
    let summary = execute_uninstall(UninstallRequest {
        rc_file: settings.rc_file.clone(),
        dry_run,
    })?;
    report_uninstall(settings, &summary)
}

fn handle_status(settings: &Settings) -> Result<()> {
    let status = block_status(&settings.rc_file)?;
    report_status(settings, &status)
}

#[derive(Serialize)]
struct InstallReport<'a> {
    rc_file: &'a Path,
    outcome: InstallOutcome,
    force_sensitive: bool,
    wrappers: &'a [esrever_io::WrapperSpec],
    skipped: &'a [esrever_io::SkippedCandidate],
    summary: esrever_io::PlanSummary,
}

fn report_install(settings: &Settings, summary: &InstallSummary, forced: bool) -> Result<()> {
    let plan = &summary.plan;
    if settings.format == OutputFormat::Json {
        let report = InstallReport {
            rc_file: &settings.rc_file,
            outcome: summary.outcome,
            force_sensitive: forced,
            wrappers: &plan.wrappers,
            skipped: &plan.skipped,
            summary: plan.summary(),
        };
        return print_json(&report);
    }

    let mut stdout = std::io::stdout().lock();
    if forced {
        writeln!(stdout, "Sensitive-command blocklist bypassed (--force-sensitive)")?;
    }
    match summary.outcome {
        InstallOutcome::DryRun => {
            write_plan(&mut stdout, plan)?;
            writeln!(
                stdout,
                "Dry run: {} not modified",
                settings.rc_file.display()
            )?;
        }
        InstallOutcome::NothingToInstall => {
            write_skip_summary(&mut stdout, plan)?;
            writeln!(
                stdout,
                "No commands passed the safety filter; {} not modified",
                settings.rc_file.display()
            )?;
        }
        InstallOutcome::Installed { replaced } => {
            writeln!(
                stdout,
                "Installed {} wrappers into {}{}",
                plan.wrappers.len(),
                settings.rc_file.display(),
                if replaced { " (replaced previous block)" } else { "" }
            )?;
            write_skip_summary(&mut stdout, plan)?;
            writeln!(
                stdout,
                "Open a new interactive shell or run: source {}",
                settings.rc_file.display()
            )?;
        }
    }
    Ok(())
}

fn write_plan(out: &mut impl Write, plan: &WrapperPlan) -> Result<()> {
    writeln!(out, "Wrappers ({}):", plan.wrappers.len())?;
    for spec in &plan.wrappers {
        writeln!(out, "  {} -> {}", spec.identifier, spec.original)?;
    }
    if !plan.skipped.is_empty() {
        writeln!(out, "Skipped ({}):", plan.skipped.len())?;
        for entry in &plan.skipped {
            writeln!(out, "  {}\t{}", entry.name, entry.reason)?;
        }
    }
    Ok(())
}

fn write_skip_summary(out: &mut impl Write, plan: &WrapperPlan) -> Result<()> {
    let summary = plan.summary();
    if summary.skipped() == 0 {
        return Ok(());
    }
    let parts: Vec<String> = SkipReason::ALL
        .iter()
        .filter(|reason| summary.count(**reason) > 0)
        .map(|reason| format!("{} {}", summary.count(*reason), reason))
        .collect();
    writeln!(
        out,
        "Skipped {} of {} candidates: {}",
        summary.skipped(),
        summary.candidates,
        parts.join(", ")
    )?;
    Ok(())
}

#[derive(Serialize)]
struct UninstallReport<'a> {
    rc_file: &'a Path,
    outcome: UninstallOutcome,
    dry_run: bool,
}

fn report_uninstall(settings: &Settings, summary: &UninstallSummary) -> Result<()> {
    if settings.format == OutputFormat::Json {
        return print_json(&UninstallReport {
            rc_file: &settings.rc_file,
            outcome: summary.outcome,
            dry_run: summary.dry_run,
        });
    }
    let rc = settings.rc_file.display();
    match (summary.outcome, summary.dry_run) {
        (UninstallOutcome::Removed, false) => println!("Removed wrapper block from {rc}"),
        (UninstallOutcome::Removed, true) => {
            println!("Dry run: would remove wrapper block from {rc}")
        }
        (UninstallOutcome::NotInstalled, _) => {
            println!("No wrapper block found in {rc}; nothing to do")
        }
    }
    Ok(())
}

fn report_status(settings: &Settings, status: &BlockStatus) -> Result<()> {
    if settings.format == OutputFormat::Json {
        return print_json(status);
    }
    let rc = status.rc_file.display();
    if !status.installed {
        println!("Not installed in {rc}");
        return Ok(());
    }
    match &status.installed_at {
        Some(at) => println!(
            "Installed in {rc}: {} wrappers (installed {at})",
            status.wrapper_count
        ),
        None => println!("Installed in {rc}: {} wrappers", status.wrapper_count),
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
