//! esrever I/O - Filesystem layer and high-level operations
//!
//! This crate connects the pure pipeline to the machine it runs on:
//!
//! - Candidate scanning over search-path directories
//! - Live resolvers for collision checks
//! - Atomic startup-file edits
//! - `execute_install` / `execute_uninstall` request APIs used by the CLI

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod rcfile;
pub mod resolver;
pub mod scanner;

// Re-export commonly used types
pub use esrever_codec::{
    build_plan, render_block, PlanSummary, SkippedCandidate, WrapperPlan,
};
pub use esrever_format::{
    Candidate, EsreverError, Resolver, Result, SafetyPolicy, SkipReason, WrapperSpec,
};
pub use rcfile::{block_status, BlockStatus, UninstallOutcome};
pub use resolver::{AnyResolver, SearchPathResolver, ShellResolver};
pub use scanner::{default_search_path, scan_candidates, split_search_path, CandidateScanner};

use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Everything needed to compute a wrapper plan.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    /// Directories to scan, in precedence order
    pub search_dirs: Vec<PathBuf>,
    /// Append the fixed builtin names after the directories
    pub include_builtins: bool,
    /// Blocklist and force switch
    pub policy: SafetyPolicy,
}

/// Install a freshly computed block into a startup file.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// How to compute the plan
    pub plan: PlanRequest,
    /// Startup file to edit
    pub rc_file: PathBuf,
    /// Timestamp written into the block header
    pub installed_at: String,
    /// Compute and report only
    pub dry_run: bool,
}

/// What installing did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallOutcome {
    /// Block written; `replaced` when an older block was swapped out
    Installed {
        /// Whether a previous block existed
        replaced: bool,
    },
    /// Every candidate was filtered out; the file was not touched
    NothingToInstall,
    /// Dry run; the file was not touched
    DryRun,
}

/// Result of [`execute_install`].
#[derive(Debug, Clone, Serialize)]
pub struct InstallSummary {
    /// The computed plan
    pub plan: WrapperPlan,
    /// What happened to the file
    pub outcome: InstallOutcome,
    /// Rendered block (also produced for dry runs)
    pub block: String,
}

/// Remove the block from a startup file.
#[derive(Debug, Clone)]
pub struct UninstallRequest {
    /// Startup file to edit
    pub rc_file: PathBuf,
    /// Report only
    pub dry_run: bool,
}

/// Result of [`execute_uninstall`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UninstallSummary {
    /// Whether a block was (or, for dry runs, would be) removed
    pub outcome: UninstallOutcome,
    /// Whether the file was left untouched because of a dry run
    pub dry_run: bool,
}

/// Scan the search path and filter the candidates.
///
/// Fails with [`EsreverError::NoCandidates`] when scanning finds nothing.
pub fn compute_plan(request: &PlanRequest, resolver: &dyn Resolver) -> Result<WrapperPlan> {
    let candidates = scan_candidates(&request.search_dirs, request.include_builtins);
    if candidates.is_empty() {
        return Err(EsreverError::NoCandidates);
    }
    let plan = build_plan(&candidates, &request.policy, resolver);
    let summary = plan.summary();
    info!(
        candidates = summary.candidates,
        accepted = summary.accepted,
        skipped = summary.skipped(),
        "computed wrapper plan"
    );
    Ok(plan)
}

/// Compute a plan and write it into the startup file.
pub fn execute_install(request: InstallRequest, resolver: &dyn Resolver) -> Result<InstallSummary> {
    let plan = compute_plan(&request.plan, resolver)?;
    let block = render_block(&plan.wrappers, &request.installed_at);

    let outcome = if request.dry_run {
        InstallOutcome::DryRun
    } else if plan.is_empty() {
        InstallOutcome::NothingToInstall
    } else {
        let replaced = rcfile::install_block(&request.rc_file, &block)?;
        InstallOutcome::Installed { replaced }
    };

    Ok(InstallSummary {
        plan,
        outcome,
        block,
    })
}

/// Remove the managed block, or report whether one exists for dry runs.
pub fn execute_uninstall(request: UninstallRequest) -> Result<UninstallSummary> {
    let outcome = if request.dry_run {
        if block_status(&request.rc_file)?.installed {
            UninstallOutcome::Removed
        } else {
            UninstallOutcome::NotInstalled
        }
    } else {
        rcfile::uninstall_block(&request.rc_file)?
    };
    Ok(UninstallSummary {
        outcome,
        dry_run: request.dry_run,
    })
}
