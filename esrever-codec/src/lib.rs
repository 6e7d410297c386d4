//! esrever Codec - Wrapper pipeline and startup-file block handling
//!
//! This crate turns candidate names into a wrapper plan and moves that plan
//! in and out of startup-file text:
//!
//! - Plan builder applying the safety filter and name transforms
//! - Block renderer producing the marker-delimited shell snippet
//! - Line-oriented parser that splits text around the managed block
//!
//! Nothing here touches the filesystem; see `esrever-io` for that.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod block;
pub mod pipeline;
pub mod render;

// Re-export commonly used types
pub use esrever_format::{
    Candidate, CandidateOrigin, Delegation, EsreverError, Resolver, Result, SafetyPolicy,
    SkipReason, WrapperSpec,
};

// Re-export our own types
pub use block::{insert_block, remove_block, BlockSplit};
pub use pipeline::{build_plan, PlanBuilder, PlanSummary, SkippedCandidate, WrapperPlan};
pub use render::{count_definitions, installed_at, render_block};
