//! esrever Format - Core primitives for reversed-name command wrappers
//!
//! This crate provides the pure building blocks of the wrapper pipeline
//! with no I/O dependencies. It includes:
//!
//! - Marker lines, builtin names and the sensitive-command blocklist
//! - Name reversal and identifier sanitizing
//! - The safety filter and the `Resolver` capability it consults
//! - Error types
//! - Candidate and wrapper data model

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod constants;
pub mod error;
pub mod filter;
pub mod transform;
pub mod types;

// Re-export commonly used types
pub use error::{EsreverError, Result};
pub use filter::{Resolver, SafetyPolicy};
pub use transform::{is_identifier, reverse, sanitize};
pub use types::{Candidate, CandidateOrigin, Delegation, SkipReason, WrapperSpec};
