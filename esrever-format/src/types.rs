//! Candidate and wrapper data model

use crate::constants::BUILTIN_DELEGATED;
use crate::transform::{reverse, sanitize};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where a candidate name was discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateOrigin {
    /// Executable file found in a search-path directory
    Directory(PathBuf),
    /// Name from the fixed builtin list
    Builtin,
}

impl fmt::Display for CandidateOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateOrigin::Directory(dir) => write!(f, "{}", dir.display()),
            CandidateOrigin::Builtin => f.write_str("builtin"),
        }
    }
}

/// A command name eligible for wrapping, unique within one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Command name as typed at the prompt
    pub name: String,
    /// Discovery source
    pub origin: CandidateOrigin,
}

impl Candidate {
    /// Candidate found as an executable inside `dir`.
    pub fn in_directory(name: impl Into<String>, dir: &Path) -> Self {
        Self {
            name: name.into(),
            origin: CandidateOrigin::Directory(dir.to_path_buf()),
        }
    }

    /// Candidate taken from the builtin list.
    pub fn builtin(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin: CandidateOrigin::Builtin,
        }
    }
}

/// Why a candidate was left out of the wrapper list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Name is one character or shorter
    SingleChar,
    /// Name is on the sensitive blocklist
    Sensitive,
    /// Name reads the same reversed
    Palindrome,
    /// Reversed name or identifier already resolves to something
    Collision,
}

impl SkipReason {
    /// Every reason in filter priority order.
    pub const ALL: [SkipReason; 4] = [
        SkipReason::SingleChar,
        SkipReason::Sensitive,
        SkipReason::Palindrome,
        SkipReason::Collision,
    ];

    /// Stable snake_case tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::SingleChar => "single_char",
            SkipReason::Sensitive => "sensitive",
            SkipReason::Palindrome => "palindrome",
            SkipReason::Collision => "collision",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a wrapper forwards to its original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Delegation {
    /// `command ORIGINAL "$@"`
    Command,
    /// `builtin ORIGINAL "$@"`, for builtins that act on the calling shell
    Builtin,
}

/// One accepted wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrapperSpec {
    /// Name of the command being wrapped
    pub original: String,
    /// Character reversal of `original`
    pub reversed: String,
    /// `reversed` sanitized into a function name
    pub identifier: String,
    /// Forwarding style
    pub delegation: Delegation,
}

impl WrapperSpec {
    /// Derive the reversed name, identifier and delegation for `original`.
    pub fn new(original: &str) -> Self {
        let reversed = reverse(original);
        let identifier = sanitize(&reversed);
        let delegation = if BUILTIN_DELEGATED.contains(&original) {
            Delegation::Builtin
        } else {
            Delegation::Command
        };
        Self {
            original: original.to_string(),
            reversed,
            identifier,
            delegation,
        }
    }
}
