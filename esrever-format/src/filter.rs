//! Safety filter deciding which names may be wrapped

use crate::constants::{CONFIRMATION_TOKEN, SENSITIVE_COMMANDS};
use crate::error::{EsreverError, Result};
use crate::transform::{reverse, sanitize};
use crate::types::SkipReason;
use std::collections::BTreeSet;

/// Answers whether a name already means something in the user's environment.
///
/// Implementations look at live state (search path, shell builtins, a probe
/// shell), so callers must query them on every run instead of caching answers.
pub trait Resolver {
    /// True when `name` already resolves to a command, builtin or callable.
    fn resolves(&self, name: &str) -> bool;
}

impl<F> Resolver for F
where
    F: Fn(&str) -> bool,
{
    fn resolves(&self, name: &str) -> bool {
        self(name)
    }
}

/// Blocklist plus the force switch.
#[derive(Debug, Clone)]
pub struct SafetyPolicy {
    blocklist: BTreeSet<String>,
    force_sensitive: bool,
}

impl Default for SafetyPolicy {
    fn default() -> Self {
        Self {
            blocklist: SENSITIVE_COMMANDS.iter().map(|s| s.to_string()).collect(),
            force_sensitive: false,
        }
    }
}

impl SafetyPolicy {
    /// Policy with the built-in blocklist and force disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy with an empty blocklist.
    pub fn without_blocklist() -> Self {
        Self {
            blocklist: BTreeSet::new(),
            force_sensitive: false,
        }
    }

    /// Add names to the blocklist.
    pub fn with_extra_blocklist<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blocklist.extend(names.into_iter().map(Into::into));
        self
    }

    /// Let blocklisted names through to the remaining checks.
    ///
    /// Fails with [`EsreverError::ConfirmationRequired`] unless `confirmation`
    /// is exactly [`CONFIRMATION_TOKEN`].
    pub fn force_sensitive(mut self, confirmation: Option<&str>) -> Result<Self> {
        if confirmation != Some(CONFIRMATION_TOKEN) {
            return Err(EsreverError::ConfirmationRequired);
        }
        self.force_sensitive = true;
        Ok(self)
    }

    /// Whether the blocklist is bypassed.
    pub fn is_forced(&self) -> bool {
        self.force_sensitive
    }

    /// Whether `name` is on the blocklist (regardless of force).
    pub fn is_sensitive(&self, name: &str) -> bool {
        self.blocklist.contains(name)
    }

    /// Classify `name`; `None` means it may be wrapped.
    ///
    /// Checks run in fixed order and the first hit wins: length, blocklist,
    /// palindrome, then collision of the reversed name or its identifier.
    pub fn classify(&self, name: &str, resolver: &dyn Resolver) -> Option<SkipReason> {
        if name.chars().count() <= 1 {
            return Some(SkipReason::SingleChar);
        }
        if !self.force_sensitive && self.is_sensitive(name) {
            return Some(SkipReason::Sensitive);
        }

        let reversed = reverse(name);
        if reversed == name {
            return Some(SkipReason::Palindrome);
        }

        if resolver.resolves(&reversed) {
            return Some(SkipReason::Collision);
        }
        let identifier = sanitize(&reversed);
        if identifier != reversed && resolver.resolves(&identifier) {
            return Some(SkipReason::Collision);
        }
        None
    }
}
