//! Plan builder combining the safety filter with the name transforms

use esrever_format::{Candidate, Resolver, SafetyPolicy, SkipReason, WrapperSpec};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// A candidate left out of the plan, with the first rule it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedCandidate {
    /// Candidate name
    pub name: String,
    /// Reason it was skipped
    pub reason: SkipReason,
}

/// Result of running the pipeline once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WrapperPlan {
    /// Accepted wrappers in discovery order
    pub wrappers: Vec<WrapperSpec>,
    /// Skipped candidates in discovery order
    pub skipped: Vec<SkippedCandidate>,
}

/// Counts per outcome for a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    /// Candidates considered
    pub candidates: usize,
    /// Wrappers accepted
    pub accepted: usize,
    /// Skipped as one character or shorter
    pub single_char: usize,
    /// Skipped as blocklisted
    pub sensitive: usize,
    /// Skipped as palindromes
    pub palindrome: usize,
    /// Skipped because the reversed name is taken
    pub collision: usize,
}

impl PlanSummary {
    /// Count for a single reason.
    pub fn count(&self, reason: SkipReason) -> usize {
        match reason {
            SkipReason::SingleChar => self.single_char,
            SkipReason::Sensitive => self.sensitive,
            SkipReason::Palindrome => self.palindrome,
            SkipReason::Collision => self.collision,
        }
    }

    /// Total skipped candidates.
    pub fn skipped(&self) -> usize {
        self.candidates - self.accepted
    }
}

impl WrapperPlan {
    /// True when no wrapper was accepted.
    pub fn is_empty(&self) -> bool {
        self.wrappers.is_empty()
    }

    /// Reason `name` was skipped, if it was.
    pub fn skip_reason(&self, name: &str) -> Option<SkipReason> {
        self.skipped
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.reason)
    }

    /// Accepted wrapper for `original`, if any.
    pub fn wrapper(&self, original: &str) -> Option<&WrapperSpec> {
        self.wrappers.iter().find(|spec| spec.original == original)
    }

    /// Tally accepted and skipped candidates.
    pub fn summary(&self) -> PlanSummary {
        let mut summary = PlanSummary {
            candidates: self.wrappers.len() + self.skipped.len(),
            accepted: self.wrappers.len(),
            ..PlanSummary::default()
        };
        for entry in &self.skipped {
            match entry.reason {
                SkipReason::SingleChar => summary.single_char += 1,
                SkipReason::Sensitive => summary.sensitive += 1,
                SkipReason::Palindrome => summary.palindrome += 1,
                SkipReason::Collision => summary.collision += 1,
            }
        }
        summary
    }
}

/// Builds a [`WrapperPlan`] one candidate at a time.
pub struct PlanBuilder<'a> {
    /// Blocklist and force switch
    policy: &'a SafetyPolicy,
    /// Live lookup for collisions
    resolver: &'a dyn Resolver,
    /// Plan under construction
    plan: WrapperPlan,
    /// Identifiers already claimed by accepted wrappers
    identifiers: HashSet<String>,
}

impl<'a> PlanBuilder<'a> {
    /// Create new plan builder
    pub fn new(policy: &'a SafetyPolicy, resolver: &'a dyn Resolver) -> Self {
        Self {
            policy,
            resolver,
            plan: WrapperPlan::default(),
            identifiers: HashSet::new(),
        }
    }

    /// Filter and transform one candidate.
    ///
    /// Returns the skip reason when the candidate is left out.
    pub fn add_candidate(&mut self, candidate: &Candidate) -> Option<SkipReason> {
        let verdict = match self.policy.classify(&candidate.name, self.resolver) {
            Some(reason) => Err(reason),
            None => {
                let spec = WrapperSpec::new(&candidate.name);
                if self.identifiers.contains(&spec.identifier) {
                    Err(SkipReason::Collision)
                } else {
                    Ok(spec)
                }
            }
        };

        match verdict {
            Ok(spec) => {
                debug!(
                    name = %candidate.name,
                    origin = %candidate.origin,
                    identifier = %spec.identifier,
                    "accepted candidate"
                );
                self.identifiers.insert(spec.identifier.clone());
                self.plan.wrappers.push(spec);
                None
            }
            Err(reason) => {
                debug!(
                    name = %candidate.name,
                    origin = %candidate.origin,
                    %reason,
                    "skipped candidate"
                );
                self.plan.skipped.push(SkippedCandidate {
                    name: candidate.name.clone(),
                    reason,
                });
                Some(reason)
            }
        }
    }

    /// Finish and return the plan
    pub fn finish(self) -> WrapperPlan {
        self.plan
    }
}

/// Run every candidate through the filter in order.
pub fn build_plan(
    candidates: &[Candidate],
    policy: &SafetyPolicy,
    resolver: &dyn Resolver,
) -> WrapperPlan {
    let mut builder = PlanBuilder::new(policy, resolver);
    for candidate in candidates {
        builder.add_candidate(candidate);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use esrever_format::constants::CONFIRMATION_TOKEN;
    use esrever_format::Delegation;
    use esrever_test_utils::FakeResolver;
    use std::path::Path;

    fn dir_candidates(names: &[&str]) -> Vec<Candidate> {
        names
            .iter()
            .map(|name| Candidate::in_directory(*name, Path::new("/opt/bin")))
            .collect()
    }

    #[test]
    fn accepts_in_discovery_order() {
        let candidates = dir_candidates(&["cat", "grep", "awk"]);
        let plan = build_plan(&candidates, &SafetyPolicy::new(), &FakeResolver::empty());

        let originals: Vec<_> = plan.wrappers.iter().map(|w| w.original.as_str()).collect();
        assert_eq!(originals, vec!["cat", "grep", "awk"]);
        assert_eq!(plan.wrapper("grep").unwrap().identifier, "perg");
        assert!(plan.skipped.is_empty());
    }

    #[test]
    fn mutual_reversals_both_collide() {
        // ls and sl live in the same directory, so each reversal is taken.
        let candidates = dir_candidates(&["ls", "cat", "sl"]);
        let resolver = FakeResolver::with(["ls", "cat", "sl"]);
        let plan = build_plan(&candidates, &SafetyPolicy::new(), &resolver);

        assert_eq!(plan.wrappers.len(), 1);
        assert_eq!(plan.wrappers[0].original, "cat");
        assert_eq!(plan.wrappers[0].reversed, "tac");
        assert_eq!(plan.skip_reason("ls"), Some(SkipReason::Collision));
        assert_eq!(plan.skip_reason("sl"), Some(SkipReason::Collision));
    }

    #[test]
    fn skip_list_keeps_discovery_order_and_first_reason() {
        let candidates = dir_candidates(&["a", "sudo", "level", "ls", "rm"]);
        let resolver = FakeResolver::with(["sl"]);
        let plan = build_plan(&candidates, &SafetyPolicy::new(), &resolver);

        let skipped: Vec<_> = plan
            .skipped
            .iter()
            .map(|s| (s.name.as_str(), s.reason))
            .collect();
        assert_eq!(
            skipped,
            vec![
                ("a", SkipReason::SingleChar),
                ("sudo", SkipReason::Sensitive),
                ("level", SkipReason::Palindrome),
                ("ls", SkipReason::Collision),
                ("rm", SkipReason::Sensitive),
            ]
        );
        assert!(plan.is_empty());
    }

    #[test]
    fn forced_sensitive_names_reach_later_checks() {
        let policy = SafetyPolicy::new()
            .force_sensitive(Some(CONFIRMATION_TOKEN))
            .unwrap();
        let candidates = dir_candidates(&["sudo", "dd", "rm"]);
        let resolver = FakeResolver::with(["mr"]);
        let plan = build_plan(&candidates, &policy, &resolver);

        assert_eq!(plan.wrapper("sudo").unwrap().identifier, "odus");
        assert_eq!(plan.skip_reason("dd"), Some(SkipReason::Palindrome));
        assert_eq!(plan.skip_reason("rm"), Some(SkipReason::Collision));
    }

    #[test]
    fn duplicate_identifiers_collide_within_a_run() {
        let candidates = dir_candidates(&["a-b", "a.b"]);
        let plan = build_plan(&candidates, &SafetyPolicy::new(), &FakeResolver::empty());

        assert_eq!(plan.wrappers.len(), 1);
        assert_eq!(plan.wrappers[0].identifier, "b_a");
        assert_eq!(plan.skip_reason("a.b"), Some(SkipReason::Collision));
    }

    #[test]
    fn builtins_keep_builtin_delegation() {
        let candidates = vec![Candidate::builtin("cd"), Candidate::builtin("pushd")];
        let plan = build_plan(&candidates, &SafetyPolicy::new(), &FakeResolver::empty());

        assert_eq!(plan.wrapper("cd").unwrap().delegation, Delegation::Builtin);
        assert_eq!(plan.wrapper("pushd").unwrap().delegation, Delegation::Command);
    }

    #[test]
    fn resolver_is_consulted_on_every_run() {
        let candidates = dir_candidates(&["cat"]);
        let policy = SafetyPolicy::new();

        let first = build_plan(&candidates, &policy, &FakeResolver::empty());
        let second = build_plan(&candidates, &policy, &FakeResolver::with(["tac"]));

        assert_eq!(first.wrappers.len(), 1);
        assert_eq!(second.skip_reason("cat"), Some(SkipReason::Collision));
    }

    #[test]
    fn summary_counts_each_reason() {
        let candidates = dir_candidates(&["x", "sudo", "civic", "ls", "cat", "grep"]);
        let plan = build_plan(&candidates, &SafetyPolicy::new(), &FakeResolver::with(["sl"]));
        let summary = plan.summary();

        assert_eq!(summary.candidates, 6);
        assert_eq!(summary.accepted, 2);
        assert_eq!(summary.skipped(), 4);
        for reason in SkipReason::ALL {
            assert_eq!(summary.count(reason), 1, "{reason}");
        }
    }
}
