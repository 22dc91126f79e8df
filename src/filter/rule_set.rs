//! Ordered composition of several rule sources

use tracing::trace;

use crate::gitignore::Matcher;

use super::gitignore::{GitignoreFilter, decision_for_match, match_rules};
use super::{Decision, Mode, PathFilter};

/// One rule source together with the mode it is applied under.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub mode: Mode,
    pub matcher: Matcher,
}

impl RuleSet {
    pub fn new(mode: Mode, matcher: Matcher) -> Self {
        Self { mode, matcher }
    }
}

/// Applies rule sets in order; the last rule set that matches a path decides
/// it. Paths no rule set matches fall back to `base_mode`.
#[derive(Debug, Clone)]
pub struct RuleSetFilter {
    base_mode: Mode,
    rule_sets: Vec<RuleSet>,
}

impl RuleSetFilter {
    pub fn new(rule_sets: Vec<RuleSet>, base_mode: Mode) -> Self {
        Self {
            base_mode,
            rule_sets,
        }
    }

    /// Build the filter for `rule_sets`. Without any rule set this is a
    /// plain [`GitignoreFilter`] with no rules under `base_mode`.
    pub fn build(rule_sets: Vec<RuleSet>, base_mode: Mode) -> Box<dyn PathFilter> {
        if rule_sets.is_empty() {
            return Box::new(GitignoreFilter::new(base_mode, Matcher::default()));
        }
        Box::new(Self::new(rule_sets, base_mode))
    }

    pub fn base_mode(&self) -> Mode {
        self.base_mode
    }

    pub fn rule_sets(&self) -> &[RuleSet] {
        &self.rule_sets
    }
}

impl PathFilter for RuleSetFilter {
    fn evaluate(&self, path: &str, is_dir: bool) -> Decision {
        let base = decision_for_match(self.base_mode, false, false);

        let mut decision = None;
        for (idx, rule_set) in self.rule_sets.iter().enumerate() {
            let (matched, negated) = match_rules(rule_set.mode, &rule_set.matcher, path, is_dir);
            if matched {
                trace!(path, rule_set = idx, mode = %rule_set.mode, negated, "rule set matched");
                decision = Some(decision_for_match(rule_set.mode, matched, negated));
            }
        }

        decision.unwrap_or(base)
    }
}
