//! Single rule source evaluated under one mode

use crate::gitignore::{Matcher, split_path};

use super::{Decision, Mode, PathFilter};

/// Evaluates paths against one matcher.
#[derive(Debug, Clone, Default)]
pub struct GitignoreFilter {
    mode: Mode,
    matcher: Matcher,
}

impl GitignoreFilter {
    pub fn new(mode: Mode, matcher: Matcher) -> Self {
        Self { mode, matcher }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }
}

impl PathFilter for GitignoreFilter {
    fn evaluate(&self, path: &str, is_dir: bool) -> Decision {
        let (matched, negated) = match_rules(self.mode, &self.matcher, path, is_dir);
        decision_for_match(self.mode, matched, negated)
    }
}

/// Scan every rule in order and report `(matched, negated)` for the last
/// matching rule.
///
/// Directory-only rules extend to descendants only under whitelist mode;
/// a blacklisted directory is pruned before its children are ever seen.
pub fn match_rules(mode: Mode, matcher: &Matcher, path: &str, is_dir: bool) -> (bool, bool) {
    let mut matched = false;
    let mut negated = false;
    let parts = split_path(path);

    for rule in matcher.rules() {
        let hit = if mode == Mode::Whitelist && rule.dir_only() {
            rule.matches_descendant_parts(&parts, is_dir)
        } else {
            rule.matches_parts(&parts, is_dir)
        };
        if hit {
            matched = true;
            negated = rule.negate();
        }
    }

    (matched, negated)
}

/// Map a match result to a decision under `mode`.
pub fn decision_for_match(mode: Mode, matched: bool, negated: bool) -> Decision {
    match mode {
        Mode::Blacklist => {
            let include = !matched || negated;
            Decision::new(include, include)
        }
        // Whitelisted traversal always descends: a deeper pattern may still match.
        Mode::Whitelist => Decision::new(matched && !negated, true),
    }
}
