//! Path filters: per-path include/descend decisions
//!
//! Every filter answers one question for the walker through [`PathFilter`].
//! Filters compose by holding an inner filter:
//!
//! - [`GitignoreFilter`] - one rule source with one [`Mode`]
//! - [`RuleSetFilter`] - several rule sources, later matches override earlier ones
//! - [`ExcludePathFilter`] - force-excludes literal paths around another filter

mod exclude;
mod gitignore;
mod rule_set;

use std::fmt;

pub use exclude::ExcludePathFilter;
pub use gitignore::{GitignoreFilter, decision_for_match, match_rules};
pub use rule_set::{RuleSet, RuleSetFilter};

/// Whether a path is included in output and whether its children are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub include: bool,
    pub descend: bool,
}

impl Decision {
    pub const fn new(include: bool, descend: bool) -> Self {
        Self { include, descend }
    }
}

/// Decides, per relative slash-separated path, what the walker does with it.
///
/// Implementations are immutable after construction and are shared across
/// threads.
pub trait PathFilter: Send + Sync {
    fn evaluate(&self, path: &str, is_dir: bool) -> Decision;
}

/// How a rule source is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Matched paths are excluded; everything else is included.
    #[default]
    Blacklist,
    /// Only matched paths are included.
    Whitelist,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Blacklist => "blacklist",
            Mode::Whitelist => "whitelist",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
