//! Gitignore-style rule compilation and matching
//!
//! Rule text is compiled line by line into [`Rule`]s. A rule either matches a
//! path's final component at any depth (no slash in the pattern) or matches
//! the whole relative path segment by segment, where a bare `**` segment
//! spans zero or more directories.
//!
//! - `pattern` - per-segment glob compilation and the globstar matcher
//! - `rule` - markers (`!`, leading `/`, trailing `/`) and path matching
//! - `matcher` - ordered rule lists parsed from text or files

mod matcher;
mod pattern;
mod rule;

pub use matcher::Matcher;
pub use pattern::{Segment, compile_glob, matches_segments, split_path};
pub use rule::{Rule, RulePattern};
