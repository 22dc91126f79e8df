//! Compiling a single rule line and matching paths against it

use glob::Pattern;

use super::pattern::{Segment, compile_glob, matches_segments, split_path};

/// How a rule's pattern is applied to a path.
#[derive(Debug, Clone)]
pub enum RulePattern {
    /// Pattern contained a slash (or was anchored): matched segment by
    /// segment against the whole relative path.
    Segments(Vec<Segment>),
    /// Pattern without a slash: matched against the final path component
    /// at any depth.
    Basename(Pattern),
}

/// A compiled gitignore-style rule.
#[derive(Debug, Clone)]
pub struct Rule {
    raw: String,
    negate: bool,
    anchored: bool,
    dir_only: bool,
    pattern: RulePattern,
}

impl Rule {
    /// Compile one rule line.
    ///
    /// Returns `Ok(None)` when nothing is left after stripping the markers
    /// (for example `!` or `/` alone). The error is a human-readable reason;
    /// the caller attaches the line number.
    pub fn compile(line: &str) -> Result<Option<Self>, String> {
        let raw = line.to_string();
        let mut rest = line;

        let negate = rest.starts_with('!');
        if negate {
            rest = &rest[1..];
        }

        let anchored = rest.starts_with('/');
        if anchored {
            rest = &rest[1..];
        }

        let dir_only = rest.ends_with('/') && !is_escaped(rest, rest.len() - 1);
        if dir_only {
            rest = &rest[..rest.len() - 1];
        }

        if rest.is_empty() {
            return Ok(None);
        }

        let parts = split_unescaped_slashes(rest);
        if parts.iter().any(|part| part.contains('/')) {
            return Err("escaped slash can never match a path segment".to_string());
        }
        let has_slash = anchored || parts.len() > 1;

        let pattern = if has_slash {
            let segments = parts
                .into_iter()
                .filter(|part| !part.is_empty())
                .map(Segment::compile)
                .collect::<Result<Vec<_>, _>>()?;
            RulePattern::Segments(segments)
        } else if rest == "**" {
            RulePattern::Basename(compile_glob("*")?)
        } else {
            RulePattern::Basename(compile_glob(rest)?)
        };

        Ok(Some(Self {
            raw,
            negate,
            anchored,
            dir_only,
            pattern,
        }))
    }

    /// The original line, for diagnostics.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn negate(&self) -> bool {
        self.negate
    }

    pub fn anchored(&self) -> bool {
        self.anchored
    }

    pub fn dir_only(&self) -> bool {
        self.dir_only
    }

    pub fn has_slash(&self) -> bool {
        matches!(self.pattern, RulePattern::Segments(_))
    }

    pub fn pattern(&self) -> &RulePattern {
        &self.pattern
    }

    /// Check whether the rule matches `path` itself.
    pub fn matches(&self, path: &str, is_dir: bool) -> bool {
        self.matches_parts(&split_path(path), is_dir)
    }

    /// Like [`Rule::matches`] for a path already split into components.
    pub fn matches_parts(&self, parts: &[&str], is_dir: bool) -> bool {
        if self.dir_only && !is_dir {
            return false;
        }

        match &self.pattern {
            RulePattern::Segments(segments) => matches_segments(segments, parts),
            RulePattern::Basename(glob) => parts.last().is_some_and(|base| glob.matches(base)),
        }
    }

    /// Check whether the rule matches `path` or, for directory-only rules,
    /// any directory above it.
    pub fn matches_descendant(&self, path: &str, is_dir: bool) -> bool {
        self.matches_descendant_parts(&split_path(path), is_dir)
    }

    /// Like [`Rule::matches_descendant`] for a path already split into components.
    pub fn matches_descendant_parts(&self, parts: &[&str], is_dir: bool) -> bool {
        if self.matches_parts(parts, is_dir) {
            return true;
        }
        if !self.dir_only {
            return false;
        }
        (1..parts.len()).rev().any(|end| self.matches_parts(&parts[..end], true))
    }
}

/// Whether the byte at `index` is preceded by an odd number of backslashes.
pub(crate) fn is_escaped(line: &str, index: usize) -> bool {
    line.as_bytes()[..index]
        .iter()
        .rev()
        .take_while(|&&b| b == b'\\')
        .count()
        % 2
        == 1
}

fn split_unescaped_slashes(pattern: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (idx, byte) in pattern.bytes().enumerate() {
        if byte == b'/' && !is_escaped(pattern, idx) {
            parts.push(&pattern[start..idx]);
            start = idx + 1;
        }
    }
    parts.push(&pattern[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(line: &str) -> Rule {
        Rule::compile(line).unwrap().unwrap()
    }

    #[test]
    fn test_markers_are_stripped() {
        let r = rule("!/build/");
        assert!(r.negate());
        assert!(r.anchored());
        assert!(r.dir_only());
        assert!(r.has_slash());
        assert_eq!(r.raw(), "!/build/");
    }

    #[test]
    fn test_marker_only_lines_are_dropped() {
        assert!(Rule::compile("!").unwrap().is_none());
        assert!(Rule::compile("/").unwrap().is_none());
        assert!(Rule::compile("!/").unwrap().is_none());
    }

    #[test]
    fn test_basename_vs_segments() {
        assert!(!rule("*.log").has_slash());
        assert!(!rule("logs/").has_slash());
        assert!(rule("doc/*.txt").has_slash());
        assert!(rule("/TODO").has_slash());
    }

    #[test]
    fn test_basename_matches_at_any_depth() {
        let r = rule("*.log");
        assert!(r.matches("debug.log", false));
        assert!(r.matches("logs/trace.log", false));
        assert!(!r.matches("logs/trace.txt", false));
    }

    #[test]
    fn test_anchored_only_matches_at_root() {
        let r = rule("/TODO");
        assert!(r.matches("TODO", false));
        assert!(!r.matches("src/TODO", false));
    }

    #[test]
    fn test_dir_only_never_matches_files() {
        let r = rule("build/");
        assert!(r.matches("build", true));
        assert!(r.matches("nested/build", true));
        assert!(!r.matches("build", false));
    }

    #[test]
    fn test_collapsed_slashes_are_ignored() {
        let r = rule("a//b");
        assert!(r.matches("a/b", false));
        assert!(!r.matches("a/x/b", false));
    }

    #[test]
    fn test_inner_double_star_degrades_to_star() {
        let r = rule("src/a**b");
        assert!(r.matches("src/axxb", false));
        assert!(!r.matches("src/a/b", false));
    }

    #[test]
    fn test_bare_globstar_without_slash_matches_everything() {
        let r = rule("**");
        assert!(r.matches("anything", false));
        assert!(r.matches("deep/path/file", false));
    }

    #[test]
    fn test_escaped_negation_is_literal() {
        let r = rule("\\!important.txt");
        assert!(!r.negate());
        assert!(r.matches("!important.txt", false));
        assert!(!r.matches("important.txt", false));
    }

    #[test]
    fn test_escaped_slash_is_rejected() {
        let err = Rule::compile("a\\/b").unwrap_err();
        assert!(err.contains("escaped slash"), "{}", err);
        // Escaped trailing slash is not a directory marker either.
        assert!(Rule::compile("name\\/").is_err());
    }

    #[test]
    fn test_matches_parts_agrees_with_matches() {
        let r = rule("doc/**/*.md");
        let path = "doc/guide/intro.md";
        assert_eq!(r.matches_parts(&split_path(path), false), r.matches(path, false));
        assert!(r.matches_parts(&["doc", "a", "b", "x.md"], false));
        assert!(!r.matches_parts(&["doc", "x.txt"], false));
    }

    #[test]
    fn test_double_backslash_before_slash_keeps_dir_marker() {
        let r = rule("name\\\\/");
        assert!(r.dir_only());
        assert!(r.matches("name\\", true));
    }

    #[test]
    fn test_invalid_segment_is_an_error() {
        assert!(Rule::compile("src/[abc").is_err());
        assert!(Rule::compile("[abc").is_err());
    }

    #[test]
    fn test_matches_descendant_walks_ancestors() {
        let r = rule("assets/");
        assert!(r.matches_descendant("assets", true));
        assert!(r.matches_descendant("assets/img.png", false));
        assert!(r.matches_descendant("assets/deep/img.png", false));
        assert!(r.matches_descendant("web/assets/img.png", false));
        assert!(!r.matches_descendant("other/img.png", false));
        assert!(!r.matches("assets/img.png", false));
    }

    #[test]
    fn test_matches_descendant_anchored_dir() {
        let r = rule("/assets/");
        assert!(r.matches_descendant("assets/img.png", false));
        assert!(!r.matches_descendant("web/assets/img.png", false));
    }

    #[test]
    fn test_matches_descendant_delegates_for_plain_rules() {
        let r = rule("docs");
        assert!(r.matches_descendant("docs", true));
        assert!(!r.matches_descendant("docs/readme.md", false));
    }
}
