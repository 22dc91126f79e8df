//! Ordered rule lists parsed from rule text or rule files

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

use super::rule::{Rule, is_escaped};

/// Compiled rules from one rule source, in source order.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    rules: Vec<Rule>,
}

impl Matcher {
    /// Create a matcher from pre-compiled rules.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Parse rule text. `origin` names the source in error messages.
    ///
    /// Any invalid pattern fails the whole source; no partial matcher is
    /// returned.
    pub fn parse(content: &str, origin: &str) -> Result<Self> {
        let mut rules = Vec::new();

        for (idx, line) in content.split('\n').enumerate() {
            let line = trim_trailing_whitespace(line.trim_end_matches('\r'));
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match Rule::compile(line) {
                Ok(Some(rule)) => rules.push(rule),
                Ok(None) => {}
                Err(reason) => {
                    return Err(Error::Compile {
                        origin: origin.to_string(),
                        line: idx + 1,
                        pattern: line.to_string(),
                        reason,
                    });
                }
            }
        }

        debug!(origin, rules = rules.len(), "parsed rule source");
        Ok(Self::new(rules))
    }

    /// Load a rule file. A file that does not exist yields an empty matcher.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "rule source not found, using empty rule set");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(Error::RuleSourceUnreadable {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        Self::parse(&content, &path.display().to_string())
    }

    /// The compiled rules in source order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn trim_trailing_whitespace(mut line: &str) -> &str {
    while let Some(last) = line.as_bytes().last() {
        if (*last != b' ' && *last != b'\t') || is_escaped(line, line.len() - 1) {
            break;
        }
        line = &line[..line.len() - 1];
    }
    line
}
