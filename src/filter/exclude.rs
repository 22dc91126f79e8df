//! Force-exclusion of literal paths

use std::collections::HashSet;

use super::{Decision, PathFilter};

/// Excludes a fixed set of relative paths (and prunes them if they are
/// directories) before consulting the inner filter.
pub struct ExcludePathFilter {
    inner: Box<dyn PathFilter>,
    excluded: HashSet<String>,
}

impl ExcludePathFilter {
    /// Wrap `inner` so that `paths` are always excluded.
    ///
    /// Returns `inner` unchanged when there is nothing to exclude.
    pub fn wrap<I, S>(inner: Box<dyn PathFilter>, paths: I) -> Box<dyn PathFilter>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let excluded: HashSet<String> = paths
            .into_iter()
            .map(Into::into)
            .filter(|path| !path.is_empty())
            .collect();

        if excluded.is_empty() {
            return inner;
        }
        Box::new(Self { inner, excluded })
    }
}

impl PathFilter for ExcludePathFilter {
    fn evaluate(&self, path: &str, is_dir: bool) -> Decision {
        if self.excluded.contains(path) {
            return Decision::new(false, false);
        }
        self.inner.evaluate(path, is_dir)
    }
}
