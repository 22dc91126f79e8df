//! Rule-source configuration and per-root filter construction

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::filter::{ExcludePathFilter, Mode, PathFilter, RuleSet, RuleSetFilter};
use crate::gitignore::Matcher;
use crate::paths::{base_name, relative_slash_path};

/// Where a rule set's text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
    /// A rule file; relative paths are resolved by [`resolve_rule_path`].
    File(PathBuf),
    /// Rule text given directly, one pattern per line.
    Inline(String),
}

/// One rule set as configured on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSpec {
    pub mode: Mode,
    pub source: RuleSource,
}

impl RuleSpec {
    pub fn file(mode: Mode, path: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            source: RuleSource::File(path.into()),
        }
    }

    pub fn inline(mode: Mode, text: impl Into<String>) -> Self {
        Self {
            mode,
            source: RuleSource::Inline(text.into()),
        }
    }

    /// Compile this rule spec for the scan root `root`.
    pub fn load(&self, root: &Path) -> Result<RuleSet> {
        let (origin, loaded) = match &self.source {
            RuleSource::File(path) => {
                let resolved = resolve_rule_path(root, path);
                let loaded = Matcher::load_file(&resolved);
                (resolved.display().to_string(), loaded)
            }
            RuleSource::Inline(text) => {
                let origin = format!("inline {} pattern", self.mode);
                let loaded = Matcher::parse(text, &origin);
                (origin, loaded)
            }
        };

        let matcher = loaded.map_err(|e| Error::LoadRules {
            mode: self.mode,
            origin,
            source: Box::new(e),
        })?;
        Ok(RuleSet::new(self.mode, matcher))
    }
}

/// Resolve a rule file path for `root`.
///
/// Absolute paths are used as given. A relative path is taken from the
/// current directory when something exists there (or its existence cannot be
/// determined), otherwise it is resolved against the scan root.
pub fn resolve_rule_path(root: &Path, rule_path: &Path) -> PathBuf {
    if rule_path.as_os_str().is_empty() || rule_path.is_absolute() {
        return rule_path.to_path_buf();
    }

    if let Ok(cwd) = std::env::current_dir() {
        let candidate = cwd.join(rule_path);
        match candidate.metadata() {
            Ok(_) => return candidate,
            Err(e) if e.kind() != io::ErrorKind::NotFound => return candidate,
            Err(_) => {}
        }
    }

    root.join(rule_path)
}

/// Load every rule spec for `root`, in order. The first failure aborts.
pub fn load_rule_sets(root: &Path, specs: &[RuleSpec]) -> Result<Vec<RuleSet>> {
    specs
        .iter()
        .map(|spec| {
            let rule_set = spec.load(root)?;
            debug!(
                root = %root.display(),
                mode = %spec.mode,
                rules = rule_set.matcher.rules().len(),
                "loaded rule set"
            );
            Ok(rule_set)
        })
        .collect()
}

/// Baseline polarity: the mode of the first rule spec, or blacklist.
pub fn base_mode(specs: &[RuleSpec]) -> Mode {
    specs.first().map(|spec| spec.mode).unwrap_or_default()
}

/// Header label describing the configured modes, e.g. `blacklist -> whitelist`.
pub fn format_rule_modes(specs: &[RuleSpec]) -> String {
    specs
        .iter()
        .map(|spec| spec.mode.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Build the complete filter for one root: rule sets in order, baseline from
/// the first rule spec, and force-exclusion of `excluded` relative paths.
pub fn build_filter(
    root: &Path,
    specs: &[RuleSpec],
    excluded: Vec<String>,
) -> Result<Arc<dyn PathFilter>> {
    let rule_sets = load_rule_sets(root, specs)?;
    let filter = RuleSetFilter::build(rule_sets, base_mode(specs));
    Ok(Arc::from(ExcludePathFilter::wrap(filter, excluded)))
}

/// Display labels for scan roots.
///
/// A single root is labelled by its base name. Several roots are labelled by
/// their path relative to `cwd` when inside it, else by base name, and made
/// unique with numeric suffixes.
pub fn make_root_labels(roots: &[PathBuf], cwd: Option<&Path>) -> Vec<String> {
    if let [root] = roots {
        return vec![base_name(root)];
    }

    let labels: Vec<String> = roots
        .iter()
        .map(|root| {
            cwd.and_then(|cwd| relative_slash_path(cwd, root))
                .unwrap_or_else(|| base_name(root))
        })
        .collect();
    make_unique_labels(labels)
}

fn make_unique_labels(labels: Vec<String>) -> Vec<String> {
    let mut used = HashSet::new();
    labels
        .into_iter()
        .enumerate()
        .map(|(idx, label)| {
            let base = if label.is_empty() || label == "." || label == "/" {
                format!("root-{}", idx + 1)
            } else {
                label
            };
            let mut candidate = base.clone();
            let mut suffix = 2;
            while used.contains(&candidate) {
                candidate = format!("{base}-{suffix}");
                suffix += 1;
            }
            used.insert(candidate.clone());
            candidate
        })
        .collect()
}
