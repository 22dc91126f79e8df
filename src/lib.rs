//! Weaver - combine a directory tree into one text file, filtered by
//! gitignore-style blacklist and whitelist rules

pub mod combiner;
pub mod config;
pub mod error;
pub mod filter;
pub mod gitignore;
pub mod paths;
pub mod tree;
pub mod walk;

pub use combiner::{CombineOptions, Combiner, Root};
pub use config::{RuleSource, RuleSpec, build_filter, make_root_labels};
pub use error::{Error, Result};
pub use filter::{
    Decision, ExcludePathFilter, GitignoreFilter, Mode, PathFilter, RuleSet, RuleSetFilter,
};
pub use gitignore::{Matcher, Rule};
pub use tree::TreeNode;
pub use walk::collect_files;
