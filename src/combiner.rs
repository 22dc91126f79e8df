//! Combined-file writer
//!
//! Collects the included files of every root, then writes one document:
//! a comment header, optional JSON trees, and one delimited block per file.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::filter::PathFilter;
use crate::tree;
use crate::walk::collect_files;

/// A directory to scan with its display label and filter.
#[derive(Clone)]
pub struct Root {
    pub path: PathBuf,
    pub label: String,
    pub filter: Arc<dyn PathFilter>,
}

impl Root {
    pub fn new(path: impl Into<PathBuf>, label: impl Into<String>, filter: Arc<dyn PathFilter>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            filter,
        }
    }
}

/// What to write besides the file blocks.
#[derive(Debug, Clone, Default)]
pub struct CombineOptions {
    pub include_tree: bool,
    pub include_tree_compact: bool,
    /// Shown as `# Mode:` in the header when non-empty.
    pub mode_label: String,
}

struct Entry {
    root: usize,
    rel: String,
    display: String,
}

/// Orchestrates collecting and writing combined files.
pub struct Combiner {
    clock: fn() -> DateTime<Utc>,
}

impl Default for Combiner {
    fn default() -> Self {
        Self { clock: Utc::now }
    }
}

impl Combiner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed time source, for reproducible output.
    pub fn with_clock(clock: fn() -> DateTime<Utc>) -> Self {
        Self { clock }
    }

    /// Write the combined document for `roots` to `out`. Returns the number
    /// of files written.
    pub fn combine<W: Write>(&self, roots: &[Root], options: &CombineOptions, out: W) -> Result<usize> {
        if roots.is_empty() {
            return Err(Error::Config("root path is required".to_string()));
        }

        let collected: Vec<Vec<String>> = roots
            .par_iter()
            .map(|root| collect_files(&root.path, Arc::clone(&root.filter)))
            .collect::<Result<_>>()?;

        let multi = roots.len() > 1;
        let mut entries: Vec<Entry> = collected
            .into_iter()
            .enumerate()
            .flat_map(|(idx, files)| {
                let label = &roots[idx].label;
                files.into_iter().map(move |rel| {
                    let display = if multi {
                        format!("{label}/{rel}")
                    } else {
                        rel.clone()
                    };
                    Entry {
                        root: idx,
                        rel,
                        display,
                    }
                })
            })
            .collect();
        entries.sort_by(|a, b| a.display.cmp(&b.display));
        debug!(files = entries.len(), roots = roots.len(), "collected files");

        let mut writer = BufWriter::new(out);
        self.write_header(&mut writer, roots, options, entries.len())?;

        if options.include_tree || options.include_tree_compact {
            let root_name = if multi { "roots" } else { roots[0].label.as_str() };
            let node = tree::build(root_name, entries.iter().map(|e| e.display.as_str()));

            if options.include_tree {
                writeln!(writer, "--- BEGIN FILE TREE (JSON) ---")?;
                serde_json::to_writer_pretty(&mut writer, &node)?;
                writeln!(writer, "\n--- END FILE TREE ---\n")?;
            }
            if options.include_tree_compact {
                writeln!(writer, "--- BEGIN FILE TREE (JSON, COMPACT) ---")?;
                serde_json::to_writer(&mut writer, &node)?;
                writeln!(writer, "\n--- END FILE TREE (JSON, COMPACT) ---\n")?;
            }
        }

        for entry in &entries {
            writeln!(writer, "--- BEGIN FILE: {} ---", entry.display)?;

            let full_path = roots[entry.root].path.join(&entry.rel);
            let data = fs::read(&full_path).map_err(|source| Error::ReadFile {
                display: entry.display.clone(),
                source,
            })?;
            writer.write_all(&data)?;
            if data.last() != Some(&b'\n') {
                writer.write_all(b"\n")?;
            }

            writeln!(writer, "--- END FILE: {} ---\n", entry.display)?;
        }

        writer.flush()?;
        info!(files = entries.len(), "wrote combined file");
        Ok(entries.len())
    }

    fn write_header<W: Write>(
        &self,
        writer: &mut W,
        roots: &[Root],
        options: &CombineOptions,
        count: usize,
    ) -> Result<()> {
        let timestamp = (self.clock)().to_rfc3339_opts(SecondsFormat::Secs, true);

        writeln!(writer, "# Weaver Combined File")?;
        if let [root] = roots {
            writeln!(writer, "# Root: {}", root.path.display())?;
        } else {
            writeln!(writer, "# Roots:")?;
            for root in roots {
                writeln!(writer, "# - {}", root.path.display())?;
            }
        }
        if !options.mode_label.is_empty() {
            writeln!(writer, "# Mode: {}", options.mode_label)?;
        }
        writeln!(writer, "# Files: {count}")?;
        writeln!(writer, "# Generated: {timestamp}\n")?;
        Ok(())
    }
}
