//! CLI entry point for weaver

use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use weaver::paths::{absolute_clean, relative_if_within};
use weaver::{
    CombineOptions, Combiner, Error, Mode, Result, Root, RuleSpec, build_filter, make_root_labels,
};

const EXAMPLES: &str = "\
Examples:
  weaver --root . --out combined.txt
  weaver --root . --include-tree --out -
  weaver --root ./api --root ./web --out -
  weaver --blacklist .gitignore --out -
  weaver --whitelist-pattern 'src/' --blacklist-pattern '*.snap'";

#[derive(Parser, Debug)]
#[command(name = "weaver")]
#[command(about = "Combine files from one or more directories into a single text file")]
#[command(long_about = "Combine files from one or more directories into a single text file.\n\n\
Filtering is configured by gitignore-style rule sets. Rule sets are evaluated in \
command-line order; later matches override earlier ones. Without rule sets, all \
files are included.")]
#[command(after_help = EXAMPLES)]
#[command(version)]
struct Args {
    /// Root directory to scan (repeatable, defaults to the current directory)
    #[arg(long = "root", value_name = "DIR")]
    roots: Vec<PathBuf>,

    /// Output file path ('-' for stdout, defaults to stdout)
    #[arg(short = 'o', long = "out", value_name = "PATH")]
    out: Option<String>,

    /// Include a JSON file tree of the included files
    #[arg(long = "include-tree")]
    include_tree: bool,

    /// Include a compact single-line JSON file tree
    #[arg(long = "include-tree-compact")]
    include_tree_compact: bool,

    /// Gitignore-style file whose matches are excluded (repeatable)
    #[arg(long = "blacklist", value_name = "FILE")]
    blacklist: Vec<String>,

    /// Gitignore-style file whose matches are included (repeatable)
    #[arg(long = "whitelist", value_name = "FILE")]
    whitelist: Vec<String>,

    /// Inline blacklist rules, one pattern per line (repeatable)
    #[arg(long = "blacklist-pattern", value_name = "PATTERN")]
    blacklist_pattern: Vec<String>,

    /// Inline whitelist rules, one pattern per line (repeatable)
    #[arg(long = "whitelist-pattern", value_name = "PATTERN")]
    whitelist_pattern: Vec<String>,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

/// Collect rule specs from all rule flags in the order they appeared in argv.
fn ordered_rule_specs(matches: &ArgMatches) -> Result<Vec<RuleSpec>> {
    let flags = [
        ("blacklist", Mode::Blacklist, false),
        ("whitelist", Mode::Whitelist, false),
        ("blacklist_pattern", Mode::Blacklist, true),
        ("whitelist_pattern", Mode::Whitelist, true),
    ];

    let mut indexed = Vec::new();
    for (id, mode, inline) in flags {
        let (Some(values), Some(indices)) = (matches.get_many::<String>(id), matches.indices_of(id))
        else {
            continue;
        };
        for (value, index) in values.zip(indices) {
            let value = value.trim();
            if value.is_empty() {
                let what = if inline { "pattern" } else { "path" };
                return Err(Error::Config(format!("{mode} rule {what} is required")));
            }
            let spec = if inline {
                RuleSpec::inline(mode, value)
            } else {
                RuleSpec::file(mode, value)
            };
            indexed.push((index, spec));
        }
    }

    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, spec)| spec).collect())
}

fn resolve_roots(roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let roots: Vec<PathBuf> = if roots.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        roots.to_vec()
    };

    roots
        .iter()
        .map(|root| {
            let abs = absolute_clean(root).map_err(|e| Error::InvalidRoot {
                path: root.clone(),
                reason: e.to_string(),
            })?;
            match abs.metadata() {
                Ok(meta) if meta.is_dir() => Ok(abs),
                Ok(_) => Err(Error::InvalidRoot {
                    path: abs,
                    reason: "not a directory".to_string(),
                }),
                Err(e) => Err(Error::InvalidRoot {
                    path: abs,
                    reason: e.to_string(),
                }),
            }
        })
        .collect()
}

/// Open the output sink. Returns the absolute output path for files so it
/// can be excluded from the scan.
fn prepare_output(out: Option<&str>) -> Result<(Box<dyn Write>, Option<PathBuf>)> {
    match out {
        None | Some("") | Some("-") => Ok((Box::new(io::stdout().lock()), None)),
        Some(path) => {
            let abs = absolute_clean(Path::new(path))?;
            let file = File::create(&abs).map_err(|source| Error::CreateOutput {
                path: abs.clone(),
                source,
            })?;
            Ok((Box::new(file), Some(abs)))
        }
    }
}

fn run(args: &Args, matches: &ArgMatches) -> Result<()> {
    let specs = ordered_rule_specs(matches)?;
    let root_paths = resolve_roots(&args.roots)?;
    let cwd = std::env::current_dir().ok();
    let labels = make_root_labels(&root_paths, cwd.as_deref());

    let (out, out_abs) = prepare_output(args.out.as_deref())?;

    let roots = root_paths
        .into_iter()
        .zip(labels)
        .map(|(path, label)| {
            let excluded: Vec<String> = out_abs
                .as_deref()
                .and_then(|out| relative_if_within(&path, out))
                .into_iter()
                .collect();
            if !excluded.is_empty() {
                debug!(root = %path.display(), excluded = ?excluded, "excluding output file");
            }
            let filter = build_filter(&path, &specs, excluded)?;
            Ok(Root::new(path, label, filter))
        })
        .collect::<Result<Vec<_>>>()?;

    let options = CombineOptions {
        include_tree: args.include_tree,
        include_tree_compact: args.include_tree_compact,
        mode_label: weaver::config::format_rule_modes(&specs),
    };

    Combiner::new().combine(&roots, &options, out)?;
    Ok(())
}

fn main() {
    let matches = Args::command().get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| {
        eprintln!("weaver: argument parsing error: {}", e);
        process::exit(1);
    });

    init_logging(args.verbose);

    if let Err(e) = run(&args, &matches) {
        eprintln!("weaver: {}", e);
        process::exit(1);
    }
}
