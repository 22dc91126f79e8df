//! Edge case tests for the weaver command line


use assert_cmd::Command;
use predicates::prelude::*;

use harness::{TestTree, file_blocks};

fn weaver(tree: &TestTree) -> Command {
    let mut cmd = Command::cargo_bin("weaver").unwrap();
    cmd.current_dir(tree.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_invalid_pattern_fails_with_line_number() {
    let tree = TestTree::new();
    tree.add_file("a.txt", "");
    tree.add_file("bad.ignore", "*.log\n\nsrc/[oops\n");

    weaver(&tree)
        .args(["--blacklist", "bad.ignore"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("weaver: load blacklist rules from"))
        .stderr(predicate::str::contains("line 3"));
}

#[test]
fn test_invalid_inline_pattern_names_inline_source() {
    let tree = TestTree::new();

    weaver(&tree)
        .args(["--whitelist-pattern", "[abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("inline whitelist pattern: line 1"));
}

#[test]
fn test_root_must_be_a_directory() {
    let tree = TestTree::new();
    tree.add_file("file.txt", "");

    weaver(&tree)
        .args(["--root", "file.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn test_missing_root_fails() {
    let tree = TestTree::new();

    weaver(&tree)
        .args(["--root", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("weaver: invalid root"));
}

#[test]
fn test_output_in_missing_directory_fails() {
    let tree = TestTree::new();
    tree.add_file("a.txt", "");

    weaver(&tree)
        .args(["--out", "missing/dir/combined.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("weaver: create output"));
}

#[test]
fn test_escaped_slash_pattern_is_rejected() {
    let tree = TestTree::new();

    weaver(&tree)
        .args(["--blacklist-pattern", "a\\/b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 1"))
        .stderr(predicate::str::contains("escaped slash"));
}

#[test]
fn test_blank_rule_flag_is_rejected() {
    let tree = TestTree::new();

    weaver(&tree)
        .args(["--whitelist", " "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("whitelist rule path is required"));
}

#[test]
fn test_unexpected_positional_argument() {
    let tree = TestTree::new();

    weaver(&tree).arg("stray").assert().failure();
}

#[test]
fn test_empty_root_writes_header_only() {
    let tree = TestTree::new();

    weaver(&tree)
        .assert()
        .success()
        .stdout(predicate::str::contains("# Files: 0\n"))
        .stdout(predicate::str::contains("--- BEGIN FILE:").not());
}

#[test]
fn test_file_without_trailing_newline_gets_one() {
    let tree = TestTree::new();
    tree.add_file("a.txt", "no newline");

    weaver(&tree)
        .assert()
        .success()
        .stdout(predicate::str::contains("no newline\n--- END FILE: a.txt ---\n\n"));
}

#[test]
fn test_whitelist_name_without_slash_does_not_include_contents() {
    let tree = TestTree::new();
    tree.add_file("docs/readme.md", "");

    let output = weaver(&tree)
        .args(["--whitelist-pattern", "docs"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(file_blocks(&stdout).is_empty(), "{}", stdout);
}

#[test]
fn test_globstar_pattern() {
    let tree = TestTree::new();
    tree.add_file("a/b", "");
    tree.add_file("a/x/y/b", "");
    tree.add_file("a/b2/c", "");
    tree.add_file("keep.txt", "");

    let output = weaver(&tree)
        .args(["--blacklist-pattern", "a/**/b"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(file_blocks(&stdout), vec!["a/b2/c", "keep.txt"]);
}

#[test]
fn test_escaped_negation_pattern() {
    let tree = TestTree::new();
    tree.add_file("!important.txt", "");
    tree.add_file("important.txt", "");

    let output = weaver(&tree)
        .args(["--blacklist-pattern", "\\!important.txt"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(file_blocks(&stdout), vec!["important.txt"]);
}

#[test]
fn test_verbose_logs_go_to_stderr() {
    let tree = TestTree::new();
    tree.add_file("a.txt", "A");

    weaver(&tree)
        .args(["-vv", "--blacklist-pattern", "*.log"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# Weaver Combined File"))
        .stderr(predicate::str::contains("loaded rule set"));
}
