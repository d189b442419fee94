//! CLI integration tests for phasechain.
//!
//! Each test writes a Chain.toml into a temporary directory and runs the
//! binary against it.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the phasechain binary command.
fn phasechain() -> Command {
    let mut cmd = Command::cargo_bin("phasechain").unwrap();
    cmd.env_remove("PHASECHAIN_MANIFEST");
    cmd
}

/// Create a temporary directory holding `Chain.toml` with `content`.
fn project(content: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("Chain.toml"), content).unwrap();
    tmp
}

const PIPELINE: &str = r#"
[[phase]]
name = "parse"
before = ["emit"]

[[phase]]
name = "emit"

[[component]]
id = "parser"
provides = ["ast"]
before = ["emit"]
after = ["tokens"]

[[component]]
id = "lexer"
provides = ["tokens"]
before = ["parse"]

[[component]]
id = "codegen"
provides = ["object"]
after = ["emit", "ast"]

[[component]]
id = "report"
provides = ["report"]
after = ["*"]
"#;

const CYCLE: &str = r#"
[[component]]
id = "audit"
provides = ["audit"]
after = ["persist"]

[[component]]
id = "store"
provides = ["persist"]
after = ["audit"]
"#;

fn stdout_lines(dir: &Path, args: &[&str]) -> Vec<String> {
    let output = phasechain()
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(output.status.success(), "{:?}", output);
    String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

// ============================================================================
// phasechain order
// ============================================================================

#[test]
fn test_order_prints_chain() {
    let tmp = project(PIPELINE);

    let chain = stdout_lines(tmp.path(), &["order"]);
    assert_eq!(chain, vec!["lexer", "parser", "codegen", "report"]);
}

#[test]
fn test_order_json() {
    let tmp = project(PIPELINE);

    let output = phasechain()
        .args(["order", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let chain: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(chain, vec!["lexer", "parser", "codegen", "report"]);
}

#[test]
fn test_order_with_manifest_path() {
    let tmp = project(PIPELINE);
    let manifest = tmp.path().join("Chain.toml");
    let elsewhere = TempDir::new().unwrap();

    phasechain()
        .args(["order", "--manifest-path"])
        .arg(&manifest)
        .current_dir(elsewhere.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("lexer\n"));
}

#[test]
fn test_order_finds_manifest_in_parent() {
    let tmp = project(PIPELINE);
    let nested = tmp.path().join("a").join("b");
    fs::create_dir_all(&nested).unwrap();

    let chain = stdout_lines(&nested, &["order"]);
    assert_eq!(chain.len(), 4);
}

#[test]
fn test_order_fails_without_manifest() {
    let tmp = TempDir::new().unwrap();

    phasechain()
        .args(["order", "--no-color"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not find Chain.toml"));
}

#[test]
fn test_order_rejects_unknown_field() {
    let tmp = project(
        r#"
[[component]]
id = "lexer"
provides = ["tokens"]
requires = ["source"]
"#,
    );

    phasechain()
        .args(["order"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid manifest"));
}

#[test]
fn test_order_reports_conflicting_name() {
    let tmp = project(
        r#"
[[phase]]
name = "storage"

[[component]]
id = "db"
provides = ["storage"]
"#,
    );

    phasechain()
        .args(["order", "--no-color"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("conflicting use of name `storage`"))
        .stderr(predicate::str::contains("component `db` uses it as a capability"));
}

#[test]
fn test_order_reports_missing_provides() {
    let tmp = project(
        r#"
[[component]]
id = "orphan"
"#,
    );

    phasechain()
        .args(["order", "--no-color"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("`orphan` provides nothing"));
}

#[test]
fn test_order_warns_about_unbound_name() {
    let tmp = project(
        r#"
[[component]]
id = "a"
provides = ["a"]
before = ["nowhere"]

[[component]]
id = "b"
provides = ["b"]
after = ["nowhere"]
"#,
    );

    phasechain()
        .args(["order", "--no-color"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout("a\nb\n")
        .stderr(predicate::str::contains(
            "warning: `nowhere` is referenced but never declared or provided",
        ));
}

#[test]
fn test_order_bound_names_do_not_warn() {
    let tmp = project(PIPELINE);

    phasechain()
        .args(["order", "--no-color"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("warning:").not());
}

// ============================================================================
// cycles
// ============================================================================

#[test]
fn test_order_reports_cycle() {
    let tmp = project(CYCLE);

    phasechain()
        .args(["order", "--no-color"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("ordering constraints form a cycle"))
        .stderr(predicate::str::contains("cycle: audit -> store -> audit"))
        .stderr(predicate::str::contains("could not be placed: audit, store"));
}

#[test]
fn test_order_writes_dot_on_cycle() {
    let tmp = project(CYCLE);
    let dot_path = tmp.path().join("cycle.dot");

    phasechain()
        .args(["order", "--dot-on-cycle", "cycle.dot"])
        .current_dir(tmp.path())
        .assert()
        .failure();

    let dot = fs::read_to_string(dot_path).unwrap();
    assert!(dot.starts_with("digraph {"));
    assert!(dot.contains("\"audit\""));
    assert!(dot.contains("\"store\""));
    assert!(dot.contains("style = dashed"));
    assert!(!dot.contains("phase:*"));
}

#[test]
fn test_dot_on_cycle_untouched_on_success() {
    let tmp = project(PIPELINE);

    phasechain()
        .args(["order", "--dot-on-cycle", "cycle.dot"])
        .current_dir(tmp.path())
        .assert()
        .success();

    assert!(!tmp.path().join("cycle.dot").exists());
}

// ============================================================================
// phasechain graph
// ============================================================================

#[test]
fn test_graph_prints_dot() {
    let tmp = project(PIPELINE);

    phasechain()
        .args(["graph"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph {"))
        .stdout(predicate::str::contains("\"phase:parse\""))
        .stdout(predicate::str::contains("\"cap:ast\""))
        .stdout(predicate::str::contains("shape = hexagon"));
}

#[test]
fn test_graph_renders_cyclic_manifest() {
    let tmp = project(CYCLE);

    phasechain()
        .args(["graph"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"store\""));
}

// ============================================================================
// phasechain completions
// ============================================================================

#[test]
fn test_completions_bash() {
    phasechain()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("phasechain"));
}
