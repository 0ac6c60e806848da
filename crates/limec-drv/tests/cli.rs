//! Black-box CLI tests: write a temporary `.lime` file, run the built
//! `limec` binary against it, and assert on exit code and stdout/stderr.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn lime_file(source: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".lime")
        .tempfile()
        .expect("create temp file");
    write!(file, "{source}").expect("write temp file");
    file
}

fn run_on(source: &str) -> assert_cmd::assert::Assert {
    let file = lime_file(source);
    Command::cargo_bin("limec")
        .expect("find limec binary")
        .arg(file.path())
        .assert()
}

#[test]
fn returns_forty_two_from_a_let_and_return() {
    run_on("fn main() -> int { let x: int = 40 + 2; return x; }")
        .success()
        .stdout(predicate::str::contains("42"));
}

#[test]
fn returns_forty_two_from_a_function_call() {
    run_on("fn add(a: int, b: int) -> int { return a + b; } fn main() -> int { return add(20, 22); }")
        .success()
        .stdout(predicate::str::contains("42"));
}

#[test]
fn returns_forty_five_from_a_for_loop_accumulator() {
    run_on(
        "fn main() -> int { let s: int = 0; for (let i: int = 0; i < 10; i = i + 1) { s = s + i; } return s; }",
    )
    .success()
    .stdout(predicate::str::contains("45"));
}

#[test]
fn returns_three_from_a_while_loop_with_break() {
    run_on(
        "fn main() -> int { let i: int = 0; while i < 5 { if i == 3 { break; } i = i + 1; } return i; }",
    )
    .success()
    .stdout(predicate::str::contains("3"));
}

#[test]
fn returns_seven_hundred_twenty_from_recursive_factorial() {
    run_on(
        "fn fact(n: int) -> int { if n < 2 { return 1; } return n * fact(n - 1); } fn main() -> int { return fact(6); }",
    )
    .success()
    .stdout(predicate::str::contains("720"));
}

#[test]
fn returns_fifty_six_from_post_increment() {
    run_on("fn main() -> int { let i: int = 5; let j: int = i++; return j * 10 + i; }")
        .success()
        .stdout(predicate::str::contains("56"));
}

#[test]
fn missing_source_file_exits_with_failure() {
    Command::cargo_bin("limec")
        .expect("find limec binary")
        .arg("does_not_exist.lime")
        .assert()
        .failure();
}

#[test]
fn assigning_to_an_undeclared_identifier_exits_with_failure() {
    run_on("fn main() -> int { y = 1; return 0; }")
        .failure()
        .stderr(predicate::str::contains("y"));
}

#[test]
fn two_decimal_points_is_a_parse_error() {
    run_on("fn main() -> int { let x: float = 1.2.3; return 0; }")
        .failure()
        .stderr(predicate::str::contains("parse error"));
}

#[test]
fn importing_a_missing_module_exits_with_failure() {
    run_on(r#"import "does_not_exist"; fn main() -> int { return 0; }"#)
        .failure()
        .stderr(predicate::str::contains("does_not_exist"));
}

#[test]
fn no_run_flag_skips_execution() {
    let file = lime_file("fn main() -> int { return 42; }");
    Command::cargo_bin("limec")
        .expect("find limec binary")
        .arg(file.path())
        .arg("--no-run")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}
