//! CLI smoke tests: help text, missing-file handling, and the
//! `--emit-tokens`/`--emit-ast` debug flags.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn luvion_bin() -> Command {
    Command::cargo_bin("luvion").expect("binary should build")
}

fn write_source(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".lv").expect("create temp source file");
    file.write_all(contents.as_bytes()).expect("write source");
    file
}

#[test]
fn help_lists_usage() {
    luvion_bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn missing_file_is_reported_as_an_error() {
    luvion_bin()
        .arg("does-not-exist.lv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn emit_tokens_prints_a_token_stream() {
    let source = write_source("fn main(): void =>\n    print(1)\n");
    luvion_bin()
        .arg(source.path())
        .arg("--emit-tokens")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fn"));
}

#[test]
fn emit_ast_prints_the_parsed_module() {
    let source = write_source("fn main(): void =>\n    print(1)\n");
    luvion_bin()
        .arg(source.path())
        .arg("--emit-ast")
        .assert()
        .success()
        .stdout(predicate::str::contains("FnDecl"));
}

#[test]
fn syntax_error_fails_compilation() {
    let source = write_source("fn main(): void =>\n    var =\n");
    luvion_bin().arg(source.path()).assert().failure();
}
