//! The driver's six canonical programs, each compiled to assembly and
//! checked for the instructions its behavior depends on. These stand in
//! for running a linked binary: without an assembler and runtime library
//! on hand, asserting on the emitted call sequence is the next best
//! confirmation that each construct lowers the way the ABI requires.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn compile(source: &str) -> String {
    let mut input = NamedTempFile::with_suffix(".lv").expect("create temp source file");
    input.write_all(source.as_bytes()).expect("write source");

    let out_dir = TempDir::new().expect("create temp output dir");
    let output = out_dir.path().join("out.s");

    Command::cargo_bin("luvion")
        .expect("binary should build")
        .arg(input.path())
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    std::fs::read_to_string(&output).expect("read generated assembly")
}

#[test]
fn scenario_one_arithmetic_and_print() {
    let asm = compile("fn main(): void =>\n    print(1 + 2)\n");
    assert!(asm.contains("call rt_add_long"));
    assert!(asm.contains("call rt_print_long"));
}

#[test]
fn scenario_two_string_concat_is_freed() {
    let asm = compile(
        "fn main(): void =>\n    var s: str = \"hello\"\n    print(s + \" world\")\n",
    );
    assert!(asm.contains("call rt_str_concat"));
    assert!(asm.contains("call free"));
    assert!(asm.contains("call rt_print_string"));
}

#[test]
fn scenario_three_while_loop_counts_to_three() {
    let asm = compile(
        "fn main(): void =>\n    var i: int = 0\n    while i < 3 =>\n        i = i + 1\n    print(i)\n",
    );
    assert!(asm.contains("call rt_lt_long"));
    assert!(asm.contains(".Lwhile_0:"));
}

#[test]
fn scenario_four_recursive_factorial() {
    let asm = compile(
        "fn factorial(n: int): int =>\n    if n <= 1 =>\n        return 1\n    return n * factorial(n - 1)\nfn main(): void =>\n    print(factorial(5))\n",
    );
    assert!(asm.contains("factorial:"));
    assert!(asm.contains("call factorial"));
    assert!(asm.contains("call rt_mul_long"));
}

#[test]
fn scenario_five_interpolated_string() {
    let asm = compile("fn main(): void =>\n    var x: int = 7\n    print($\"x is {x}\")\n");
    assert!(asm.contains("call rt_to_string_long"));
    assert!(asm.contains("str_0:"));
}

#[test]
fn scenario_six_for_loop_prints_each_index() {
    let asm = compile("fn main(): void =>\n    for var j: int = 0; j < 3; j++ =>\n        print(j)\n");
    assert!(asm.contains("call rt_post_inc_long"));
    assert!(asm.contains(".Lfor_0:"));
}
