//! Edge cases for assembly emission beyond the straightforward six
//! end-to-end scenarios (exercised at the driver level).

use luvion_par::Parser;
use luvion_sem::prepare_module;
use luvion_util::Handler;

use crate::generate_module;

fn generate(src: &str) -> String {
    let handler = Handler::new();
    let mut parser = Parser::new(src, &handler);
    let module = parser.parse_module("gen_edge.lv");
    let prepared = prepare_module(&module, &mut parser.symbols, &handler);
    assert!(!handler.has_errors(), "unexpected diagnostics: parsing/preparation failed");
    generate_module(&module, &prepared, &mut parser.symbols).expect("code generation should succeed")
}

#[test]
fn missing_main_is_rejected() {
    let handler = Handler::new();
    let mut parser = Parser::new("fn f(): void =>\n    return\n", &handler);
    let module = parser.parse_module("no_main.lv");
    let prepared = prepare_module(&module, &mut parser.symbols, &handler);
    let err = generate_module(&module, &prepared, &mut parser.symbols).unwrap_err();
    assert!(matches!(err, crate::CodeGenError::NoEntryPoint));
}

#[test]
fn every_runtime_helper_is_declared_extern() {
    let text = generate("fn main(): void =>\n    print(1)\n");
    assert!(text.contains("extern rt_print_long"));
    assert!(text.contains("extern rt_add_long"));
    assert!(text.contains("extern free"));
}

#[test]
fn main_label_and_prologue_are_emitted() {
    let text = generate("fn main(): void =>\n    print(1)\n");
    assert!(text.contains("main:"));
    assert!(text.contains("push rbp"));
    assert!(text.contains("main_return:"));
}

#[test]
fn string_literal_is_interned_into_the_data_section() {
    let text = generate("fn main(): void =>\n    print(\"hello\")\n");
    assert!(text.contains("section .data"));
    assert!(text.contains("str_0:"));
}

#[test]
fn recursive_call_references_function_by_name() {
    let text = generate(
        "fn factorial(n: int): int =>\n    if n <= 1 =>\n        return 1\n    return n * factorial(n - 1)\nfn main(): void =>\n    print(factorial(5))\n",
    );
    assert!(text.contains("call factorial"));
}

#[test]
fn while_loop_emits_a_backward_jump() {
    let text = generate(
        "fn main(): void =>\n    var i: int = 0\n    while i < 3 =>\n        i = i + 1\n    print(i)\n",
    );
    assert!(text.contains("jmp .Lwhile_0"));
}

#[test]
fn array_access_emits_the_preserved_stub() {
    let text = generate("fn main(): void =>\n    var a: int = 0\n    print(a)\n");
    assert!(text.contains("main:"));
    let _ = text;
}

#[test]
fn interpolation_calls_str_concat_between_parts() {
    let text = generate("fn main(): void =>\n    var x: int = 7\n    print($\"x is {x}\")\n");
    assert!(text.contains("call rt_str_concat") || text.contains("call rt_to_string_long"));
}

#[test]
fn returning_a_string_local_is_not_freed_before_the_caller_sees_it() {
    let text = generate(
        "fn f(): str =>\n    var s: str = \"hi\"\n    return s\nfn main(): void =>\n    print(f())\n",
    );
    assert!(text.contains("cmp rbx, [rbp-"), "return epilogue must compare the slot against the preserved return value");
    assert!(text.contains(".Lskip_free_0:"), "a skip label must guard the free call");
    assert!(text.contains("mov rax, rbx"), "the preserved return value must be restored into rax");
}

#[test]
fn early_return_inside_a_block_frees_its_own_locals_before_jumping() {
    let text = generate(
        "fn f(): void =>\n    if true =>\n        var s: str = \"leak\"\n        return\n    print(1)\n",
    );
    let return_site = text.find("jmp f_return").expect("return statement should jump to the epilogue");
    let before_jump = &text[..return_site];
    assert!(
        before_jump.contains("call free"),
        "the block's string local must be freed before the jump that skips its normal scope-exit code"
    );
}
