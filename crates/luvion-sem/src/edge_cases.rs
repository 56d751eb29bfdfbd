//! Edge cases for semantic preparation beyond the happy-path tests in
//! [`crate::prepare`].

use crate::prepare_module;
use luvion_par::symtab::{LOCAL_BASE, OFFSET_STEP};
use luvion_par::Parser;
use luvion_util::Handler;

fn prepare(src: &str) -> (crate::PreparedModule, Handler) {
    let handler = Handler::new();
    let mut parser = Parser::new(src, &handler);
    let module = parser.parse_module("edge.lv");
    let prepared = prepare_module(&module, &mut parser.symbols, &handler);
    (prepared, handler)
}

#[test]
fn function_with_no_locals_has_base_frame_size() {
    let (prepared, handler) = prepare("fn f(): void =>\n    return\n");
    assert!(!handler.has_errors());
    assert_eq!(prepared.functions[0].frame_size, LOCAL_BASE);
}

#[test]
fn three_way_sibling_branches_fold_to_the_deepest_peak() {
    let (prepared, handler) = prepare(
        "fn f(): void =>\n    if true =>\n        var a: int = 1\n    \
         var b: int = 2\n    if true =>\n        var c: int = 1\n        var d: int = 2\n        var e: int = 3\n    return\n",
    );
    assert!(!handler.has_errors());
    // a (1 slot) + b (1 slot) fold first, then the second if's three-deep
    // then-branch is folded on top of that running total.
    assert_eq!(prepared.functions[0].frame_size, LOCAL_BASE + 5 * OFFSET_STEP);
}

#[test]
fn undefined_identifier_in_a_nested_block_is_diagnosed() {
    let (_, handler) = prepare("fn f(): void =>\n    if true =>\n        return missing\n    return\n");
    assert!(handler.has_errors());
}

#[test]
fn call_with_exactly_six_register_arguments_is_not_diagnosed() {
    let src = "fn g(a:int,b:int,c:int,d:int,e:int,f:int): void =>\n    return\nfn f(): void =>\n    g(1,2,3,4,5,6)\n    return\n";
    let (_, handler) = prepare(src);
    assert!(!handler.has_errors());
}

#[test]
fn call_with_seven_register_arguments_is_diagnosed() {
    let src = "fn g(a:int,b:int,c:int,d:int,e:int,f:int,h:int): void =>\n    return\nfn f(): void =>\n    g(1,2,3,4,5,6,7)\n    return\n";
    let (_, handler) = prepare(src);
    assert!(handler.has_errors());
}

#[test]
fn for_loop_variable_does_not_leak_past_the_loop() {
    let (_, handler) =
        prepare("fn f(): void =>\n    for var i: int = 0; i < 10; i++ =>\n        var x: int = i\n    return i\n");
    assert!(handler.has_errors());
}

#[test]
fn wrong_argument_count_is_diagnosed() {
    let src = "fn g(a:int,b:int): void =>\n    return\nfn f(): void =>\n    g(1)\n    return\n";
    let (_, handler) = prepare(src);
    assert!(handler.has_errors());
}

#[test]
fn nil_is_compatible_with_any_declared_type() {
    let (_, handler) = prepare("fn f(): void =>\n    var s: str = nil\n    return\n");
    assert!(!handler.has_errors());
}

#[test]
fn mismatched_initializer_type_is_diagnosed() {
    let (_, handler) = prepare("fn f(): void =>\n    var s: str = true\n    return\n");
    assert!(handler.has_errors());
}

#[test]
fn array_index_must_be_numeric() {
    let (_, handler) = prepare("fn f(): void =>\n    var a: int = 0\n    var x: int = a[true]\n    return\n");
    assert!(handler.has_errors());
}
