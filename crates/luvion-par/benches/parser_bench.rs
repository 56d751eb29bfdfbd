//! Parser benchmarks.
//!
//! Run with `cargo bench --package luvion-par`.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use luvion_par::{Module, Parser};
use luvion_util::Handler;

fn parse_source(source: &str) -> Module {
    let handler = Handler::new();
    let mut parser = Parser::new(source, &handler);
    parser.parse_module("bench.lv")
}

fn bench_parser_var_decl(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_var_decl");

    let source = "var x: int = 42\n";
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("var_decl", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_functions(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_functions");

    let source = "fn main(): void =>\n    var x: int = 42\n    var y: int = x + 1\n    return y\n\nfn fib(n: int): int =>\n    if n <= 1 =>\n        return n\n    return fib(n - 1) + fib(n - 2)\n";
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("functions", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_control_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_control_flow");

    let source = "fn process(n: int): int =>\n    if n < 0 =>\n        return -1\n    else =>\n        var sum: int = 0\n        var i: int = 0\n        while i < n =>\n            sum = sum + i\n            i = i + 1\n        return sum\n";
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("control_flow", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_interpolation(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_interpolation");

    let source = r#"fn main(): void =>
    var x: int = 7
    print($"x is {x} and double is {x * 2}")
"#;
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("interpolated_string", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_complex");

    let source = r#"
fn factorial(n: int): int =>
    if n <= 1 =>
        return 1
    return n * factorial(n - 1)

fn sum_array(values: [int]): int =>
    var total: int = 0
    for var i: int = 0; i < 3; i++ =>
        total = total + values[i]
    return total

fn main(): void =>
    print(factorial(5))
    for var j: int = 0; j < 3; j++ =>
        print(j)
"#;
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("complex_source", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

criterion_group!(
    benches,
    bench_parser_var_decl,
    bench_parser_functions,
    bench_parser_control_flow,
    bench_parser_interpolation,
    bench_parser_complex
);
criterion_main!(benches);
