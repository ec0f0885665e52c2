use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use foi_core::{lexer::Lexer, parse, parser::Parser, serialize};

// ============================================================================
// Test Data
// ============================================================================

const BEARING_PILES: &str = include_str!("../tests/ok/bearing_piles.foi");
const TENSION_PILES: &str = include_str!("../tests/ok/tension_piles.foi");

// A positions table with `rows` piles plus a matching list of loads
fn generate_positions(rows: usize) -> String {
    let mut foi = String::from("[INPUT DATA]\n[LOADS]\n");
    foi.push_str(&format!("{rows} = number of items\n"));
    for i in 0..rows {
        foi.push_str(&format!("{:>12.2} : Load {}\n", -(i as f64) - 100.0, i + 1));
    }
    foi.push_str("[END OF LOADS]\n[POSITIONS - BEARING PILES]\n[TABLE]\n[COLUMN INDICATION]\n");
    for column in ["index", "X", "Y", "PileHeadLevel", "Surcharge", "PileName"] {
        foi.push_str(column);
        foi.push('\n');
    }
    foi.push_str("[END OF COLUMN INDICATION]\n[DATA]\n");
    for i in 0..rows {
        foi.push_str(&format!(
            "{:>6} {:>10.3} {:>10.3} {:>10.3} {:>10.3} P{}\n",
            i + 1,
            i as f64 * 1.5,
            i as f64 * 0.5,
            -0.5,
            0.0,
            i + 1
        ));
    }
    foi.push_str("[END OF DATA]\n[END OF TABLE]\n[END OF POSITIONS - BEARING PILES]\n[END OF INPUT DATA]\n");
    foi
}

// ============================================================================
// Lexer Benchmarks
// ============================================================================

fn bench_lexer_fixtures(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_by_fixture");

    for (name, source) in [("bearing", BEARING_PILES), ("tension", TENSION_PILES)] {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, src| {
            b.iter(|| Lexer::new(black_box(src)).lex())
        });
    }

    group.finish();
}

// ============================================================================
// Parser Benchmarks
// ============================================================================

fn bench_parser_fixtures(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_by_fixture");

    for (name, source) in [("bearing", BEARING_PILES), ("tension", TENSION_PILES)] {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, src| {
            b.iter(|| Parser::new(black_box(src)).parse_document())
        });
    }

    group.finish();
}

fn bench_parser_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_row_scaling");

    for size in [10, 100, 1000, 10000] {
        let source = generate_positions(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, src| {
            b.iter(|| Parser::new(black_box(src)).parse_document())
        });
    }

    group.finish();
}

// ============================================================================
// Serializer Benchmarks
// ============================================================================

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize_by_fixture");

    for (name, source) in [("bearing", BEARING_PILES), ("tension", TENSION_PILES)] {
        let Ok(document) = parse(source) else {
            panic!("fixture {name} must parse");
        };
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &document, |b, doc| {
            b.iter(|| serialize(black_box(doc)))
        });
    }

    group.finish();
}

fn bench_round_trip_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_trip_row_scaling");

    for size in [10, 100, 1000] {
        let source = generate_positions(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, src| {
            b.iter(|| parse(black_box(src)).and_then(|doc| serialize(&doc)))
        });
    }

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(lexer_benches, bench_lexer_fixtures);

criterion_group!(parser_benches, bench_parser_fixtures, bench_parser_scaling);

criterion_group!(serializer_benches, bench_serialize, bench_round_trip_scaling);

criterion_main!(lexer_benches, parser_benches, serializer_benches);
