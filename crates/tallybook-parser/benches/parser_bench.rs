//! Parser performance benchmarks.
//!
//! Run with: cargo bench -p tallybook-parser

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use tallybook_parser::parse;

/// Generate a synthetic ledger with N transactions.
fn generate_ledger(num_transactions: usize) -> String {
    let mut lines = Vec::new();

    lines.push("option \"title\" \"Synthetic Ledger\"".to_string());
    lines.push("2014-01-01 open Assets:Bank:Checking USD".to_string());
    lines.push("2014-01-01 open Expenses:Food USD".to_string());
    lines.push("2014-01-01 open Expenses:Coffee USD".to_string());
    lines.push("2014-01-01 open Expenses:Groceries USD".to_string());
    lines.push("2014-01-01 open Expenses:Transport USD".to_string());
    lines.push(String::new());

    let categories = ["Food", "Coffee", "Groceries", "Transport"];
    let payees = ["Store A", "Store B", "Cafe", "Gas Station", "Supermarket"];
    let mut day = 1;
    let mut month = 1;
    let mut year = 2014;

    for i in 0..num_transactions {
        let category = categories[i % categories.len()];
        let payee = payees[i % payees.len()];
        let amount = format!("{}.{:02}", 10 + (i % 90), i % 100);

        lines.push(format!(
            "{year:04}-{month:02}-{day:02} * \"{payee}\" | \"Transaction {i}\" #synthetic"
        ));
        lines.push(format!("  Expenses:{category}  {amount} USD"));
        lines.push(format!("  Assets:Bank:Checking  -{amount} USD"));
        lines.push(String::new());

        day += 1;
        if day > 28 {
            day = 1;
            month += 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
        }
    }

    lines.join("\n")
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for size in [10usize, 100, 1000] {
        let ledger = generate_ledger(size);
        group.throughput(Throughput::Bytes(ledger.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &ledger, |b, ledger| {
            b.iter(|| parse(black_box(ledger)));
        });
    }
    group.finish();
}

fn bench_parse_with_headings(c: &mut Criterion) {
    // Interleave org-mode headings and comments with directives, which
    // exercises the skipped-line paths of the lexer.
    let mut lines = Vec::new();
    for i in 0..200 {
        lines.push(format!("* Section {i}"));
        lines.push("; a comment line".to_string());
        lines.push(format!("2014-01-{:02} price USD 1.{:02} CAD", 1 + i % 28, i % 100));
    }
    let ledger = lines.join("\n");
    let bytes = ledger.len();

    let mut group = c.benchmark_group("parse_headings");
    group.throughput(Throughput::Bytes(bytes as u64));
    group.bench_function("200_sections", |b| {
        b.iter(|| parse(black_box(&ledger)));
    });
    group.finish();
}

criterion_group!(benches, bench_parse, bench_parse_with_headings);
criterion_main!(benches);
