//! Validator performance benchmarks.
//!
//! Measures full validation runs over synthetic claim sheets.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rulesheet::{Rule, RuleSet, Rulesheet, Scalar, Sheet, TypeMap};

const STATUSES: &[&str] = &["Paid", "Pending", "Void", "Closed"];
const REGIONS: &[&str] = &["North", "South", "East", "West", ""];

/// Generate a synthetic claims sheet with the given number of rows.
fn generate_claims(rows: usize) -> Sheet {
    let headers = ["Claim No", "Claim Type", "Status", "Amount", "Region", "Loss Date"]
        .iter()
        .map(|h| h.to_string())
        .collect();

    let data = (0..rows)
        .map(|row| {
            let amount = if row % 7 == 0 {
                Scalar::from("n/a")
            } else {
                Scalar::Number((row % 500) as f64 * 10.0)
            };
            vec![
                Scalar::from(format!("C{:06}", row)),
                Scalar::from(if row % 3 == 0 { "Home" } else { "Motor" }),
                Scalar::from(STATUSES[row % STATUSES.len()]),
                amount,
                Scalar::infer(REGIONS[row % REGIONS.len()], true),
                Scalar::Number(44_000.0 + (row % 1_000) as f64),
            ]
        })
        .collect();

    Sheet::new("Claims", headers, data)
}

fn type_map() -> TypeMap {
    TypeMap::new()
        .with("Claim No", "text")
        .with("Claim Type", "text")
        .with("Amount", "number")
        .with("Loss Date", "date")
}

fn rules() -> RuleSet {
    let rule = |no: &str, conditions: &[&str]| {
        Rule::new(
            no,
            format!("rule {}", no),
            conditions.iter().map(|c| c.to_string()).collect(),
        )
    };
    vec![
        rule("R1", &["Status == Paid|Closed", "Amount > 0"]),
        rule("R2", &["Claim Type == 'Motor'", "Region != ''", "Region == North|South|East|West"]),
        rule("R3", &["Loss Date > '2020-01-01'", "Amount < 10000"]),
    ]
    .into_iter()
    .collect()
}

/// Benchmark complete validation runs of various sizes.
fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");
    let rulesheet = Rulesheet::new();
    let type_map = type_map();
    let rules = rules();

    for rows in [100, 1_000, 10_000].iter() {
        let sheet = generate_claims(*rows);
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &sheet, |b, sheet| {
            b.iter(|| black_box(rulesheet.validate(sheet, &type_map, &rules)))
        });
    }

    group.finish();
}

/// Benchmark row normalization alone (header keys and serial dates).
fn bench_normalize(c: &mut Criterion) {
    let rulesheet = Rulesheet::new();
    let sheet = generate_claims(1_000);

    c.bench_function("normalize_rows_1000", |b| {
        b.iter(|| black_box(rulesheet.normalize_rows(&sheet)))
    });
}

criterion_group!(benches, bench_validate, bench_normalize);
criterion_main!(benches);
