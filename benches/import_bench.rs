//! Benchmarks for file import and validation
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use roster::import::batch_normalize;
use roster::{parse_text, validate_all};

fn create_csv(rows: usize) -> String {
    let mut text = String::from("First Name,Last Name,Email,Phone,Department,Position,Start Date\n");
    for i in 0..rows {
        let date = if i % 2 == 0 {
            "2024-01-15".to_string()
        } else {
            (45000 + i % 1000).to_string()
        };
        text.push_str(&format!(
            "First{i},Last{i},user{i}@company.com,(555) 123-{:04},Engineering,Engineer,{date}\n",
            i % 10000
        ));
    }
    text
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for size in [100, 1000, 10000] {
        let text = create_csv(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("csv_{}", size), |b| {
            b.iter(|| parse_text(black_box(&text)).unwrap())
        });
    }

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");

    for size in [100, 1000, 10000] {
        let records = parse_text(&create_csv(size)).unwrap().records;
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("validate_all_{}", size), |b| {
            b.iter(|| validate_all(black_box(&records)))
        });

        group.bench_function(format!("normalize_{}", size), |b| {
            b.iter(|| {
                let mut batch = records.clone();
                batch_normalize(black_box(&mut batch));
                batch
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_validate);
criterion_main!(benches);
