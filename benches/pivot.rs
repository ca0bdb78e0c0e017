//! Population and query throughput for the pivot fact tree.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pivot_facts::{InPivot, Record, Value};

fn records(count: usize) -> Vec<Record> {
    let types = ["good", "ok", "bad"];
    let dates = ["2015-05-10", "2015-05-11", "2015-05-12", "2015-05-13"];
    (0..count)
        .map(|i| {
            Record::new()
                .with("type", types[i % types.len()])
                .with("status", 200 + (i % 5) as i64 * 100)
                .with("date", dates[i % dates.len()])
                .with("bytes", (i % 4096) as i64)
                .with("occurrences", (i % 17) as i64)
        })
        .collect()
}

fn bench_add(c: &mut Criterion) {
    let rows = records(10_000);
    let creation = InPivot::new()
        .grouping_by("type")
        .grouping_by("status")
        .spreading_on("date")
        .summing("occurrences")
        .summing("bytes");

    c.bench_function("add 10k records, two levels, spread", |b| {
        b.iter(|| {
            let mut pivot = creation.create().unwrap();
            for row in &rows {
                pivot.add(black_box(row)).unwrap();
            }
            black_box(pivot.count(&[]).unwrap())
        })
    });
}

fn bench_queries(c: &mut Criterion) {
    let rows = records(10_000);
    let creation = InPivot::new()
        .grouping_by("type")
        .grouping_by("status")
        .summing("occurrences");
    let mut pivot = creation.create().unwrap();
    for row in &rows {
        pivot.add(row).unwrap();
    }

    let path = [Value::from("bad"), Value::from(400)];
    c.bench_function("sum at depth two", |b| {
        b.iter(|| black_box(pivot.sum(black_box(&path)).unwrap()))
    });
}

criterion_group!(benches, bench_add, bench_queries);
criterion_main!(benches);
