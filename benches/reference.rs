// benches/reference.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};

use opcode_populate::config::options::CyclePolicy;
use opcode_populate::specs::reference;

fn load_sample() -> String {
    // The saved fixture is small; repeat it to get something page-sized.
    let one = include_str!("../tests/fixtures/reference.html");
    one.repeat(50)
}

fn bench_reference(c: &mut Criterion) {
    let doc = load_sample();

    c.bench_function("reference_table_rows", |b| {
        b.iter(|| {
            let rows = reference::table_rows(black_box(&doc));
            black_box(rows.len())
        })
    });

    c.bench_function("reference_parse", |b| {
        b.iter(|| {
            let (table, _) = reference::parse(black_box(&doc), CyclePolicy::FailFast)
                .expect("fixture parses");
            black_box(table.len())
        })
    });
}

criterion_group!(benches, bench_reference);
criterion_main!(benches);
