//! Compiler throughput on a representative catalog query.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use campdex_query::compile;

fn bench_compile(c: &mut Criterion) {
    let params = [
        ("tuition[gte]", "500"),
        ("tuition[lte]", "1000"),
        ("minimum_skill", "beginner"),
        ("careers[in]", "Web Development,Data Science"),
        ("sort", "-tuition,title"),
        ("page", "2"),
        ("limit", "5"),
        ("fields", "title,tuition,minimum_skill"),
    ];

    c.bench_function("compile_catalog_query", |b| {
        b.iter(|| compile(black_box(params)))
    });
}

criterion_group!(benches, bench_compile);
criterion_main!(benches);
