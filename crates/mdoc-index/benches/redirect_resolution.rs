//! Benchmarks for redirect table parsing and resolution.

use std::fmt::Write;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mdoc_index::{RedirectTable, SiteIndex};

/// Build an index page with `count` redirects, every tenth one chained.
fn index_page(count: usize) -> String {
    let mut md = String::from("# Redirects\n\n| Path | Location |\n| -- | -- |\n");
    for i in 0..count {
        if i % 10 == 0 && i > 0 {
            writeln!(md, "| /docs/old-{i} | /docs/old-{} |", i - 1).unwrap();
        } else {
            writeln!(md, "| /docs/old-{i} | /docs/page-{i} |").unwrap();
        }
    }
    md
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("redirect_parse");

    for count in [100, 1_000, 10_000] {
        let md = index_page(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &md, |b, md| {
            b.iter(|| SiteIndex::parse(md, 10).unwrap());
        });
    }

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let table = RedirectTable::parse(&index_page(1_000)).unwrap();
    let is_page = |path: &str| path.starts_with("/docs/page-");

    let mut group = c.benchmark_group("redirect_resolve");

    group.bench_function("page_miss", |b| {
        b.iter(|| table.resolve("/docs/page-5", is_page).unwrap());
    });

    group.bench_function("single_hop", |b| {
        b.iter(|| table.resolve("/docs/old-5", is_page).unwrap());
    });

    group.bench_function("chained", |b| {
        b.iter(|| table.resolve("/docs/old-990#section", is_page).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_resolve);
criterion_main!(benches);
