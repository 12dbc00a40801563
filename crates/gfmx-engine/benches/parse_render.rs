//! Benchmarks for parsing and rendering with extensions enabled.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use gfmx_engine::{HtmlBackend, MarkdownRenderer, Parser, Registry, global_registry};

/// Generate a document mixing task lists, mentions and plain prose.
fn generate_markdown(sections: usize, items_per_section: usize) -> String {
    let mut md = String::with_capacity(sections * (60 + items_per_section * 80));
    md.push_str("# Release checklist\n\n");

    for i in 0..sections {
        md.push_str(&format!("## Milestone {i}\n\n"));
        md.push_str("Owners: @alice, @bob-ops and @carol_1. Contact me@example.com.\n\n");
        for j in 0..items_per_section {
            let mark = if j % 2 == 0 { 'x' } else { ' ' };
            md.push_str(&format!("- [{mark}] task {j} for **milestone {i}**, ping @dev{j}\n"));
        }
        md.push('\n');
    }
    md
}

fn bench_parse(c: &mut Criterion) {
    let registry = global_registry();
    let empty = Registry::new();
    let markdown = generate_markdown(20, 10);

    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Bytes(markdown.len() as u64));
    group.bench_function("with_extensions", |b| {
        b.iter(|| Parser::new(registry).parse(&markdown));
    });
    group.bench_function("without_extensions", |b| {
        b.iter(|| Parser::new(&empty).parse(&markdown));
    });
    group.finish();
}

fn bench_render_varying_sizes(c: &mut Criterion) {
    let registry = global_registry();
    let renderer = MarkdownRenderer::<HtmlBackend>::new(registry)
        .with_mention_url_template("https://github.com/{handle}");

    let mut group = c.benchmark_group("render_by_size");

    for (sections, items) in [(5, 4), (20, 10), (50, 20)] {
        let markdown = generate_markdown(sections, items);
        let document = Parser::new(registry).parse(&markdown);

        group.throughput(Throughput::Bytes(markdown.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("html", format!("{sections}s_{items}i")),
            &document,
            |b, document| b.iter(|| renderer.render(document)),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_render_varying_sizes);
criterion_main!(benches);
