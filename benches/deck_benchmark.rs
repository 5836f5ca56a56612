//! Benchmarks for reveal-pdf deck building.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use reveal_pdf::model::{Destination, Operand, Outline, OutlineEntry, Page, PaintOp, Viewport};
use reveal_pdf::{
    DeckBuilder, DeckOptions, MemorySource, OutlineSectionPartitioner, PartitionOptions,
    VectorFragmentExtractor,
};

/// A page with a few filled rectangles and one line of text.
fn busy_page(number: u32) -> Page {
    let mut operations = Vec::new();
    for i in 0..20 {
        operations.extend([
            PaintOp::new("q", vec![]),
            PaintOp::new(
                "rg",
                vec![Operand::Real(0.1), Operand::Real(0.2), Operand::Real(0.3)],
            ),
            PaintOp::new(
                "re",
                vec![
                    Operand::Integer(10 + i * 5),
                    Operand::Integer(10 + i * 3),
                    Operand::Integer(100),
                    Operand::Integer(40),
                ],
            ),
            PaintOp::new("f", vec![]),
            PaintOp::new("Q", vec![]),
        ]);
    }
    Page::new(number, Viewport::new(720.0, 405.0)).with_operations(operations)
}

/// A synthetic deck with one outline entry every five pages.
fn create_test_source(page_count: u32) -> MemorySource {
    let mut outline = Outline::new();
    for start in (0..page_count).step_by(5) {
        outline.add_entry(OutlineEntry::new(
            format!("Part {}", start / 5 + 1),
            Destination::PageIndex(start),
        ));
    }

    let mut source = MemorySource::new(page_count)
        .with_viewport(Viewport::new(720.0, 405.0))
        .with_outline(outline);
    for number in 1..=page_count {
        source = source.with_page(busy_page(number));
    }
    source
}

fn create_test_markup(glyphs: usize) -> String {
    let mut markup = String::from(
        "<svg:svg xmlns:svg=\"http://www.w3.org/2000/svg\"><svg:defs><svg:style>",
    );
    markup.push_str("@font-face { font-family: f1; src: url(data:font/otf;base64,AAAA); }");
    markup.push_str("</svg:style></svg:defs>");
    for i in 0..glyphs {
        markup.push_str(&format!(
            "<svg:text x=\"{}\" y=\"20\">&#x41;&amp;</svg:text>",
            i
        ));
    }
    markup.push_str("</svg:svg>");
    markup
}

/// Benchmark outline partitioning.
fn bench_partition(c: &mut Criterion) {
    let source = create_test_source(200);
    let partitioner = OutlineSectionPartitioner::new(PartitionOptions::default());

    c.bench_function("partition_200_pages", |b| {
        b.iter(|| partitioner.partition(black_box(&source)).unwrap());
    });
}

/// Benchmark markup normalization.
fn bench_normalize(c: &mut Criterion) {
    let markup = create_test_markup(500);

    c.bench_function("normalize_500_glyphs", |b| {
        b.iter(|| reveal_pdf::extract::normalize(1, black_box(&markup)));
    });
}

/// Benchmark single-page extraction.
fn bench_extract_page(c: &mut Criterion) {
    let source = create_test_source(1);
    let extractor = VectorFragmentExtractor::default();

    c.bench_function("extract_page", |b| {
        b.iter(|| extractor.extract_page(black_box(&source), 1).unwrap());
    });
}

/// Benchmark full deck builds, sequential and parallel.
fn bench_deck_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("deck_build");

    for page_count in [10, 50].iter() {
        let source = create_test_source(*page_count);

        for parallel in [false, true] {
            let name = if parallel { "parallel" } else { "sequential" };
            let builder = DeckBuilder::new(DeckOptions::new().with_parallel(parallel));

            group.bench_function(format!("{}_pages_{}", page_count, name), |b| {
                b.iter(|| builder.build(black_box(&source)).unwrap());
            });
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_partition,
    bench_normalize,
    bench_extract_page,
    bench_deck_build,
);
criterion_main!(benches);
