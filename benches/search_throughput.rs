//! Text extraction and search throughput benchmarks
//!
//! Measures per-page cost with varying line counts:
//! - extraction alone (content stream interpretation and line grouping)
//! - extraction plus a multi-term search
//!
//! Run benchmarks: `cargo bench --bench search_throughput`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use findtext::text::extract_page;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use std::hint::black_box;

/// One page of Helvetica text with `lines` lines.
fn page_with_lines(lines: usize) -> (Document, ObjectId) {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 10.into()]),
        Operation::new("TL", vec![12.into()]),
        Operation::new("Td", vec![36.into(), 760.into()]),
    ];
    for i in 0..lines {
        operations.push(Operation::new("T*", vec![]));
        let text = format!("Line {} mentions Alpha, then Beta, and once more Alpha near the end", i);
        operations.push(Operation::new("Tj", vec![Object::string_literal(text)]));
    }
    operations.push(Operation::new("ET", vec![]));
    let content = Content { operations }.encode().expect("encode content stream");
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Contents" => content_id,
        "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
    });
    doc.objects.insert(
        pages_id,
        dictionary! { "Type" => "Pages", "Count" => 1, "Kids" => vec![Object::Reference(page_id)] }.into(),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);
    (doc, page_id)
}

fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_page");
    for lines in [10usize, 60, 240] {
        let (doc, page_id) = page_with_lines(lines);
        group.throughput(Throughput::Elements(lines as u64));
        group.bench_with_input(BenchmarkId::from_parameter(lines), &lines, |b, _| {
            b.iter(|| extract_page(black_box(&doc), page_id).expect("extract"));
        });
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let terms = ["Alpha", "Beta", "near the end", "Missing"];
    let mut group = c.benchmark_group("extract_and_search");
    for lines in [10usize, 60, 240] {
        let (doc, page_id) = page_with_lines(lines);
        group.throughput(Throughput::Elements(lines as u64));
        group.bench_with_input(BenchmarkId::from_parameter(lines), &lines, |b, _| {
            b.iter(|| {
                let page = extract_page(black_box(&doc), page_id).expect("extract");
                terms.iter().map(|t| page.search(t).len()).sum::<usize>()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_extraction, bench_search);
criterion_main!(benches);
