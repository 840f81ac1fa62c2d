//! Worksheet rendering benchmarks
//!
//! Measures layout alone and the full layout, render and write path.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use genki_sheets::{DocumentBuilder, FallbackPolicy, FontLibrary, Worksheet};
use std::hint::black_box;
use std::sync::Arc;

fn bench_worksheets(c: &mut Criterion) {
    let sheets = Worksheet::all().expect("worksheets build");
    let fonts = Arc::new(FontLibrary::new().with_fallback(FallbackPolicy::Builtin));
    let dir = tempfile::tempdir().expect("temp dir");

    let mut group = c.benchmark_group("worksheet");
    for sheet in &sheets {
        group.bench_with_input(
            BenchmarkId::new("render", sheet.filename),
            sheet,
            |b, sheet| b.iter(|| black_box(sheet.generate(fonts.clone(), dir.path()).unwrap())),
        );
    }
    group.finish();
}

fn bench_layout_only(c: &mut Criterion) {
    let sheets = Worksheet::all().expect("worksheets build");
    let fonts = Arc::new(FontLibrary::new().with_fallback(FallbackPolicy::Builtin));

    c.bench_function("layout_all_worksheets", |b| {
        b.iter(|| {
            for sheet in &sheets {
                let renderer = genki_sheets::ContentRenderer::new(sheet.styles.clone(), fonts.clone())
                    .with_table_style(sheet.table_style.clone());
                let mut doc = DocumentBuilder::new(
                    sheet.filename,
                    sheet.page.clone(),
                    sheet.styles.clone(),
                    fonts.clone(),
                );
                renderer.append_items(&sheet.content, &mut doc).unwrap();
                black_box(doc.layout().unwrap());
            }
        })
    });
}

criterion_group!(benches, bench_worksheets, bench_layout_only);
criterion_main!(benches);
