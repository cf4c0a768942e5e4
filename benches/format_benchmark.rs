//! Benchmarks for docxstyle formatting performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks build synthetic documents in memory and time the
//! table and text operations on them.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use docxstyle::style::{
    apply_alternating_row_shading, apply_table_borders, format_text_range, highlight_header_row,
};
use docxstyle::{
    BorderSpec, BorderStyle, ColorInput, Document, FormatOptions, RowColorPolicy, RunFormat,
    SplitMode,
};

/// Creates a document holding one filled `rows` x `cols` table.
fn create_table_doc(rows: usize, cols: usize) -> Document {
    let mut doc = Document::new();
    {
        let mut table = doc.add_table(rows, cols);
        for r in 0..rows {
            for c in 0..cols {
                if let Some(mut cell) = table.cell(r, c) {
                    cell.set_text(&format!("Row {} column {}", r, c));
                }
            }
        }
    }
    doc
}

/// Creates a document holding one paragraph split into `runs` runs.
fn create_paragraph_doc(runs: usize) -> Document {
    let mut doc = Document::new();
    {
        let mut p = doc.add_paragraph("");
        for i in 0..runs {
            p.add_run(&format!("Segment {} of benchmark text. ", i));
        }
    }
    doc
}

/// Benchmark package serialization and reading.
fn bench_open_save(c: &mut Criterion) {
    let bytes = create_table_doc(50, 6).to_bytes().unwrap();

    c.bench_function("open_bytes", |b| {
        b.iter(|| docxstyle::open_bytes(black_box(&bytes)).unwrap());
    });

    let doc = create_table_doc(50, 6);
    c.bench_function("to_bytes", |b| {
        b.iter(|| black_box(&doc).to_bytes().unwrap());
    });
}

/// Benchmark table-wide operations at various sizes.
fn bench_table_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_ops");
    let options = FormatOptions::default();
    let borders = BorderSpec::new(BorderStyle::Single);
    let policy = RowColorPolicy::default();
    let header = ColorInput::from("4472C4");

    for rows in [10, 100, 500].iter() {
        let mut doc = create_table_doc(*rows, 8);

        group.bench_function(format!("borders_{}_rows", rows), |b| {
            b.iter(|| {
                let mut table = doc.table(0).unwrap();
                apply_table_borders(&mut table, black_box(&borders), &options).unwrap()
            });
        });

        group.bench_function(format!("alternating_{}_rows", rows), |b| {
            b.iter(|| {
                let mut table = doc.table(0).unwrap();
                apply_alternating_row_shading(&mut table, black_box(&policy), &options).unwrap()
            });
        });

        group.bench_function(format!("header_{}_rows", rows), |b| {
            b.iter(|| {
                let mut table = doc.table(0).unwrap();
                highlight_header_row(&mut table, black_box(&header), "FFFFFF", &options).unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark run splitting in both modes.
fn bench_text_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_range");
    let format = RunFormat::new().bold(true).font_size(12.0);
    let template = create_paragraph_doc(200);

    for mode in [SplitMode::Preserve, SplitMode::Flatten] {
        group.bench_function(format!("{:?}", mode).to_lowercase(), |b| {
            b.iter(|| {
                let mut doc = template.clone();
                let mut p = doc.paragraph(0).unwrap();
                format_text_range(&mut p, black_box(45), black_box(4005), &format, mode).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_open_save, bench_table_ops, bench_text_range);
criterion_main!(benches);
