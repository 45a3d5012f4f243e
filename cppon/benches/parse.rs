//! Benchmarks for parsing across modes and scan widths.
//!
//! Run with: cargo bench -p cppon -- parse

use cppon::{Document, ParseMode, ScanWidth, scan};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

// =============================================================================
// Test Data Generation
// =============================================================================

/// Small document: one flat object (~50 bytes).
fn small_doc() -> &'static [u8] {
    br#"{"name":"Alice","age":30,"active":true}"#
}

/// Medium document: nesting, references, typed numbers (~500 bytes).
fn medium_doc() -> Vec<u8> {
    let mut text = String::from(r#"{"user":{"id":"550e8400-e29b-41d4-a716-446655440000","#);
    text.push_str(r#""name":"Alice Johnson","scores":[1.5,2.25,3e2,42i16],"#);
    text.push_str(r#""icon":"$cppon-blob:SGVsbG8sIFdvcmxkIQ=="},"#);
    text.push_str(r#""posts":[{"id":1,"title":"Hello World","published":true},"#);
    text.push_str(r#"{"id":2,"title":"Second Post","published":false}],"#);
    text.push_str(r#""pinned":"$cppon-path:/posts/0","meta":{"version":1}}"#);
    text.into_bytes()
}

/// Large document: an array of 500 objects (~30KB).
fn large_doc() -> Vec<u8> {
    let mut text = String::from("[");
    for i in 0..500 {
        if i > 0 {
            text.push(',');
        }
        text.push_str(&format!(
            r#"{{"id":{i},"name":"User {i} with a longer name","email":"user{i}@example.com","active":{}}}"#,
            i % 2 == 0
        ));
    }
    text.push(']');
    text.into_bytes()
}

// =============================================================================
// Parse Mode Benchmarks
// =============================================================================

fn bench_parse_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_modes");
    let large = large_doc();
    group.throughput(Throughput::Bytes(large.len() as u64));
    for (label, mode) in [
        ("validate", ParseMode::Parse),
        ("quick", ParseMode::Quick),
        ("eval", ParseMode::Eval),
        ("full", ParseMode::Full),
    ] {
        group.bench_with_input(BenchmarkId::new("mode", label), &large, |b, data| {
            b.iter(|| Document::parse(black_box(data.as_slice()), mode));
        });
    }
    group.finish();
}

fn bench_parse_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_sizes");

    let small = small_doc();
    group.throughput(Throughput::Bytes(small.len() as u64));
    group.bench_with_input(BenchmarkId::new("size", "small_50B"), &small, |b, data| {
        b.iter(|| Document::parse(black_box(*data), ParseMode::Quick));
    });

    let medium = medium_doc();
    group.throughput(Throughput::Bytes(medium.len() as u64));
    group.bench_with_input(BenchmarkId::new("size", "medium_500B"), &medium, |b, data| {
        b.iter(|| Document::parse(black_box(data.as_slice()), ParseMode::Quick));
    });

    let large = large_doc();
    group.throughput(Throughput::Bytes(large.len() as u64));
    group.bench_with_input(BenchmarkId::new("size", "large_30KB"), &large, |b, data| {
        b.iter(|| Document::parse(black_box(data.as_slice()), ParseMode::Quick));
    });

    group.finish();
}

// =============================================================================
// Scan Width Benchmarks
// =============================================================================

fn bench_scan_widths(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_widths");
    let large = large_doc();
    group.throughput(Throughput::Bytes(large.len() as u64));
    for width in [
        ScanWidth::Scalar,
        ScanWidth::Bytes16,
        ScanWidth::Bytes32,
        ScanWidth::Bytes64,
    ] {
        if width > scan::max_supported() {
            continue;
        }
        scan::set_thread_override(Some(width));
        group.bench_with_input(
            BenchmarkId::new("width", format!("{width:?}")),
            &large,
            |b, data| {
                b.iter(|| Document::parse(black_box(data.as_slice()), ParseMode::Quick));
            },
        );
    }
    scan::set_thread_override(None);
    group.finish();
}

// =============================================================================
// Navigation Benchmarks
// =============================================================================

fn bench_navigation(c: &mut Criterion) {
    let mut group = c.benchmark_group("navigation");
    let medium = medium_doc();
    let doc = Document::parse(&medium, ParseMode::Eval).unwrap();
    group.bench_function("path_read", |b| {
        b.iter(|| doc.get(black_box("/posts/1/title")));
    });
    group.bench_function("typed_read", |b| {
        b.iter(|| doc.get_strict::<i64>(black_box("/meta/version")));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_parse_modes,
    bench_parse_sizes,
    bench_scan_widths,
    bench_navigation
);
criterion_main!(benches);
