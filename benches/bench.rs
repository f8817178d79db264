//! Criterion benchmarks for skein query evaluation.
//!
//! Covers query parsing, window synchronization, ranked top-K retrieval
//! and batched execution over a synthetic memory index.

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use skein::prelude::*;
use skein::retrieval::BatchQuery;
use std::hint::black_box;

/// Generate test documents for benchmarking.
fn generate_test_documents(count: usize) -> Vec<String> {
    let words = vec![
        "search",
        "engine",
        "full",
        "text",
        "index",
        "query",
        "document",
        "field",
        "term",
        "phrase",
        "boolean",
        "window",
        "relevance",
        "score",
        "extent",
        "stemming",
        "posting",
        "structure",
        "retrieval",
        "ranking",
    ];

    let mut documents = Vec::with_capacity(count);
    for i in 0..count {
        let doc_length = 50 + (i % 100); // Variable length documents
        let mut doc_words = Vec::with_capacity(doc_length);

        for j in 0..doc_length {
            let word_idx = (i * 7 + j * 13) % words.len(); // Pseudo-random distribution
            doc_words.push(words[word_idx]);
        }

        documents.push(doc_words.join(" "));
    }

    documents
}

fn build_retrieval(count: usize) -> LocalRetrieval {
    let mut builder = MemoryIndex::builder();
    for (i, text) in generate_test_documents(count).iter().enumerate() {
        builder = builder
            .add_text(i as DocId + 1, text)
            .add_field(i as DocId + 1, "title", 0, 10);
    }
    LocalRetrieval::with_index(builder.build())
}

/// Benchmark query parsing.
fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    group.bench_function("parse_nested_query", |b| {
        b.iter(|| {
            let result = parse_query(black_box(
                "#combine:0=2:1=1(#od:1(search engine) #uw:8(query ranking) text.title)",
            ));
            black_box(result)
        })
    });

    group.finish();
}

/// Benchmark boolean window matching.
fn bench_windows(c: &mut Criterion) {
    let mut group = c.benchmark_group("windows");
    let retrieval = build_retrieval(1000);
    let parameters = Parameters::new();

    group.throughput(Throughput::Elements(1000));
    for query in ["#od:1(search engine)", "#uw:8(query ranking)", "phrase.title"] {
        let root = parse_query(query).unwrap();
        group.bench_function(query, |b| {
            b.iter(|| black_box(retrieval.run_boolean_query(black_box(&root), &parameters)))
        });
    }

    group.finish();
}

/// Benchmark ranked top-K retrieval with each scorer.
fn bench_ranked(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranked");
    group.sample_size(20);
    let retrieval = build_retrieval(1000);
    let root = parse_query("search engine #od:1(query document)").unwrap();

    for scorer in ["dirichlet", "bm25", "jm"] {
        let parameters = Parameters::new()
            .with("scorer", scorer)
            .with("requestedDocuments", 10);
        group.bench_function(format!("top10_{scorer}"), |b| {
            b.iter(|| black_box(retrieval.run_ranked_query(black_box(&root), &parameters)))
        });
    }

    group.finish();
}

/// Benchmark parallel batch execution.
fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    group.sample_size(10);
    let retrieval = build_retrieval(1000);
    let queries: Vec<BatchQuery> = ["search", "ranking window", "#od:2(posting structure)"]
        .iter()
        .cycle()
        .take(32)
        .map(|text| BatchQuery {
            root: parse_query(text).unwrap(),
            parameters: Parameters::new().with("requestedDocuments", 10),
            mode: QueryMode::Ranked,
        })
        .collect();

    group.throughput(Throughput::Elements(queries.len() as u64));
    group.bench_function("parallel_batch", |b| {
        b.iter(|| black_box(retrieval.run_batch_queries(black_box(&queries))))
    });

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_windows, bench_ranked, bench_batch);
criterion_main!(benches);
