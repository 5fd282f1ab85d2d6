use criterion::{criterion_group, criterion_main, Criterion};
use irtables::InvertedIndex;

fn build(docs: u32) -> InvertedIndex {
    let mut index = InvertedIndex::new();
    for doc in 0..docs {
        for t in 0..50u32 {
            index.insert_occurrence(&format!("term{}", (doc * 7 + t) % 997), doc);
        }
    }
    index
}

fn bench_index(c: &mut Criterion) {
    c.bench_function("insert_1k_docs", |b| b.iter(|| build(1_000)));
    let index = build(1_000);
    c.bench_function("idf_lookup", |b| b.iter(|| index.idf("term42")));
}

criterion_group!(benches, bench_index);
criterion_main!(benches);
