use criterion::{criterion_group, criterion_main, Criterion};
use texlca::_internal_test_data::{HITS_10K, LINEAGES_64};
use texlca::consensus::{
    dominant_common_prefix_block, longest_common_prefix, longest_common_substring,
    DominanceThreshold,
};
use texlca::lca::TaxonomicLca;

fn consensus_64(c: &mut Criterion) {
    c.bench_function("Common substring of 64 lineages", |b| {
        b.iter(|| longest_common_substring(LINEAGES_64.as_slice()))
    });
    c.bench_function("Common prefix of 64 lineages", |b| {
        b.iter(|| longest_common_prefix(LINEAGES_64.as_slice()))
    });
    c.bench_function("Dominant prefix block of 64 lineages", |b| {
        let threshold = DominanceThreshold::new(0.3).unwrap();
        b.iter(|| dominant_common_prefix_block(LINEAGES_64.as_slice(), ';', threshold))
    });
}

fn lca_10k_hits(c: &mut Criterion) {
    c.bench_function("Assign 10k hits", |b| {
        b.iter(|| {
            let mut output = Vec::new();
            let summary = TaxonomicLca::new()
                .run(HITS_10K.as_bytes(), &mut output)
                .unwrap();
            assert_eq!(summary.reads, 1000);
        })
    });
}

criterion_group!(benches, consensus_64, lca_10k_hits);
criterion_main!(benches);
