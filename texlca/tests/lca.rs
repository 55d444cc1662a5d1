use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use texlca::_internal_test_data::{BLAST_HITS_WITH_HEADER, HITS_10K};
use texlca::consensus::{ConsensusStrategy, DominanceThreshold};
use texlca::lca::{LcaParams, TaxonomicLca};
use texlca::progress::{ByteNum, ProgressNotifier};
use texlca::table::hits::HitTableParams;
use texlca::table::{ColumnIndex, TableFormat};

fn blast_params(strategy: ConsensusStrategy) -> LcaParams {
    LcaParams::builder()
        .table(
            HitTableParams::builder()
                .format(TableFormat::new(b',', true))
                .read_column(ColumnIndex::new(0))
                .tax_column(ColumnIndex::new(-1))
                .score_column(Some(ColumnIndex::new(2)))
                .build(),
        )
        .strategy(strategy)
        .build()
}

fn run(params: LcaParams, input: &str) -> String {
    let mut output = Vec::new();
    TaxonomicLca::with_params(params)
        .run(input.as_bytes(), &mut output)
        .unwrap();
    String::from_utf8(output).unwrap()
}

#[test_log::test]
fn test_blast_table_prefix_block() {
    let output = run(
        blast_params(ConsensusStrategy::default()),
        BLAST_HITS_WITH_HEADER,
    );

    assert_eq!(
        output,
        "qseqid,taxonomy\n\
         read_1,d__Bacteria;p__Firmicutes;c__Bacilli;o__Lactobacillales\n\
         read_2,d__Bacteria\n"
    );
}

#[test_log::test]
fn test_blast_table_plain_prefix() {
    let output = run(
        blast_params(ConsensusStrategy::PlainPrefix),
        BLAST_HITS_WITH_HEADER,
    );

    assert_eq!(
        output,
        "qseqid,taxonomy\n\
         read_1,d__Bacteria;p__Firmicutes;c__Bacilli;o__Lactobacillales\n\
         read_2,d__Bacteria;p__\n"
    );
}

#[test_log::test]
fn test_blast_table_substring() {
    let output = run(
        blast_params(ConsensusStrategy::Substring),
        BLAST_HITS_WITH_HEADER,
    );

    assert_eq!(
        output,
        "qseqid,taxonomy\n\
         read_1,d__Bacteria;p__Firmicutes;c__Bacilli;o__Lactobacillales\n\
         read_2,d__Bacteria;p__\n"
    );
}

#[test_log::test]
fn test_lower_threshold_never_shortens_consensus() {
    let thresholds = [1.0, 0.9, 0.7, 0.5, 0.3, 0.1];
    let outputs: Vec<_> = thresholds
        .iter()
        .map(|&threshold| {
            let params = LcaParams::builder()
                .strategy(ConsensusStrategy::PrefixBlock {
                    threshold: DominanceThreshold::new(threshold).unwrap(),
                })
                .build();
            run(params, &HITS_10K)
        })
        .collect();

    for pair in outputs.windows(2) {
        for (stricter, looser) in pair[0].lines().zip(pair[1].lines()) {
            let (read, stricter) = stricter.split_once('\t').unwrap();
            let (other_read, looser) = looser.split_once('\t').unwrap();
            assert_eq!(read, other_read);
            assert!(
                looser.starts_with(stricter),
                "`{}` is not an extension of `{}`",
                looser,
                stricter
            );
        }
    }
}

#[derive(Debug, Default)]
struct CountingNotifier {
    bytes: AtomicU64,
    group_num: AtomicU64,
    groups: AtomicU64,
}

impl ProgressNotifier for CountingNotifier {
    fn processed_bytes(&self, bytes: ByteNum) {
        self.bytes.fetch_add(bytes.get() as u64, Ordering::Relaxed);
    }

    fn set_group_num(&self, group_num: u64) {
        self.group_num.store(group_num, Ordering::Relaxed);
    }

    fn inc_group(&self) {
        self.groups.fetch_add(1, Ordering::Relaxed);
    }
}

#[test_log::test]
fn test_progress_is_reported_per_read() {
    let notifier = Arc::new(CountingNotifier::default());
    let params = LcaParams::builder()
        .progress_notifier(notifier.clone())
        .build();

    let mut output = Vec::new();
    let summary = TaxonomicLca::with_params(params)
        .run(HITS_10K.as_bytes(), &mut output)
        .unwrap();

    assert_eq!(summary.hits, 10_000);
    assert_eq!(summary.reads, 1000);
    assert_eq!(
        notifier.bytes.load(Ordering::Relaxed),
        HITS_10K.len() as u64
    );
    assert_eq!(notifier.group_num.load(Ordering::Relaxed), 1000);
    assert_eq!(notifier.groups.load(Ordering::Relaxed), 1000);
    assert_eq!(output.iter().filter(|&&byte| byte == b'\n').count(), 1000);
}
