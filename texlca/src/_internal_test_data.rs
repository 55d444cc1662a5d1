use itertools::Itertools;
use lazy_static::lazy_static;

/// Two reads: `r2` with a single hit, `r1` with two hits diverging at the
/// class rank.
pub const FIRMICUTES_HITS: &str = "r2\tArchaea;Euryarchaeota;Methanobacteria
r1\tBacteria;Firmicutes;Bacilli
r1\tBacteria;Firmicutes;Clostridia
";

/// A read with two best hits tied on score and one worse hit.
pub const SCORED_HITS: &str = "r3\tX;Y\t10
r3\tX;Z\t10
r3\tX;W\t5
";

/// BLAST-like table with a header, the lineage in the last column.
pub const BLAST_HITS_WITH_HEADER: &str = "qseqid,sseqid,pident,taxonomy
read_1,ref_1,99.0,d__Bacteria;p__Firmicutes;c__Bacilli;o__Lactobacillales;
read_1,ref_2,99.0,d__Bacteria;p__Firmicutes;c__Bacilli;o__Lactobacillales;
read_1,ref_3,97.5,d__Bacteria;p__Firmicutes;c__Bacilli;o__Bacillales;
read_2,ref_4,88.1,d__Bacteria;p__Proteobacteria;c__Gammaproteobacteria;
read_2,ref_5,88.1,d__Bacteria;p__Bacteroidota;c__Bacteroidia;
";

pub const CONTIGS_FASTA: &str = ">k141_1 flag=1 multi=3.0 len=24
ATGAAACGCATT
AGCACCACCATT

>k141_2 flag=0 multi=1.0 len=12
GGGCCCAAATTT
";

pub const RGI_TABLE: &str = "ORF_ID\tContig\tStart\tStop\tCARD_Protein_Sequence
k141_1_1 # 1\tk141_1_1\t1\t9\tMKR
k141_1_2 # 10\tk141_1_2\t10\t15\tNA
k141_2_3 # 4\tk141_2_3\t4\t12\tPKF
";

const DOMAINS: [&str; 3] = ["Bacteria", "Archaea", "Eukaryota"];
const RANKS: [&str; 7] = [
    "domain", "phylum", "class", "order", "family", "genus", "species",
];

fn synthetic_lineage(seed: usize) -> String {
    std::iter::once(DOMAINS[seed % DOMAINS.len()].to_owned())
        .chain(
            RANKS
                .iter()
                .enumerate()
                .skip(1)
                .map(|(depth, rank)| format!("{}_{}", rank, (seed >> depth) % (depth + 1))),
        )
        .join(";")
}

lazy_static! {
    /// 64 deterministic 7-rank lineages sharing most of their upper ranks.
    pub static ref LINEAGES_64: Vec<String> = (0..64).map(|i| synthetic_lineage(i * 3)).collect();

    /// A hit table of 1000 reads with 10 hits each.
    pub static ref HITS_10K: String = (0..10_000)
        .map(|i| format!("read_{}\t{}\n", i / 10, synthetic_lineage(i % 10 + (i / 10) % 7)))
        .collect();
}
