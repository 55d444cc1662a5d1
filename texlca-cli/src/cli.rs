use std::path::PathBuf;

use clap::{ArgEnum, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use texlca::consensus::{ConsensusStrategy, DominanceThreshold};
use texlca::table::ColumnIndex;

use crate::opts::{directory, input_file, input_stream, Directory, InputFile, InputStream};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
pub struct Cli {
    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,

    /// Don't display a progress bar/spinner
    #[clap(long, global = true, value_parser)]
    pub no_progress: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

/// Strategy used to reduce the candidate lineages of a read to one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ArgEnum)]
pub enum ConsensusMode {
    /// Dominant common prefix block, voting rank by rank
    PrefixBlock,
    /// Longest common substring
    Substring,
    /// Longest common character prefix
    PlainPrefix,
}

impl ConsensusMode {
    pub fn strategy(self, percent: f64) -> Result<ConsensusStrategy, anyhow::Error> {
        let strategy = match self {
            ConsensusMode::PrefixBlock => ConsensusStrategy::PrefixBlock {
                threshold: DominanceThreshold::new(percent)?,
            },
            ConsensusMode::Substring => ConsensusStrategy::Substring,
            ConsensusMode::PlainPrefix => ConsensusStrategy::PlainPrefix,
        };

        Ok(strategy)
    }
}

pub fn separator(value: &str) -> Result<u8, String> {
    match value.as_bytes() {
        b"\\t" | b"\t" => Ok(b'\t'),
        &[byte] if byte.is_ascii() => Ok(byte),
        _ => Err(format!(
            "separator must be a single ASCII character, got `{}`",
            value
        )),
    }
}

pub fn column_index(value: &str) -> Result<ColumnIndex, String> {
    value
        .parse()
        .map_err(|_| format!("`{}` is not a column index", value))
}

#[derive(Subcommand)]
pub enum Commands {
    /// Assign each read the consensus lineage of its hits
    Lca {
        /// Input hit table; `-` is the standard input
        #[clap(short, long, default_value_t, value_parser = input_stream)]
        input: InputStream,

        /// Output table path; `-` is the standard output
        #[clap(short, long, default_value = "-", value_parser)]
        output: PathBuf,

        /// Field separator of the input and output tables
        #[clap(short, long, default_value = "\\t", value_parser = separator)]
        sep: u8,

        /// The first row of the input table is a header
        #[clap(short = 'a', long, value_parser)]
        header: bool,

        /// Zero-based column of the read identifiers; negative counts from
        /// the end
        #[clap(short, long, default_value = "0", allow_hyphen_values = true, value_parser = column_index)]
        read: ColumnIndex,

        /// Zero-based column of the lineages; negative counts from the end
        #[clap(short, long, default_value = "-1", allow_hyphen_values = true, value_parser = column_index)]
        tax: ColumnIndex,

        /// Zero-based column of the similarity score; only the best scoring
        /// hits of each read are used when given
        #[clap(short, long, allow_hyphen_values = true, value_parser = column_index)]
        escore: Option<ColumnIndex>,

        /// Delimiter between taxonomic ranks
        #[clap(short, long, default_value_t = ';', value_parser)]
        delimiter: char,

        /// Fraction of hits that have to agree on a rank for it to be
        /// included (prefix block mode only)
        #[clap(short, long, default_value_t = 1.0, value_parser)]
        percent: f64,

        /// Consensus strategy
        #[clap(long, arg_enum, default_value_t = ConsensusMode::PrefixBlock, value_parser)]
        mode: ConsensusMode,

        /// Shorthand for `--mode substring`
        #[clap(short = 'b', long, value_parser)]
        substring: bool,
    },

    /// Number lines by groups starting at lines containing a marker
    GroupLines {
        /// Input text file; `-` is the standard input
        #[clap(short, long, default_value_t, value_parser = input_stream)]
        input: InputStream,

        /// Output file path; `-` is the standard output
        #[clap(short, long, default_value = "-", value_parser)]
        output: PathBuf,

        /// Substring marking the first line of a group
        #[clap(short = 's', long = "string", value_parser)]
        marker: String,

        /// Join the lines of every group into a single tab-separated row
        #[clap(short, long, value_parser)]
        wide: bool,
    },

    /// List the distinct values of a metadata category as sample identifiers
    GroupMetadata {
        /// Tab-separated metadata table with a header; `-` is the standard
        /// input
        #[clap(short, long, default_value_t, value_parser = input_stream)]
        metadata: InputStream,

        /// Output file path; `-` is the standard output
        #[clap(short, long = "out", default_value = "-", value_parser)]
        output: PathBuf,

        /// Metadata column to group by
        #[clap(short = 'g', long = "group", value_parser)]
        category: String,
    },

    /// Extract the nucleotide sequences of ORFs found by CARD RGI
    ExtractRgi {
        /// CARD RGI result table
        #[clap(short = 'b', long, value_parser = input_file)]
        rgi: InputFile,

        /// FASTA file of the contigs RGI was run on
        #[clap(short = 'i', long, value_parser = input_file)]
        fasta: InputFile,

        /// Output directory; created if missing
        #[clap(short, long, value_parser = directory)]
        output: Directory,
    },
}
