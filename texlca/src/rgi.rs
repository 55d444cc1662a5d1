//! Extraction of antibiotic resistance gene ORFs reported by CARD RGI from
//! the assembled contigs they were predicted on.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use log::{debug, info};
use serde::Deserialize;

use crate::fasta::reader::FastaReaderError;
use crate::fasta::FastaIndex;
use crate::table::{is_missing_value, TableError, TableFormat};

/// Name of the extracted ORF sequences file in the output directory.
pub const ORF_FASTA_FILE: &str = "AMG.fasta";
/// Name of the kept RGI rows file in the output directory.
pub const KEPT_TABLE_FILE: &str = "kept.tsv";
/// Name of the column appended to the kept RGI rows.
pub const CONTIG_HEADER_COLUMN: &str = "Contig_header";

const REQUIRED_COLUMNS: [&str; 4] = ["Contig", "Start", "Stop", "CARD_Protein_Sequence"];

#[derive(Debug)]
pub enum RgiError {
    /// I/O error occurred when reading the inputs or writing the outputs.
    IoError(std::io::Error),
    /// The RGI table could not be read or the kept table written.
    TableError(TableError),
    /// The contig FASTA could not be read.
    FastaError(FastaReaderError),
    /// An ORF refers to a contig absent from the FASTA file.
    MissingContig(String),
    /// ORF coordinates do not fit in the contig sequence.
    InvalidCoordinates {
        contig: String,
        start: u64,
        stop: u64,
        len: usize,
    },
}

impl From<std::io::Error> for RgiError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e)
    }
}

impl From<TableError> for RgiError {
    fn from(e: TableError) -> Self {
        Self::TableError(e)
    }
}

impl From<csv::Error> for RgiError {
    fn from(e: csv::Error) -> Self {
        Self::TableError(TableError::from(e))
    }
}

impl From<FastaReaderError> for RgiError {
    fn from(e: FastaReaderError) -> Self {
        Self::FastaError(e)
    }
}

impl Display for RgiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RgiError::IoError(e) => write!(f, "IO error: {}", e),
            RgiError::TableError(e) => write!(f, "RGI table error: {}", e),
            RgiError::FastaError(e) => write!(f, "FASTA error: {}", e),
            RgiError::MissingContig(contig) => write!(f, "Contig not found: `{}`", contig),
            RgiError::InvalidCoordinates {
                contig,
                start,
                stop,
                len,
            } => write!(
                f,
                "Invalid ORF coordinates {}..{} on contig `{}` of length {}",
                start, stop, contig, len
            ),
        }
    }
}

impl Error for RgiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RgiError::IoError(e) => Some(e),
            RgiError::TableError(e) => Some(e),
            RgiError::FastaError(e) => Some(e),
            RgiError::MissingContig(_) | RgiError::InvalidCoordinates { .. } => None,
        }
    }
}

pub type RgiResult<T> = Result<T, RgiError>;

#[derive(Debug, Deserialize)]
struct RgiHit {
    #[serde(rename = "Contig")]
    contig: String,
    #[serde(rename = "Start")]
    start: u64,
    #[serde(rename = "Stop")]
    stop: u64,
    #[serde(rename = "CARD_Protein_Sequence")]
    protein_sequence: Option<String>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct RgiSummary {
    pub rows: usize,
    pub kept: usize,
}

/// Returns the name of the contig an ORF was predicted on, i.e. the ORF name
/// without its last `_`-separated suffix. Names without `_` give an empty
/// string.
///
/// # Examples
/// ```
/// use texlca::rgi::contig_header;
///
/// assert_eq!(contig_header("k141_1234_2"), "k141_1234");
/// assert_eq!(contig_header("contig"), "");
/// ```
#[must_use]
pub fn contig_header(orf: &str) -> &str {
    orf.rsplit_once('_').map_or("", |(contig, _)| contig)
}

/// Writes the nucleotide sequence of every RGI hit with a protein sequence
/// as a FASTA record, and the hits themselves as a table with a leading
/// index column and an appended [`CONTIG_HEADER_COLUMN`]. All the hits are
/// validated before anything is written.
pub fn extract_orfs<R, F, K>(
    rgi_reader: R,
    contigs: &FastaIndex,
    fasta_writer: F,
    kept_writer: K,
) -> RgiResult<RgiSummary>
where
    R: Read,
    F: Write,
    K: Write,
{
    let format = TableFormat::new(b'\t', true);
    let mut reader = format.reader_builder().from_reader(rgi_reader);
    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|name| name == column) {
            return Err(TableError::MissingColumn(column.to_owned()).into());
        }
    }

    let mut summary = RgiSummary::default();
    let mut kept = Vec::new();
    for row in reader.records() {
        let row = row?;
        summary.rows += 1;
        let hit: RgiHit = row.deserialize(Some(&headers))?;
        if hit.protein_sequence.as_deref().map_or(true, is_missing_value) {
            continue;
        }

        let orf = orf_sequence(contigs, &hit)?;
        kept.push((row, hit.contig, orf));
    }
    summary.kept = kept.len();
    debug!("Kept {} of {} RGI hits", summary.kept, summary.rows);

    let mut fasta_writer = fasta_writer;
    let mut table_writer = format.writer_builder().from_writer(kept_writer);
    table_writer.write_record(
        std::iter::once("")
            .chain(headers.iter())
            .chain(std::iter::once(CONTIG_HEADER_COLUMN)),
    )?;
    for (index, (row, orf_name, orf)) in kept.iter().enumerate() {
        writeln!(fasta_writer, ">{}\n{}", orf_name, orf)?;

        let index = index.to_string();
        table_writer.write_record(
            std::iter::once(index.as_str())
                .chain(row.iter())
                .chain(std::iter::once(contig_header(orf_name))),
        )?;
    }
    fasta_writer.flush()?;
    table_writer.flush()?;

    Ok(summary)
}

/// Reads the RGI table and the contig FASTA and writes [`ORF_FASTA_FILE`]
/// and [`KEPT_TABLE_FILE`] into `out_dir`, creating it if needed.
pub fn extract_rgi<P, Q, O>(rgi_path: P, fasta_path: Q, out_dir: O) -> RgiResult<RgiSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    O: AsRef<Path>,
{
    let contigs = FastaIndex::from_reader(BufReader::new(File::open(fasta_path)?))?;
    let rgi_reader = BufReader::new(File::open(rgi_path)?);

    let out_dir = out_dir.as_ref();
    std::fs::create_dir_all(out_dir)?;
    let mut fasta_out = Vec::new();
    let mut kept_out = Vec::new();
    let summary = extract_orfs(rgi_reader, &contigs, &mut fasta_out, &mut kept_out)?;

    std::fs::write(out_dir.join(ORF_FASTA_FILE), fasta_out)?;
    std::fs::write(out_dir.join(KEPT_TABLE_FILE), kept_out)?;
    info!("Extracted {} ORFs into {}", summary.kept, out_dir.display());

    Ok(summary)
}

fn orf_sequence<'a>(contigs: &'a FastaIndex, hit: &RgiHit) -> RgiResult<&'a str> {
    let contig = contig_header(&hit.contig);
    let sequence = contigs
        .get(contig)
        .ok_or_else(|| RgiError::MissingContig(contig.to_owned()))?;

    let invalid = || RgiError::InvalidCoordinates {
        contig: contig.to_owned(),
        start: hit.start,
        stop: hit.stop,
        len: sequence.len(),
    };
    if hit.start < 1 || hit.start > hit.stop {
        return Err(invalid());
    }
    let start = usize::try_from(hit.start - 1).map_err(|_| invalid())?;
    let stop = usize::try_from(hit.stop).map_err(|_| invalid())?;

    sequence.get(start..stop).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use crate::_internal_test_data::{CONTIGS_FASTA, RGI_TABLE};
    use crate::fasta::FastaIndex;
    use crate::rgi::{contig_header, extract_orfs, extract_rgi, RgiError, RgiSummary};
    use crate::table::TableError;

    fn extract(rgi: &str) -> Result<(String, String, RgiSummary), RgiError> {
        let contigs = FastaIndex::from_reader(CONTIGS_FASTA.as_bytes()).unwrap();
        let mut fasta = Vec::new();
        let mut kept = Vec::new();
        let summary = extract_orfs(rgi.as_bytes(), &contigs, &mut fasta, &mut kept)?;

        Ok((
            String::from_utf8(fasta).unwrap(),
            String::from_utf8(kept).unwrap(),
            summary,
        ))
    }

    #[test]
    fn contig_header_drops_orf_number() {
        assert_eq!(contig_header("k141_1_1"), "k141_1");
        assert_eq!(contig_header("a_b_c_10"), "a_b_c");
        assert_eq!(contig_header("_3"), "");
        assert_eq!(contig_header("k141"), "");
    }

    #[test]
    fn extracts_kept_orfs() {
        let (fasta, kept, summary) = extract(RGI_TABLE).unwrap();

        assert_eq!(fasta, ">k141_1_1\nATGAAACGC\n>k141_2_3\nCCCAAATTT\n");
        assert_eq!(
            kept,
            "\tORF_ID\tContig\tStart\tStop\tCARD_Protein_Sequence\tContig_header\n\
             0\tk141_1_1 # 1\tk141_1_1\t1\t9\tMKR\tk141_1\n\
             1\tk141_2_3 # 4\tk141_2_3\t4\t12\tPKF\tk141_2\n"
        );
        assert_eq!(summary, RgiSummary { rows: 3, kept: 2 });
    }

    #[test]
    fn unknown_contig_is_rejected() {
        let rgi = "Contig\tStart\tStop\tCARD_Protein_Sequence\nk9_1\t1\t3\tM\n";

        assert!(matches!(extract(rgi), Err(RgiError::MissingContig(ref contig)) if contig == "k9"));
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        for (start, stop) in [(0, 3), (5, 4), (10, 13)] {
            let rgi = format!(
                "Contig\tStart\tStop\tCARD_Protein_Sequence\nk141_2_1\t{}\t{}\tM\n",
                start, stop
            );

            assert!(matches!(
                extract(&rgi),
                Err(RgiError::InvalidCoordinates { len: 12, .. })
            ));
        }
    }

    #[test]
    fn missing_column_is_rejected() {
        let rgi = "Contig\tStart\tCARD_Protein_Sequence\nk141_2_1\t1\tM\n";

        assert!(matches!(
            extract(rgi),
            Err(RgiError::TableError(TableError::MissingColumn(ref name))) if name == "Stop"
        ));
    }

    #[test]
    fn malformed_coordinates_are_rejected() {
        let rgi = "Contig\tStart\tStop\tCARD_Protein_Sequence\nk141_2_1\tone\t3\tM\n";

        assert!(matches!(
            extract(rgi),
            Err(RgiError::TableError(TableError::CsvError(_)))
        ));
    }

    #[test]
    fn writes_output_directory() {
        let dir = std::env::temp_dir().join(format!("texlca-rgi-{}", std::process::id()));
        let rgi_path = dir.join("rgi.txt");
        let fasta_path = dir.join("contigs.fa");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&rgi_path, RGI_TABLE).unwrap();
        std::fs::write(&fasta_path, CONTIGS_FASTA).unwrap();

        let out_dir = dir.join("out").join("nested");
        let summary = extract_rgi(&rgi_path, &fasta_path, &out_dir).unwrap();

        assert_eq!(summary.kept, 2);
        assert!(std::fs::read_to_string(out_dir.join("AMG.fasta"))
            .unwrap()
            .starts_with(">k141_1_1\n"));
        assert!(out_dir.join("kept.tsv").exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            format!("{}", RgiError::MissingContig("k9".to_owned())),
            "Contig not found: `k9`"
        );
        assert_eq!(
            format!(
                "{}",
                RgiError::InvalidCoordinates {
                    contig: "k1".to_owned(),
                    start: 5,
                    stop: 40,
                    len: 30,
                }
            ),
            "Invalid ORF coordinates 5..40 on contig `k1` of length 30"
        );
    }

    #[test]
    fn test_error_source() {
        assert!(RgiError::from(TableError::MissingColumn("Stop".to_owned()))
            .source()
            .is_some());
        assert!(RgiError::MissingContig("k9".to_owned()).source().is_none());
    }
}
