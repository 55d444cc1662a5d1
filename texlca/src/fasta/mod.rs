//! FASTA sequences, e.g. assembled contigs.

use std::collections::HashMap;
use std::io::BufRead;

use log::debug;

use crate::fasta::reader::{FastaReader, FastaReaderError, FastaResult};

pub mod reader;

pub(crate) const FASTA_TITLE_PREFIX: char = '>';

/// A single FASTA record. The identifier is the part of the title line up to
/// the first whitespace; the rest of the title is the description.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FastaRecord {
    identifier: String,
    description: String,
    sequence: String,
}

impl FastaRecord {
    #[must_use]
    pub fn new<I, D, S>(identifier: I, description: D, sequence: S) -> Self
    where
        I: Into<String>,
        D: Into<String>,
        S: Into<String>,
    {
        Self {
            identifier: identifier.into(),
            description: description.into(),
            sequence: sequence.into(),
        }
    }

    /// Creates a record from a title line with the `>` prefix already
    /// removed.
    #[must_use]
    pub fn from_title(title: &str, sequence: String) -> Self {
        let title = title.trim();
        let (identifier, description) = match title.split_once(char::is_whitespace) {
            Some((identifier, description)) => (identifier, description.trim_start()),
            None => (title, ""),
        };

        Self::new(identifier, description, sequence)
    }

    #[inline]
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    #[must_use]
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// In-memory lookup of sequences by identifier.
#[derive(Debug, Clone, Default)]
pub struct FastaIndex {
    sequences: HashMap<String, String>,
}

impl FastaIndex {
    /// Loads all the records of a FASTA file. Identifiers have to be unique.
    ///
    /// # Examples
    /// ```
    /// use texlca::fasta::FastaIndex;
    ///
    /// let index = FastaIndex::from_reader(">k1\nACGT\n>k2\nTT\n".as_bytes()).unwrap();
    /// assert_eq!(index.len(), 2);
    /// assert_eq!(index.get("k2"), Some("TT"));
    /// ```
    pub fn from_reader<R: BufRead>(reader: R) -> FastaResult<Self> {
        let mut sequences = HashMap::new();
        for record in FastaReader::new(reader) {
            let record = record?;
            if sequences.contains_key(&record.identifier) {
                return Err(FastaReaderError::DuplicateIdentifier(record.identifier));
            }
            sequences.insert(record.identifier, record.sequence);
        }
        debug!("Indexed {} FASTA sequences", sequences.len());

        Ok(Self { sequences })
    }

    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.sequences.get(identifier).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::_internal_test_data::CONTIGS_FASTA;
    use crate::fasta::reader::FastaReaderError;
    use crate::fasta::{FastaIndex, FastaRecord};

    #[test]
    fn title_is_split_on_whitespace() {
        let record = FastaRecord::from_title(" k141_7\t flag=0 len=3", "ACG".to_owned());

        assert_eq!(record.identifier(), "k141_7");
        assert_eq!(record.description(), "flag=0 len=3");
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn index_lookup() {
        let index = FastaIndex::from_reader(CONTIGS_FASTA.as_bytes()).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("k141_1"), Some("ATGAAACGCATTAGCACCACCATT"));
        assert_eq!(index.get("k141_3"), None);
    }

    #[test]
    fn duplicate_identifiers_are_rejected() {
        let result = FastaIndex::from_reader(">a x\nAC\n>a y\nGT\n".as_bytes());

        assert!(matches!(result, Err(FastaReaderError::DuplicateIdentifier(ref id)) if id == "a"));
    }
}
