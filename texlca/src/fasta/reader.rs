use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::io::BufRead;

use crate::fasta::{FastaRecord, FASTA_TITLE_PREFIX};

/// Error occurring during parsing a FASTA file.
#[derive(Debug)]
pub enum FastaReaderError {
    /// I/O error occurred when reading the FASTA file.
    IoError(std::io::Error),
    /// Sequence data found before the first title line.
    InvalidFormat,
    /// A line is not valid UTF-8.
    InvalidEncoding,
    /// Two records share the same identifier.
    DuplicateIdentifier(String),
}

impl From<std::io::Error> for FastaReaderError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e)
    }
}

impl Display for FastaReaderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FastaReaderError::IoError(e) => write!(f, "IO error: {}", e),
            FastaReaderError::InvalidFormat => write!(f, "Invalid format"),
            FastaReaderError::InvalidEncoding => write!(f, "Invalid encoding"),
            FastaReaderError::DuplicateIdentifier(id) => {
                write!(f, "Duplicate identifier: `{}`", id)
            }
        }
    }
}

impl Error for FastaReaderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FastaReaderError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

/// The result of a FASTA reading operation.
pub type FastaResult<T> = Result<T, FastaReaderError>;

/// FASTA format reader producing [`FastaRecord`] objects. Sequences split
/// over several lines are concatenated; empty lines are skipped.
#[derive(Debug)]
pub struct FastaReader<R> {
    reader: R,
    buffer: Vec<u8>,
    next_title: Option<String>,
}

impl<R: BufRead> FastaReader<R> {
    /// Creates new `FastaReader` instance.
    ///
    /// # Examples
    /// ```
    /// use texlca::fasta::reader::FastaReader;
    ///
    /// let mut reader = FastaReader::new(">contig_1 len=8\nACGT\nACGT\n".as_bytes());
    /// let record = reader.read_record().unwrap().unwrap();
    /// assert_eq!(record.identifier(), "contig_1");
    /// assert_eq!(record.sequence(), "ACGTACGT");
    /// ```
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(4096),
            next_title: None,
        }
    }

    /// Reads a single record, or returns `None` at the end of the file.
    pub fn read_record(&mut self) -> FastaResult<Option<FastaRecord>> {
        let title = match self.next_title.take() {
            Some(title) => title,
            None => match self.parse_title()? {
                Some(title) => title,
                None => return Ok(None),
            },
        };

        let mut sequence = String::new();
        while let Some(line) = Self::read_line(&mut self.reader, &mut self.buffer)? {
            if let Some(next_title) = line.strip_prefix(FASTA_TITLE_PREFIX) {
                self.next_title = Some(next_title.trim().to_owned());
                break;
            }
            sequence.push_str(line.trim());
        }

        Ok(Some(FastaRecord::from_title(&title, sequence)))
    }

    /// Reads the first title line, skipping empty lines.
    fn parse_title(&mut self) -> FastaResult<Option<String>> {
        while let Some(line) = Self::read_line(&mut self.reader, &mut self.buffer)? {
            if line.trim().is_empty() {
                continue;
            }

            return match line.strip_prefix(FASTA_TITLE_PREFIX) {
                Some(title) => Ok(Some(title.trim().to_owned())),
                None => Err(FastaReaderError::InvalidFormat),
            };
        }

        Ok(None)
    }

    fn read_line<'a, T: BufRead>(
        mut buf_reader: T,
        buffer: &'a mut Vec<u8>,
    ) -> FastaResult<Option<&'a str>> {
        buffer.clear();
        if buf_reader.read_until(b'\n', buffer)? == 0 {
            return Ok(None);
        }

        let mut buffer = buffer.as_slice();
        while let Some((b'\n' | b'\r', rest)) = buffer.split_last() {
            buffer = rest;
        }

        let line = std::str::from_utf8(buffer).map_err(|_| FastaReaderError::InvalidEncoding)?;
        Ok(Some(line))
    }
}

impl<R: BufRead> IntoIterator for FastaReader<R> {
    type Item = FastaResult<FastaRecord>;
    type IntoIter = FastaReaderIterator<R>;

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            reader: self,
            no_errors: true,
        }
    }
}

/// Iterator implementation for [`FastaReader`] which iterates over all
/// records in a file.
#[derive(Debug)]
pub struct FastaReaderIterator<R> {
    reader: FastaReader<R>,
    no_errors: bool,
}

impl<R: BufRead> Iterator for FastaReaderIterator<R> {
    type Item = FastaResult<FastaRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.no_errors {
            return None;
        }

        match self.reader.read_record() {
            Ok(record) => record.map(Ok),
            Err(e) => {
                self.no_errors = false;
                Some(Err(e))
            }
        }
    }
}
