//! Delimited text tables: hit tables in, consensus tables out.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub mod hits;
pub mod writer;

/// Default field separator of the tables.
pub const DEFAULT_SEPARATOR: u8 = b'\t';

/// Field values treated as missing data.
pub const NA_VALUES: [&str; 10] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A",
];

/// Returns whether given field value denotes missing data.
///
/// # Examples
/// ```
/// use texlca::table::is_missing_value;
///
/// assert!(is_missing_value(""));
/// assert!(is_missing_value(" NA "));
/// assert!(!is_missing_value("Bacteria"));
/// ```
#[must_use]
pub fn is_missing_value(value: &str) -> bool {
    NA_VALUES.contains(&value.trim())
}

/// Error occurring when reading or writing a delimited table.
#[derive(Debug)]
pub enum TableError {
    /// The table could not be parsed or written.
    CsvError(csv::Error),
    /// A column index does not exist in a row.
    ColumnOutOfRange {
        line: u64,
        column: ColumnIndex,
        field_num: usize,
    },
    /// A column required by name is not in the header.
    MissingColumn(String),
    /// The taxonomy field of a row is empty.
    MissingLineage { line: u64 },
    /// A numeric field could not be parsed.
    InvalidNumber { line: u64, value: String },
}

impl From<csv::Error> for TableError {
    fn from(e: csv::Error) -> Self {
        Self::CsvError(e)
    }
}

impl Display for TableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TableError::CsvError(e) => write!(f, "Malformed table: {}", e),
            TableError::ColumnOutOfRange {
                line,
                column,
                field_num,
            } => write!(
                f,
                "Column {} out of range at line {} ({} fields)",
                column, line, field_num
            ),
            TableError::MissingColumn(name) => write!(f, "Missing column: `{}`", name),
            TableError::MissingLineage { line } => write!(f, "Missing taxonomy at line {}", line),
            TableError::InvalidNumber { line, value } => {
                write!(f, "Invalid number at line {}: `{}`", line, value)
            }
        }
    }
}

impl Error for TableError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TableError::CsvError(e) => Some(e),
            _ => None,
        }
    }
}

/// The result of a table operation.
pub type TableResult<T> = Result<T, TableError>;

/// Zero-based column selector; negative values count from the end of a row,
/// with `-1` being the last column.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ColumnIndex(isize);

impl ColumnIndex {
    pub const FIRST: ColumnIndex = ColumnIndex(0);
    pub const LAST: ColumnIndex = ColumnIndex(-1);

    #[inline]
    #[must_use]
    pub const fn new(index: isize) -> Self {
        Self(index)
    }

    #[inline]
    #[must_use]
    pub const fn get(&self) -> isize {
        self.0
    }

    /// Returns the position of the column in a row of `field_num` fields.
    ///
    /// # Examples
    /// ```
    /// use texlca::table::ColumnIndex;
    ///
    /// assert_eq!(ColumnIndex::new(1).resolve(3), Some(1));
    /// assert_eq!(ColumnIndex::new(-1).resolve(3), Some(2));
    /// assert_eq!(ColumnIndex::new(-4).resolve(3), None);
    /// assert_eq!(ColumnIndex::new(3).resolve(3), None);
    /// ```
    #[must_use]
    pub fn resolve(&self, field_num: usize) -> Option<usize> {
        let index = if self.0 < 0 {
            field_num.checked_sub(self.0.unsigned_abs())?
        } else {
            self.0 as usize
        };

        (index < field_num).then(|| index)
    }
}

impl Display for ColumnIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ColumnIndex {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Layout shared by the input and output tables.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TableFormat {
    pub separator: u8,
    pub has_header: bool,
}

impl TableFormat {
    #[must_use]
    pub const fn new(separator: u8, has_header: bool) -> Self {
        Self {
            separator,
            has_header,
        }
    }

    pub(crate) fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(self.separator)
            .has_headers(self.has_header);
        builder
    }

    pub(crate) fn writer_builder(&self) -> csv::WriterBuilder {
        let mut builder = csv::WriterBuilder::new();
        builder.delimiter(self.separator).has_headers(false);
        builder
    }
}

impl Default for TableFormat {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR, false)
    }
}
