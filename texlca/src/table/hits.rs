//! Reading taxonomic hit tables: one row per (read, candidate lineage) pair.

use std::io::Read;

use log::debug;

use crate::progress::{ByteNum, NoProgress, ProgressNotifier};
use crate::table::{is_missing_value, ColumnIndex, TableError, TableFormat, TableResult};

/// A single hit of a read against a reference with a known lineage.
#[derive(Debug, Clone, PartialEq)]
pub struct HitRecord {
    pub read_id: String,
    pub lineage: String,
    pub score: Option<f64>,
}

impl HitRecord {
    #[must_use]
    pub fn new<S: Into<String>, T: Into<String>>(read_id: S, lineage: T, score: Option<f64>) -> Self {
        Self {
            read_id: read_id.into(),
            lineage: lineage.into(),
            score,
        }
    }
}

/// Names of the selected columns, taken from the header row.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HitTableHeader {
    pub read_column: String,
    pub tax_column: String,
}

/// A fully loaded hit table.
#[derive(Debug, Clone, PartialEq)]
pub struct HitTable {
    pub header: Option<HitTableHeader>,
    pub records: Vec<HitRecord>,
}

/// A builder for `HitTableParams`.
#[derive(Debug, Clone)]
pub struct HitTableParamsBuilder {
    format: TableFormat,
    read_column: ColumnIndex,
    tax_column: ColumnIndex,
    score_column: Option<ColumnIndex>,
}

impl HitTableParamsBuilder {
    /// Returns a new instance of `HitTableParamsBuilder`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            format: TableFormat::default(),
            read_column: ColumnIndex::FIRST,
            tax_column: ColumnIndex::LAST,
            score_column: None,
        }
    }

    /// Sets the field separator and header presence.
    pub fn format(&mut self, format: TableFormat) -> &mut Self {
        let mut new = self;
        new.format = format;
        new
    }

    /// Sets the column holding the read identifiers.
    pub fn read_column(&mut self, read_column: ColumnIndex) -> &mut Self {
        let mut new = self;
        new.read_column = read_column;
        new
    }

    /// Sets the column holding the lineages.
    pub fn tax_column(&mut self, tax_column: ColumnIndex) -> &mut Self {
        let mut new = self;
        new.tax_column = tax_column;
        new
    }

    /// Sets the column holding the similarity score. When set, only the best
    /// scoring hits of each read are used.
    pub fn score_column(&mut self, score_column: Option<ColumnIndex>) -> &mut Self {
        let mut new = self;
        new.score_column = score_column;
        new
    }

    /// Builds and returns [`HitTableParams`].
    pub fn build(&self) -> HitTableParams {
        HitTableParams {
            format: self.format,
            read_column: self.read_column,
            tax_column: self.tax_column,
            score_column: self.score_column,
        }
    }
}

impl Default for HitTableParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Hit table reading params.
#[derive(Debug, Clone, PartialEq)]
pub struct HitTableParams {
    format: TableFormat,
    read_column: ColumnIndex,
    tax_column: ColumnIndex,
    score_column: Option<ColumnIndex>,
}

impl HitTableParams {
    /// Returns new builder for `HitTableParams`.
    #[must_use]
    pub fn builder() -> HitTableParamsBuilder {
        HitTableParamsBuilder::new()
    }

    #[must_use]
    pub fn format(&self) -> TableFormat {
        self.format
    }

    #[must_use]
    pub fn score_column(&self) -> Option<ColumnIndex> {
        self.score_column
    }
}

impl Default for HitTableParams {
    fn default() -> Self {
        HitTableParamsBuilder::default().build()
    }
}

/// Reader of delimited hit tables producing typed [`HitRecord`]s. Rows are
/// validated eagerly: every selected column has to exist and every lineage
/// has to be present.
#[derive(Debug)]
pub struct HitTableReader<R> {
    reader: csv::Reader<R>,
    params: HitTableParams,
    row: csv::StringRecord,
}

impl<R: Read> HitTableReader<R> {
    /// Creates new `HitTableReader` instance with default parameters.
    ///
    /// # Examples
    /// ```
    /// use texlca::table::hits::HitTableReader;
    ///
    /// let table = "r1\tBacteria;Firmicutes\n";
    /// let mut reader = HitTableReader::new(table.as_bytes());
    /// let record = reader.read_record().unwrap().unwrap();
    /// assert_eq!(record.lineage, "Bacteria;Firmicutes");
    /// ```
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self::with_params(reader, HitTableParams::default())
    }

    /// Creates new `HitTableReader` instance with given parameters.
    #[must_use]
    pub fn with_params(reader: R, params: HitTableParams) -> Self {
        Self {
            reader: params.format.reader_builder().from_reader(reader),
            params,
            row: csv::StringRecord::new(),
        }
    }

    /// Returns the names of the selected columns if the table has a header.
    pub fn header(&mut self) -> TableResult<Option<HitTableHeader>> {
        if !self.params.format.has_header {
            return Ok(None);
        }

        let headers = self.reader.headers()?;
        let line = headers.position().map_or(1, csv::Position::line);
        let header = HitTableHeader {
            read_column: Self::field(headers, self.params.read_column, line)?.to_owned(),
            tax_column: Self::field(headers, self.params.tax_column, line)?.to_owned(),
        };

        Ok(Some(header))
    }

    /// Reads a single row, or returns `None` at the end of the table.
    pub fn read_record(&mut self) -> TableResult<Option<HitRecord>> {
        if !self.reader.read_record(&mut self.row)? {
            return Ok(None);
        }
        let row = &self.row;
        let line = row.position().map_or(0, csv::Position::line);

        let read_id = Self::field(row, self.params.read_column, line)?;
        let lineage = Self::field(row, self.params.tax_column, line)?;
        if is_missing_value(lineage) {
            return Err(TableError::MissingLineage { line });
        }

        let score = match self.params.score_column {
            Some(column) => {
                let value = Self::field(row, column, line)?;
                let score = value
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| TableError::InvalidNumber {
                        line,
                        value: value.to_owned(),
                    })?;
                Some(score)
            }
            None => None,
        };

        Ok(Some(HitRecord::new(read_id, lineage, score)))
    }

    /// Returns the number of bytes of the input consumed so far.
    #[must_use]
    pub fn bytes_read(&self) -> ByteNum {
        ByteNum::new(self.reader.position().byte() as usize)
    }

    /// Reads the header and all the rows.
    pub fn read_table(self) -> TableResult<HitTable> {
        self.read_table_with_progress(&NoProgress)
    }

    /// Reads the header and all the rows, reporting the bytes consumed by
    /// every row to `notifier`.
    pub fn read_table_with_progress(
        mut self,
        notifier: &dyn ProgressNotifier,
    ) -> TableResult<HitTable> {
        let header = self.header()?;
        let mut reported = ByteNum::ZERO;
        let mut records = Vec::new();
        while let Some(record) = self.read_record()? {
            records.push(record);

            let bytes_read = self.bytes_read();
            notifier.processed_bytes(ByteNum::new(bytes_read.get() - reported.get()));
            reported = bytes_read;
        }
        debug!("Loaded {} hits", records.len());

        Ok(HitTable { header, records })
    }

    fn field(row: &csv::StringRecord, column: ColumnIndex, line: u64) -> TableResult<&str> {
        column
            .resolve(row.len())
            .and_then(|index| row.get(index))
            .ok_or(TableError::ColumnOutOfRange {
                line,
                column,
                field_num: row.len(),
            })
    }
}
