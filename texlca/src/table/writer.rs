use std::io::Write;

use crate::table::hits::HitTableHeader;
use crate::table::{TableFormat, TableResult};

/// The consensus lineage computed for a single read.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ReadConsensus {
    pub read_id: String,
    pub lineage: String,
}

impl ReadConsensus {
    #[must_use]
    pub fn new<S: Into<String>, T: Into<String>>(read_id: S, lineage: T) -> Self {
        Self {
            read_id: read_id.into(),
            lineage: lineage.into(),
        }
    }
}

/// Writes the two-column `read -> consensus lineage` table.
#[derive(Debug)]
pub struct ConsensusWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ConsensusWriter<W> {
    /// Creates new `ConsensusWriter` writing in given table format. The header
    /// is only written if the format has one, see [`Self::write_header`].
    #[must_use]
    pub fn new(writer: W, format: TableFormat) -> Self {
        Self {
            writer: format.writer_builder().from_writer(writer),
        }
    }

    pub fn write_header(&mut self, header: &HitTableHeader) -> TableResult<()> {
        self.writer
            .write_record([&header.read_column, &header.tax_column])?;
        Ok(())
    }

    pub fn write_consensus(&mut self, consensus: &ReadConsensus) -> TableResult<()> {
        self.writer
            .write_record([&consensus.read_id, &consensus.lineage])?;
        Ok(())
    }

    pub fn flush(&mut self) -> TableResult<()> {
        self.writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::table::hits::HitTableHeader;
    use crate::table::writer::{ConsensusWriter, ReadConsensus};
    use crate::table::TableFormat;

    fn write(format: TableFormat, header: Option<HitTableHeader>, rows: &[ReadConsensus]) -> String {
        let mut data = Vec::new();
        {
            let mut writer = ConsensusWriter::new(&mut data, format);
            if let Some(header) = &header {
                writer.write_header(header).unwrap();
            }
            for row in rows {
                writer.write_consensus(row).unwrap();
            }
            writer.flush().unwrap();
        }

        String::from_utf8(data).unwrap()
    }

    #[test]
    fn writes_tab_separated_rows() {
        let output = write(
            TableFormat::default(),
            None,
            &[
                ReadConsensus::new("r1", "Bacteria;Firmicutes"),
                ReadConsensus::new("r2", ""),
            ],
        );

        assert_eq!(output, "r1\tBacteria;Firmicutes\nr2\t\n");
    }

    #[test]
    fn writes_header_with_custom_separator() {
        let header = HitTableHeader {
            read_column: "query".to_owned(),
            tax_column: "taxonomy".to_owned(),
        };
        let output = write(
            TableFormat::new(b',', true),
            Some(header),
            &[ReadConsensus::new("r1", "A;B")],
        );

        assert_eq!(output, "query,taxonomy\nr1,A;B\n");
    }

    #[test]
    fn quotes_fields_containing_separator() {
        let output = write(
            TableFormat::new(b',', false),
            None,
            &[ReadConsensus::new("r1", "Escherichia coli, K-12")],
        );

        assert_eq!(output, "r1,\"Escherichia coli, K-12\"\n");
    }
}
