//! Grouped sample metadata: the distinct values of one category of a
//! metadata table, usable as sample identifiers of data aggregated by that
//! category.

use std::io::{Read, Write};

use indexmap::IndexSet;
use log::debug;

use crate::table::{is_missing_value, TableError, TableFormat, TableResult};

/// Header of the grouped metadata column.
pub const SAMPLE_ID_COLUMN: &str = "SampleID";

/// Writes the distinct values of the `category` column, in order of first
/// appearance, as a single-column table headed [`SAMPLE_ID_COLUMN`]. Missing
/// values are all written as one empty line. Returns the number of distinct
/// values.
///
/// # Examples
/// ```
/// use texlca::metadata::group_metadata;
///
/// let metadata = "#SampleID\tdiet\nS1\tfiber\nS2\tfat\nS3\tfiber\n";
/// let mut output = Vec::new();
/// let num = group_metadata(metadata.as_bytes(), &mut output, "diet").unwrap();
///
/// assert_eq!(num, 2);
/// assert_eq!(String::from_utf8(output).unwrap(), "SampleID\nfiber\nfat\n");
/// ```
pub fn group_metadata<R: Read, W: Write>(reader: R, writer: W, category: &str) -> TableResult<usize> {
    let format = TableFormat::new(b'\t', true);
    let mut reader = format.reader_builder().from_reader(reader);

    let column = reader
        .headers()?
        .iter()
        .position(|name| name == category)
        .ok_or_else(|| TableError::MissingColumn(category.to_owned()))?;

    let mut values: IndexSet<String> = IndexSet::new();
    for row in reader.records() {
        let row = row?;
        let value = row.get(column).unwrap_or_default();
        if is_missing_value(value) {
            values.insert(String::new());
        } else {
            values.insert(value.to_owned());
        }
    }
    debug!("{} distinct values of `{}`", values.len(), category);

    // csv quotes a lone empty field, so the missing value is written raw
    let mut writer = writer;
    let missing = values.get_index_of("");
    let leading = values
        .iter()
        .take(missing.unwrap_or(values.len()))
        .map(String::as_str);
    write_column(&mut writer, format, std::iter::once(SAMPLE_ID_COLUMN).chain(leading))?;
    if let Some(index) = missing {
        writeln!(writer).map_err(csv::Error::from)?;
        let trailing = values.iter().skip(index + 1).map(String::as_str);
        write_column(&mut writer, format, trailing)?;
    }

    Ok(values.len())
}

fn write_column<'a, W, I>(writer: W, format: TableFormat, values: I) -> TableResult<()>
where
    W: Write,
    I: Iterator<Item = &'a str>,
{
    let mut writer = format.writer_builder().from_writer(writer);
    for value in values {
        writer.write_record([value])?;
    }
    writer.flush().map_err(csv::Error::from)?;

    Ok(())
}
