//! Grouping consecutive lines of a text file, where a new group starts at
//! every line containing a marker substring.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{BufRead, Write};
use std::sync::Arc;

use crate::progress::{ByteNum, NoProgress, ProgressNotifier};

#[derive(Debug)]
pub enum LineGroupingError {
    /// I/O error occurred when reading or writing the lines.
    IoError(std::io::Error),
    /// The marker is empty, so every line would start a group.
    EmptyMarker,
}

impl From<std::io::Error> for LineGroupingError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e)
    }
}

impl Display for LineGroupingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LineGroupingError::IoError(e) => write!(f, "IO error: {}", e),
            LineGroupingError::EmptyMarker => write!(f, "Empty group marker"),
        }
    }
}

impl Error for LineGroupingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LineGroupingError::IoError(e) => Some(e),
            LineGroupingError::EmptyMarker => None,
        }
    }
}

pub type LineGroupingResult<T> = Result<T, LineGroupingError>;

/// Output layout of the grouped lines.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LineGroupingMode {
    /// Every line is prefixed with its group number and a tab. Lines before
    /// the first marker line get the number 0.
    Counter,
    /// Lines of a group are joined with tabs into a single row.
    Wide,
}

impl Default for LineGroupingMode {
    fn default() -> Self {
        Self::Counter
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct LineGroupingSummary {
    pub lines: usize,
    pub groups: usize,
}

/// Groups the lines of a text stream.
///
/// # Examples
/// ```
/// use texlca::lines::{LineGrouper, LineGroupingMode};
///
/// let input = ">seq1\nACGT\n>seq2\nTTGA\n";
/// let mut output = Vec::new();
/// LineGrouper::new(">", LineGroupingMode::Counter)
///     .group(input.as_bytes(), &mut output)
///     .unwrap();
/// assert_eq!(String::from_utf8(output).unwrap(), "1\t>seq1\n1\tACGT\n2\t>seq2\n2\tTTGA\n");
/// ```
#[derive(Debug, Clone)]
pub struct LineGrouper {
    marker: String,
    mode: LineGroupingMode,
    progress_notifier: Arc<dyn ProgressNotifier>,
}

impl LineGrouper {
    #[must_use]
    pub fn new<S: Into<String>>(marker: S, mode: LineGroupingMode) -> Self {
        Self {
            marker: marker.into(),
            mode,
            progress_notifier: Arc::new(NoProgress),
        }
    }

    #[must_use]
    pub fn with_progress_notifier(mut self, progress_notifier: Arc<dyn ProgressNotifier>) -> Self {
        self.progress_notifier = progress_notifier;
        self
    }

    pub fn group<R: BufRead, W: Write>(
        &self,
        mut reader: R,
        mut writer: W,
    ) -> LineGroupingResult<LineGroupingSummary> {
        if self.marker.is_empty() {
            return Err(LineGroupingError::EmptyMarker);
        }

        let mut summary = LineGroupingSummary::default();
        let mut line = String::new();
        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line)?;
            if bytes_read == 0 {
                break;
            }

            match self.mode {
                LineGroupingMode::Counter => {
                    if line.contains(&self.marker) {
                        summary.groups += 1;
                    }
                    write!(writer, "{}\t{}", summary.groups, line)?;
                }
                LineGroupingMode::Wide => {
                    let mut cell = line.trim_end().to_owned();
                    cell.push('\t');
                    if cell.contains(&self.marker) {
                        // no empty row before the first group
                        if summary.lines > 0 {
                            writer.write_all(b"\n")?;
                        }
                        summary.groups += 1;
                    }
                    writer.write_all(cell.as_bytes())?;
                }
            }

            summary.lines += 1;
            self.progress_notifier
                .processed_bytes(ByteNum::new(bytes_read));
        }

        if self.mode == LineGroupingMode::Wide && summary.lines > 0 {
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        Ok(summary)
    }
}
