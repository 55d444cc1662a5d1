use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use log::info;
use texlca::lines::{LineGrouper, LineGroupingMode};
use texlca::progress::ProgressNotifier;

pub fn group_lines<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    marker: &str,
    wide: bool,
    progress_notifier: Arc<dyn ProgressNotifier>,
) -> anyhow::Result<()> {
    let mode = if wide {
        LineGroupingMode::Wide
    } else {
        LineGroupingMode::Counter
    };

    let summary = LineGrouper::new(marker, mode)
        .with_progress_notifier(progress_notifier)
        .group(reader, writer)
        .context("Could not group the lines")?;
    info!("Found {} groups in {} lines", summary.groups, summary.lines);

    Ok(())
}
