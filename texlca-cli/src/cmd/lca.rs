use std::io::{BufReader, Read, Write};
use std::sync::Arc;

use anyhow::Context;
use log::info;
use texlca::consensus::ConsensusStrategy;
use texlca::lca::{LcaParams, TaxonomicLca};
use texlca::progress::ProgressNotifier;
use texlca::table::hits::HitTableParams;

pub fn lca<R: Read, W: Write>(
    reader: R,
    writer: W,
    table: HitTableParams,
    rank_delimiter: char,
    strategy: ConsensusStrategy,
    progress_notifier: Arc<dyn ProgressNotifier>,
) -> anyhow::Result<()> {
    let params = LcaParams::builder()
        .table(table)
        .rank_delimiter(rank_delimiter)
        .strategy(strategy)
        .progress_notifier(progress_notifier)
        .build();

    let summary = TaxonomicLca::with_params(params)
        .run(BufReader::new(reader), writer)
        .context("Could not compute the consensus lineages")?;

    info!(
        "Assigned {} reads from {} hits ({} top scoring)",
        summary.reads, summary.hits, summary.top_hits
    );

    Ok(())
}
