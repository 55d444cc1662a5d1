use std::path::Path;

use anyhow::Context;
use log::info;
use texlca::rgi::{extract_rgi as extract, KEPT_TABLE_FILE, ORF_FASTA_FILE};

pub fn extract_rgi(rgi: &Path, fasta: &Path, out_dir: &Path) -> anyhow::Result<()> {
    let summary = extract(rgi, fasta, out_dir).with_context(|| {
        format!(
            "Could not extract the ORFs of {} from {}",
            rgi.display(),
            fasta.display()
        )
    })?;

    info!(
        "Kept {} of {} RGI hits; wrote {} and {}",
        summary.kept, summary.rows, ORF_FASTA_FILE, KEPT_TABLE_FILE
    );

    Ok(())
}
