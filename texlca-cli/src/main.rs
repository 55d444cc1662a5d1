#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands, ConsensusMode};
use cmd::{extract_rgi, group_lines, group_metadata, lca};
use human_panic::setup_panic;
use lazy_static::lazy_static;
use texlca::table::hits::HitTableParams;
use texlca::table::TableFormat;

use crate::logging::init_logging;
use crate::opts::OutputWriter;
use crate::progress_bar::TexlcaProgressBar;

mod cli;
mod cmd;
mod logging;
mod opts;
mod progress_bar;

lazy_static! {
    pub(crate) static ref PROGRESS_BAR: TexlcaProgressBar = TexlcaProgressBar::new();
}

fn main() -> anyhow::Result<()> {
    setup_panic!();

    let cli: Cli = Cli::parse();

    if !cli.no_progress {
        PROGRESS_BAR.show();
    }

    init_logging(cli.verbose.log_level_filter()).expect("Could not initialize logging");

    match &cli.command {
        Commands::Lca {
            input,
            output,
            sep,
            header,
            read,
            tax,
            escore,
            delimiter,
            percent,
            mode,
            substring,
        } => {
            let mode = if *substring {
                ConsensusMode::Substring
            } else {
                *mode
            };
            let strategy = mode
                .strategy(*percent)
                .context("Invalid --percent value")?;
            let table = HitTableParams::builder()
                .format(TableFormat::new(*sep, *header))
                .read_column(*read)
                .tax_column(*tax)
                .score_column(*escore)
                .build();

            let reader = input.as_reader()?;
            PROGRESS_BAR.set_total_bytes(reader.length()?);
            let output = OutputWriter::from_path(output)?;

            lca::lca(
                reader.into_read(),
                output.into_write(),
                table,
                *delimiter,
                strategy,
                Arc::new(PROGRESS_BAR.clone()),
            )
            .with_context(|| format!("Failed to assign lineages to reads of {}", input))?;
        }
        Commands::GroupLines {
            input,
            output,
            marker,
            wide,
        } => {
            let reader = input.as_reader()?;
            PROGRESS_BAR.set_total_bytes(reader.length()?);
            let output = OutputWriter::from_path(output)?;

            group_lines::group_lines(
                reader.into_buf_read(),
                output.into_write(),
                marker,
                *wide,
                Arc::new(PROGRESS_BAR.clone()),
            )
            .with_context(|| format!("Failed to group lines of {}", input))?;
        }
        Commands::GroupMetadata {
            metadata,
            output,
            category,
        } => {
            PROGRESS_BAR.set_message("Reading metadata...");
            let reader = metadata.as_reader()?;
            let output = OutputWriter::from_path(output)?;

            group_metadata::group_metadata(reader.into_read(), output.into_write(), category)
                .with_context(|| format!("Failed to group metadata of {}", metadata))?;
        }
        Commands::ExtractRgi { rgi, fasta, output } => {
            PROGRESS_BAR.set_message("Extracting ORFs...");

            extract_rgi::extract_rgi(rgi.as_path()?, fasta.as_path()?, output.as_path()?)
                .with_context(|| format!("Failed to extract ORFs into {}", output))?;
        }
    }

    PROGRESS_BAR.finish();
    Ok(())
}
