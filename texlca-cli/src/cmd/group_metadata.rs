use std::io::{Read, Write};

use anyhow::Context;
use log::info;
use texlca::metadata::group_metadata as group;

pub fn group_metadata<R: Read, W: Write>(
    reader: R,
    writer: W,
    category: &str,
) -> anyhow::Result<()> {
    let num = group(reader, writer, category)
        .with_context(|| format!("Could not group the metadata by `{}`", category))?;
    info!("{} distinct values of `{}`", num, category);

    Ok(())
}
