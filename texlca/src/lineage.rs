//! Helpers for delimiter-joined taxonomic lineages, such as
//! `Bacteria;Firmicutes;Bacilli`.

/// Default character separating the ranks of a lineage.
pub const DEFAULT_RANK_DELIMITER: char = ';';

/// Returns the rank block at given zero-based index, or `None` if the lineage
/// does not have that many ranks.
///
/// # Examples
/// ```
/// use texlca::lineage::rank_block;
///
/// let lineage = "Bacteria;Firmicutes;Bacilli";
/// assert_eq!(rank_block(lineage, ';', 1), Some("Firmicutes"));
/// assert_eq!(rank_block(lineage, ';', 3), None);
/// ```
#[must_use]
pub fn rank_block(lineage: &str, delimiter: char, index: usize) -> Option<&str> {
    lineage.split(delimiter).nth(index)
}

/// Returns the number of delimiters in given lineage. A lineage has one more
/// rank block than it has delimiters.
///
/// # Examples
/// ```
/// use texlca::lineage::delimiter_count;
///
/// assert_eq!(delimiter_count("Bacteria;Firmicutes;", ';'), 2);
/// assert_eq!(delimiter_count("Bacteria", ';'), 0);
/// ```
#[must_use]
pub fn delimiter_count(lineage: &str, delimiter: char) -> usize {
    lineage.matches(delimiter).count()
}

/// Returns the first `count` rank blocks of given lineage, joined with the
/// delimiter. If the lineage has fewer blocks, it is returned whole.
///
/// # Examples
/// ```
/// use texlca::lineage::leading_blocks;
///
/// assert_eq!(leading_blocks("A;B;C", ';', 2), "A;B");
/// assert_eq!(leading_blocks("A;B;C", ';', 0), "");
/// assert_eq!(leading_blocks("A;B", ';', 5), "A;B");
/// ```
#[must_use]
pub fn leading_blocks(lineage: &str, delimiter: char, count: usize) -> &str {
    if count == 0 {
        return "";
    }

    match lineage.match_indices(delimiter).nth(count - 1) {
        Some((pos, _)) => &lineage[..pos],
        None => lineage,
    }
}

/// Strips all trailing delimiter characters, e.g. the artifact of lineages
/// written as `Bacteria;Firmicutes;`.
///
/// # Examples
/// ```
/// use texlca::lineage::strip_trailing_delimiter;
///
/// assert_eq!(strip_trailing_delimiter("Bacteria;Firmicutes;", ';'), "Bacteria;Firmicutes");
/// assert_eq!(strip_trailing_delimiter("Bacteria;;", ';'), "Bacteria");
/// ```
#[must_use]
pub fn strip_trailing_delimiter(lineage: &str, delimiter: char) -> &str {
    lineage.trim_end_matches(delimiter)
}
