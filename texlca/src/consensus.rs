//! Consensus of candidate lineages: the core of local common ancestor
//! inference.
//!
//! Given every lineage reported for a single query sequence, a
//! [`ConsensusStrategy`] computes one lineage summarizing the agreement
//! between them.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::iter;

use crate::lineage::{delimiter_count, leading_blocks, rank_block, strip_trailing_delimiter};

/// Error occurring when computing a consensus lineage.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsensusError {
    /// No candidate lineages were given.
    EmptyGroup,
    /// The dominance threshold is outside of the `(0, 1]` range.
    InvalidThreshold(f64),
}

impl Display for ConsensusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsensusError::EmptyGroup => write!(f, "No candidate lineages in the group"),
            ConsensusError::InvalidThreshold(value) => {
                write!(f, "Invalid dominance threshold: {} (must be in (0, 1])", value)
            }
        }
    }
}

impl Error for ConsensusError {}

/// The result of a consensus operation.
pub type ConsensusResult<T> = Result<T, ConsensusError>;

/// Minimum fraction of candidates that must agree on a rank block for it to
/// be appended past the unanimous prefix.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct DominanceThreshold(f64);

impl DominanceThreshold {
    /// Every candidate has to agree.
    pub const UNANIMOUS: DominanceThreshold = DominanceThreshold(1.0);

    /// Creates a new `DominanceThreshold`.
    ///
    /// # Examples
    /// ```
    /// use texlca::consensus::DominanceThreshold;
    ///
    /// assert!(DominanceThreshold::new(0.8).is_ok());
    /// assert!(DominanceThreshold::new(0.0).is_err());
    /// assert!(DominanceThreshold::new(1.5).is_err());
    /// ```
    pub fn new(value: f64) -> ConsensusResult<Self> {
        if value > 0.0 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(ConsensusError::InvalidThreshold(value))
        }
    }

    #[inline]
    #[must_use]
    pub const fn get(&self) -> f64 {
        self.0
    }

    #[inline]
    fn is_reached(&self, votes: usize, total: usize) -> bool {
        votes as f64 / total as f64 >= self.0
    }
}

impl Default for DominanceThreshold {
    fn default() -> Self {
        Self::UNANIMOUS
    }
}

impl Display for DominanceThreshold {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The method of combining candidate lineages into one.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ConsensusStrategy {
    /// Unanimous prefix at rank granularity, extended rank by rank while the
    /// most frequent block reaches the threshold.
    /// See [`dominant_common_prefix_block`].
    PrefixBlock { threshold: DominanceThreshold },
    /// Longest common substring. See [`longest_common_substring`].
    Substring,
    /// Character-level longest common prefix. See [`longest_common_prefix`].
    PlainPrefix,
}

impl ConsensusStrategy {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ConsensusStrategy::PrefixBlock { .. } => "prefix-block",
            ConsensusStrategy::Substring => "substring",
            ConsensusStrategy::PlainPrefix => "plain-prefix",
        }
    }

    /// Computes the consensus of given candidate lineages.
    ///
    /// A single candidate is returned as is. Trailing delimiters are always
    /// stripped from the result.
    ///
    /// # Examples
    /// ```
    /// use texlca::consensus::ConsensusStrategy;
    ///
    /// let lineages = ["Bacteria;Firmicutes;Bacilli", "Bacteria;Firmicutes;Clostridia"];
    /// let consensus = ConsensusStrategy::default().consensus(&lineages, ';').unwrap();
    /// assert_eq!(consensus, "Bacteria;Firmicutes");
    /// ```
    pub fn consensus<S: AsRef<str>>(&self, lineages: &[S], delimiter: char) -> ConsensusResult<String> {
        let consensus = match lineages {
            [] => return Err(ConsensusError::EmptyGroup),
            [single] => single.as_ref().to_owned(),
            _ => match *self {
                ConsensusStrategy::PrefixBlock { threshold } => {
                    dominant_common_prefix_block(lineages, delimiter, threshold)
                }
                ConsensusStrategy::Substring => longest_common_substring(lineages),
                ConsensusStrategy::PlainPrefix => longest_common_prefix(lineages),
            },
        };

        Ok(strip_trailing_delimiter(&consensus, delimiter).to_owned())
    }
}

impl Default for ConsensusStrategy {
    fn default() -> Self {
        Self::PrefixBlock {
            threshold: DominanceThreshold::default(),
        }
    }
}

impl Display for ConsensusStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsensusStrategy::PrefixBlock { threshold } => {
                write!(f, "{} (threshold {})", self.name(), threshold)
            }
            _ => write!(f, "{}", self.name()),
        }
    }
}

/// Returns the longest string that is a contiguous substring of every
/// lineage. Among several substrings of the maximal length, the one starting
/// first in the first lineage wins. Returns an empty string if there is no
/// common character at all.
///
/// The substrings of the first lineage are enumerated and each is looked up
/// in all the other lineages, so the worst case cost is
/// `O(L^2 * n * m)` for a first lineage of length `L` and `n` lineages of
/// average length `m`. Long lineages with large groups are slow in this mode.
///
/// # Examples
/// ```
/// use texlca::consensus::longest_common_substring;
///
/// let lineages = ["Bacteria;Firmicutes", "Proteobacteria;Firmicutes"];
/// assert_eq!(longest_common_substring(&lineages), "acteria;Firmicutes");
/// ```
#[must_use]
pub fn longest_common_substring<S: AsRef<str>>(lineages: &[S]) -> String {
    let (reference, others) = match lineages.split_first() {
        Some((reference, others)) => (reference.as_ref(), others),
        None => return String::new(),
    };

    let bounds: Vec<usize> = reference
        .char_indices()
        .map(|(pos, _)| pos)
        .chain(iter::once(reference.len()))
        .collect();

    let (mut best_start, mut best_end) = (0, 0);
    for start in 0..bounds.len() {
        let best_len = best_end - best_start;
        for end in start + best_len + 1..bounds.len() {
            let stem = &reference[bounds[start]..bounds[end]];
            // no longer stem from this start can match either
            if !others.iter().all(|other| other.as_ref().contains(stem)) {
                break;
            }

            best_start = start;
            best_end = end;
        }
    }

    reference[bounds[best_start]..bounds[best_end]].to_owned()
}

/// Returns the longest character prefix shared by all lineages. This is not
/// rank-aware and may end in the middle of a rank name.
///
/// # Examples
/// ```
/// use texlca::consensus::longest_common_prefix;
///
/// let lineages = ["Bacteria;Firmicutes;Bacilli", "Bacteria;Firmicutes;Bacteroides"];
/// assert_eq!(longest_common_prefix(&lineages), "Bacteria;Firmicutes;Bac");
/// ```
#[must_use]
pub fn longest_common_prefix<S: AsRef<str>>(lineages: &[S]) -> String {
    let words: Vec<Vec<char>> = lineages
        .iter()
        .map(|lineage| lineage.as_ref().chars().collect())
        .collect();
    let reference = match words.first() {
        Some(reference) => reference,
        None => return String::new(),
    };
    let min_len = words.iter().map(Vec::len).min().unwrap_or(0);

    // binary search; [0, low) is known to be common, [high, min_len) is not
    let (mut low, mut high) = (0, min_len);
    while low < high {
        let mid = low + (high - 1 - low) / 2;
        let agree = words
            .iter()
            .all(|word| word[low..=mid] == reference[low..=mid]);

        if agree {
            low = mid + 1;
        } else {
            high = mid;
        }
    }

    reference[..low].iter().collect()
}

/// Returns the longest common prefix cut down to whole rank blocks, along
/// with the number of blocks in it.
fn prefix_block_with_len<S: AsRef<str>>(lineages: &[S], delimiter: char) -> (String, usize) {
    let prefix = longest_common_prefix(lineages);
    // the part after the last delimiter may be a fragment of a longer rank
    // name; it is dropped and left for the voting to decide
    let block_num = delimiter_count(&prefix, delimiter);

    (
        leading_blocks(&prefix, delimiter, block_num).to_owned(),
        block_num,
    )
}

/// Returns the longest prefix made of whole rank blocks shared by all
/// lineages.
///
/// # Examples
/// ```
/// use texlca::consensus::common_prefix_block;
///
/// let lineages = ["Bacteria;Firmicutes;Bacilli", "Bacteria;Firmicutes;Bacteroides"];
/// assert_eq!(common_prefix_block(&lineages, ';'), "Bacteria;Firmicutes");
/// ```
#[must_use]
pub fn common_prefix_block<S: AsRef<str>>(lineages: &[S], delimiter: char) -> String {
    prefix_block_with_len(lineages, delimiter).0
}

/// Returns the common prefix block of all lineages, extended by the blocks
/// of the following ranks as long as the most frequent block of the rank is
/// shared by at least `threshold` of all lineages.
///
/// Lineages that do not reach a rank, or have an empty block there, do not
/// vote for it but still count towards the total. When several blocks are
/// equally frequent, the lexicographically smallest one is picked.
///
/// # Examples
/// ```
/// use texlca::consensus::{dominant_common_prefix_block, DominanceThreshold};
///
/// let lineages = [
///     "Bacteria;Firmicutes;Bacilli",
///     "Bacteria;Firmicutes;Bacilli",
///     "Bacteria;Firmicutes;Clostridia",
/// ];
/// let threshold = DominanceThreshold::new(0.6).unwrap();
/// assert_eq!(
///     dominant_common_prefix_block(&lineages, ';', threshold),
///     "Bacteria;Firmicutes;Bacilli"
/// );
/// ```
#[must_use]
pub fn dominant_common_prefix_block<S: AsRef<str>>(
    lineages: &[S],
    delimiter: char,
    threshold: DominanceThreshold,
) -> String {
    let (mut consensus, block_num) = prefix_block_with_len(lineages, delimiter);
    let max_delimiters = lineages
        .iter()
        .map(|lineage| delimiter_count(lineage.as_ref(), delimiter))
        .max()
        .unwrap_or(0);

    for index in block_num..=max_delimiters {
        let mut votes: BTreeMap<&str, usize> = BTreeMap::new();
        for lineage in lineages {
            match rank_block(lineage.as_ref(), delimiter, index) {
                Some(block) if !block.is_empty() => *votes.entry(block).or_insert(0) += 1,
                _ => {}
            }
        }

        let (block, count) = match dominant_block(&votes) {
            Some(dominant) => dominant,
            None => break,
        };
        if !threshold.is_reached(count, lineages.len()) {
            break;
        }

        if index > 0 {
            consensus.push(delimiter);
        }
        consensus.push_str(block);
    }

    consensus
}

/// Most frequent block; the smallest one wins a tie as the map is ordered.
fn dominant_block<'a>(votes: &BTreeMap<&'a str, usize>) -> Option<(&'a str, usize)> {
    votes
        .iter()
        .fold(None, |best, (&block, &count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((block, count)),
        })
}
