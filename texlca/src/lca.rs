//! Local common ancestor assignment: hit table in, one consensus lineage per
//! read out.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{Read, Write};
use std::sync::Arc;

use log::{debug, info, warn};

use crate::consensus::{ConsensusError, ConsensusStrategy};
use crate::grouping::{group_by_read, retain_top_scores, HitGroup};
use crate::lineage::DEFAULT_RANK_DELIMITER;
use crate::progress::{NoProgress, ProgressNotifier};
use crate::table::hits::{HitTableParams, HitTableReader};
use crate::table::writer::{ConsensusWriter, ReadConsensus};
use crate::table::TableError;

/// Error occurring during local common ancestor assignment.
#[derive(Debug)]
pub enum LcaError {
    /// The hit table could not be read or the output written.
    TableError(TableError),
    /// A consensus could not be computed.
    ConsensusError(ConsensusError),
}

impl From<TableError> for LcaError {
    fn from(e: TableError) -> Self {
        Self::TableError(e)
    }
}

impl From<ConsensusError> for LcaError {
    fn from(e: ConsensusError) -> Self {
        Self::ConsensusError(e)
    }
}

impl Display for LcaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LcaError::TableError(e) => write!(f, "Table error: {}", e),
            LcaError::ConsensusError(e) => write!(f, "Consensus error: {}", e),
        }
    }
}

impl Error for LcaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LcaError::TableError(e) => Some(e),
            LcaError::ConsensusError(e) => Some(e),
        }
    }
}

/// The result of local common ancestor assignment.
pub type LcaResult<T> = Result<T, LcaError>;

#[derive(Debug, Clone)]
pub struct LcaParams {
    table: HitTableParams,
    rank_delimiter: char,
    strategy: ConsensusStrategy,
    progress_notifier: Arc<dyn ProgressNotifier>,
}

impl LcaParams {
    #[must_use]
    pub fn builder() -> LcaParamsBuilder {
        LcaParamsBuilder::new()
    }
}

impl Default for LcaParams {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Clone)]
pub struct LcaParamsBuilder {
    table: HitTableParams,
    rank_delimiter: char,
    strategy: ConsensusStrategy,
    progress_notifier: Arc<dyn ProgressNotifier>,
}

impl LcaParamsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: HitTableParams::default(),
            rank_delimiter: DEFAULT_RANK_DELIMITER,
            strategy: ConsensusStrategy::default(),
            progress_notifier: Arc::new(NoProgress),
        }
    }

    pub fn table(&mut self, table: HitTableParams) -> &mut Self {
        let mut new = self;
        new.table = table;
        new
    }

    pub fn rank_delimiter(&mut self, rank_delimiter: char) -> &mut Self {
        let mut new = self;
        new.rank_delimiter = rank_delimiter;
        new
    }

    pub fn strategy(&mut self, strategy: ConsensusStrategy) -> &mut Self {
        let mut new = self;
        new.strategy = strategy;
        new
    }

    pub fn progress_notifier(&mut self, progress_notifier: Arc<dyn ProgressNotifier>) -> &mut Self {
        let mut new = self;
        new.progress_notifier = progress_notifier;
        new
    }

    pub fn build(&mut self) -> LcaParams {
        LcaParams {
            table: self.table.clone(),
            rank_delimiter: self.rank_delimiter,
            strategy: self.strategy,
            progress_notifier: self.progress_notifier.clone(),
        }
    }
}

impl Default for LcaParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics of a finished assignment run.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct LcaSummary {
    /// Rows read from the hit table.
    pub hits: usize,
    /// Rows left after keeping the best scoring hits only.
    pub top_hits: usize,
    /// Reads (and output rows).
    pub reads: usize,
    /// Reads with several candidate lineages and an empty consensus.
    pub degenerate: Vec<String>,
}

/// Assigns each read of a hit table the consensus of its candidate lineages.
///
/// # Examples
/// ```
/// use texlca::lca::TaxonomicLca;
///
/// let hits = "r1\tBacteria;Firmicutes;Bacilli\nr1\tBacteria;Firmicutes;Clostridia\n";
/// let mut output = Vec::new();
/// let summary = TaxonomicLca::new().run(hits.as_bytes(), &mut output).unwrap();
///
/// assert_eq!(summary.reads, 1);
/// assert_eq!(String::from_utf8(output).unwrap(), "r1\tBacteria;Firmicutes\n");
/// ```
#[derive(Debug, Clone)]
pub struct TaxonomicLca {
    params: LcaParams,
}

impl TaxonomicLca {
    #[must_use]
    pub fn new() -> Self {
        Self::with_params(LcaParams::default())
    }

    #[must_use]
    pub fn with_params(params: LcaParams) -> Self {
        Self { params }
    }

    /// Reads the whole hit table, computes the consensus of every read and
    /// writes the consensus table. Nothing is written unless every consensus
    /// has been computed successfully.
    pub fn run<R: Read, W: Write>(&self, reader: R, writer: W) -> LcaResult<LcaSummary> {
        let table = HitTableReader::with_params(reader, self.params.table.clone())
            .read_table_with_progress(self.params.progress_notifier.as_ref())?;
        let mut summary = LcaSummary {
            hits: table.records.len(),
            ..LcaSummary::default()
        };

        let records = if self.params.table.score_column().is_some() {
            retain_top_scores(table.records)
        } else {
            table.records
        };
        summary.top_hits = records.len();
        debug!("{} of {} hits kept", summary.top_hits, summary.hits);

        let groups = group_by_read(records);
        summary.reads = groups.len();
        info!(
            "Computing consensus of {} reads using {}",
            groups.len(),
            self.params.strategy
        );

        let assignments = self.assign(&groups)?;
        summary.degenerate = assignments
            .iter()
            .zip(&groups)
            .filter(|(assignment, group)| assignment.lineage.is_empty() && group.len() > 1)
            .map(|(assignment, _)| assignment.read_id.clone())
            .collect();

        let mut consensus_writer = ConsensusWriter::new(writer, self.params.table.format());
        if let Some(header) = &table.header {
            consensus_writer.write_header(header)?;
        }
        for assignment in &assignments {
            consensus_writer.write_consensus(assignment)?;
        }
        consensus_writer.flush()?;

        if !summary.degenerate.is_empty() {
            warn!(
                "{} reads have no shared lineage structure and an empty consensus",
                summary.degenerate.len()
            );
        }

        Ok(summary)
    }

    /// Computes the consensus lineage of every group.
    pub fn assign(&self, groups: &[HitGroup]) -> LcaResult<Vec<ReadConsensus>> {
        let notifier = &self.params.progress_notifier;
        notifier.set_group_num(groups.len() as u64);

        let mut assignments = Vec::with_capacity(groups.len());
        for group in groups {
            let lineage = self.consensus(group)?;
            assignments.push(ReadConsensus::new(group.read_id(), lineage));
            notifier.inc_group();
        }

        Ok(assignments)
    }

    /// Computes the consensus lineage of a single group.
    pub fn consensus(&self, group: &HitGroup) -> LcaResult<String> {
        let lineage = self
            .params
            .strategy
            .consensus(group.lineages(), self.params.rank_delimiter)?;

        if lineage.is_empty() && group.len() > 1 {
            warn!(
                "Degenerate consensus for read `{}`: {} candidate lineages share nothing",
                group.read_id(),
                group.len()
            );
        }

        Ok(lineage)
    }
}

impl Default for TaxonomicLca {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use crate::_internal_test_data::{FIRMICUTES_HITS, SCORED_HITS};
    use crate::consensus::{ConsensusError, ConsensusStrategy, DominanceThreshold};
    use crate::grouping::HitGroup;
    use crate::lca::{LcaError, LcaParams, TaxonomicLca};
    use crate::table::hits::HitTableParams;
    use crate::table::{ColumnIndex, TableError, TableFormat};

    fn run(lca: &TaxonomicLca, input: &str) -> String {
        let mut output = Vec::new();
        lca.run(input.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn score_filter_restricts_candidates() {
        let params = LcaParams::builder()
            .table(
                HitTableParams::builder()
                    .score_column(Some(ColumnIndex::new(2)))
                    .tax_column(ColumnIndex::new(1))
                    .build(),
            )
            .build();
        let lca = TaxonomicLca::with_params(params);

        let mut output = Vec::new();
        let summary = lca.run(SCORED_HITS.as_bytes(), &mut output).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "r3\tX\n");
        assert_eq!(summary.hits, 3);
        assert_eq!(summary.top_hits, 2);
        assert_eq!(summary.reads, 1);
    }

    #[test]
    fn without_score_column_all_hits_vote() {
        let params = LcaParams::builder()
            .table(HitTableParams::builder().tax_column(ColumnIndex::new(1)).build())
            .strategy(ConsensusStrategy::PrefixBlock {
                threshold: DominanceThreshold::new(0.6).unwrap(),
            })
            .build();

        assert_eq!(run(&TaxonomicLca::with_params(params), SCORED_HITS), "r3\tX\n");
    }

    #[test]
    fn reads_are_written_in_first_seen_order() {
        let output = run(&TaxonomicLca::new(), FIRMICUTES_HITS);

        assert_eq!(
            output,
            "r2\tArchaea;Euryarchaeota;Methanobacteria\nr1\tBacteria;Firmicutes\n"
        );
    }

    #[test]
    fn header_is_echoed() {
        let params = LcaParams::builder()
            .table(
                HitTableParams::builder()
                    .format(TableFormat::new(b',', true))
                    .read_column(ColumnIndex::new(1))
                    .tax_column(ColumnIndex::new(-1))
                    .build(),
            )
            .build();
        let input = "n,read,taxonomy\n1,r1,A;B;C\n2,r1,A;B;D\n";

        assert_eq!(
            run(&TaxonomicLca::with_params(params), input),
            "read,taxonomy\nr1,A;B\n"
        );
    }

    #[test]
    fn degenerate_consensus_is_reported_and_written() {
        let params = LcaParams::builder()
            .strategy(ConsensusStrategy::Substring)
            .build();
        let lca = TaxonomicLca::with_params(params);

        let mut output = Vec::new();
        let summary = lca
            .run("q\tAAA\nq\tBBB\nr\tCCC\n".as_bytes(), &mut output)
            .unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "q\t\nr\tCCC\n");
        assert_eq!(summary.degenerate, vec!["q".to_owned()]);
    }

    #[test]
    fn malformed_input_writes_nothing() {
        let params = LcaParams::builder()
            .table(HitTableParams::builder().tax_column(ColumnIndex::new(2)).build())
            .build();
        let lca = TaxonomicLca::with_params(params);

        let mut output = Vec::new();
        let error = lca
            .run("r1\tx\tA;B\nr2\tA;C\n".as_bytes(), &mut output)
            .unwrap_err();

        assert!(matches!(error, LcaError::TableError(TableError::CsvError(_))));
        assert!(output.is_empty());
    }

    #[test]
    fn custom_rank_delimiter() {
        let params = LcaParams::builder().rank_delimiter('|').build();
        let output = run(
            &TaxonomicLca::with_params(params),
            "r1\td__Bacteria|p__Firmicutes|\nr1\td__Bacteria|p__Bacteroidota|\n",
        );

        assert_eq!(output, "r1\td__Bacteria\n");
    }

    #[test]
    fn runs_are_deterministic() {
        let lca = TaxonomicLca::new();

        assert_eq!(run(&lca, FIRMICUTES_HITS), run(&lca, FIRMICUTES_HITS));
    }

    #[test]
    fn empty_group_is_an_error() {
        let error = TaxonomicLca::new()
            .consensus(&HitGroup::new("r1", Vec::new()))
            .unwrap_err();

        assert!(matches!(
            error,
            LcaError::ConsensusError(ConsensusError::EmptyGroup)
        ));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            format!("{}", LcaError::from(ConsensusError::EmptyGroup)),
            "Consensus error: No candidate lineages in the group"
        );
        assert_eq!(
            format!("{}", LcaError::from(TableError::MissingLineage { line: 4 })),
            "Table error: Missing taxonomy at line 4"
        );
    }
}
