//! Filtering hits by score and grouping them by read.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::table::hits::HitRecord;

/// All the candidate lineages of a single read, in input order.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HitGroup {
    read_id: String,
    lineages: Vec<String>,
}

impl HitGroup {
    #[must_use]
    pub fn new<S: Into<String>>(read_id: S, lineages: Vec<String>) -> Self {
        Self {
            read_id: read_id.into(),
            lineages,
        }
    }

    #[inline]
    #[must_use]
    pub fn read_id(&self) -> &str {
        &self.read_id
    }

    #[inline]
    #[must_use]
    pub fn lineages(&self) -> &[String] {
        &self.lineages
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lineages.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lineages.is_empty()
    }
}

/// Keeps, for every read, only the hits with the maximal score. All hits
/// sharing the maximum are kept; scores are compared exactly. Hits without a
/// score are always kept, hits scored NaN never are.
///
/// # Examples
/// ```
/// use texlca::grouping::retain_top_scores;
/// use texlca::table::hits::HitRecord;
///
/// let records = vec![
///     HitRecord::new("r3", "X;Y", Some(10.0)),
///     HitRecord::new("r3", "X;W", Some(5.0)),
/// ];
/// assert_eq!(retain_top_scores(records), vec![HitRecord::new("r3", "X;Y", Some(10.0))]);
/// ```
#[must_use]
pub fn retain_top_scores(records: Vec<HitRecord>) -> Vec<HitRecord> {
    let mut max_scores: HashMap<&str, f64> = HashMap::new();
    for record in &records {
        if let Some(score) = record.score {
            max_scores
                .entry(&record.read_id)
                .and_modify(|max| *max = max.max(score))
                .or_insert(score);
        }
    }

    let keep: Vec<bool> = records
        .iter()
        .map(|record| match record.score {
            Some(score) => max_scores.get(record.read_id.as_str()) == Some(&score),
            None => true,
        })
        .collect();

    records
        .into_iter()
        .zip(keep)
        .filter_map(|(record, keep)| keep.then(|| record))
        .collect()
}

/// Partitions hits by read, in order of the first appearance of each read.
///
/// # Examples
/// ```
/// use texlca::grouping::group_by_read;
/// use texlca::table::hits::HitRecord;
///
/// let groups = group_by_read(vec![
///     HitRecord::new("r2", "A;B", None),
///     HitRecord::new("r1", "A;C", None),
///     HitRecord::new("r2", "A;D", None),
/// ]);
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].read_id(), "r2");
/// assert_eq!(groups[0].lineages(), ["A;B", "A;D"]);
/// ```
#[must_use]
pub fn group_by_read(records: Vec<HitRecord>) -> Vec<HitGroup> {
    let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
    for record in records {
        groups
            .entry(record.read_id)
            .or_insert_with(Vec::new)
            .push(record.lineage);
    }

    groups
        .into_iter()
        .map(|(read_id, lineages)| HitGroup::new(read_id, lineages))
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::grouping::{group_by_read, retain_top_scores, HitGroup};
    use crate::table::hits::HitRecord;

    #[test]
    fn top_score_ties_are_all_kept() {
        let records = vec![
            HitRecord::new("r3", "X;Y", Some(10.0)),
            HitRecord::new("r3", "X;Z", Some(10.0)),
            HitRecord::new("r3", "X;W", Some(5.0)),
        ];

        assert_eq!(
            retain_top_scores(records),
            vec![
                HitRecord::new("r3", "X;Y", Some(10.0)),
                HitRecord::new("r3", "X;Z", Some(10.0)),
            ]
        );
    }

    #[test]
    fn top_scores_are_per_read() {
        let records = vec![
            HitRecord::new("r1", "A", Some(1.0)),
            HitRecord::new("r2", "B", Some(90.0)),
            HitRecord::new("r1", "C", Some(0.5)),
            HitRecord::new("r2", "D", Some(99.5)),
        ];
        let kept: Vec<_> = retain_top_scores(records)
            .into_iter()
            .map(|record| record.lineage)
            .collect();

        assert_eq!(kept, ["A", "D"]);
    }

    #[test]
    fn nan_scores_are_dropped() {
        let records = vec![
            HitRecord::new("r1", "A", Some(f64::NAN)),
            HitRecord::new("r1", "B", Some(3.0)),
            HitRecord::new("r2", "C", Some(f64::NAN)),
        ];
        let kept = retain_top_scores(records);

        assert_eq!(kept, vec![HitRecord::new("r1", "B", Some(3.0))]);
    }

    #[test]
    fn grouping_keeps_duplicates_and_order() {
        let groups = group_by_read(vec![
            HitRecord::new("b", "X;1", None),
            HitRecord::new("a", "X;2", None),
            HitRecord::new("b", "X;1", None),
            HitRecord::new("c", "X;3", None),
            HitRecord::new("a", "X;4", None),
        ]);

        assert_eq!(
            groups,
            vec![
                HitGroup::new("b", vec!["X;1".to_owned(), "X;1".to_owned()]),
                HitGroup::new("a", vec!["X;2".to_owned(), "X;4".to_owned()]),
                HitGroup::new("c", vec!["X;3".to_owned()]),
            ]
        );
        assert!(groups.iter().all(|group| !group.is_empty()));
    }

    #[test]
    fn grouping_nothing() {
        assert!(group_by_read(Vec::new()).is_empty());
    }
}
