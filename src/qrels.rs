//! Relevance judgments (qrels): the ground-truth table metrics are scored against.

use crate::error::{EvalError, Result};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Query identifier (`id_left` in the judgments source).
pub type QueryId = i64;
/// Document identifier (`id_right` in the judgments source).
pub type DocId = i64;

/// Label value reserved for the single gold document of a query.
const PRIMARY_LABEL: i64 = 2;

/// Two-tier relevance grade carried by a judgment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relevance {
    NotRelevant,
    /// Relevant, but not the gold document.
    Secondary,
    /// The gold document used by Hits@K and MRR.
    Primary,
}

impl Relevance {
    /// Map a raw integer label: 2 is primary, other positives are secondary,
    /// zero and negatives are not relevant.
    pub fn from_label(label: i64) -> Self {
        match label {
            PRIMARY_LABEL => Relevance::Primary,
            l if l > 0 => Relevance::Secondary,
            _ => Relevance::NotRelevant,
        }
    }

    pub fn is_relevant(self) -> bool {
        !matches!(self, Relevance::NotRelevant)
    }
}

/// One (query, document, relevance) row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Judgment {
    pub query_id: QueryId,
    pub doc_id: DocId,
    pub relevance: Relevance,
}

impl Judgment {
    pub fn new(query_id: QueryId, doc_id: DocId, relevance: Relevance) -> Self {
        Self {
            query_id,
            doc_id,
            relevance,
        }
    }
}

/// Immutable judgments table, grouped by query with source order preserved.
#[derive(Debug, Clone, Default)]
pub struct Qrels {
    by_query: HashMap<QueryId, Vec<Judgment>>,
    rows: usize,
}

impl Qrels {
    /// Build the table from rows; per-query order follows the input order.
    pub fn from_judgments<I>(judgments: I) -> Self
    where
        I: IntoIterator<Item = Judgment>,
    {
        let mut by_query: HashMap<QueryId, Vec<Judgment>> = HashMap::new();
        let mut rows = 0;
        for judgment in judgments {
            rows += 1;
            by_query.entry(judgment.query_id).or_default().push(judgment);
        }
        Self { by_query, rows }
    }

    /// Load a tab-separated judgments file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let qrels = Self::parse(&content).map_err(|e| match e {
            EvalError::Parse(msg) => EvalError::Parse(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;
        log::debug!(
            "Loaded {} judgments for {} queries from {}",
            qrels.len(),
            qrels.query_count(),
            path.display()
        );
        Ok(qrels)
    }

    /// Parse judgments text: four tab-separated columns per line, no header.
    ///
    /// Columns are `id_left`, an unused placeholder, `id_right` and `label`.
    /// Blank lines are skipped.
    pub fn parse(content: &str) -> Result<Self> {
        let mut judgments = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let line_no = index + 1;
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 4 {
                return Err(EvalError::Parse(format!(
                    "line {}: expected 4 tab-separated columns, found {}",
                    line_no,
                    fields.len()
                )));
            }
            let query_id = parse_int(fields[0], "id_left", line_no)?;
            let doc_id = parse_int(fields[2], "id_right", line_no)?;
            let label = parse_int(fields[3], "label", line_no)?;
            judgments.push(Judgment::new(query_id, doc_id, Relevance::from_label(label)));
        }
        Ok(Self::from_judgments(judgments))
    }

    /// The gold document for a query: the first primary row in source order.
    pub fn primary_relevant(&self, query_id: QueryId) -> Result<DocId> {
        self.judgments_for(query_id)
            .iter()
            .find(|j| j.relevance == Relevance::Primary)
            .map(|j| j.doc_id)
            .ok_or(EvalError::MissingPrimary { query_id })
    }

    /// Every document judged relevant (primary or secondary) for a query.
    pub fn all_relevant(&self, query_id: QueryId) -> HashSet<DocId> {
        self.judgments_for(query_id)
            .iter()
            .filter(|j| j.relevance.is_relevant())
            .map(|j| j.doc_id)
            .collect()
    }

    /// Raw rows for a query, in source order; empty when the query is unknown.
    pub fn judgments_for(&self, query_id: QueryId) -> &[Judgment] {
        self.by_query
            .get(&query_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of judgment rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Number of distinct queries with at least one row.
    pub fn query_count(&self) -> usize {
        self.by_query.len()
    }
}

fn parse_int(field: &str, column: &str, line_no: usize) -> Result<i64> {
    field.trim().parse::<i64>().map_err(|e| {
        EvalError::Parse(format!(
            "line {}: invalid {} value {:?}: {}",
            line_no, column, field, e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE: &str = "1\t0\t10\t2\n1\t0\t11\t1\n1\t0\t12\t0\n2\t0\t20\t1\n";

    #[test]
    fn test_relevance_from_label() {
        assert_eq!(Relevance::from_label(2), Relevance::Primary);
        assert_eq!(Relevance::from_label(1), Relevance::Secondary);
        assert_eq!(Relevance::from_label(3), Relevance::Secondary);
        assert_eq!(Relevance::from_label(0), Relevance::NotRelevant);
        assert_eq!(Relevance::from_label(-1), Relevance::NotRelevant);
    }

    #[test]
    fn test_parse_sample() {
        let qrels = Qrels::parse(SAMPLE).unwrap();
        assert_eq!(qrels.len(), 4);
        assert_eq!(qrels.query_count(), 2);
        assert_eq!(qrels.judgments_for(1).len(), 3);
        assert!(qrels.judgments_for(99).is_empty());
    }

    #[test]
    fn test_primary_relevant() {
        let qrels = Qrels::parse(SAMPLE).unwrap();
        assert_eq!(qrels.primary_relevant(1).unwrap(), 10);
    }

    #[test]
    fn test_primary_relevant_missing() {
        let qrels = Qrels::parse(SAMPLE).unwrap();
        let err = qrels.primary_relevant(2).unwrap_err();
        assert!(matches!(err, EvalError::MissingPrimary { query_id: 2 }));
        assert!(matches!(
            qrels.primary_relevant(42),
            Err(EvalError::MissingPrimary { query_id: 42 })
        ));
    }

    #[test]
    fn test_primary_relevant_first_row_wins() {
        let qrels = Qrels::from_judgments(vec![
            Judgment::new(5, 50, Relevance::Secondary),
            Judgment::new(5, 51, Relevance::Primary),
            Judgment::new(5, 52, Relevance::Primary),
        ]);
        assert_eq!(qrels.primary_relevant(5).unwrap(), 51);
    }

    #[test]
    fn test_all_relevant_excludes_not_relevant() {
        let qrels = Qrels::parse(SAMPLE).unwrap();
        let relevant = qrels.all_relevant(1);
        assert_eq!(relevant, HashSet::from([10, 11]));
        assert!(qrels.all_relevant(99).is_empty());
    }

    #[test]
    fn test_parse_skips_blank_lines_and_crlf() {
        let qrels = Qrels::parse("\n3\tQ0\t30\t2\r\n\n").unwrap();
        assert_eq!(qrels.len(), 1);
        assert_eq!(qrels.primary_relevant(3).unwrap(), 30);
    }

    #[test]
    fn test_parse_too_few_columns() {
        let err = Qrels::parse("1\t0\t10\t2\n1\t0\t11\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 2"), "unexpected message: {}", msg);
    }

    #[test]
    fn test_parse_bad_integer() {
        let err = Qrels::parse("1\t0\tdoc\t2\n").unwrap_err();
        assert!(matches!(err, EvalError::Parse(_)));
        assert!(err.to_string().contains("id_right"));
    }

    #[test]
    fn test_qrels_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Qrels>();
        assert_send_sync::<Judgment>();
    }

    #[test]
    fn test_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.qrels");
        fs::write(&path, SAMPLE).unwrap();
        let qrels = Qrels::from_path(&path).unwrap();
        assert_eq!(qrels.len(), 4);
        assert_eq!(qrels.primary_relevant(1).unwrap(), 10);
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = Qrels::from_path("does/not/exist.qrels").unwrap_err();
        assert!(matches!(err, EvalError::Io(_)));
    }

    #[test]
    fn test_from_path_parse_error_names_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.qrels");
        fs::write(&path, "1\t0\n").unwrap();
        let err = Qrels::from_path(&path).unwrap_err();
        assert!(err.to_string().contains("broken.qrels"));
    }
}
