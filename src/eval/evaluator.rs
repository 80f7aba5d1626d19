//! Orchestration: runs every metric over a batch and assembles the report.

use crate::error::{EvalError, Result};
use crate::eval::metrics::{avg_hits_at_k, avg_precision_at_k, mean_reciprocal_rank};
use crate::eval::report::{EvalReport, HitsScore, PrecisionScore};
use crate::qrels::{DocId, QueryId, Qrels};

/// Cutoffs used by [`Evaluator::evaluate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalSettings {
    pub hits_k: usize,
    pub precision_ks: Vec<usize>,
}

impl Default for EvalSettings {
    /// The standard report: Hits@5 and Precision@5/10/20.
    fn default() -> Self {
        Self {
            hits_k: 5,
            precision_ks: vec![5, 10, 20],
        }
    }
}

/// Scores ranked predictions against a judgments table.
#[derive(Debug, Clone)]
pub struct Evaluator {
    qrels: Qrels,
    settings: EvalSettings,
}

impl Evaluator {
    /// Evaluator producing the standard report.
    pub fn new(qrels: Qrels) -> Self {
        Self {
            qrels,
            settings: EvalSettings::default(),
        }
    }

    pub fn with_settings(qrels: Qrels, settings: EvalSettings) -> Result<Self> {
        if settings.hits_k == 0 {
            return Err(EvalError::InvalidInput("hits_k must be greater than 0".to_string()));
        }
        if settings.precision_ks.is_empty() || settings.precision_ks.contains(&0) {
            return Err(EvalError::InvalidInput(
                "precision_ks must be non-empty and every cutoff greater than 0".to_string(),
            ));
        }
        Ok(Self { qrels, settings })
    }

    pub fn qrels(&self) -> &Qrels {
        &self.qrels
    }

    pub fn settings(&self) -> &EvalSettings {
        &self.settings
    }

    /// Compute MRR, Hits@K and every Precision@K for the batch.
    ///
    /// Fails without partial results if any prediction list is shorter than
    /// the Hits cutoff or any query lacks a primary judgment. Queries with too
    /// few relevant documents are only dropped from the affected Precision@K.
    pub fn evaluate(&self, query_ids: &[QueryId], predictions: &[Vec<DocId>]) -> Result<EvalReport> {
        let mrr = mean_reciprocal_rank(&self.qrels, query_ids, predictions)?;
        let hits_k = self.settings.hits_k;
        let hits = avg_hits_at_k(&self.qrels, query_ids, predictions, hits_k)?;

        let precision = self
            .settings
            .precision_ks
            .iter()
            .map(|&k| {
                avg_precision_at_k(&self.qrels, query_ids, predictions, k).map(
                    |(value, queries_considered)| PrecisionScore {
                        k,
                        value,
                        queries_considered,
                    },
                )
            })
            .collect::<Result<Vec<_>>>()?;

        let report = EvalReport {
            queries: query_ids.len(),
            mrr,
            hits: HitsScore { k: hits_k, value: hits },
            precision,
        };
        log::info!("{}", report);
        Ok(report)
    }
}
