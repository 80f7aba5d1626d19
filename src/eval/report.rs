//! Aggregate evaluation report and its text rendering.

use serde::Serialize;
use std::fmt;

/// Hits@K for one cutoff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitsScore {
    pub k: usize,
    pub value: f64,
}

/// Precision@K for one cutoff, with the number of queries that were evaluable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecisionScore {
    pub k: usize,
    pub value: f64,
    pub queries_considered: usize,
}

/// Result of [`Evaluator::evaluate`](crate::eval::Evaluator::evaluate).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalReport {
    /// Number of queries in the batch.
    pub queries: usize,
    pub mrr: f64,
    pub hits: HitsScore,
    pub precision: Vec<PrecisionScore>,
}

impl EvalReport {
    /// Precision entry for a given cutoff, if it was computed.
    pub fn precision_at(&self, k: usize) -> Option<&PrecisionScore> {
        self.precision.iter().find(|p| p.k == k)
    }
}

impl fmt::Display for EvalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Evaluation Results ({} queries) ===", self.queries)?;
        writeln!(f, "MRR:           {}", self.mrr)?;
        write!(f, "Hits @ {:<8}{}", format!("{}:", self.hits.k), self.hits.value)?;
        for p in &self.precision {
            write!(
                f,
                "\nPrecision @ {:<4}{} ({} queries considered)",
                format!("{}:", p.k),
                p.value,
                p.queries_considered
            )?;
        }
        Ok(())
    }
}
