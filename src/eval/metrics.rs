//! Evaluation metrics: Hits@K, Mean Reciprocal Rank (MRR) and Precision@K.
//!
//! Batch averages divide by `count + EPS` so an empty batch scores 0.0
//! instead of NaN.

use crate::error::{EvalError, Result};
use crate::qrels::{DocId, QueryId, Qrels};

/// Zero-guard added to every denominator.
pub const EPS: f64 = 1e-12;

/// Returned by [`precision_at_k`] when the query has fewer than `k` relevant documents.
pub const NOT_EVALUABLE: f64 = -1.0;

fn ensure_aligned(query_ids: &[QueryId], predictions: &[Vec<DocId>]) -> Result<()> {
    if query_ids.len() != predictions.len() {
        return Err(EvalError::LengthMismatch {
            queries: query_ids.len(),
            predictions: predictions.len(),
        });
    }
    Ok(())
}

/// Hit at K: 1 if the primary document is in the top-K predictions, else 0.
/// Fails if `predictions` has fewer than `k` entries.
pub fn hit_at_k(qrels: &Qrels, query_id: QueryId, predictions: &[DocId], k: usize) -> Result<u8> {
    if predictions.len() < k {
        return Err(EvalError::InsufficientPredictions {
            query_id,
            k,
            len: predictions.len(),
        });
    }
    let golden = qrels.primary_relevant(query_id)?;
    Ok(u8::from(predictions[..k].contains(&golden)))
}

/// Hits at K averaged over the batch. Any short prediction list aborts the whole call.
pub fn avg_hits_at_k(
    qrels: &Qrels,
    query_ids: &[QueryId],
    predictions: &[Vec<DocId>],
    k: usize,
) -> Result<f64> {
    ensure_aligned(query_ids, predictions)?;
    let mut count = 0usize;
    let mut sum = 0.0;
    for (&query_id, predicted) in query_ids.iter().zip(predictions) {
        sum += f64::from(hit_at_k(qrels, query_id, predicted, k)?);
        count += 1;
    }
    Ok(sum / (count as f64 + EPS))
}

/// Reciprocal rank of the primary document: 1/(position+1), or 0 if absent.
pub fn reciprocal_rank(qrels: &Qrels, query_id: QueryId, predictions: &[DocId]) -> Result<f64> {
    let golden = qrels.primary_relevant(query_id)?;
    Ok(predictions
        .iter()
        .position(|&doc_id| doc_id == golden)
        .map_or(0.0, |rank| 1.0 / (rank + 1) as f64))
}

/// Mean Reciprocal Rank over the batch.
pub fn mean_reciprocal_rank(
    qrels: &Qrels,
    query_ids: &[QueryId],
    predictions: &[Vec<DocId>],
) -> Result<f64> {
    ensure_aligned(query_ids, predictions)?;
    let mut count = 0usize;
    let mut sum = 0.0;
    for (&query_id, predicted) in query_ids.iter().zip(predictions) {
        sum += reciprocal_rank(qrels, query_id, predicted)?;
        count += 1;
    }
    Ok(sum / (count as f64 + EPS))
}

/// Precision at K: relevant documents in the top-K, divided by K.
///
/// Returns [`NOT_EVALUABLE`] when fewer than `k` documents are judged relevant
/// for the query, whatever the predictions contain.
pub fn precision_at_k(qrels: &Qrels, query_id: QueryId, predictions: &[DocId], k: usize) -> f64 {
    let golden = qrels.all_relevant(query_id);
    if golden.len() < k {
        return NOT_EVALUABLE;
    }
    let mut top_k: Vec<DocId> = predictions.iter().take(k).copied().collect();
    top_k.sort_unstable();
    top_k.dedup();
    let hits = top_k.iter().filter(|doc_id| golden.contains(doc_id)).count();
    hits as f64 / (k as f64 + EPS)
}

/// Precision at K averaged over evaluable queries.
///
/// Queries with too few relevant documents are skipped and excluded from the
/// count. Returns `(average, queries_considered)`.
pub fn avg_precision_at_k(
    qrels: &Qrels,
    query_ids: &[QueryId],
    predictions: &[Vec<DocId>],
    k: usize,
) -> Result<(f64, usize)> {
    ensure_aligned(query_ids, predictions)?;
    let mut count = 0usize;
    let mut sum = 0.0;
    for (&query_id, predicted) in query_ids.iter().zip(predictions) {
        let precision = precision_at_k(qrels, query_id, predicted, k);
        if precision == NOT_EVALUABLE {
            log::warn!(
                "Query {} has less than {} golden relevant documents, skipping",
                query_id,
                k
            );
            continue;
        }
        sum += precision;
        count += 1;
    }
    Ok((sum / (count as f64 + EPS), count))
}
