//! Evaluation framework: metrics (Hits@K, MRR, P@K), run files, and the report.

pub mod evaluator;
pub mod metrics;
pub mod report;
pub mod run;

pub use evaluator::{EvalSettings, Evaluator};
pub use metrics::{
    avg_hits_at_k, avg_precision_at_k, hit_at_k, mean_reciprocal_rank, precision_at_k,
    reciprocal_rank, EPS, NOT_EVALUABLE,
};
pub use report::{EvalReport, HitsScore, PrecisionScore};
pub use run::{Run, RunEntry};
