pub mod config;
pub mod error;
pub mod eval;
pub mod qrels;

pub use config::Config;
pub use error::{EvalError, Result};
pub use eval::{EvalReport, EvalSettings, Evaluator};
pub use qrels::{DocId, Judgment, QueryId, Qrels, Relevance};
