//! Run file: ranked predictions produced by an external retrieval model.

use crate::error::Result;
use crate::qrels::{DocId, QueryId};
use serde::Deserialize;
use std::path::Path;

/// Ranked predictions for one query, highest confidence first.
#[derive(Debug, Clone, Deserialize)]
pub struct RunEntry {
    pub query_id: QueryId,
    pub predictions: Vec<DocId>,
}

/// A full run, kept in file order.
#[derive(Debug, Clone, Default)]
pub struct Run {
    pub entries: Vec<RunEntry>,
}

impl Run {
    /// Parse a JSON array of `{"query_id": .., "predictions": [..]}` objects.
    pub fn from_json(content: &str) -> Result<Self> {
        let entries: Vec<RunEntry> = serde_json::from_str(content)?;
        Ok(Self { entries })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let run = Self::from_json(&content)?;
        log::debug!(
            "Loaded run with {} queries from {}",
            run.len(),
            path.as_ref().display()
        );
        Ok(run)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Split into the index-aligned `(query_ids, predictions)` pair the metrics take.
    pub fn into_parts(self) -> (Vec<QueryId>, Vec<Vec<DocId>>) {
        self.entries
            .into_iter()
            .map(|e| (e.query_id, e.predictions))
            .unzip()
    }
}
