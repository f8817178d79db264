//! Asynchronous query submission.

use tokio::task::JoinHandle;

use crate::error::{Result, SkeinError};
use crate::retrieval::collector::ScoredDocument;

/// A query running on the blocking thread pool.
#[derive(Debug)]
pub struct QueryHandle {
    handle: JoinHandle<Result<Vec<ScoredDocument>>>,
}

impl QueryHandle {
    pub(crate) fn new(handle: JoinHandle<Result<Vec<ScoredDocument>>>) -> Self {
        QueryHandle { handle }
    }

    /// Whether the query has completed.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the results.
    pub async fn wait(self) -> Result<Vec<ScoredDocument>> {
        self.handle
            .await
            .map_err(|e| SkeinError::other(format!("query task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wait_returns_task_result() {
        let handle = QueryHandle::new(tokio::task::spawn_blocking(|| {
            Ok(vec![ScoredDocument::new(4, 0.5)])
        }));
        let results = handle.wait().await.unwrap();
        assert_eq!(results[0].document, 4);
    }

    #[tokio::test]
    async fn test_wait_reports_panics() {
        let task = tokio::task::spawn_blocking(|| -> Result<Vec<ScoredDocument>> {
            panic!("boom")
        });
        let handle = QueryHandle::new(task);
        assert!(matches!(handle.wait().await, Err(SkeinError::Other(_))));
    }
}
