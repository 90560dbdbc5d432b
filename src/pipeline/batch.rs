// file: src/pipeline/batch.rs
// description: runs many queries against one knowledge base concurrently
// reference: blocking searches fanned out over a bounded async stream

use crate::error::{NavigatorError, Result};
use crate::pipeline::progress::{BatchStats, ProgressTracker};
use crate::search::{SearchEngine, SearchOutcome};
use crate::utils::{OperationTimer, PerformanceMetrics};
use futures::stream::{self, StreamExt};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// One query of a batch and what became of it.
#[derive(Debug)]
pub struct BatchEntry {
    pub query: String,
    pub outcome: Result<SearchOutcome>,
}

#[derive(Debug)]
pub struct BatchReport {
    /// In the same order as the submitted queries.
    pub entries: Vec<BatchEntry>,
    pub stats: BatchStats,
    pub metrics: PerformanceMetrics,
}

impl BatchReport {
    pub fn outcomes(&self) -> impl Iterator<Item = &SearchOutcome> {
        self.entries.iter().filter_map(|e| e.outcome.as_ref().ok())
    }
}

pub struct BatchSearcher {
    engine: Arc<SearchEngine>,
    max_concurrent_tasks: usize,
    show_progress: bool,
    colored: bool,
}

impl BatchSearcher {
    pub fn new(engine: Arc<SearchEngine>) -> Self {
        let max_concurrent_tasks = engine.config().pipeline.parallel_workers.max(1);
        Self {
            engine,
            max_concurrent_tasks,
            show_progress: true,
            colored: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool, colored: bool) -> Self {
        self.show_progress = show_progress;
        self.colored = colored;
        self
    }

    pub async fn run(&self, queries: Vec<String>) -> BatchReport {
        let timer = OperationTimer::new("batch search");
        let total = queries.len();
        let progress = Arc::new(if self.show_progress {
            ProgressTracker::with_color(total, self.colored)
        } else {
            ProgressTracker::hidden(total)
        });

        info!(
            "Searching {} queries with {} concurrent tasks...",
            total, self.max_concurrent_tasks
        );

        let tasks = queries.into_iter().enumerate().map(|(index, query)| {
            let engine = Arc::clone(&self.engine);
            let progress = Arc::clone(&progress);

            async move {
                let searched = tokio::task::spawn_blocking({
                    let query = query.clone();
                    move || engine.search(&query)
                })
                .await;

                let outcome = match searched {
                    Ok(outcome) => {
                        progress.inc_completed(outcome.matches.len(), outcome.from_cache);
                        Ok(outcome)
                    }
                    Err(e) => {
                        progress.inc_failed();
                        error!("Search task for '{}' failed: {}", query, e);
                        Err(NavigatorError::Task(e.to_string()))
                    }
                };

                (index, BatchEntry { query, outcome })
            }
        });

        let mut indexed: Vec<(usize, BatchEntry)> = stream::iter(tasks)
            .buffer_unordered(self.max_concurrent_tasks)
            .collect()
            .await;
        indexed.sort_by_key(|(index, _)| *index);

        progress.finish();
        let stats = progress.get_stats();
        let duration = timer.finish_with_count(total);
        let metrics = PerformanceMetrics::new("batch search", total, duration);

        if stats.queries_failed > 0 {
            warn!("{} of {} queries failed", stats.queries_failed, total);
        }
        let (hits, misses) = self.engine.cache_stats();
        debug!("Engine cache: {} hits, {} misses so far", hits, misses);

        BatchReport {
            entries: indexed.into_iter().map(|(_, entry)| entry).collect(),
            stats,
            metrics,
        }
    }
}

/// One query per non-blank line, trimmed.
pub fn load_queries(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| NavigatorError::FileOperation {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
