// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for batch searches
// reference: uses indicatif for progress bars and tracks search counters

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchStats {
    pub queries_completed: usize,
    pub queries_failed: usize,
    pub cache_hits: usize,
    pub total_matches: usize,
    pub duration: Duration,
}

impl BatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queries_per_second(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.queries_completed as f64 / secs
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.queries_completed + self.queries_failed;
        if total == 0 {
            return 0.0;
        }
        (self.queries_completed as f64 / total as f64) * 100.0
    }

    pub fn average_matches(&self) -> f64 {
        if self.queries_completed == 0 {
            return 0.0;
        }
        self.total_matches as f64 / self.queries_completed as f64
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    completed: Arc<AtomicUsize>,
    failed: Arc<AtomicUsize>,
    cache_hits: Arc<AtomicUsize>,
    matches: Arc<AtomicUsize>,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(total_queries: usize) -> Self {
        Self::with_color(total_queries, true)
    }

    pub fn with_color(total_queries: usize, colored: bool) -> Self {
        Self::build(MultiProgress::new(), total_queries, colored)
    }

    /// Tracks counters without drawing anything, for tests and quiet runs.
    pub fn hidden(total_queries: usize) -> Self {
        Self::build(
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
            total_queries,
            false,
        )
    }

    fn build(multi_progress: MultiProgress, total_queries: usize, colored: bool) -> Self {
        let main_bar = create_progress_bar(&multi_progress, total_queries as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            main_bar,
            detail_bar,
            completed: Arc::new(AtomicUsize::new(0)),
            failed: Arc::new(AtomicUsize::new(0)),
            cache_hits: Arc::new(AtomicUsize::new(0)),
            matches: Arc::new(AtomicUsize::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_completed(&self, match_count: usize, from_cache: bool) {
        self.completed.fetch_add(1, Ordering::SeqCst);
        self.matches.fetch_add(match_count, Ordering::SeqCst);
        if from_cache {
            self.cache_hits.fetch_add(1, Ordering::SeqCst);
        }
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn inc_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn set_message(&self, message: String) {
        self.detail_bar.set_message(message);
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Batch complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> BatchStats {
        BatchStats {
            queries_completed: self.completed.load(Ordering::SeqCst),
            queries_failed: self.failed.load(Ordering::SeqCst),
            cache_hits: self.cache_hits.load(Ordering::SeqCst),
            total_matches: self.matches.load(Ordering::SeqCst),
            duration: self.start_time.elapsed(),
        }
    }

    fn update_detail_bar(&self) {
        let matches = self.matches.load(Ordering::SeqCst);
        let hits = self.cache_hits.load(Ordering::SeqCst);
        let failed = self.failed.load(Ordering::SeqCst);

        let message = format!("Matches: {} | Cache hits: {} | Failed: {}", matches, hits, failed);

        self.detail_bar.set_message(message);
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    let template = if colored {
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} queries {msg}"
    } else {
        "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} queries {msg}"
    };

    if let Ok(style) = ProgressStyle::default_bar().template(template) {
        let chars = if colored { "█▓▒░" } else { "=>-" };
        bar.set_style(style.progress_chars(chars));
    }
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    if let Ok(style) = ProgressStyle::default_bar().template("{msg}") {
        bar.set_style(style);
    }
    bar
}
