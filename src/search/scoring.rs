// file: src/search/scoring.rs
// description: per keyword/candidate scores and the per-location score accumulator

use crate::config::ScoringConfig;
use crate::search::similarity::SimilarityMeasure;
use std::collections::BTreeMap;
use tracing::debug;

/// Fuzzy-matching switch and threshold for one search call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuzzyOptions {
    pub enabled: bool,
    /// Minimum similarity ratio, 0-100.
    pub threshold: u8,
}

impl FuzzyOptions {
    pub fn new(enabled: bool, threshold: u8) -> Self {
        Self {
            enabled,
            threshold: threshold.min(100),
        }
    }

    pub fn exact() -> Self {
        Self::new(false, 100)
    }

    fn accepts(&self, ratio: f64) -> bool {
        ratio >= f64::from(self.threshold)
    }
}

/// A query keyword with its lowercased form computed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryKeyword {
    pub original: String,
    pub lower: String,
}

impl QueryKeyword {
    /// `None` for blank keywords, which carry nothing to match on.
    pub fn new(keyword: &str) -> Option<Self> {
        if keyword.trim().is_empty() {
            return None;
        }
        Some(Self {
            original: keyword.to_string(),
            lower: keyword.to_lowercase(),
        })
    }
}

/// Score of one keyword against one lowercased heading.
///
/// A fuzzy hit scores `base + ratio / divisor` (above any plain substring
/// hit); otherwise a substring hit scores the flat substring score.
pub fn heading_score(
    keyword: &str,
    heading: &str,
    fuzzy: FuzzyOptions,
    scoring: &ScoringConfig,
    similarity: &dyn SimilarityMeasure,
) -> f64 {
    let substring = || {
        if heading.contains(keyword) {
            scoring.heading_substring_score
        } else {
            0.0
        }
    };

    if !fuzzy.enabled {
        return substring();
    }

    match similarity.ratio(keyword, heading) {
        Ok(ratio) if fuzzy.accepts(ratio) => {
            scoring.heading_fuzzy_base + ratio / scoring.heading_fuzzy_divisor
        }
        Ok(_) => substring(),
        Err(e) => {
            debug!("Similarity failed for heading, using substring check: {}", e);
            substring()
        }
    }
}

/// Score of one keyword against one lowercased paragraph.
///
/// Substring hits win outright. Fuzzy scoring is only attempted for
/// paragraphs shorter than `fuzzy_max_chars` and stays below a substring hit.
pub fn content_score(
    keyword: &str,
    paragraph: &str,
    paragraph_chars: usize,
    fuzzy: FuzzyOptions,
    fuzzy_max_chars: usize,
    scoring: &ScoringConfig,
    similarity: &dyn SimilarityMeasure,
) -> f64 {
    if paragraph.contains(keyword) {
        return scoring.content_substring_score;
    }

    if !fuzzy.enabled || paragraph_chars >= fuzzy_max_chars {
        return 0.0;
    }

    match similarity.ratio(keyword, paragraph) {
        Ok(ratio) if fuzzy.accepts(ratio) => {
            scoring.content_fuzzy_base + ratio / scoring.content_fuzzy_divisor
        }
        Ok(_) => 0.0,
        Err(e) => {
            debug!("Similarity failed for paragraph, skipping fuzzy score: {}", e);
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Accumulated {
    /// Index of the heading or paragraph this location came from.
    pub source: usize,
    pub score: f64,
    pub keywords: Vec<String>,
}

/// Groups keyword hits by document position: scores add up and each keyword
/// counts at most once per position.
#[derive(Debug, Default)]
pub(crate) struct ScoreAccumulator {
    entries: BTreeMap<usize, Accumulated>,
}

impl ScoreAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, position: usize, source: usize, keyword: &str, score: f64) {
        if score <= 0.0 {
            return;
        }

        let entry = self.entries.entry(position).or_insert_with(|| Accumulated {
            source,
            score: 0.0,
            keywords: Vec::new(),
        });

        if entry.keywords.iter().any(|k| k == keyword) {
            return;
        }
        entry.score += score;
        entry.keywords.push(keyword.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in ascending position order.
    pub fn into_entries(self) -> impl Iterator<Item = (usize, Accumulated)> {
        self.entries.into_iter()
    }
}
