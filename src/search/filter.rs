// file: src/search/filter.rs
// description: display-side filtering and ordering of ranked matches

use crate::models::{Heading, SearchMatch};
use crate::parser::parent_chapter;
use crate::search::content::nearest_heading;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Level used when a match cannot be tied to any heading.
const UNKNOWN_LEVEL: u32 = 99;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchFilter {
    pub show_headings: bool,
    pub show_content: bool,
    /// Minimum relevance percent, 0-100.
    pub min_relevance: u8,
    /// Only keep matches under this level-1 chapter.
    pub chapter: Option<String>,
}

impl MatchFilter {
    pub fn new() -> Self {
        Self {
            show_headings: true,
            show_content: true,
            min_relevance: 0,
            chapter: None,
        }
    }

    pub fn accepts(&self, found: &SearchMatch, headings: &[Heading]) -> bool {
        let shown = if found.is_heading() {
            self.show_headings
        } else {
            self.show_content
        };
        if !shown || found.relevance_percent() < self.min_relevance {
            return false;
        }

        match &self.chapter {
            Some(chapter) => parent_chapter(headings, found.position) == chapter,
            None => true,
        }
    }

    pub fn apply(&self, matches: &[SearchMatch], headings: &[Heading]) -> Vec<SearchMatch> {
        matches
            .iter()
            .filter(|m| self.accepts(m, headings))
            .cloned()
            .collect()
    }
}

impl Default for MatchFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Relevance,
    Position,
    Level,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "relevance" => Ok(SortOrder::Relevance),
            "position" => Ok(SortOrder::Position),
            "level" => Ok(SortOrder::Level),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

/// Reorders `matches` in place. Every order is stable.
pub fn sort_matches(matches: &mut [SearchMatch], order: SortOrder, headings: &[Heading]) {
    match order {
        SortOrder::Relevance => matches.sort_by(|a, b| b.score.total_cmp(&a.score)),
        SortOrder::Position => matches.sort_by_key(|m| m.position),
        SortOrder::Level => matches.sort_by_cached_key(|m| (level_rank(m, headings), m.position)),
    }
}

/// Twice the effective level, so content sits half a level below its heading.
fn level_rank(found: &SearchMatch, headings: &[Heading]) -> u32 {
    if found.is_heading() {
        let level = headings
            .iter()
            .find(|h| h.position == found.position)
            .map(|h| h.level)
            .unwrap_or(UNKNOWN_LEVEL);
        level * 2
    } else {
        nearest_heading(headings, found.position)
            .map(|h| h.level * 2 + 1)
            .unwrap_or(UNKNOWN_LEVEL * 2)
    }
}
