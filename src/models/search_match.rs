// file: src/models/search_match.rs
// description: ranked match record produced by the matcher
// reference: heading and paragraph hits with accumulated keyword scores

use crate::utils::Validator;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Heading,
    Content,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Heading => "heading",
            MatchType::Content => "content",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    /// Heading text, or `"{nearest heading} - {snippet}"` for content hits
    pub text: String,

    /// Character offset of the heading or paragraph start in the document
    pub position: usize,

    /// Sum of every contributing keyword's score (higher is more relevant)
    pub score: f64,

    #[serde(rename = "type")]
    pub match_type: MatchType,

    /// Distinct keywords that contributed, in contribution order
    pub keywords: Vec<String>,
}

impl SearchMatch {
    pub fn new(
        text: String,
        position: usize,
        score: f64,
        match_type: MatchType,
        keywords: Vec<String>,
    ) -> Self {
        Self {
            text,
            position,
            score,
            match_type,
            keywords,
        }
    }

    pub fn is_heading(&self) -> bool {
        self.match_type == MatchType::Heading
    }

    /// Score mapped onto a 0-100 scale: one plain substring hit is 20%.
    pub fn relevance_percent(&self) -> u8 {
        (self.score * 20.0).clamp(0.0, 100.0) as u8
    }

    /// Format as a summary line for display
    pub fn format_summary(&self, max_text_chars: usize) -> String {
        let preview = Validator::truncate_text(&self.text, max_text_chars);

        format!(
            "Score: {:.4} | {} @{} [{}]\n{}\n",
            self.score,
            self.match_type.as_str(),
            self.position,
            self.keywords.join(", "),
            preview
        )
    }
}
