// file: src/models/knowledge_base.rs
// description: loaded knowledge base document with its parsed heading structure
// reference: internal data structures

use crate::models::Heading;
use crate::parser::StructureParser;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Markdown,
    PlainText,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("md") | Some("markdown") => DocumentFormat::Markdown,
            _ => DocumentFormat::PlainText,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Markdown => "markdown",
            DocumentFormat::PlainText => "text",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub path: Option<PathBuf>,
    pub format: DocumentFormat,
    pub text: String,
    pub encoding: String,
    pub content_hash: String,
    pub headings: Vec<Heading>,
    pub loaded_at: u64,
}

impl KnowledgeBase {
    /// Builds a knowledge base from already decoded text and parses its headings.
    pub fn from_text(text: impl Into<String>, format: DocumentFormat) -> Self {
        let text = text.into();
        let headings = StructureParser::new().parse(&text, format);
        Self::with_headings(text, format, headings)
    }

    /// Builds a knowledge base from text and a heading list supplied by another parser.
    pub fn with_headings(text: String, format: DocumentFormat, headings: Vec<Heading>) -> Self {
        let content_hash = Self::compute_hash(&text);
        let loaded_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Self {
            path: None,
            format,
            text,
            encoding: "UTF-8".to_string(),
            content_hash,
            headings,
            loaded_at,
        }
    }

    pub fn with_source(mut self, path: PathBuf, encoding: &str) -> Self {
        self.path = Some(path);
        self.encoding = encoding.to_string();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "<memory>".to_string())
    }

    fn compute_hash(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
