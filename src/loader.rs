// file: src/loader.rs
// description: read a knowledge base file from disk and decode it
// reference: https://docs.rs/encoding_rs

use crate::error::{NavigatorError, Result};
use crate::models::{DocumentFormat, KnowledgeBase};
use crate::parser::StructureParser;
use encoding_rs::GBK;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

const UTF8_BOM: &str = "\u{feff}";

pub struct DocumentLoader {
    parser: StructureParser,
}

impl DocumentLoader {
    pub fn new() -> Self {
        Self {
            parser: StructureParser::new(),
        }
    }

    /// Reads `path` as UTF-8, falling back to GBK, and parses its headings.
    pub fn load(&self, path: &Path) -> Result<KnowledgeBase> {
        let bytes = fs::read(path).map_err(|e| NavigatorError::FileOperation {
            path: path.to_path_buf(),
            source: e,
        })?;

        let (text, encoding) = decode(&bytes, path);
        let format = DocumentFormat::from_path(path);
        let headings = self.parser.parse(&text, format);

        info!(
            "Loaded {} ({}, {}): {} headings",
            path.display(),
            format.as_str(),
            encoding,
            headings.len()
        );

        Ok(KnowledgeBase::with_headings(text, format, headings).with_source(path.to_path_buf(), encoding))
    }
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Decoded text and the label of the encoding that produced it.
fn decode(bytes: &[u8], path: &Path) -> (String, &'static str) {
    if let Ok(text) = std::str::from_utf8(bytes) {
        let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);
        return (text.to_string(), "UTF-8");
    }

    warn!("{} is not valid UTF-8, decoding as GBK", path.display());
    let (text, _, had_errors) = GBK.decode(bytes);
    if had_errors {
        warn!(
            "{} contains bytes that are not valid GBK either; they were replaced",
            path.display()
        );
    }
    (text.into_owned(), "GBK")
}
