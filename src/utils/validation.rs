// file: src/utils/validation.rs
// description: input validation for knowledge base files, queries and options

use crate::error::{NavigatorError, Result};
use std::fs;
use std::path::Path;

const KNOWLEDGE_BASE_EXTENSIONS: [&str; 3] = ["md", "markdown", "txt"];

pub struct Validator;

impl Validator {
    pub fn validate_file_path(path: &Path) -> Result<()> {
        let canonical = fs::canonicalize(path).map_err(|e| {
            NavigatorError::Validation(format!(
                "Cannot canonicalize path {}: {}",
                path.display(),
                e
            ))
        })?;

        if !canonical.is_file() {
            return Err(NavigatorError::Validation(format!(
                "Path is not a file: {}",
                canonical.display()
            )));
        }

        Ok(())
    }

    pub fn validate_knowledge_base_extension(path: &Path) -> Result<()> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension {
            Some(ext) if KNOWLEDGE_BASE_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
            _ => Err(NavigatorError::Validation(format!(
                "Knowledge base must be a .md, .markdown or .txt file: {}",
                path.display()
            ))),
        }
    }

    pub fn validate_knowledge_base(path: &Path) -> Result<()> {
        Self::validate_file_path(path)?;
        Self::validate_knowledge_base_extension(path)
    }

    pub fn validate_query(query: &str) -> Result<()> {
        if query.trim().is_empty() {
            return Err(NavigatorError::Validation("Query is empty".to_string()));
        }
        Ok(())
    }

    pub fn validate_threshold(threshold: u8) -> Result<()> {
        if threshold > 100 {
            return Err(NavigatorError::Validation(format!(
                "Fuzzy threshold must be between 0 and 100, got {}",
                threshold
            )));
        }
        Ok(())
    }

    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            text.to_string()
        } else {
            let head: String = text.chars().take(max_chars).collect();
            format!("{}...", head)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_file_path() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("guide.md");
        fs::write(&file_path, "# Guide").unwrap();

        assert!(Validator::validate_file_path(&file_path).is_ok());
        assert!(Validator::validate_file_path(temp.path()).is_err());
        assert!(Validator::validate_file_path(Path::new("/nonexistent")).is_err());
    }

    #[test]
    fn test_validate_knowledge_base_extension() {
        assert!(Validator::validate_knowledge_base_extension(Path::new("kb.md")).is_ok());
        assert!(Validator::validate_knowledge_base_extension(Path::new("kb.MARKDOWN")).is_ok());
        assert!(Validator::validate_knowledge_base_extension(Path::new("kb.txt")).is_ok());
        assert!(Validator::validate_knowledge_base_extension(Path::new("kb.pdf")).is_err());
        assert!(Validator::validate_knowledge_base_extension(Path::new("kb")).is_err());
    }

    #[test]
    fn test_validate_query_and_threshold() {
        assert!(Validator::validate_query("redis").is_ok());
        assert!(Validator::validate_query("  \n").is_err());
        assert!(Validator::validate_threshold(100).is_ok());
        assert!(Validator::validate_threshold(101).is_err());
    }

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(Validator::truncate_text("short", 10), "short");
        assert_eq!(Validator::truncate_text("缓存策略很重要", 4), "缓存策略...");
    }
}
