// file: src/exporter/json.rs
// description: json export of search outcomes

use crate::error::{NavigatorError, Result};
use crate::models::{KnowledgeBase, SearchMatch};
use crate::search::SearchOutcome;
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ExportedSearch<'a> {
    pub exported_at: String,
    pub source: Option<&'a Path>,
    pub content_hash: &'a str,
    pub query: &'a str,
    pub keywords: &'a BTreeSet<String>,
    pub elapsed_ms: u128,
    pub from_cache: bool,
    pub matches: &'a [SearchMatch],
}

#[derive(Debug, Serialize)]
pub struct ExportManifest {
    pub exported_at: String,
    pub total_searches: usize,
    pub total_matches: usize,
    pub files: Vec<String>,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).map_err(|e| NavigatorError::FileOperation {
            path: output_dir.clone(),
            source: e,
        })?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes one search report and returns the file path.
    pub fn export_outcome(
        &self,
        outcome: &SearchOutcome,
        knowledge_base: &KnowledgeBase,
        pretty: bool,
    ) -> Result<PathBuf> {
        let now = Utc::now();
        let report = ExportedSearch {
            exported_at: now.to_rfc3339(),
            source: knowledge_base.path.as_deref(),
            content_hash: &knowledge_base.content_hash,
            query: &outcome.query,
            keywords: &outcome.keywords,
            elapsed_ms: outcome.elapsed.as_millis(),
            from_cache: outcome.from_cache,
            matches: &outcome.matches,
        };

        let file_name = format!("search-{}.json", now.format("%Y%m%dT%H%M%S%.6f"));
        let path = self.unique_path(&file_name);
        self.write_json(&path, &report, pretty)?;

        info!(
            "Exported {} matches for '{}' to {}",
            outcome.matches.len(),
            outcome.query,
            path.display()
        );
        Ok(path)
    }

    /// Writes every outcome of a batch run plus a manifest listing the files.
    pub fn export_batch(
        &self,
        outcomes: &[SearchOutcome],
        knowledge_base: &KnowledgeBase,
        pretty: bool,
    ) -> Result<ExportManifest> {
        info!("Starting JSON export to {:?}", self.output_dir);

        let mut files = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            let path = self.export_outcome(outcome, knowledge_base, pretty)?;
            files.push(path.display().to_string());
        }

        let manifest = ExportManifest {
            exported_at: Utc::now().to_rfc3339(),
            total_searches: outcomes.len(),
            total_matches: outcomes.iter().map(|o| o.matches.len()).sum(),
            files,
        };

        let manifest_path = self.unique_path("manifest.json");
        self.write_json(&manifest_path, &manifest, pretty)?;

        info!(
            "Export complete: {} searches written",
            manifest.total_searches
        );
        Ok(manifest)
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T, pretty: bool) -> Result<()> {
        let json = if pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };

        fs::write(path, json).map_err(|e| NavigatorError::FileOperation {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Appends a counter when `file_name` already exists in the output directory.
    fn unique_path(&self, file_name: &str) -> PathBuf {
        let candidate = self.output_dir.join(file_name);
        if !candidate.exists() {
            return candidate;
        }

        let (stem, extension) = file_name.rsplit_once('.').unwrap_or((file_name, "json"));
        (1..)
            .map(|n| self.output_dir.join(format!("{}-{}.{}", stem, n, extension)))
            .find(|p| !p.exists())
            .unwrap_or(candidate)
    }
}
