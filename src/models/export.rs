use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Snippet;

/// Export options for customizing what to export
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub include_code: bool,
    pub favorites_only: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_code: true,
            favorites_only: false,
        }
    }
}

/// Export file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub snippets: Vec<Snippet>,
}

impl ExportData {
    /// Create a new export data object from the collection
    pub fn from_collection(snippets: &[Snippet], options: &ExportOptions) -> Self {
        let snippets = snippets
            .iter()
            .filter(|snippet| !options.favorites_only || snippet.favorite)
            .cloned()
            .map(|mut snippet| {
                // Optionally strip code to reduce export size
                if !options.include_code {
                    snippet.code = String::new();
                }
                snippet
            })
            .collect();

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: Utc::now(),
            snippets,
        }
    }
}

/// Export the collection to a JSON file
pub fn export_collection(snippets: &[Snippet], path: &Path, options: &ExportOptions) -> Result<()> {
    let data = ExportData::from_collection(snippets, options);

    let json =
        serde_json::to_string_pretty(&data).context("Failed to serialize snippets to JSON")?;
    fs::write(path, json).context("Failed to write JSON export file")?;

    Ok(())
}

/// Import a collection from an export file
pub fn import_collection(path: &Path) -> Result<ExportData> {
    let contents = fs::read_to_string(path).context("Failed to read import file")?;
    serde_json::from_str(&contents).context("Failed to parse import file as JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateSnippetInput, SnippetCategory, SnippetLanguage};

    fn snippet(title: &str, favorite: bool) -> Snippet {
        Snippet::new(CreateSnippetInput {
            title: title.to_string(),
            description: String::new(),
            code: String::from("echo hello"),
            language: SnippetLanguage::Bash,
            category: SnippetCategory::Scripting,
            tags: Vec::new(),
            favorite,
        })
    }

    #[test]
    fn favorites_only_drops_unstarred_snippets() {
        let snippets = vec![snippet("starred", true), snippet("plain", false)];

        let options = ExportOptions {
            favorites_only: true,
            ..Default::default()
        };
        let data = ExportData::from_collection(&snippets, &options);

        assert_eq!(data.snippets.len(), 1);
        assert_eq!(data.snippets[0].title, "starred");
    }

    #[test]
    fn include_code_false_strips_code_but_keeps_metadata() {
        let snippets = vec![snippet("stripped", false)];

        let options = ExportOptions {
            include_code: false,
            ..Default::default()
        };
        let data = ExportData::from_collection(&snippets, &options);

        assert!(data.snippets[0].code.is_empty());
        assert_eq!(data.snippets[0].title, "stripped");
        assert_eq!(data.version, env!("CARGO_PKG_VERSION"));
    }
}
