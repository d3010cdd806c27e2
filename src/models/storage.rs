use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use tokio::fs;
use uuid::Uuid;

use crate::models::error::{Result, StorageError};
use crate::models::{CreateSnippetInput, Snippet, SnippetFilter, UpdateSnippetInput};

const STORAGE_DIR_NAME: &str = ".omnisnip";
const SNIPPETS_FILE_NAME: &str = "snippets.json";

/// Storage service for disk operations.
///
/// One instance owns one `snippets.json` holding the whole collection as a
/// JSON array in insertion order. Every operation is a whole-file
/// read-modify-write with no locking: callers must await each operation
/// before issuing the next, and pointing a second instance (or a second
/// process) at the same path is unsupported.
#[derive(Debug)]
pub struct StorageService {
    storage_dir: PathBuf,
    snippets_file: PathBuf,
}

impl StorageService {
    /// Creates a service over the default `~/.omnisnip` directory
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir().ok_or(StorageError::HomeDir)?;
        Ok(Self::with_directory(home.join(STORAGE_DIR_NAME)))
    }

    /// Creates a service over an explicit storage directory. Nothing is
    /// touched on disk until the first write; a store that was never
    /// written to reads as an empty collection.
    pub fn with_directory(dir: impl Into<PathBuf>) -> Self {
        let storage_dir = dir.into();
        let snippets_file = storage_dir.join(SNIPPETS_FILE_NAME);

        Self {
            storage_dir,
            snippets_file,
        }
    }

    pub fn snippets_file(&self) -> &Path {
        &self.snippets_file
    }

    async fn read_collection(&self) -> Result<Vec<Snippet>> {
        match fs::read_to_string(&self.snippets_file).await {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|source| StorageError::Parse {
                    path: self.snippets_file.clone(),
                    source,
                })
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(StorageError::Read {
                path: self.snippets_file.clone(),
                source,
            }),
        }
    }

    async fn write_collection(&self, snippets: &[Snippet]) -> Result<()> {
        fs::create_dir_all(&self.storage_dir)
            .await
            .map_err(|source| StorageError::Directory {
                path: self.storage_dir.clone(),
                source,
            })?;

        let content =
            serde_json::to_string_pretty(snippets).map_err(|source| StorageError::Parse {
                path: self.snippets_file.clone(),
                source,
            })?;

        fs::write(&self.snippets_file, content)
            .await
            .map_err(|source| StorageError::Write {
                path: self.snippets_file.clone(),
                source,
            })?;

        debug!(
            "wrote {} snippets to {}",
            snippets.len(),
            self.snippets_file.display()
        );
        Ok(())
    }

    /// Creates a snippet, appends it to the collection and persists.
    /// Returns the created record with its generated id and timestamps.
    pub async fn add(&self, input: CreateSnippetInput) -> Result<Snippet> {
        let mut snippets = self.read_collection().await?;
        let snippet = Snippet::new(input);
        snippets.push(snippet.clone());
        self.write_collection(&snippets).await?;
        Ok(snippet)
    }

    /// Returns every snippet in file order
    pub async fn get_all(&self) -> Result<Vec<Snippet>> {
        self.read_collection().await
    }

    /// Linear scan for the first snippet with a matching id
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Snippet>> {
        let snippets = self.read_collection().await?;
        Ok(snippets.into_iter().find(|snippet| snippet.id == id))
    }

    /// Applies a partial update to the record with the given id and
    /// persists. The record keeps its position and `created_at`; absent
    /// input fields keep their prior value. Returns `None` when no record
    /// matches.
    pub async fn update(&self, id: Uuid, input: UpdateSnippetInput) -> Result<Option<Snippet>> {
        let mut snippets = self.read_collection().await?;

        let Some(snippet) = snippets.iter_mut().find(|snippet| snippet.id == id) else {
            return Ok(None);
        };

        snippet.apply_update(input);
        let updated = snippet.clone();
        self.write_collection(&snippets).await?;
        Ok(Some(updated))
    }

    /// Removes the first snippet with a matching id. The collection is only
    /// rewritten when something was actually removed.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut snippets = self.read_collection().await?;

        let Some(index) = snippets.iter().position(|snippet| snippet.id == id) else {
            return Ok(false);
        };

        snippets.remove(index);
        self.write_collection(&snippets).await?;
        Ok(true)
    }

    /// Persists an empty collection unconditionally
    pub async fn delete_all(&self) -> Result<()> {
        self.write_collection(&[]).await
    }

    /// Applies every supplied criterion (AND), then the optional sort
    pub async fn filter(&self, criteria: &SnippetFilter) -> Result<Vec<Snippet>> {
        let snippets = self.read_collection().await?;
        let mut matched: Vec<Snippet> = snippets
            .into_iter()
            .filter(|snippet| criteria.matches(snippet))
            .collect();
        criteria.sort(&mut matched);
        Ok(matched)
    }

    /// Substring search over title, description and code. Exactly
    /// equivalent to `filter` with only the query set.
    pub async fn search(&self, text: &str) -> Result<Vec<Snippet>> {
        self.filter(&SnippetFilter::with_query(text)).await
    }

    /// Merges records by id into the collection: unknown ids are appended,
    /// known ids are overwritten only when `overwrite` is set. Returns the
    /// number of records taken from `incoming`.
    pub async fn import(&self, incoming: Vec<Snippet>, overwrite: bool) -> Result<usize> {
        let mut snippets = self.read_collection().await?;
        let mut merged = 0;

        for snippet in incoming {
            if let Some(existing) = snippets.iter_mut().find(|s| s.id == snippet.id) {
                if overwrite {
                    *existing = snippet;
                    merged += 1;
                }
            } else {
                snippets.push(snippet);
                merged += 1;
            }
        }

        if merged > 0 {
            self.write_collection(&snippets).await?;
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SnippetCategory, SnippetLanguage, SortField, SortOrder};
    use std::collections::HashSet;
    use std::time::Duration;
    use tempfile::tempdir;

    fn input(title: &str) -> CreateSnippetInput {
        CreateSnippetInput {
            title: title.to_string(),
            description: format!("{title} description"),
            code: format!("// {title}"),
            language: SnippetLanguage::Rust,
            category: SnippetCategory::General,
            tags: Vec::new(),
            favorite: false,
        }
    }

    #[tokio::test]
    async fn add_assigns_unique_ids() {
        let dir = tempdir().unwrap();
        let storage = StorageService::with_directory(dir.path());

        let mut ids = HashSet::new();
        for i in 0..5 {
            let created = storage.add(input(&format!("snippet {i}"))).await.unwrap();
            ids.insert(created.id);
        }

        assert_eq!(ids.len(), 5);
    }

    #[tokio::test]
    async fn add_then_get_by_id_round_trips() {
        let dir = tempdir().unwrap();
        let storage = StorageService::with_directory(dir.path());

        let mut create = input("round trip");
        create.tags = vec!["a".to_string(), "b".to_string()];
        create.favorite = true;

        let created = storage.add(create).await.unwrap();
        let fetched = storage.get_by_id(created.id).await.unwrap();

        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn get_all_on_fresh_directory_is_empty() {
        let dir = tempdir().unwrap();
        let storage = StorageService::with_directory(dir.path().join("never-written"));

        let snippets = storage.get_all().await.unwrap();
        assert!(snippets.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let storage = StorageService::with_directory(dir.path());
        std::fs::write(storage.snippets_file(), "{ not json").unwrap();

        let err = storage.get_all().await.unwrap_err();
        assert!(matches!(err, StorageError::Parse { .. }));
    }

    #[tokio::test]
    async fn get_by_id_returns_none_for_unknown_id() {
        let dir = tempdir().unwrap();
        let storage = StorageService::with_directory(dir.path());
        storage.add(input("present")).await.unwrap();

        let missing = storage.get_by_id(Uuid::new_v4()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn update_changes_only_supplied_fields() {
        let dir = tempdir().unwrap();
        let storage = StorageService::with_directory(dir.path());

        let mut create = input("original");
        create.tags = vec!["keep".to_string(), "keep".to_string()];
        let created = storage.add(create).await.unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;

        let updated = storage
            .update(
                created.id,
                UpdateSnippetInput {
                    title: Some("renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.code, created.code);
        // duplicate tags survive updates verbatim
        assert_eq!(updated.tags, vec!["keep", "keep"]);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn update_keeps_record_position() {
        let dir = tempdir().unwrap();
        let storage = StorageService::with_directory(dir.path());

        storage.add(input("first")).await.unwrap();
        let second = storage.add(input("second")).await.unwrap();
        storage.add(input("third")).await.unwrap();

        storage
            .update(
                second.id,
                UpdateSnippetInput {
                    favorite: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        let all = storage.get_all().await.unwrap();
        assert_eq!(all[1].id, second.id);
        assert!(all[1].favorite);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_an_error() {
        let dir = tempdir().unwrap();
        let storage = StorageService::with_directory(dir.path());

        let result = storage
            .update(Uuid::new_v4(), UpdateSnippetInput::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_record() {
        let dir = tempdir().unwrap();
        let storage = StorageService::with_directory(dir.path());

        let first = storage.add(input("first")).await.unwrap();
        storage.add(input("second")).await.unwrap();

        assert!(storage.delete(first.id).await.unwrap());
        assert_eq!(storage.get_all().await.unwrap().len(), 1);

        assert!(!storage.delete(Uuid::new_v4()).await.unwrap());
        assert_eq!(storage.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_all_is_idempotent() {
        let dir = tempdir().unwrap();
        let storage = StorageService::with_directory(dir.path());

        storage.add(input("doomed")).await.unwrap();

        storage.delete_all().await.unwrap();
        assert!(storage.get_all().await.unwrap().is_empty());

        storage.delete_all().await.unwrap();
        assert!(storage.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_filter_preserves_insertion_order() {
        let dir = tempdir().unwrap();
        let storage = StorageService::with_directory(dir.path());

        for title in ["one", "two", "three"] {
            storage.add(input(title)).await.unwrap();
        }

        let filtered = storage.filter(&SnippetFilter::default()).await.unwrap();
        let titles: Vec<&str> = filtered.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["one", "two", "three"]);
    }

    #[tokio::test]
    async fn empty_tag_list_means_no_tag_filter() {
        let dir = tempdir().unwrap();
        let storage = StorageService::with_directory(dir.path());

        let mut tagged = input("tagged");
        tagged.tags = vec!["rust".to_string()];
        storage.add(tagged).await.unwrap();
        storage.add(input("untagged")).await.unwrap();

        let with_empty = storage
            .filter(&SnippetFilter {
                tags: Vec::new(),
                ..Default::default()
            })
            .await
            .unwrap();
        let without = storage.filter(&SnippetFilter::default()).await.unwrap();

        assert_eq!(with_empty, without);
        assert_eq!(with_empty.len(), 2);
    }

    #[tokio::test]
    async fn tag_filter_uses_or_semantics() {
        let dir = tempdir().unwrap();
        let storage = StorageService::with_directory(dir.path());

        let mut a = input("has a");
        a.tags = vec!["a".to_string()];
        let mut b = input("has b");
        b.tags = vec!["b".to_string()];
        let mut c = input("has c");
        c.tags = vec!["c".to_string()];

        storage.add(a).await.unwrap();
        storage.add(b).await.unwrap();
        storage.add(c).await.unwrap();

        let matched = storage
            .filter(&SnippetFilter {
                tags: vec!["a".to_string(), "b".to_string()],
                ..Default::default()
            })
            .await
            .unwrap();

        let titles: Vec<&str> = matched.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["has a", "has b"]);
    }

    #[tokio::test]
    async fn criteria_combine_with_and() {
        let dir = tempdir().unwrap();
        let storage = StorageService::with_directory(dir.path());

        let mut rust = input("shared word");
        rust.language = SnippetLanguage::Rust;
        let mut python = input("shared word");
        python.language = SnippetLanguage::Python;

        storage.add(rust).await.unwrap();
        storage.add(python).await.unwrap();

        let matched = storage
            .filter(&SnippetFilter {
                query: Some("shared".to_string()),
                language: Some(SnippetLanguage::Python),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].language, SnippetLanguage::Python);
    }

    #[tokio::test]
    async fn favorite_filter_is_exact() {
        let dir = tempdir().unwrap();
        let storage = StorageService::with_directory(dir.path());

        let mut starred = input("starred");
        starred.favorite = true;
        storage.add(starred).await.unwrap();
        storage.add(input("plain")).await.unwrap();

        let favorites = storage
            .filter(&SnippetFilter {
                favorite: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].title, "starred");
    }

    #[tokio::test]
    async fn search_is_equivalent_to_query_filter() {
        let dir = tempdir().unwrap();
        let storage = StorageService::with_directory(dir.path());

        let mut a = input("Apple pie");
        a.code = String::from("fn bake() {}");
        storage.add(a).await.unwrap();
        storage.add(input("banana")).await.unwrap();

        for query in ["", "APPLE", "fn bake", "nothing matches this"] {
            let searched = storage.search(query).await.unwrap();
            let filtered = storage.filter(&SnippetFilter::with_query(query)).await.unwrap();
            assert_eq!(searched, filtered, "query {query:?}");
        }
    }

    #[tokio::test]
    async fn title_sort_is_case_insensitive_and_created_desc_reverses_insertion() {
        let dir = tempdir().unwrap();
        let storage = StorageService::with_directory(dir.path());

        for title in ["Zebra", "Apple", "Mango"] {
            storage.add(input(title)).await.unwrap();
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let by_title = storage
            .filter(&SnippetFilter {
                sort_by: Some(SortField::Title),
                ..Default::default()
            })
            .await
            .unwrap();
        let titles: Vec<&str> = by_title.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Apple", "Mango", "Zebra"]);

        let by_created_desc = storage
            .filter(&SnippetFilter {
                sort_by: Some(SortField::CreatedAt),
                sort_order: SortOrder::Descending,
                ..Default::default()
            })
            .await
            .unwrap();
        let titles: Vec<&str> = by_created_desc.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Mango", "Apple", "Zebra"]);
    }

    #[tokio::test]
    async fn import_appends_unknown_and_respects_overwrite() {
        let dir = tempdir().unwrap();
        let storage = StorageService::with_directory(dir.path());

        let existing = storage.add(input("existing")).await.unwrap();

        let mut replacement = existing.clone();
        replacement.title = String::from("replacement");
        let incoming_new = Snippet::new(input("brand new"));

        let merged = storage
            .import(vec![replacement.clone(), incoming_new.clone()], false)
            .await
            .unwrap();
        assert_eq!(merged, 1);

        let all = storage.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "existing");

        let merged = storage.import(vec![replacement], true).await.unwrap();
        assert_eq!(merged, 1);

        let all = storage.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "replacement");
    }
}
