pub mod error;
pub mod export;
pub mod filter;
pub mod snippet;
pub mod storage;

pub use error::StorageError;
pub use export::{ExportData, ExportOptions, export_collection, import_collection};
pub use filter::{SnippetFilter, SortField, SortOrder};
pub use snippet::{
    CreateSnippetInput, Snippet, SnippetCategory, SnippetLanguage, UpdateSnippetInput,
};
pub use storage::StorageService;
