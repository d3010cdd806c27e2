use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub code: String,
    pub language: SnippetLanguage,
    pub category: SnippetCategory,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub favorite: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnippetLanguage {
    Rust,
    JavaScript,
    TypeScript,
    Python,
    Go,
    Java,
    C,
    Cpp,
    CSharp,
    PHP,
    Ruby,
    Swift,
    Kotlin,
    SQL,
    Bash,
    PowerShell,
    HTML,
    CSS,
    Yaml,
    Json,
    Toml,
    Markdown,
    Text,
}

impl SnippetLanguage {
    pub const ALL: [SnippetLanguage; 23] = [
        SnippetLanguage::Rust,
        SnippetLanguage::JavaScript,
        SnippetLanguage::TypeScript,
        SnippetLanguage::Python,
        SnippetLanguage::Go,
        SnippetLanguage::Java,
        SnippetLanguage::C,
        SnippetLanguage::Cpp,
        SnippetLanguage::CSharp,
        SnippetLanguage::PHP,
        SnippetLanguage::Ruby,
        SnippetLanguage::Swift,
        SnippetLanguage::Kotlin,
        SnippetLanguage::SQL,
        SnippetLanguage::Bash,
        SnippetLanguage::PowerShell,
        SnippetLanguage::HTML,
        SnippetLanguage::CSS,
        SnippetLanguage::Yaml,
        SnippetLanguage::Json,
        SnippetLanguage::Toml,
        SnippetLanguage::Markdown,
        SnippetLanguage::Text,
    ];

    /// Parse a language from a user-supplied name, accepting common aliases
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "rust" | "rs" => Some(SnippetLanguage::Rust),
            "javascript" | "js" => Some(SnippetLanguage::JavaScript),
            "typescript" | "ts" => Some(SnippetLanguage::TypeScript),
            "python" | "py" => Some(SnippetLanguage::Python),
            "go" | "golang" => Some(SnippetLanguage::Go),
            "java" => Some(SnippetLanguage::Java),
            "c" => Some(SnippetLanguage::C),
            "cpp" | "c++" | "cxx" => Some(SnippetLanguage::Cpp),
            "csharp" | "c#" | "cs" => Some(SnippetLanguage::CSharp),
            "php" => Some(SnippetLanguage::PHP),
            "ruby" | "rb" => Some(SnippetLanguage::Ruby),
            "swift" => Some(SnippetLanguage::Swift),
            "kotlin" | "kt" => Some(SnippetLanguage::Kotlin),
            "sql" => Some(SnippetLanguage::SQL),
            "bash" | "sh" | "shell" => Some(SnippetLanguage::Bash),
            "powershell" | "ps1" => Some(SnippetLanguage::PowerShell),
            "html" | "htm" => Some(SnippetLanguage::HTML),
            "css" => Some(SnippetLanguage::CSS),
            "yaml" | "yml" => Some(SnippetLanguage::Yaml),
            "json" => Some(SnippetLanguage::Json),
            "toml" => Some(SnippetLanguage::Toml),
            "markdown" | "md" => Some(SnippetLanguage::Markdown),
            "text" | "txt" | "plain" => Some(SnippetLanguage::Text),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SnippetLanguage::Rust => "Rust",
            SnippetLanguage::JavaScript => "JavaScript",
            SnippetLanguage::TypeScript => "TypeScript",
            SnippetLanguage::Python => "Python",
            SnippetLanguage::Go => "Go",
            SnippetLanguage::Java => "Java",
            SnippetLanguage::C => "C",
            SnippetLanguage::Cpp => "C++",
            SnippetLanguage::CSharp => "C#",
            SnippetLanguage::PHP => "PHP",
            SnippetLanguage::Ruby => "Ruby",
            SnippetLanguage::Swift => "Swift",
            SnippetLanguage::Kotlin => "Kotlin",
            SnippetLanguage::SQL => "SQL",
            SnippetLanguage::Bash => "Bash",
            SnippetLanguage::PowerShell => "PowerShell",
            SnippetLanguage::HTML => "HTML",
            SnippetLanguage::CSS => "CSS",
            SnippetLanguage::Yaml => "YAML",
            SnippetLanguage::Json => "JSON",
            SnippetLanguage::Toml => "TOML",
            SnippetLanguage::Markdown => "Markdown",
            SnippetLanguage::Text => "Text",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnippetCategory {
    General,
    Algorithms,
    Web,
    Database,
    DevOps,
    Testing,
    Security,
    Scripting,
    Configuration,
    Documentation,
}

impl SnippetCategory {
    pub const ALL: [SnippetCategory; 10] = [
        SnippetCategory::General,
        SnippetCategory::Algorithms,
        SnippetCategory::Web,
        SnippetCategory::Database,
        SnippetCategory::DevOps,
        SnippetCategory::Testing,
        SnippetCategory::Security,
        SnippetCategory::Scripting,
        SnippetCategory::Configuration,
        SnippetCategory::Documentation,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "general" => Some(SnippetCategory::General),
            "algorithms" | "algo" => Some(SnippetCategory::Algorithms),
            "web" => Some(SnippetCategory::Web),
            "database" | "db" => Some(SnippetCategory::Database),
            "devops" => Some(SnippetCategory::DevOps),
            "testing" | "tests" => Some(SnippetCategory::Testing),
            "security" => Some(SnippetCategory::Security),
            "scripting" | "scripts" => Some(SnippetCategory::Scripting),
            "configuration" | "config" => Some(SnippetCategory::Configuration),
            "documentation" | "docs" => Some(SnippetCategory::Documentation),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SnippetCategory::General => "General",
            SnippetCategory::Algorithms => "Algorithms",
            SnippetCategory::Web => "Web",
            SnippetCategory::Database => "Database",
            SnippetCategory::DevOps => "DevOps",
            SnippetCategory::Testing => "Testing",
            SnippetCategory::Security => "Security",
            SnippetCategory::Scripting => "Scripting",
            SnippetCategory::Configuration => "Configuration",
            SnippetCategory::Documentation => "Documentation",
        }
    }
}

/// Input for creating a snippet. Title, description, code, language and
/// category are required by the store; tags and favorite carry defaults.
#[derive(Debug, Clone)]
pub struct CreateSnippetInput {
    pub title: String,
    pub description: String,
    pub code: String,
    pub language: SnippetLanguage,
    pub category: SnippetCategory,
    pub tags: Vec<String>,
    pub favorite: bool,
}

/// Partial update input. Fields left as `None` keep their prior value.
#[derive(Debug, Clone, Default)]
pub struct UpdateSnippetInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub language: Option<SnippetLanguage>,
    pub category: Option<SnippetCategory>,
    pub tags: Option<Vec<String>>,
    pub favorite: Option<bool>,
}

impl UpdateSnippetInput {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.code.is_none()
            && self.language.is_none()
            && self.category.is_none()
            && self.tags.is_none()
            && self.favorite.is_none()
    }
}

impl Snippet {
    pub fn new(input: CreateSnippetInput) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            code: input.code,
            language: input.language,
            category: input.category,
            tags: input.tags,
            created_at: now,
            updated_at: now,
            favorite: input.favorite,
        }
    }

    /// Overwrites the fields present in the input and refreshes
    /// `updated_at`. The id and `created_at` never change.
    pub fn apply_update(&mut self, input: UpdateSnippetInput) {
        if let Some(title) = input.title {
            self.title = title;
        }
        if let Some(description) = input.description {
            self.description = description;
        }
        if let Some(code) = input.code {
            self.code = code;
        }
        if let Some(language) = input.language {
            self.language = language;
        }
        if let Some(category) = input.category {
            self.category = category;
        }
        if let Some(tags) = input.tags {
            self.tags = tags;
        }
        if let Some(favorite) = input.favorite {
            self.favorite = favorite;
        }
        self.updated_at = Utc::now();
    }

    pub fn line_count(&self) -> usize {
        self.code.lines().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_from_name_accepts_aliases() {
        assert_eq!(
            SnippetLanguage::from_name("rs"),
            Some(SnippetLanguage::Rust)
        );
        assert_eq!(
            SnippetLanguage::from_name("C++"),
            Some(SnippetLanguage::Cpp)
        );
        assert_eq!(
            SnippetLanguage::from_name("YML"),
            Some(SnippetLanguage::Yaml)
        );
        assert_eq!(SnippetLanguage::from_name("cobol"), None);
    }

    #[test]
    fn category_from_name_is_case_insensitive() {
        assert_eq!(
            SnippetCategory::from_name("DevOps"),
            Some(SnippetCategory::DevOps)
        );
        assert_eq!(
            SnippetCategory::from_name("DB"),
            Some(SnippetCategory::Database)
        );
        assert_eq!(SnippetCategory::from_name("misc"), None);
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(UpdateSnippetInput::default().is_empty());

        let update = UpdateSnippetInput {
            favorite: Some(true),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
