use std::cmp::Ordering;

use crate::models::{Snippet, SnippetCategory, SnippetLanguage};

/// Criteria for querying the snippet collection. Every field is optional;
/// supplied criteria combine with AND. An empty `tags` list means "no tag
/// filter", not "match nothing".
#[derive(Debug, Clone, Default)]
pub struct SnippetFilter {
    /// Case-insensitive substring, tested against title, description and code
    pub query: Option<String>,
    pub language: Option<SnippetLanguage>,
    pub category: Option<SnippetCategory>,
    /// A record matches when it shares at least one tag with this list
    pub tags: Vec<String>,
    pub favorite: Option<bool>,
    pub sort_by: Option<SortField>,
    pub sort_order: SortOrder,
}

impl SnippetFilter {
    /// The filter `search` is defined in terms of: a query and nothing else
    pub fn with_query(text: &str) -> Self {
        Self {
            query: Some(text.to_string()),
            ..Self::default()
        }
    }

    pub fn matches(&self, snippet: &Snippet) -> bool {
        if let Some(query) = &self.query {
            let query = query.to_lowercase();
            let hit = snippet.title.to_lowercase().contains(&query)
                || snippet.description.to_lowercase().contains(&query)
                || snippet.code.to_lowercase().contains(&query);
            if !hit {
                return false;
            }
        }

        if let Some(language) = self.language {
            if snippet.language != language {
                return false;
            }
        }

        if let Some(category) = self.category {
            if snippet.category != category {
                return false;
            }
        }

        if !self.tags.is_empty() && !snippet.tags.iter().any(|tag| self.tags.contains(tag)) {
            return false;
        }

        if let Some(favorite) = self.favorite {
            if snippet.favorite != favorite {
                return false;
            }
        }

        true
    }

    /// Stable sort by the selected field. Descending reverses the ascending
    /// comparator, so ties keep their filtered-result order either way.
    pub fn sort(&self, snippets: &mut [Snippet]) {
        let Some(field) = self.sort_by else {
            return;
        };

        match self.sort_order {
            SortOrder::Ascending => snippets.sort_by(|a, b| field.compare(a, b)),
            SortOrder::Descending => snippets.sort_by(|a, b| field.compare(a, b).reverse()),
        }
    }
}

/// The finite set of sortable fields, each with a typed comparator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Title,
    Language,
    Category,
    Favorite,
}

impl SortField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "created" | "createdat" | "created_at" => Some(SortField::CreatedAt),
            "updated" | "updatedat" | "updated_at" => Some(SortField::UpdatedAt),
            "title" => Some(SortField::Title),
            "language" | "lang" => Some(SortField::Language),
            "category" => Some(SortField::Category),
            "favorite" | "fav" => Some(SortField::Favorite),
            _ => None,
        }
    }

    /// Ascending comparison: timestamps by instant, booleans false before
    /// true, strings case-insensitively.
    fn compare(&self, a: &Snippet, b: &Snippet) -> Ordering {
        match self {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Title => compare_case_insensitive(&a.title, &b.title),
            SortField::Language => {
                compare_case_insensitive(a.language.display_name(), b.language.display_name())
            }
            SortField::Category => {
                compare_case_insensitive(a.category.display_name(), b.category.display_name())
            }
            SortField::Favorite => a.favorite.cmp(&b.favorite),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

fn compare_case_insensitive(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateSnippetInput;

    fn snippet(title: &str, description: &str) -> Snippet {
        Snippet::new(CreateSnippetInput {
            title: title.to_string(),
            description: description.to_string(),
            code: String::new(),
            language: SnippetLanguage::Rust,
            category: SnippetCategory::General,
            tags: Vec::new(),
            favorite: false,
        })
    }

    #[test]
    fn title_sort_is_stable_for_equal_keys() {
        let mut snippets = vec![
            snippet("same", "first"),
            snippet("Same", "second"),
            snippet("SAME", "third"),
        ];

        let filter = SnippetFilter {
            sort_by: Some(SortField::Title),
            ..Default::default()
        };
        filter.sort(&mut snippets);

        let order: Vec<&str> = snippets.iter().map(|s| s.description.as_str()).collect();
        assert_eq!(order, ["first", "second", "third"]);
    }

    #[test]
    fn descending_reverses_ascending_comparisons() {
        let mut snippets = vec![
            snippet("beta", ""),
            snippet("Alpha", ""),
            snippet("gamma", ""),
        ];

        let filter = SnippetFilter {
            sort_by: Some(SortField::Title),
            sort_order: SortOrder::Descending,
            ..Default::default()
        };
        filter.sort(&mut snippets);

        let order: Vec<&str> = snippets.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(order, ["gamma", "beta", "Alpha"]);
    }

    #[test]
    fn favorite_sorts_false_before_true() {
        let mut starred = snippet("starred", "");
        starred.favorite = true;
        let plain = snippet("plain", "");

        let mut snippets = vec![starred, plain];
        let filter = SnippetFilter {
            sort_by: Some(SortField::Favorite),
            ..Default::default()
        };
        filter.sort(&mut snippets);

        assert!(!snippets[0].favorite);
        assert!(snippets[1].favorite);
    }

    #[test]
    fn query_matches_any_of_title_description_code() {
        let mut hit = snippet("needle in title", "plain");
        hit.code = String::from("fn main() {}");
        let miss = snippet("other", "plain");

        let filter = SnippetFilter {
            query: Some("NEEDLE".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&hit));
        assert!(!filter.matches(&miss));

        let code_filter = SnippetFilter {
            query: Some("fn main".to_string()),
            ..Default::default()
        };
        assert!(code_filter.matches(&hit));
    }
}
