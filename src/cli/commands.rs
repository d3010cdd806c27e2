use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use colored::Colorize;
use uuid::Uuid;

use crate::models::{
    CreateSnippetInput, ExportOptions, Snippet, SnippetCategory, SnippetFilter, SnippetLanguage,
    SortField, SortOrder, StorageService, UpdateSnippetInput, export_collection, import_collection,
};

/// Builds the storage service, honoring the OMNISNIP_DIR override.
/// Constructed once per invocation and passed down to every command.
pub fn resolve_storage() -> Result<StorageService> {
    match std::env::var_os("OMNISNIP_DIR") {
        Some(dir) => Ok(StorageService::with_directory(PathBuf::from(dir))),
        None => Ok(StorageService::new()?),
    }
}

/// Options shared by the add and edit commands
#[derive(Default)]
struct SnippetFlags {
    title: Option<String>,
    description: Option<String>,
    code: Option<String>,
    file: Option<PathBuf>,
    language: Option<SnippetLanguage>,
    category: Option<SnippetCategory>,
    tags: Option<Vec<String>>,
    favorite: Option<bool>,
}

fn parse_snippet_flags(args: &[String]) -> Result<SnippetFlags> {
    let mut flags = SnippetFlags::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--title" => flags.title = Some(flag_value(&mut iter, arg)?.clone()),
            "--desc" | "--description" => {
                flags.description = Some(flag_value(&mut iter, arg)?.clone());
            }
            "--code" => flags.code = Some(flag_value(&mut iter, arg)?.clone()),
            "--file" => flags.file = Some(PathBuf::from(flag_value(&mut iter, arg)?)),
            "--lang" | "--language" => {
                let name = flag_value(&mut iter, arg)?;
                let language = SnippetLanguage::from_name(name).ok_or_else(|| {
                    anyhow!("Unknown language: {name} (one of: {})", language_names())
                })?;
                flags.language = Some(language);
            }
            "--category" => {
                let name = flag_value(&mut iter, arg)?;
                let category = SnippetCategory::from_name(name).ok_or_else(|| {
                    anyhow!("Unknown category: {name} (one of: {})", category_names())
                })?;
                flags.category = Some(category);
            }
            "--tags" => {
                let value = flag_value(&mut iter, arg)?;
                flags.tags = Some(split_tags(value));
            }
            "--favorite" => flags.favorite = Some(true),
            "--no-favorite" => flags.favorite = Some(false),
            _ => bail!("Unknown option: {arg}"),
        }
    }

    Ok(flags)
}

fn flag_value<'a>(iter: &mut std::slice::Iter<'a, String>, flag: &str) -> Result<&'a String> {
    iter.next()
        .ok_or_else(|| anyhow!("Missing value for {flag}"))
}

fn split_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

fn language_names() -> String {
    SnippetLanguage::ALL
        .iter()
        .map(|language| language.display_name().to_lowercase())
        .collect::<Vec<_>>()
        .join(", ")
}

fn category_names() -> String {
    SnippetCategory::ALL
        .iter()
        .map(|category| category.display_name().to_lowercase())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Code can come inline or from a file; inline wins when both are given
fn resolve_code(flags: &SnippetFlags) -> Result<Option<String>> {
    if let Some(code) = &flags.code {
        return Ok(Some(code.clone()));
    }

    if let Some(file) = &flags.file {
        let code = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read code from {}", file.display()))?;
        return Ok(Some(code));
    }

    Ok(None)
}

/// Adds a new snippet to the store
pub async fn add_snippet(storage: &StorageService, title: &str, args: &[String]) -> Result<()> {
    let flags = parse_snippet_flags(args)?;

    if flags.title.is_some() {
        bail!("Pass the title as the positional argument: omnisnip add <TITLE> ...");
    }

    let Some(language) = flags.language else {
        bail!("Missing --lang (one of: {})", language_names());
    };
    let Some(category) = flags.category else {
        bail!("Missing --category (one of: {})", category_names());
    };
    let Some(code) = resolve_code(&flags)? else {
        bail!("Missing snippet code (use --code <CODE> or --file <PATH>)");
    };

    let created = storage
        .add(CreateSnippetInput {
            title: title.to_string(),
            description: flags.description.unwrap_or_default(),
            code,
            language,
            category,
            tags: flags.tags.unwrap_or_default(),
            favorite: flags.favorite.unwrap_or(false),
        })
        .await?;

    println!(
        "{}  Added {} ({})",
        "┃".bright_magenta(),
        created.title.bright_white().bold(),
        created.language.display_name()
    );
    println!(
        "{}  {}: {}",
        "┃".bright_magenta(),
        "ID".bright_black(),
        created.id
    );

    Ok(())
}

/// Lists snippets, optionally filtered and sorted
pub async fn list_snippets(storage: &StorageService, args: &[String]) -> Result<()> {
    let mut criteria = SnippetFilter::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--lang" | "--language" => {
                let name = flag_value(&mut iter, arg)?;
                criteria.language = Some(SnippetLanguage::from_name(name).ok_or_else(|| {
                    anyhow!("Unknown language: {name} (one of: {})", language_names())
                })?);
            }
            "--category" => {
                let name = flag_value(&mut iter, arg)?;
                criteria.category = Some(SnippetCategory::from_name(name).ok_or_else(|| {
                    anyhow!("Unknown category: {name} (one of: {})", category_names())
                })?);
            }
            "--tag" | "--tags" => {
                let value = flag_value(&mut iter, arg)?;
                criteria.tags = split_tags(value);
            }
            "--favorites" | "--fav" => criteria.favorite = Some(true),
            "--sort" => {
                let name = flag_value(&mut iter, arg)?;
                criteria.sort_by = Some(SortField::from_name(name).ok_or_else(|| {
                    anyhow!(
                        "Unknown sort field: {name} (one of: created, updated, title, language, category, favorite)"
                    )
                })?);
            }
            "--order" => {
                let value = flag_value(&mut iter, arg)?;
                criteria.sort_order = match value.to_lowercase().as_str() {
                    "asc" | "ascending" => SortOrder::Ascending,
                    "desc" | "descending" => SortOrder::Descending,
                    _ => bail!("Unknown sort order: {value} (asc or desc)"),
                };
            }
            _ => bail!("Unknown option: {arg}"),
        }
    }

    let snippets = storage.filter(&criteria).await?;

    if snippets.is_empty() {
        println!("{}  No snippets found.", "┃".bright_magenta());
        return Ok(());
    }

    println!("{}  {} snippets:", "┃".bright_magenta(), snippets.len());
    println!("{}", "─".repeat(60).bright_magenta());

    for (idx, snippet) in snippets.iter().enumerate() {
        display_snippet_line(idx, snippet);
    }

    Ok(())
}

fn display_snippet_line(idx: usize, snippet: &Snippet) {
    let marker = if snippet.favorite {
        "★".yellow().to_string()
    } else {
        String::from(" ")
    };

    println!(
        "{}  {}. {} {}",
        "┃".bright_magenta(),
        (idx + 1).to_string().bright_yellow(),
        marker,
        snippet.title.bright_white().bold()
    );
    println!(
        "{}     {}: {}  {}: {}",
        "┃".bright_magenta(),
        "Language".bright_green(),
        snippet.language.display_name(),
        "Category".bright_blue(),
        snippet.category.display_name()
    );
    if !snippet.tags.is_empty() {
        println!(
            "{}     {}: {}",
            "┃".bright_magenta(),
            "Tags".bright_cyan(),
            snippet.tags.join(", ")
        );
    }
    println!(
        "{}     {}: {}",
        "┃".bright_magenta(),
        "ID".bright_black(),
        snippet.id
    );
}

/// Shows the content of a specific snippet by ID or title
pub async fn show_snippet(storage: &StorageService, name_or_id: &str) -> Result<()> {

    // First try parsing as UUID
    if let Ok(id) = Uuid::parse_str(name_or_id) {
        match storage.get_by_id(id).await? {
            Some(snippet) => display_snippet(&snippet),
            None => println!(
                "{}  Snippet not found with ID: {}",
                "┃".bright_magenta(),
                id
            ),
        }
        return Ok(());
    }

    // If not a valid UUID, try to find by title
    let snippets = storage.get_all().await?;
    let name = name_or_id.to_lowercase();

    // Try exact match first, then partial match
    let found = snippets
        .iter()
        .find(|snippet| snippet.title.to_lowercase() == name)
        .or_else(|| {
            snippets
                .iter()
                .find(|snippet| snippet.title.to_lowercase().contains(&name))
        });

    match found {
        Some(snippet) => display_snippet(snippet),
        None => {
            println!(
                "{}  No snippet found with title: {}",
                "┃".bright_magenta(),
                name_or_id
            );
            println!("{}  Available snippets:", "┃".bright_magenta());
            println!("{}", "─".repeat(60).bright_magenta());

            // List available snippets to help the user
            for (idx, snippet) in snippets.iter().enumerate().take(10) {
                println!(
                    "{}  {}. {}",
                    "┃".bright_magenta(),
                    (idx + 1).to_string().yellow(),
                    snippet.title.bright_white()
                );
            }

            if snippets.len() > 10 {
                println!(
                    "{}  ... and {} more",
                    "┃".bright_magenta(),
                    snippets.len() - 10
                );
            }
        }
    }

    Ok(())
}

/// Helper function to display snippet content
fn display_snippet(snippet: &Snippet) {
    println!(
        "{}  {} {}",
        "┃".bright_magenta(),
        "SNIPPET".bright_green().bold(),
        snippet.title.bold()
    );
    println!("{}", "─".repeat(60).bright_magenta());

    println!(
        "{}  {}: {}",
        "┃".bright_magenta(),
        "Language".bright_yellow(),
        snippet.language.display_name()
    );
    println!(
        "{}  {}: {}",
        "┃".bright_magenta(),
        "Category".bright_blue(),
        snippet.category.display_name()
    );
    println!(
        "{}  {}: {}",
        "┃".bright_magenta(),
        "Lines".bright_black(),
        snippet.line_count()
    );
    if !snippet.description.is_empty() {
        println!(
            "{}  {}: {}",
            "┃".bright_magenta(),
            "Description".bright_cyan(),
            snippet.description
        );
    }
    if !snippet.tags.is_empty() {
        println!(
            "{}  {}: {}",
            "┃".bright_magenta(),
            "Tags".bright_cyan(),
            snippet.tags.join(", ")
        );
    }
    if snippet.favorite {
        println!("{}  {}", "┃".bright_magenta(), "★ Favorite".yellow());
    }
    println!(
        "{}  {}: {}",
        "┃".bright_magenta(),
        "Created".bright_black(),
        snippet.created_at.format("%Y-%m-%d %H:%M")
    );
    println!(
        "{}  {}: {}",
        "┃".bright_magenta(),
        "Updated".bright_black(),
        snippet.updated_at.format("%Y-%m-%d %H:%M")
    );
    println!(
        "{}  {}: {}",
        "┃".bright_magenta(),
        "ID".bright_black(),
        snippet.id
    );
    println!("{}", "─".repeat(60).bright_magenta());

    // Code with the shared margin on each line
    for line in snippet.code.lines() {
        println!("{}  {}", "┃".bright_magenta(), line);
    }
}

/// Applies a partial update to a snippet; fields not supplied keep their
/// current value
pub async fn edit_snippet(storage: &StorageService, id: &str, args: &[String]) -> Result<()> {
    let id = Uuid::parse_str(id).with_context(|| format!("Invalid snippet ID: {id}"))?;
    let flags = parse_snippet_flags(args)?;

    let update = UpdateSnippetInput {
        title: flags.title.clone(),
        description: flags.description.clone(),
        code: resolve_code(&flags)?,
        language: flags.language,
        category: flags.category,
        tags: flags.tags.clone(),
        favorite: flags.favorite,
    };

    if update.is_empty() {
        bail!("Nothing to update (supply at least one option)");
    }

    match storage.update(id, update).await? {
        Some(snippet) => {
            println!(
                "{}  Updated {}",
                "┃".bright_magenta(),
                snippet.title.bright_white().bold()
            );
        }
        None => {
            println!(
                "{}  Snippet not found with ID: {}",
                "┃".bright_magenta(),
                id
            );
        }
    }

    Ok(())
}

/// Deletes a snippet by ID
pub async fn delete_snippet(storage: &StorageService, id: &str) -> Result<()> {
    let id = Uuid::parse_str(id).with_context(|| format!("Invalid snippet ID: {id}"))?;

    if storage.delete(id).await? {
        println!("{}  Deleted snippet {}", "┃".bright_magenta(), id);
    } else {
        println!(
            "{}  Snippet not found with ID: {}",
            "┃".bright_magenta(),
            id
        );
    }

    Ok(())
}

/// Wipes the snippet store after an explicit --yes
pub async fn clear_snippets(storage: &StorageService, args: &[String]) -> Result<()> {
    if !args.iter().any(|arg| arg == "--yes") {
        println!(
            "{}  This deletes every snippet in the store.",
            "┃".bright_magenta()
        );
        println!(
            "{}  Re-run with --yes to confirm: omnisnip clear --yes",
            "┃".bright_magenta()
        );
        return Ok(());
    }

    // Count is cosmetic; clearing must work even over a corrupt file
    let count = storage.get_all().await.ok().map(|snippets| snippets.len());
    storage.delete_all().await?;

    match count {
        Some(count) => println!("{}  Removed {} snippets.", "┃".bright_magenta(), count),
        None => println!("{}  Cleared the snippet store.", "┃".bright_magenta()),
    }

    Ok(())
}

/// Searches for snippets matching a query string
pub async fn search_snippets(storage: &StorageService, query: &str) -> Result<()> {
    let results = storage.search(query).await?;

    println!(
        "{}  {} '{}'",
        "┃".bright_magenta(),
        "SEARCH RESULTS FOR".bold(),
        query.bright_white()
    );

    if results.is_empty() {
        println!(
            "{}  No snippets found matching query: {}",
            "┃".bright_magenta(),
            query
        );

        return Ok(());
    }

    println!(
        "{}  Found {} snippets matching '{}':",
        "┃".bright_magenta(),
        results.len(),
        query
    );
    println!("{}", "─".repeat(60).bright_magenta());

    let needle = query.to_lowercase();
    for (idx, snippet) in results.iter().enumerate() {
        let match_kind = if snippet.title.to_lowercase().contains(&needle) {
            "title"
        } else if snippet.description.to_lowercase().contains(&needle) {
            "description"
        } else {
            "code"
        };

        println!(
            "{}  {}. {} (match in: {})",
            "┃".bright_magenta(),
            (idx + 1).to_string().bright_yellow(),
            snippet.title.bright_white().bold(),
            match_kind.bright_green()
        );
        println!(
            "{}     {}: {}",
            "┃".bright_magenta(),
            "Language".bright_blue(),
            snippet.language.display_name()
        );
        println!(
            "{}     {}: {}",
            "┃".bright_magenta(),
            "ID".bright_black(),
            snippet.id
        );

        if idx < results.len() - 1 {
            println!(
                "{}  {}",
                "┃".bright_magenta(),
                "─".repeat(40).bright_black()
            );
        }
    }

    Ok(())
}

/// Lists all favorite snippets
pub async fn list_favorites(storage: &StorageService) -> Result<()> {
    let favorites = storage
        .filter(&SnippetFilter {
            favorite: Some(true),
            ..Default::default()
        })
        .await?;

    if favorites.is_empty() {
        println!("{}  No favorite snippets found.", "┃".bright_magenta());
        return Ok(());
    }

    println!(
        "{}  {} favorite snippets:",
        "┃".bright_magenta(),
        favorites.len()
    );

    for (idx, snippet) in favorites.iter().enumerate() {
        println!(
            "{}  {}. {} {}",
            "┃".bright_magenta(),
            (idx + 1).to_string().bright_yellow(),
            "★".yellow(),
            snippet.title.bright_white().bold()
        );
        println!(
            "{}     {}: {}",
            "┃".bright_magenta(),
            "Language".bright_green(),
            snippet.language.display_name()
        );
        println!(
            "{}     {}: {}",
            "┃".bright_magenta(),
            "ID".bright_black(),
            snippet.id
        );

        if idx < favorites.len() - 1 {
            println!(
                "{}  {}",
                "┃".bright_magenta(),
                "─".repeat(40).bright_black()
            );
        }
    }

    Ok(())
}

/// Exports the collection to a JSON file
pub async fn export_snippets(storage: &StorageService, path: &str, args: &[String]) -> Result<()> {
    let mut options = ExportOptions::default();
    for arg in args {
        match arg.as_str() {
            "--no-code" => options.include_code = false,
            "--favorites" | "--fav" => options.favorites_only = true,
            _ => bail!("Unknown option: {arg}"),
        }
    }

    let snippets = storage.get_all().await?;

    let exported = if options.favorites_only {
        snippets.iter().filter(|snippet| snippet.favorite).count()
    } else {
        snippets.len()
    };

    let path = Path::new(path);
    export_collection(&snippets, path, &options)?;

    println!(
        "{}  Exported {} snippets to {}",
        "┃".bright_magenta(),
        exported,
        path.display()
    );

    Ok(())
}

/// Merges snippets from an export file into the store
pub async fn import_snippets(storage: &StorageService, path: &str, args: &[String]) -> Result<()> {
    let mut overwrite = false;
    for arg in args {
        match arg.as_str() {
            "--overwrite" => overwrite = true,
            _ => bail!("Unknown option: {arg}"),
        }
    }

    let data = import_collection(Path::new(path))?;
    let total = data.snippets.len();

    let merged = storage.import(data.snippets, overwrite).await?;

    println!(
        "{}  Imported {} of {} snippets.",
        "┃".bright_magenta(),
        merged,
        total
    );
    if merged < total {
        println!(
            "{}  {} already present (use --overwrite to replace them).",
            "┃".bright_magenta(),
            total - merged
        );
    }

    Ok(())
}
