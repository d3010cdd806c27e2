//! CLI Module for omnisnip
//! This module provides the command-line interface: it dispatches
//! subcommands against the snippet store and renders results in the
//! terminal.

pub mod commands;

use anyhow::Result;
use colored::Colorize;

/// Executes CLI commands based on the provided arguments
pub async fn execute_cli(args: &[String]) -> Result<()> {
    if args.is_empty() {
        // No arguments provided, show help
        print_help();
        return Ok(());
    }

    // One store handle per invocation, shared by every command
    let storage = commands::resolve_storage()?;

    match args[0].as_str() {
        "add" | "new" => {
            if args.len() < 2 {
                println!("{}  Error: Missing snippet title", "┃".bright_magenta());
                println!(
                    "{}  Usage: omnisnip add <TITLE> --lang <LANGUAGE> --category <CATEGORY> [OPTIONS]",
                    "┃".bright_magenta()
                );
                return Ok(());
            }

            commands::add_snippet(&storage, &args[1], &args[2..]).await?;
        }
        "list" | "ls" => {
            commands::list_snippets(&storage, &args[1..]).await?;
        }
        "show" | "view" | "cat" => {
            if args.len() < 2 {
                println!(
                    "{}  Error: Missing snippet title or ID",
                    "┃".bright_magenta()
                );
                println!(
                    "{}  Usage: omnisnip show <SNIPPET_TITLE_OR_ID>",
                    "┃".bright_magenta()
                );
                return Ok(());
            }

            commands::show_snippet(&storage, &args[1]).await?;
        }
        "edit" | "update" => {
            if args.len() < 2 {
                println!("{}  Error: Missing snippet ID", "┃".bright_magenta());
                println!(
                    "{}  Usage: omnisnip edit <SNIPPET_ID> [OPTIONS]",
                    "┃".bright_magenta()
                );
                return Ok(());
            }

            commands::edit_snippet(&storage, &args[1], &args[2..]).await?;
        }
        "delete" | "rm" => {
            if args.len() < 2 {
                println!("{}  Error: Missing snippet ID", "┃".bright_magenta());
                println!(
                    "{}  Usage: omnisnip delete <SNIPPET_ID>",
                    "┃".bright_magenta()
                );
                return Ok(());
            }

            commands::delete_snippet(&storage, &args[1]).await?;
        }
        "clear" => {
            commands::clear_snippets(&storage, &args[1..]).await?;
        }
        "search" | "find" => {
            if args.len() < 2 {
                println!("{}  Error: Missing search query", "┃".bright_magenta());
                println!(
                    "{}  Usage: omnisnip search <QUERY>",
                    "┃".bright_magenta()
                );
                return Ok(());
            }

            commands::search_snippets(&storage, &args[1]).await?;
        }
        "favorites" | "fav" => {
            commands::list_favorites(&storage).await?;
        }
        "export" => {
            if args.len() < 2 {
                println!("{}  Error: Missing export path", "┃".bright_magenta());
                println!(
                    "{}  Usage: omnisnip export <PATH> [--no-code] [--favorites]",
                    "┃".bright_magenta()
                );
                return Ok(());
            }

            commands::export_snippets(&storage, &args[1], &args[2..]).await?;
        }
        "import" => {
            if args.len() < 2 {
                println!("{}  Error: Missing import path", "┃".bright_magenta());
                println!(
                    "{}  Usage: omnisnip import <PATH> [--overwrite]",
                    "┃".bright_magenta()
                );
                return Ok(());
            }

            commands::import_snippets(&storage, &args[1], &args[2..]).await?;
        }
        "help" => {
            print_help();
        }
        _ => {
            println!("{}  Unknown command: {}", "┃".bright_magenta(), args[0]);

            print_help();
        }
    }

    Ok(())
}

/// Prints the help message with available commands
fn print_help() {
    println!(
        "{}  {}",
        "┃".bright_magenta(),
        "OMNISNIP - PERSONAL SNIPPET MANAGER".bold()
    );

    println!("{}  {}", "┃".bright_magenta(), "USAGE:".bright_yellow());
    println!("{}  omnisnip [COMMAND] [ARGS]", "┃".bright_magenta());
    println!("{}  {}", "┃".bright_magenta(), "COMMANDS:".bright_yellow());
    println!(
        "{}  {:<27} {}",
        "┃".bright_magenta(),
        "add <TITLE> [OPTIONS]".bright_white(),
        "Add a snippet (--lang, --category, --code/--file, --tags, --desc, --favorite)"
    );
    println!(
        "{}  {:<27} {}",
        "┃".bright_magenta(),
        "list, ls [OPTIONS]".bright_white(),
        "List snippets (--lang, --category, --tag, --favorites, --sort, --order)"
    );
    println!(
        "{}  {:<27} {}",
        "┃".bright_magenta(),
        "show, view <TITLE_OR_ID>".bright_white(),
        "Display a snippet by title (partial title works) or ID"
    );
    println!(
        "{}  {:<27} {}",
        "┃".bright_magenta(),
        "edit <ID> [OPTIONS]".bright_white(),
        "Update the supplied fields of a snippet, leaving the rest alone"
    );
    println!(
        "{}  {:<27} {}",
        "┃".bright_magenta(),
        "delete, rm <ID>".bright_white(),
        "Delete a snippet by ID"
    );
    println!(
        "{}  {:<27} {}",
        "┃".bright_magenta(),
        "clear --yes".bright_white(),
        "Delete every snippet in the store"
    );
    println!(
        "{}  {:<27} {}",
        "┃".bright_magenta(),
        "search, find <QUERY>".bright_white(),
        "Search titles, descriptions and code for a substring"
    );
    println!(
        "{}  {:<27} {}",
        "┃".bright_magenta(),
        "favorites, fav".bright_white(),
        "List all favorite snippets"
    );
    println!(
        "{}  {:<27} {}",
        "┃".bright_magenta(),
        "export <PATH>".bright_white(),
        "Export the collection to a JSON file"
    );
    println!(
        "{}  {:<27} {}",
        "┃".bright_magenta(),
        "import <PATH>".bright_white(),
        "Merge snippets from an export file (--overwrite replaces matches)"
    );
    println!(
        "{}  {:<27} {}",
        "┃".bright_magenta(),
        "help".bright_white(),
        "Display this help message"
    );

    println!("{}  {}", "┃".bright_magenta(), "TIP:".bright_green());
    println!(
        "{}  Set OMNISNIP_DIR to store snippets somewhere other than ~/.omnisnip",
        "┃".bright_magenta()
    );
}
