//! omnisnip - Personal Code Snippet Manager
//!
//! A command-line tool for storing, organizing and retrieving code
//! snippets. The whole collection lives in a single JSON file under the
//! user's home directory, and every snippet carries descriptive metadata:
//! title, description, language, category, tags and a favorite flag.
//!
//! omnisnip lets developers:
//! - Capture snippets straight from the shell or from a file
//! - Filter and sort the collection by language, category, tags or favorites
//! - Search titles, descriptions and code for a substring
//! - Export the collection and merge it back on another machine

use anyhow::Result;

mod cli;
mod models;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    cli::execute_cli(&args).await
}
