use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quill_core::{SearchConfig, SearchMode, Searcher};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Search a directory of text notes by keyword or phrase", long_about = None)]
struct Cli {
    /// Root directory to index
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,
    /// JSON config file (preview_length, file_types, phrase_context, follow_links)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// File extension to index; repeat to allow several. Overrides the config
    #[arg(long = "ext", global = true)]
    extensions: Vec<String>,
    /// Preview window in characters
    #[arg(long, global = true)]
    preview_length: Option<usize>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search indexed documents
    Search {
        /// Query text
        #[arg(required = true)]
        query: Vec<String>,
        /// Require the words to appear together as a phrase
        #[arg(long, default_value_t = false)]
        phrase: bool,
        /// Print hits as a JSON array
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the full content of an indexed document
    Show {
        /// Document path, as printed by `search` or `list`, or relative to the root
        id: String,
    },
    /// List indexed documents and files that could not be read
    List,
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let searcher = Searcher::with_config(&cli.root, config)
        .with_context(|| format!("failed to index {}", cli.root.display()))?;

    match cli.command {
        Commands::Search { query, phrase, json } => {
            let query = query.join(" ");
            let hits = searcher.search(&query, SearchMode::from(phrase));
            if json {
                println!("{}", serde_json::to_string_pretty(&hits)?);
            } else {
                println!("{} file(s) found for {:?}", hits.len(), query);
                for hit in hits {
                    println!("\n{}\n    {}", hit.path, one_line(&hit.preview));
                }
            }
        }
        Commands::Show { id } => {
            let content = match searcher.get_content(&id) {
                Ok(content) => content,
                Err(_) => {
                    let joined = searcher.root().join(&id);
                    searcher.get_content(&joined.to_string_lossy())?
                }
            };
            print!("{content}");
        }
        Commands::List => {
            for doc_id in searcher.documents() {
                println!("{doc_id}");
            }
            for skipped in searcher.skipped() {
                eprintln!("skipped {}: {}", skipped.path.display(), skipped.reason);
            }
            eprintln!(
                "{} document(s), {} term(s), {} skipped",
                searcher.document_count(),
                searcher.term_count(),
                searcher.skipped().len()
            );
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<SearchConfig> {
    let base = match &cli.config {
        Some(path) => SearchConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SearchConfig::default(),
    };
    let mut config = base.with_env_overrides()?;
    if !cli.extensions.is_empty() {
        config.file_types = cli.extensions.clone();
    }
    if let Some(len) = cli.preview_length {
        config.preview_length = len;
    }
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
