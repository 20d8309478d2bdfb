//! `lexrag` CLI: rank a corpus file against a query, or print the assembled prompt context.

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use lexrag::index::default_metadata;
#[cfg(feature = "cli")]
use lexrag::{IndexConfig, Metadata, RetrievalIndex};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Debug, serde::Deserialize)]
struct CorpusLine {
    text: String,
    #[serde(default)]
    metadata: Option<Metadata>,
}

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(author, version, about = "Lexical retrieval CLI", long_about = None)]
struct Args {
    /// Log index progress to stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank the documents of a corpus file against a query.
    Search {
        /// Path to a corpus file (one document per line).
        #[arg(short, long)]
        input: PathBuf,

        /// Treat each line as `{"text": ..., "metadata": {...}}`.
        #[arg(long, default_value_t = false)]
        jsonl: bool,

        /// Top-k results to return.
        #[arg(short, long, default_value_t = IndexConfig::default().default_n_results)]
        k: usize,

        /// Query words.
        query: Vec<String>,
    },

    /// Print the retrieved documents joined as prompt context.
    Context {
        /// Path to a corpus file (one document per line).
        #[arg(short, long)]
        input: PathBuf,

        /// Treat each line as `{"text": ..., "metadata": {...}}`.
        #[arg(long, default_value_t = false)]
        jsonl: bool,

        /// Number of documents to include.
        #[arg(short, long, default_value_t = IndexConfig::context().default_n_results)]
        k: usize,

        /// Question words.
        query: Vec<String>,
    },
}

#[cfg(feature = "cli")]
fn load_index(input: &Path, jsonl: bool) -> Result<RetrievalIndex, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(input)?;
    let lines: Vec<&str> = raw.lines().filter(|l| !l.trim().is_empty()).collect();

    let index = RetrievalIndex::new();
    if jsonl {
        let mut texts = Vec::with_capacity(lines.len());
        let mut metadatas = Vec::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            let entry: CorpusLine = serde_json::from_str(line)
                .map_err(|e| format!("{}:{}: {e}", input.display(), i + 1))?;
            texts.push(entry.text);
            metadatas.push(entry.metadata.unwrap_or_else(|| default_metadata(i)));
        }
        index.add_documents(&texts, Some(metadatas))?;
    } else {
        index.add_documents(&lines, None)?;
    }
    Ok(index)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "cli")]
    {
        let args = Args::parse();

        let level = if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        };
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .init();

        match args.command {
            Commands::Search {
                input,
                jsonl,
                k,
                query,
            } => {
                let query = query.join(" ");
                let index = load_index(&input, jsonl)?;
                let hits = index.query(&query, k)?;

                println!("Results for {:?}:", query);
                for hit in hits {
                    let source = hit.metadata.get("source").map(String::as_str).unwrap_or("");
                    println!(
                        "  Doc {}: score {:.4} [{}] {}",
                        hit.id, hit.score, source, hit.text
                    );
                }
            }
            Commands::Context {
                input,
                jsonl,
                k,
                query,
            } => {
                let query = query.join(" ");
                let index = load_index(&input, jsonl)?;
                let hits = index.query(&query, k)?;
                println!("{}", lexrag::collection::join_context(&hits));
            }
        }
    }

    #[cfg(not(feature = "cli"))]
    println!("CLI feature is disabled. Build with --features cli to enable.");

    Ok(())
}
