//! exprcomplete CLI - Query the expression completion engine from a shell

use clap::{Parser, Subcommand};
use exprcomplete::completion::{
    find_blocks, flatten, plan_edit, referenced_roots, suggest, Suggestion,
};
use exprcomplete::{Dialect, EngineConfig, EngineError, VariableScope};
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "exprcomplete")]
#[command(about = "Autocomplete and edit planning for ${{ ... }} expressions", long_about = None)]
struct Cli {
    /// Config file (TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path dialect: json or dollar (overrides the config file)
    #[arg(short, long, global = true)]
    dialect: Option<Dialect>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every addressable path in a schema
    Flatten {
        /// Schema JSON file ("-" for stdin)
        #[arg(short, long)]
        schema: PathBuf,
    },

    /// Show suggestions for a cursor position
    Suggest {
        /// Schema JSON file ("-" for stdin)
        #[arg(short, long)]
        schema: PathBuf,

        /// Field text
        #[arg(short, long)]
        text: String,

        /// Cursor byte offset (default: end of text)
        #[arg(long)]
        cursor: Option<usize>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Apply a suggestion and print the resulting text
    Accept {
        /// Schema JSON file ("-" for stdin)
        #[arg(short, long)]
        schema: PathBuf,

        /// Field text
        #[arg(short, long)]
        text: String,

        /// Cursor byte offset (default: end of text)
        #[arg(long)]
        cursor: Option<usize>,

        /// Variable path to accept
        #[arg(short, long)]
        path: String,

        /// Print the edit plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the expression blocks in a text
    Blocks {
        /// Field text
        #[arg(short, long)]
        text: String,
    },

    /// Build a variable tree from an execution context
    Scope {
        /// Context JSON file ("-" for stdin)
        #[arg(long)]
        context: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(dialect) = cli.dialect {
        config.dialect = dialect;
    }
    info!(dialect = %config.dialect, page_size = config.page_size, "configuration loaded");

    match cli.command {
        Commands::Flatten { schema } => {
            let schema = read_json(&schema)?;
            for node in flatten(&schema, "") {
                println!("{}  {}", node.path, node.kind.label());
            }
        }

        Commands::Suggest {
            schema,
            text,
            cursor,
            json,
        } => {
            let schema = read_json(&schema)?;
            let nodes = flatten(&schema, "");
            let cursor = cursor.unwrap_or(text.len());

            let result = suggest(&text, cursor, &nodes, config.dialect, config.page_size);
            if json {
                let value = match &result {
                    Some((block, suggestions)) => {
                        serde_json::json!({ "block": block, "suggestions": suggestions })
                    }
                    None => serde_json::json!({ "block": null, "suggestions": [] }),
                };
                println!("{}", to_pretty(&value)?);
            } else {
                match result {
                    Some((block, suggestions)) => {
                        info!(anchor = ?block.anchor, fragment = %block.fragment, "inside block");
                        if suggestions.is_empty() {
                            println!("No suggestions for {:?}", block.fragment);
                        }
                        for suggestion in suggestions {
                            println!("{}  {}", suggestion.path, suggestion.label());
                        }
                    }
                    None => println!("Cursor is outside any ${{{{ ... }}}} block"),
                }
            }
        }

        Commands::Accept {
            schema,
            text,
            cursor,
            path,
            json,
        } => {
            let schema = read_json(&schema)?;
            let nodes = flatten(&schema, "");
            let node = nodes
                .iter()
                .find(|n| n.path == path)
                .ok_or_else(|| EngineError::Schema(format!("no variable at path '{}'", path)))?;

            let cursor = cursor.unwrap_or(text.len());
            let plan = plan_edit(&text, cursor, &Suggestion::from(node), config.dialect);
            if json {
                println!("{}", to_pretty(&plan)?);
            } else {
                println!("{}", plan.apply(&text));
                println!("caret: {}", plan.caret_after);
            }
        }

        Commands::Blocks { text } => {
            for line in blocks_report(&text) {
                println!("{}", line);
            }
        }

        Commands::Scope { context } => {
            let context = read_json(&context)?;
            let scope = VariableScope::from_context(&context)?;
            println!("{}", to_pretty(&scope.to_tree(config.dialect))?);
        }
    }

    Ok(())
}

/// One line per block span, then the roots the terminated blocks reference
fn blocks_report(text: &str) -> Vec<String> {
    let blocks = find_blocks(text);
    if blocks.is_empty() {
        return vec!["No expression blocks".to_string()];
    }

    let mut lines: Vec<String> = blocks
        .iter()
        .map(|block| {
            let status = if block.terminated { "" } else { " (unterminated)" };
            format!(
                "{}..{}  {}{}",
                block.start,
                block.end,
                block.expression(text),
                status
            )
        })
        .collect();

    let roots = referenced_roots(text);
    if !roots.is_empty() {
        lines.push(format!("roots: {}", roots.join(", ")));
    }
    lines
}

/// Read a JSON document from a file, or stdin for "-"
fn read_json(path: &Path) -> Result<Value, EngineError> {
    let content = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(path)?
    };
    serde_json::from_str(&content)
        .map_err(|e| EngineError::Schema(format!("{}: {}", path.display(), e)))
}

fn to_pretty<T: serde::Serialize>(value: &T) -> Result<String, EngineError> {
    serde_json::to_string_pretty(value).map_err(|e| EngineError::SerdeError(e.to_string()))
}
