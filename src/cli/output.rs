//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, SkeinArgs};
use crate::error::Result;
use crate::parameters::Parameters;
use crate::retrieval::{NodeStatistics, QueryMode, QueryStatistics, ScoredDocument};

/// Result structure for query parsing.
#[derive(Debug, Serialize, Deserialize)]
pub struct ParseResult {
    pub query: String,
    pub parsed: String,
    pub transformed: String,
    pub mode: QueryMode,
}

/// Result structure for search operations.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: String,
    pub mode: QueryMode,
    pub documents: Vec<ScoredDocument>,
    pub statistics: QueryStatistics,
}

/// Index statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexStats {
    pub collection_length: u64,
    pub document_count: u64,
    pub parts: Parameters,
    pub node: Option<NodeStatistics>,
}

/// Output a result in the requested format.
pub fn output_result<T: Serialize + std::fmt::Debug>(
    message: &str,
    result: &T,
    args: &SkeinArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

fn output_human<T: Serialize>(message: &str, result: &T, args: &SkeinArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
    }
    let value = serde_json::to_value(result)?;
    print_value(&value, 0);
    Ok(())
}

fn print_value(value: &serde_json::Value, depth: usize) {
    let indent = "  ".repeat(depth);
    match value {
        serde_json::Value::Object(map) => {
            for (key, value) in map {
                match value {
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        println!("{indent}{key}:");
                        print_value(value, depth + 1);
                    }
                    serde_json::Value::String(text) => println!("{indent}{key}: {text}"),
                    other => println!("{indent}{key}: {other}"),
                }
            }
        }
        serde_json::Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                match item {
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        println!("{indent}[{i}]");
                        print_value(item, depth + 1);
                    }
                    other => println!("{indent}- {other}"),
                }
            }
        }
        serde_json::Value::String(text) => println!("{indent}{text}"),
        other => println!("{indent}{other}"),
    }
}

fn output_json<T: Serialize>(result: &T, args: &SkeinArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}
