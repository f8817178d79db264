//! Command implementations for the skein CLI.

use std::path::Path;
use std::sync::Arc;

use log::{debug, info};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::index::StructuredIndex;
use crate::index::memory::MemoryIndex;
use crate::parameters::Parameters;
use crate::query::parser::parse_query;
use crate::retrieval::{LocalRetrieval, QueryMode};

/// Execute a CLI command.
pub fn execute_command(args: SkeinArgs) -> Result<()> {
    match &args.command {
        Command::Parse(parse_args) => parse(parse_args, &args),
        Command::Search(search_args) => search(search_args, &args),
        Command::Stats(stats_args) => stats(stats_args, &args),
    }
}

fn load_config(cli_args: &SkeinArgs) -> Result<RetrievalConfig> {
    match &cli_args.config {
        Some(path) => {
            debug!("loading configuration from {}", path.display());
            RetrievalConfig::from_file(path)
        }
        None => Ok(RetrievalConfig::default()),
    }
}

fn open_retrieval(index: Option<&Path>, cli_args: &SkeinArgs) -> Result<LocalRetrieval> {
    let config = load_config(cli_args)?;
    let index = match index {
        Some(path) => {
            info!("loading index from {}", path.display());
            MemoryIndex::from_json_file(path)?
        }
        None => MemoryIndex::default(),
    };
    Ok(LocalRetrieval::new(Arc::new(index), config))
}

fn mode(boolean: bool) -> QueryMode {
    if boolean {
        QueryMode::Boolean
    } else {
        QueryMode::Ranked
    }
}

/// Parse a query and show the tree retrieval would execute.
fn parse(args: &ParseArgs, cli_args: &SkeinArgs) -> Result<()> {
    let retrieval = open_retrieval(args.index.as_deref(), cli_args)?;
    let root = parse_query(&args.query)?;
    let mode = mode(args.boolean);
    let transformed = retrieval.transform_query(&root, mode)?;

    let result = ParseResult {
        query: args.query.clone(),
        parsed: root.to_string(),
        transformed: transformed.to_string(),
        mode,
    };
    output_result("Parsed query", &result, cli_args)
}

/// Run a query against an index file.
fn search(args: &SearchArgs, cli_args: &SkeinArgs) -> Result<()> {
    let retrieval = open_retrieval(Some(&args.index), cli_args)?;
    let root = parse_query(&args.query)?;
    let mode = mode(args.boolean);

    let mut parameters = match &args.parameters {
        Some(json) => Parameters::parse_json(json)?,
        None => Parameters::new(),
    };
    if let Some(requested) = args.requested {
        parameters.set("requestedDocuments", requested as u64);
    }
    if let Some(scorer) = &args.scorer {
        parameters.set("scorer", scorer.as_str());
    }

    let results = match mode {
        QueryMode::Boolean => retrieval.run_boolean_query_with_statistics(&root, &parameters)?,
        QueryMode::Ranked => retrieval.run_ranked_query_with_statistics(&root, &parameters)?,
    };

    let result = SearchResults {
        query: args.query.clone(),
        mode,
        documents: results.documents,
        statistics: results.statistics,
    };
    let message = format!("Found {} documents", result.documents.len());
    output_result(&message, &result, cli_args)
}

/// Report collection statistics, optionally for one node too.
fn stats(args: &StatsArgs, cli_args: &SkeinArgs) -> Result<()> {
    let retrieval = open_retrieval(Some(&args.index), cli_args)?;
    let node = match &args.node {
        Some(query) => Some(retrieval.get_node_statistics(&parse_query(query)?)?),
        None => None,
    };

    let index = retrieval.index();
    let result = IndexStats {
        collection_length: index.collection_length(),
        document_count: index.document_count(),
        parts: retrieval.get_available_parts(),
        node,
    };
    output_result("Index statistics", &result, cli_args)
}
