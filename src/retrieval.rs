//! Query retrieval over a structured index.
//!
//! [`LocalRetrieval`] is the entry point: it transforms a parsed query
//! tree, builds its iterator graph through the operator registry and drives
//! the graph to a boolean or ranked result set.

pub mod builder;
pub mod collector;
pub mod executor;
pub mod handle;
pub mod registry;
pub mod statistics;

use std::sync::Arc;

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::RetrievalConfig;
use crate::error::{Result, SkeinError};
use crate::index::StructuredIndex;
use crate::parameters::Parameters;
use crate::query::node::Node;
use crate::query::traversal::{
    CompatibilityTraversal, PartAssignmentTraversal, ScoringCastTraversal, traverse,
};

pub use self::builder::BuildContext;
pub use self::collector::{BooleanCollector, Collector, ScoredDocument, TopDocsCollector};
pub use self::handle::QueryHandle;
pub use self::registry::{NodeType, Signature};
pub use self::statistics::{NodeStatistics, QueryStatistics};

/// How a query's result set is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Every matching document, scored 1.0, in document order.
    Boolean,
    /// The best scoring documents, best first.
    Ranked,
}

/// Results together with execution statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResults {
    pub documents: Vec<ScoredDocument>,
    pub statistics: QueryStatistics,
}

/// One query of a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchQuery {
    pub root: Node,
    #[serde(default)]
    pub parameters: Parameters,
    pub mode: QueryMode,
}

/// Retrieval over an index held by this process.
#[derive(Debug, Clone)]
pub struct LocalRetrieval {
    index: Arc<dyn StructuredIndex>,
    config: RetrievalConfig,
}

impl LocalRetrieval {
    pub fn new(index: Arc<dyn StructuredIndex>, config: RetrievalConfig) -> Self {
        LocalRetrieval { index, config }
    }

    /// Retrieval over `index` with the default configuration.
    pub fn with_index<I: StructuredIndex + 'static>(index: I) -> Self {
        LocalRetrieval::new(Arc::new(index), RetrievalConfig::default())
    }

    pub fn index(&self) -> &dyn StructuredIndex {
        self.index.as_ref()
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// The registry entry `node` resolves to.
    pub fn get_node_type(&self, node: &Node) -> Result<&'static NodeType> {
        registry::lookup(node.operator())
    }

    /// Parts of the index: `{name: {"positions": bool, "terms": count}}`.
    pub fn get_available_parts(&self) -> Parameters {
        let mut parts = Parameters::new();
        for part in self.index.parts() {
            parts.set(
                part.name,
                Parameters::new()
                    .with("positions", part.has_positions)
                    .with("terms", part.term_count),
            );
        }
        parts
    }

    /// Collection-level statistics.
    pub fn get_retrieval_statistics(&self) -> Parameters {
        Parameters::new()
            .with("collectionLength", self.index.collection_length())
            .with("documentCount", self.index.document_count())
            .with("parts", self.index.part_names())
    }

    /// Configuration defaults overridden by `parameters`.
    pub fn query_parameters(&self, parameters: &Parameters) -> Parameters {
        self.config.to_parameters().merged(parameters)
    }

    /// Rewrite `root` into the executable form for `mode`.
    pub fn transform_query(&self, root: &Node, mode: QueryMode) -> Result<Node> {
        self.transform_with(root, mode, &self.query_parameters(&Parameters::new()))
    }

    fn transform_with(
        &self,
        root: &Node,
        mode: QueryMode,
        parameters: &Parameters,
    ) -> Result<Node> {
        let node = traverse(root, &mut CompatibilityTraversal)?;
        let stemming = parameters.get_bool_or("stemming", self.config.stemming);
        let mut parts = PartAssignmentTraversal::new(self.get_available_parts(), stemming);
        let node = traverse(&node, &mut parts)?;
        let node = match mode {
            QueryMode::Boolean => node,
            QueryMode::Ranked => {
                let scorer = parameters
                    .get_str("scorer")
                    .unwrap_or(&self.config.default_scorer);
                ScoringCastTraversal::new(scorer, registry::node_capability).cast_root(&node)?
            }
        };
        debug!("transformed {root} into {node}");
        Ok(node)
    }

    /// Document and collection frequency of a count node.
    pub fn get_node_statistics(&self, node: &Node) -> Result<NodeStatistics> {
        let parameters = self.query_parameters(&Parameters::new());
        let node = self.transform_with(node, QueryMode::Boolean, &parameters)?;
        let context = BuildContext::new(self.index.as_ref(), parameters);
        let mut counts = context.build(&node)?.into_counts()?;
        NodeStatistics::collect(node.to_string(), counts.as_mut())
    }

    pub fn run_boolean_query(
        &self,
        root: &Node,
        parameters: &Parameters,
    ) -> Result<Vec<ScoredDocument>> {
        Ok(self.run_boolean_query_with_statistics(root, parameters)?.documents)
    }

    /// Unbounded unless `requestedDocuments` is given.
    pub fn run_boolean_query_with_statistics(
        &self,
        root: &Node,
        parameters: &Parameters,
    ) -> Result<QueryResults> {
        let limit = match parameters.get("requestedDocuments") {
            None => None,
            Some(_) => Some(requested_documents(parameters)?),
        };
        let merged = self.query_parameters(parameters);
        let node = self.transform_with(root, QueryMode::Boolean, &merged)?;
        let context = BuildContext::new(self.index.as_ref(), merged);
        let mut iterator = context.build(&node)?.into_structured();

        let (documents, statistics) = executor::run_boolean(iterator.as_mut(), limit)?;
        info!(
            "boolean query {node} matched {} documents in {}us",
            documents.len(),
            statistics.elapsed_micros
        );
        Ok(QueryResults {
            documents,
            statistics,
        })
    }

    pub fn run_ranked_query(
        &self,
        root: &Node,
        parameters: &Parameters,
    ) -> Result<Vec<ScoredDocument>> {
        Ok(self.run_ranked_query_with_statistics(root, parameters)?.documents)
    }

    /// Top `requestedDocuments` documents, configuration default otherwise.
    pub fn run_ranked_query_with_statistics(
        &self,
        root: &Node,
        parameters: &Parameters,
    ) -> Result<QueryResults> {
        let merged = self.query_parameters(parameters);
        let requested = requested_documents(&merged)?;
        let node = self.transform_with(root, QueryMode::Ranked, &merged)?;
        let context = BuildContext::new(self.index.as_ref(), merged);
        let mut iterator = context.build(&node)?.into_scores()?;

        let (documents, statistics) =
            executor::run_ranked(iterator.as_mut(), self.index.as_ref(), requested)?;
        info!(
            "ranked query {node} scored {} candidates in {}us",
            statistics.candidates, statistics.elapsed_micros
        );
        Ok(QueryResults {
            documents,
            statistics,
        })
    }

    pub fn run_query(
        &self,
        root: &Node,
        parameters: &Parameters,
        mode: QueryMode,
    ) -> Result<Vec<ScoredDocument>> {
        match mode {
            QueryMode::Boolean => self.run_boolean_query(root, parameters),
            QueryMode::Ranked => self.run_ranked_query(root, parameters),
        }
    }

    /// Run a query on the tokio blocking pool. Requires a running runtime.
    pub fn submit_query(
        &self,
        root: Node,
        parameters: Parameters,
        mode: QueryMode,
    ) -> Result<QueryHandle> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| SkeinError::other(format!("no tokio runtime to submit a query to: {e}")))?;
        let retrieval = self.clone();
        let handle = runtime.spawn_blocking(move || retrieval.run_query(&root, &parameters, mode));
        Ok(QueryHandle::new(handle))
    }

    /// Run independent queries in parallel, each with its own iterator graph.
    pub fn run_batch_queries(&self, queries: &[BatchQuery]) -> Vec<Result<Vec<ScoredDocument>>> {
        debug!("running a batch of {} queries", queries.len());
        queries
            .par_iter()
            .map(|query| self.run_query(&query.root, &query.parameters, query.mode))
            .collect()
    }
}

fn requested_documents(parameters: &Parameters) -> Result<usize> {
    parameters
        .get_u64("requestedDocuments")
        .map(|requested| requested as usize)
        .ok_or_else(|| {
            SkeinError::configuration(format!(
                "requestedDocuments must be a non-negative integer, got {:?}",
                parameters.get("requestedDocuments")
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::memory::MemoryIndex;
    use crate::query::parser::parse_query;

    fn retrieval() -> LocalRetrieval {
        let index = MemoryIndex::builder()
            .add_text(1, "the white house on the hill")
            .add_text(2, "a white cat in a white house")
            .add_text(3, "red houses and a white fence")
            .add_text(4, "the cat sat")
            .build();
        LocalRetrieval::with_index(index)
    }

    fn documents(results: &[ScoredDocument]) -> Vec<u64> {
        results.iter().map(|d| d.document).collect()
    }

    #[test]
    fn test_transform_ranked_query() {
        let retrieval = retrieval();
        let node = retrieval
            .transform_query(&parse_query("white houses").unwrap(), QueryMode::Ranked)
            .unwrap();
        assert_eq!(
            node.to_string(),
            "#combine(#feature:dirichlet(#extents:white:part=stemmedPostings()) \
             #feature:dirichlet(#extents:hous:part=stemmedPostings()))"
        );

        let again = retrieval.transform_query(&node, QueryMode::Ranked).unwrap();
        assert_eq!(again, node);
    }

    #[test]
    fn test_boolean_query() {
        let retrieval = retrieval();
        let root = parse_query("#band(white house)").unwrap();
        let results = retrieval.run_boolean_query(&root, &Parameters::new()).unwrap();
        assert_eq!(documents(&results), vec![1, 2, 3]);

        let root = parse_query("#bor(cat fence)").unwrap();
        let limited = Parameters::new().with("requestedDocuments", 2);
        let results = retrieval.run_boolean_query(&root, &limited).unwrap();
        assert_eq!(documents(&results), vec![2, 3]);
    }

    #[test]
    fn test_ranked_query() {
        let retrieval = retrieval();
        let root = parse_query("white house").unwrap();
        let parameters = Parameters::new().with("requestedDocuments", 2);
        let results = retrieval.run_ranked_query_with_statistics(&root, &parameters).unwrap();

        assert_eq!(results.documents.len(), 2);
        assert_eq!(results.documents[0].document, 2);
        assert_eq!(results.statistics.candidates, 3);
        assert!(results.documents[0].score >= results.documents[1].score);
    }

    #[test]
    fn test_numeric_window_matches_canonical_form() {
        let retrieval = retrieval();
        let parameters = Parameters::new();
        let shorthand = retrieval
            .run_ranked_query(&parse_query("#2(white house)").unwrap(), &parameters)
            .unwrap();
        let canonical = retrieval
            .run_ranked_query(&parse_query("#od:2(white house)").unwrap(), &parameters)
            .unwrap();
        assert_eq!(shorthand, canonical);
        assert_eq!(documents(&shorthand), vec![1, 2]);
    }

    #[test]
    fn test_node_statistics() {
        let retrieval = retrieval();
        let statistics = retrieval
            .get_node_statistics(&parse_query("white").unwrap())
            .unwrap();
        assert_eq!(statistics.document_frequency, 3);
        assert_eq!(statistics.node_frequency, 4);
    }

    #[test]
    fn test_parts_and_statistics() {
        let retrieval = retrieval();
        let parts = retrieval.get_available_parts();
        assert!(parts.contains("postings"));
        assert_eq!(
            parts.get_map("stemmedPostings").and_then(|p| p.get_bool("positions")),
            Some(true)
        );

        let statistics = retrieval.get_retrieval_statistics();
        assert_eq!(statistics.get_u64("documentCount"), Some(4));
        assert_eq!(statistics.get_u64("collectionLength"), Some(22));
        assert_eq!(
            retrieval.get_node_type(&Node::new("uw")).unwrap().operator(),
            "uw"
        );
    }

    #[test]
    fn test_batch_queries() {
        let retrieval = retrieval();
        let queries = vec![
            BatchQuery {
                root: parse_query("cat").unwrap(),
                parameters: Parameters::new(),
                mode: QueryMode::Boolean,
            },
            BatchQuery {
                root: parse_query("#unknown(cat)").unwrap(),
                parameters: Parameters::new(),
                mode: QueryMode::Ranked,
            },
        ];
        let results = retrieval.run_batch_queries(&queries);
        assert_eq!(documents(results[0].as_ref().unwrap()), vec![2, 4]);
        assert!(results[1].is_err());
    }

    #[test]
    fn test_submit_requires_runtime() {
        let retrieval = retrieval();
        let result =
            retrieval.submit_query(Node::text("cat"), Parameters::new(), QueryMode::Boolean);
        assert!(matches!(result, Err(SkeinError::Other(_))));
    }
}
