//! Builds iterator graphs from transformed query trees.

use log::debug;

use crate::error::Result;
use crate::index::StructuredIndex;
use crate::iterator::QueryIterator;
use crate::parameters::Parameters;
use crate::query::node::Node;
use crate::retrieval::registry;

/// What the factories can see while a graph is being built.
#[derive(Debug)]
pub struct BuildContext<'a> {
    index: &'a dyn StructuredIndex,
    parameters: Parameters,
}

impl<'a> BuildContext<'a> {
    /// `parameters` are the query-level parameters, already merged with
    /// the retrieval configuration.
    pub fn new(index: &'a dyn StructuredIndex, parameters: Parameters) -> Self {
        BuildContext { index, parameters }
    }

    pub fn index(&self) -> &'a dyn StructuredIndex {
        self.index
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Scoring function used by `#feature` without an explicit name.
    pub fn default_scorer(&self) -> &str {
        self.parameters.get_str("scorer").unwrap_or("dirichlet")
    }

    /// Parameters for a scoring node: collection statistics, overridden by
    /// query parameters, overridden by the node's own.
    pub fn scorer_parameters(&self, node: &Node) -> Parameters {
        let mut parameters = Parameters::new()
            .with("collectionLength", self.index.collection_length())
            .with("documentCount", self.index.document_count());
        parameters.merge(&self.parameters);
        parameters.merge(node.parameters());
        parameters
    }

    /// Build the iterator for `node`, children first.
    pub fn build(&self, node: &Node) -> Result<QueryIterator> {
        let node_type = registry::lookup(node.operator())?;
        node_type.validate(node)?;
        let children = node
            .children()
            .iter()
            .map(|child| self.build(child))
            .collect::<Result<Vec<_>>>()?;
        let iterator = node_type.build(self, node, children)?;
        debug!("built #{} as a {} iterator", node.operator(), iterator.capability());
        Ok(iterator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SkeinError;
    use crate::index::memory::MemoryIndex;
    use crate::iterator::{
        Capability, CountIterator, ScoreIterator, ScoringContext, StructuredIterator,
    };
    use crate::query::parser::parse_query;

    fn index() -> MemoryIndex {
        MemoryIndex::builder()
            .add_text(1, "the white house")
            .add_text(2, "a white cat in a white house")
            .add_text(3, "red houses")
            .build()
    }

    fn build(index: &MemoryIndex, query: &str) -> Result<QueryIterator> {
        let context = BuildContext::new(index, Parameters::new().with("mu", 10));
        context.build(&parse_query(query)?)
    }

    #[test]
    fn test_builds_phrase() {
        let index = index();
        let query = "#od:1(#extents:white:part=postings() #extents:house:part=postings())";
        let iterator = build(&index, query).unwrap();
        assert_eq!(iterator.capability(), Capability::Extent);

        let mut extents = iterator.into_extents().unwrap();
        assert_eq!(extents.document(), Some(1));
        extents.next_document().unwrap();
        assert_eq!(extents.document(), Some(2));
        assert_eq!(extents.count(), 1);
    }

    #[test]
    fn test_missing_term_builds_empty_iterator() {
        let index = index();
        let iterator = build(&index, "#extents:zebra:part=postings()").unwrap();
        assert!(iterator.into_structured().is_done());
    }

    #[test]
    fn test_scorer_uses_collection_statistics() {
        let index = index();
        let iterator = build(&index, "#dirichlet(#counts:white:part=postings())").unwrap();
        let scores = iterator.into_scores().unwrap();

        let background = 3.0 / index.collection_length() as f64;
        let expected = ((2.0 + 10.0 * background) / (7.0 + 10.0_f64)).ln();
        let score = scores.score(&ScoringContext {
            document: 2,
            length: 7,
        });
        assert!((score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_construction_errors() {
        let index = index();
        for query in [
            "#near(#extents:a:part=postings())",
            "#od:1()",
            "#od:0(#extents:white:part=postings())",
            "#combine(#extents:white:part=postings())",
            "#od:1(#counts:white:part=postings())",
            "#extents:white()",
            "white",
        ] {
            assert!(
                matches!(build(&index, query), Err(SkeinError::Configuration(_))),
                "{query} should be rejected"
            );
        }
        assert!(matches!(
            build(&index, "#extents:white:part=nowhere()"),
            Err(SkeinError::Index(_))
        ));
    }
}
