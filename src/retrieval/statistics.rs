//! Statistics reported alongside results.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::iterator::CountIterator;

/// Bookkeeping of one query execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryStatistics {
    /// Candidate documents the root iterator visited.
    pub candidates: u64,
    /// Documents returned.
    pub returned: u64,
    /// Documents pushed out of a full top-K set.
    pub evictions: u64,
    /// Wall time spent driving the iterator graph.
    pub elapsed_micros: u64,
}

/// Frequencies of a count node in the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStatistics {
    /// The node, in query syntax.
    pub node: String,
    /// Documents the node occurs in.
    pub document_frequency: u64,
    /// Total occurrences.
    pub node_frequency: u64,
    /// Largest count in any single document.
    pub maximum_count: u32,
}

impl NodeStatistics {
    /// Scan `iterator` to its end, then reset it.
    pub fn collect<I: CountIterator + ?Sized>(node: String, iterator: &mut I) -> Result<Self> {
        let mut statistics = NodeStatistics {
            node,
            ..NodeStatistics::default()
        };
        while !iterator.is_done() {
            let count = iterator.count();
            if count > 0 {
                statistics.document_frequency += 1;
                statistics.node_frequency += count as u64;
                statistics.maximum_count = statistics.maximum_count.max(count);
            }
            iterator.next_document()?;
        }
        iterator.reset()?;
        Ok(statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iterator::StructuredIterator;
    use crate::iterator::testing;

    #[test]
    fn test_node_statistics() {
        let mut iterator = testing::counts(&[(1, 2), (4, 5), (6, 1)]);
        let statistics = NodeStatistics::collect("#counts:a()".to_string(), &mut iterator).unwrap();

        assert_eq!(statistics.document_frequency, 3);
        assert_eq!(statistics.node_frequency, 8);
        assert_eq!(statistics.maximum_count, 5);
        assert_eq!(iterator.document(), Some(1));
    }

    #[test]
    fn test_statistics_json() {
        let statistics = QueryStatistics {
            candidates: 4,
            returned: 2,
            evictions: 1,
            elapsed_micros: 10,
        };
        let json = serde_json::to_value(&statistics).unwrap();
        assert_eq!(json["elapsedMicros"], 10);
    }
}
