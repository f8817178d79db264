//! Integration tests for ranked and boolean retrieval over a memory index.

use std::io::Write;

use skein::prelude::*;
use skein::retrieval::BatchQuery;

fn collection() -> LocalRetrieval {
    let index = MemoryIndex::builder()
        .add_text(1, "the white house on the hill")
        .add_text(2, "a white cat in a white house")
        .add_text(3, "red houses and a white fence")
        .add_text(4, "the cat sat on the mat")
        .add_field(1, "title", 0, 3)
        .add_field(2, "title", 0, 3)
        .add_field(3, "title", 0, 2)
        .add_field(3, "body", 2, 6)
        .build();
    LocalRetrieval::with_index(index)
}

fn documents(results: &[ScoredDocument]) -> Vec<DocId> {
    results.iter().map(|d| d.document).collect()
}

fn boolean(retrieval: &LocalRetrieval, query: &str) -> Result<Vec<DocId>> {
    let root = parse_query(query)?;
    let results = retrieval.run_boolean_query(&root, &Parameters::new())?;
    Ok(documents(&results))
}

#[test]
fn test_ranked_results_are_ordered() -> Result<()> {
    let retrieval = collection();
    let root = parse_query("white cat")?;
    let results = retrieval.run_ranked_query(&root, &Parameters::new())?;

    assert_eq!(results[0].document, 2);
    assert!(results.windows(2).all(|pair| pair[0].score >= pair[1].score));
    let mut matched = documents(&results);
    matched.sort_unstable();
    assert_eq!(matched, vec![1, 2, 3, 4]);
    Ok(())
}

#[test]
fn test_requested_documents_bounds_ranked_results() -> Result<()> {
    let retrieval = collection();
    let root = parse_query("white")?;
    let parameters = Parameters::new().with("requestedDocuments", 1);
    let results = retrieval.run_ranked_query_with_statistics(&root, &parameters)?;

    assert_eq!(results.documents.len(), 1);
    assert_eq!(results.statistics.candidates, 3);
    assert_eq!(results.statistics.returned, 1);
    Ok(())
}

#[test]
fn test_scorers_agree_on_the_best_document() -> Result<()> {
    let retrieval = collection();
    let root = parse_query("white")?;
    for scorer in ["dirichlet", "jm", "linear"] {
        let parameters = Parameters::new().with("scorer", scorer);
        let results = retrieval.run_ranked_query(&root, &parameters)?;
        assert_eq!(results[0].document, 2, "scorer {scorer}");
    }
    Ok(())
}

#[test]
fn test_phrase_and_windows() -> Result<()> {
    let retrieval = collection();
    assert_eq!(boolean(&retrieval, "#od:1(white house)")?, vec![1, 2]);
    assert_eq!(boolean(&retrieval, "\"white house\"")?, vec![1, 2]);
    assert_eq!(boolean(&retrieval, "#uw:3(house white)")?, vec![1, 2]);
    assert_eq!(boolean(&retrieval, "#od:1(house white)")?, Vec::<DocId>::new());
    Ok(())
}

#[test]
fn test_window_widths() -> Result<()> {
    let retrieval = collection();
    assert_eq!(boolean(&retrieval, "#od:4294967295(white house)")?, vec![1, 2]);
    assert_eq!(boolean(&retrieval, "#uw:4294967295(house white)")?, vec![1, 2, 3]);

    // Unspecified unordered widths span four positions per child.
    assert_eq!(boolean(&retrieval, "#uw(house white)")?, vec![1, 2, 3]);
    assert_eq!(boolean(&retrieval, "#uw(white house hill)")?, vec![1]);
    Ok(())
}

#[test]
fn test_bm25_ranking() -> Result<()> {
    let index = MemoryIndex::builder()
        .add_text(1, "calm day at sea")
        .add_text(2, "storm storm at sea")
        .add_text(3, "calm night at sea")
        .add_text(4, "calm dawn at sea")
        .add_text(5, "a storm at sea")
        .add_text(6, "calm dusk at sea")
        .build();
    let retrieval = LocalRetrieval::with_index(index);
    let root = parse_query("storm")?;

    let parameters = Parameters::new().with("scorer", "bm25");
    let results = retrieval.run_ranked_query(&root, &parameters)?;
    assert_eq!(documents(&results), vec![2, 5]);
    assert!(results[1].score > 0.0);
    assert!(results[0].score > results[1].score);

    let explicit = retrieval.run_ranked_query(&parse_query("#bm25(storm)")?, &Parameters::new())?;
    assert_eq!(explicit, results);
    Ok(())
}

#[test]
fn test_field_restriction() -> Result<()> {
    let retrieval = collection();
    assert_eq!(boolean(&retrieval, "white.title")?, vec![1, 2]);
    assert_eq!(boolean(&retrieval, "house.title")?, vec![1, 3]);
    assert_eq!(boolean(&retrieval, "white.title,body")?, vec![1, 2, 3]);
    Ok(())
}

#[test]
fn test_smoothed_field_scoring() -> Result<()> {
    let retrieval = collection();
    let root = parse_query("white.(title)")?;
    let results = retrieval.run_ranked_query(&root, &Parameters::new())?;

    let mut matched = documents(&results);
    matched.sort_unstable();
    assert_eq!(matched, vec![1, 2, 3]);
    Ok(())
}

#[test]
fn test_missing_terms_match_nothing() -> Result<()> {
    let retrieval = collection();
    assert!(boolean(&retrieval, "zebra")?.is_empty());
    assert_eq!(boolean(&retrieval, "#bor(zebra cat)")?, vec![2, 4]);
    assert!(boolean(&retrieval, "#band(zebra cat)")?.is_empty());
    Ok(())
}

#[test]
fn test_unknown_operator_is_a_configuration_error() {
    let retrieval = collection();
    let root = parse_query("#frobnicate(cat)").unwrap();
    let result = retrieval.run_ranked_query(&root, &Parameters::new());
    assert!(matches!(result, Err(SkeinError::Configuration(_))));
}

#[test]
fn test_batch_matches_sequential_execution() -> Result<()> {
    let retrieval = collection();
    let queries: Vec<BatchQuery> = ["white", "cat", "#od:1(white house)"]
        .iter()
        .map(|text| BatchQuery {
            root: parse_query(text).unwrap(),
            parameters: Parameters::new(),
            mode: QueryMode::Ranked,
        })
        .collect();

    let batch = retrieval.run_batch_queries(&queries);
    for (query, result) in queries.iter().zip(batch) {
        let sequential = retrieval.run_ranked_query(&query.root, &query.parameters)?;
        assert_eq!(result?, sequential);
    }
    Ok(())
}

#[test]
fn test_index_from_json_file() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(
        file,
        r#"{{
            "documents": [
                {{
                    "id": 7,
                    "text": "ranking with structured queries",
                    "fields": {{"title": [[0, 2]]}}
                }},
                {{"id": 9, "text": "queries about structure"}}
            ]
        }}"#
    )?;

    let retrieval = LocalRetrieval::with_index(MemoryIndex::from_json_file(file.path())?);
    assert_eq!(boolean(&retrieval, "queries")?, vec![7, 9]);
    assert_eq!(boolean(&retrieval, "ranking.title")?, vec![7]);
    assert_eq!(
        retrieval.get_retrieval_statistics().get_u64("documentCount"),
        Some(2)
    );
    Ok(())
}

#[test]
fn test_json_spans_in_any_order() -> Result<()> {
    let index = MemoryIndex::from_json_str(
        r#"{
            "documents": [{"id": 1, "length": 8}],
            "parts": {"postings": {"positions": true, "terms": {
                "white": [{"document": 1, "count": 2, "spans": [[5, 6], [1, 2]]}],
                "house": [{"document": 1, "count": 1, "spans": [[6, 7]]}]
            }}}
        }"#,
    )?;
    let retrieval = LocalRetrieval::with_index(index);

    assert_eq!(boolean(&retrieval, "white")?, vec![1]);
    assert_eq!(boolean(&retrieval, "#od:1(white house)")?, vec![1]);
    Ok(())
}
