//! In-memory index parts.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SkeinError};
use crate::extent::{DocId, Extent, ExtentArray};
use crate::index::{
    EXTENTS_PART, POSTINGS_PART, PartInfo, PostingCursor, STEMMED_POSTINGS_PART, StructuredIndex,
};
use crate::query::stemmer::{PorterStemmer, Stemmer};

/// A single posting: the occurrence spans of a term in one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    /// Document ID.
    pub document: DocId,
    /// Occurrence count.
    pub count: u32,
    /// Occurrence spans `(begin, end)`, sorted by begin. Empty for count-only parts.
    #[serde(default)]
    pub spans: Vec<(u32, u32)>,
}

impl Posting {
    /// Create a posting from term positions.
    pub fn with_positions(document: DocId, positions: &[u32]) -> Self {
        Posting {
            document,
            count: positions.len() as u32,
            spans: positions.iter().map(|&p| (p, p + 1)).collect(),
        }
    }

    /// Create a count-only posting.
    pub fn with_count(document: DocId, count: u32) -> Self {
        Posting {
            document,
            count,
            spans: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct MemoryPart {
    has_positions: bool,
    terms: AHashMap<String, Arc<Vec<Posting>>>,
}

/// An index whose parts are held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    parts: BTreeMap<String, MemoryPart>,
    lengths: AHashMap<DocId, u32>,
    collection_length: u64,
}

impl MemoryIndex {
    /// Start building an index.
    pub fn builder() -> MemoryIndexBuilder {
        MemoryIndexBuilder::default()
    }

    /// Load an index from its JSON description.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse an index from its JSON description.
    ///
    /// ```json
    /// {
    ///   "documents": [{"id": 1, "text": "white house", "fields": {"title": [[0, 2]]}}],
    ///   "parts": {"postings": {"positions": true, "terms": {
    ///     "white": [{"document": 1, "count": 1, "spans": [[0, 1]]}]
    ///   }}}
    /// }
    /// ```
    pub fn from_json_str(text: &str) -> Result<Self> {
        let data: MemoryIndexData = serde_json::from_str(text)?;
        let mut builder = MemoryIndex::builder();

        for document in data.documents {
            match document.text {
                Some(text) => builder = builder.add_text(document.id, &text),
                None => {
                    let length = document.length.unwrap_or(0);
                    builder = builder.document_length(document.id, length);
                }
            }
            for (field, spans) in document.fields {
                for (begin, end) in spans {
                    builder = builder.add_field(document.id, &field, begin, end);
                }
            }
        }

        for (name, part) in data.parts {
            builder = builder.part(&name, part.positions);
            for (term, postings) in part.terms {
                for posting in postings {
                    builder = builder.add_posting(&name, &term, posting)?;
                }
            }
        }

        Ok(builder.build())
    }
}

impl StructuredIndex for MemoryIndex {
    fn parts(&self) -> Vec<PartInfo> {
        self.parts
            .iter()
            .map(|(name, part)| PartInfo {
                name: name.clone(),
                has_positions: part.has_positions,
                term_count: part.terms.len() as u64,
            })
            .collect()
    }

    fn cursor(&self, part: &str, term: &str) -> Result<Option<Box<dyn PostingCursor>>> {
        let memory_part = self
            .parts
            .get(part)
            .ok_or_else(|| SkeinError::index(format!("no such index part: {part}")))?;

        Ok(memory_part.terms.get(term).map(|postings| {
            Box::new(MemoryPostingCursor::new(Arc::clone(postings))) as Box<dyn PostingCursor>
        }))
    }

    fn collection_length(&self) -> u64 {
        self.collection_length
    }

    fn document_count(&self) -> u64 {
        self.lengths.len() as u64
    }

    fn document_length(&self, document: DocId) -> Result<u32> {
        Ok(self.lengths.get(&document).copied().unwrap_or(0))
    }

    fn document_frequency(&self, part: &str, term: &str) -> Result<u64> {
        let memory_part = self
            .parts
            .get(part)
            .ok_or_else(|| SkeinError::index(format!("no such index part: {part}")))?;
        Ok(memory_part
            .terms
            .get(term)
            .map(|p| p.len() as u64)
            .unwrap_or(0))
    }
}

/// Cursor over a shared in-memory posting list.
#[derive(Debug)]
pub struct MemoryPostingCursor {
    postings: Arc<Vec<Posting>>,
    position: usize,
}

impl MemoryPostingCursor {
    pub fn new(postings: Arc<Vec<Posting>>) -> Self {
        MemoryPostingCursor {
            postings,
            position: 0,
        }
    }

    fn current(&self) -> Option<&Posting> {
        self.postings.get(self.position)
    }
}

impl PostingCursor for MemoryPostingCursor {
    fn document(&self) -> Option<DocId> {
        self.current().map(|p| p.document)
    }

    fn count(&self) -> u32 {
        self.current().map(|p| p.count).unwrap_or(0)
    }

    fn extents(&self) -> ExtentArray {
        match self.current() {
            Some(posting) => {
                let mut array = ExtentArray::for_document(posting.document);
                for &(begin, end) in &posting.spans {
                    array.push(Extent::new(posting.document, begin, end));
                }
                array
            }
            None => ExtentArray::new(),
        }
    }

    fn next(&mut self) -> Result<bool> {
        if self.position < self.postings.len() {
            self.position += 1;
        }
        Ok(self.position < self.postings.len())
    }

    fn skip_to(&mut self, target: DocId) -> Result<bool> {
        // Postings are sorted, so the remaining tail can be binary searched.
        let tail = &self.postings[self.position.min(self.postings.len())..];
        let offset = tail.partition_point(|p| p.document < target);
        self.position += offset;
        Ok(self.position < self.postings.len())
    }

    fn reset(&mut self) -> Result<()> {
        self.position = 0;
        Ok(())
    }

    fn cost(&self) -> u64 {
        self.postings.len() as u64
    }
}

/// Builder for [`MemoryIndex`].
#[derive(Debug, Default)]
pub struct MemoryIndexBuilder {
    parts: BTreeMap<String, (bool, BTreeMap<String, BTreeMap<DocId, Posting>>)>,
    lengths: AHashMap<DocId, u32>,
}

impl MemoryIndexBuilder {
    /// Declare a part, even if it stays empty.
    pub fn part(mut self, name: &str, has_positions: bool) -> Self {
        self.parts
            .entry(name.to_string())
            .or_insert_with(|| (has_positions, BTreeMap::new()));
        self
    }

    /// Record a document's length.
    pub fn document_length(mut self, document: DocId, length: u32) -> Self {
        self.lengths.insert(document, length);
        self
    }

    /// Tokenize `text` and index it into the `postings` and `stemmedPostings`
    /// parts. The document length becomes the token count.
    pub fn add_text(mut self, document: DocId, text: &str) -> Self {
        let stemmer = PorterStemmer::new();
        let tokens = tokenize(text);
        self.lengths.insert(document, tokens.len() as u32);

        for (position, token) in tokens.iter().enumerate() {
            let position = position as u32;
            self.push_span(POSTINGS_PART, token, document, position, position + 1);
            let stemmed = stemmer.stem(token);
            self.push_span(STEMMED_POSTINGS_PART, &stemmed, document, position, position + 1);
        }
        self
    }

    /// Add one field span to the `extents` part.
    pub fn add_field(mut self, document: DocId, field: &str, begin: u32, end: u32) -> Self {
        self.push_span(EXTENTS_PART, field, document, begin, end);
        self
    }

    /// Add a prepared posting to a part. Spans may arrive in any order.
    pub fn add_posting(mut self, part: &str, term: &str, mut posting: Posting) -> Result<Self> {
        if !posting.spans.is_empty() && posting.spans.len() as u32 != posting.count {
            return Err(SkeinError::index(format!(
                "posting for {term} in document {} has count {} but {} spans",
                posting.document,
                posting.count,
                posting.spans.len()
            )));
        }
        posting.spans.sort_unstable();
        let (_, terms) = self
            .parts
            .entry(part.to_string())
            .or_insert_with(|| (!posting.spans.is_empty(), BTreeMap::new()));
        terms
            .entry(term.to_string())
            .or_default()
            .insert(posting.document, posting);
        Ok(self)
    }

    fn push_span(&mut self, part: &str, term: &str, document: DocId, begin: u32, end: u32) {
        let (_, terms) = self
            .parts
            .entry(part.to_string())
            .or_insert_with(|| (true, BTreeMap::new()));
        let posting = terms
            .entry(term.to_string())
            .or_default()
            .entry(document)
            .or_insert_with(|| Posting::with_count(document, 0));
        posting.count += 1;
        posting.spans.push((begin, end));
        posting.spans.sort_unstable();
    }

    /// Finish the index.
    pub fn build(self) -> MemoryIndex {
        let parts: BTreeMap<String, MemoryPart> = self
            .parts
            .into_iter()
            .map(|(name, (has_positions, terms))| {
                let terms = terms
                    .into_iter()
                    .map(|(term, postings)| (term, Arc::new(postings.into_values().collect())))
                    .collect();
                (
                    name,
                    MemoryPart {
                        has_positions,
                        terms,
                    },
                )
            })
            .collect();

        let collection_length = self.lengths.values().map(|&l| l as u64).sum();
        debug!(
            "built memory index: {} parts, {} documents, collection length {}",
            parts.len(),
            self.lengths.len(),
            collection_length
        );

        MemoryIndex {
            parts,
            lengths: self.lengths,
            collection_length,
        }
    }
}

/// Lower-cased alphanumeric tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[derive(Debug, Deserialize)]
struct MemoryIndexData {
    #[serde(default)]
    documents: Vec<DocumentData>,
    #[serde(default)]
    parts: BTreeMap<String, PartData>,
}

#[derive(Debug, Deserialize)]
struct DocumentData {
    id: DocId,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    length: Option<u32>,
    #[serde(default)]
    fields: BTreeMap<String, Vec<(u32, u32)>>,
}

#[derive(Debug, Deserialize)]
struct PartData {
    #[serde(default = "default_positions")]
    positions: bool,
    #[serde(default)]
    terms: BTreeMap<String, Vec<Posting>>,
}

fn default_positions() -> bool {
    true
}
