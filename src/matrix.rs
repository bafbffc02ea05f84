use std::collections::BTreeMap;

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::token2id::Token2Id;

/// Minimum number of documents to consider parallel counting
const MIN_DOCS_FOR_PARALLEL: usize = 100;

/// Minimum total token count to consider parallel counting
const MIN_TOKENS_FOR_PARALLEL: usize = 10_000;

/// Read-only view shared by the dense and the sparse matrix representation.
///
/// Both forms answer the same questions: how many documents, how many types,
/// how often does a token occur in a document, how often in the whole corpus.
/// Callers that only inspect counts can take either representation.
pub trait TermTable {
    /// Number of documents (rows).
    fn doc_count(&self) -> usize;

    /// Number of distinct types (columns).
    fn vocab_size(&self) -> usize;

    /// Occurrence count of `token` in the document named `label`.
    /// Returns 0 for unknown labels or tokens.
    fn count(&self, label: &str, token: &str) -> u64;

    /// Total occurrence count of `token` across the whole corpus.
    fn corpus_frequency(&self, token: &str) -> u64;
}

/// Dense document-term matrix for small corpora.
///
/// Rows are positional document labels (duplicates are permitted and never
/// merged), columns are types with one count per document, zero-filled where
/// a token does not occur. Columns are ordered by descending total corpus
/// frequency; ties keep first-seen order.
///
/// # Examples
/// ```
/// use topic_tools::{DocumentTermMatrix, TermTable};
///
/// let corpus = vec![
///     vec!["this", "is", "document", "one"],
///     vec!["this", "is", "document", "two"],
/// ];
/// let labels = ["document_one", "document_two"];
/// let matrix = DocumentTermMatrix::from_corpus(&corpus, &labels).unwrap();
/// assert_eq!(matrix.shape(), (2, 5));
/// assert_eq!(matrix.count("document_one", "one"), 1);
/// assert_eq!(matrix.count("document_one", "two"), 0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTermMatrix {
    labels: Vec<String>,
    /// token -> one count per document, in frequency-sorted column order
    #[serde(with = "indexmap::map::serde_seq")]
    columns: IndexMap<String, Vec<u64>>,
}

impl DocumentTermMatrix {
    /// Build a dense matrix from a tokenized corpus and its document labels.
    ///
    /// # Arguments
    /// * `corpus` - one token sequence per document
    /// * `labels` - one label per document, same length as `corpus`
    ///
    /// # Errors
    /// `Error::LengthMismatch` if `labels` and `corpus` differ in length.
    pub fn from_corpus<T, L>(corpus: &[Vec<T>], labels: &[L]) -> Result<Self>
    where
        T: AsRef<str> + Sync,
        L: AsRef<str>,
    {
        if corpus.len() != labels.len() {
            return Err(Error::LengthMismatch {
                expected: corpus.len(),
                actual: labels.len(),
            });
        }

        let per_document = count_corpus(corpus);

        // Union the per-document vocabularies in first-seen order and total
        // up corpus frequencies.
        let mut totals: IndexMap<String, u64> = IndexMap::new();
        for counts in &per_document {
            for (token, &count) in counts {
                *totals.entry(token.clone()).or_insert(0) += count;
            }
        }

        // Stable sort keeps first-seen order among equal frequencies.
        let mut order: Vec<(String, u64)> = totals.into_iter().collect();
        order.sort_by(|a, b| b.1.cmp(&a.1));

        let mut columns = IndexMap::with_capacity(order.len());
        for (token, _) in order {
            let column: Vec<u64> = per_document
                .iter()
                .map(|counts| counts.get(&token).copied().unwrap_or(0))
                .collect();
            columns.insert(token, column);
        }

        debug!(
            num_documents = corpus.len(),
            vocab_size = columns.len(),
            "Dense document-term matrix built"
        );
        Ok(DocumentTermMatrix {
            labels: labels.iter().map(|l| l.as_ref().to_string()).collect(),
            columns,
        })
    }

    /// Document labels in row order.
    #[inline]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Types in column order (descending corpus frequency).
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Columns in order: token and its per-document counts.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[u64])> {
        self.columns
            .iter()
            .map(|(token, counts)| (token.as_str(), counts.as_slice()))
    }

    /// The per-document counts for one token, if present.
    #[inline]
    pub fn column(&self, token: &str) -> Option<&[u64]> {
        self.columns.get(token).map(Vec::as_slice)
    }

    /// (documents, types)
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.labels.len(), self.columns.len())
    }

    /// Occurrence count by row position instead of label. Positions keep
    /// duplicate labels apart.
    pub fn count_at(&self, position: usize, token: &str) -> u64 {
        self.columns
            .get(token)
            .and_then(|column| column.get(position))
            .copied()
            .unwrap_or(0)
    }

    /// One row of counts, in column order.
    pub fn row(&self, position: usize) -> Option<Vec<u64>> {
        if position >= self.labels.len() {
            return None;
        }
        Some(self.columns.values().map(|column| column[position]).collect())
    }

    /// Total corpus frequency per column, in column order.
    pub fn column_sums(&self) -> Vec<(&str, u64)> {
        self.columns
            .iter()
            .map(|(token, column)| (token.as_str(), column.iter().sum()))
            .collect()
    }

    /// Drop the columns named in `features`.
    ///
    /// Tokens that are not present are silently ignored, so removal is
    /// idempotent and repeated calls are safe. Row values and the relative
    /// order of the remaining columns are unchanged.
    ///
    /// # Returns
    /// The number of columns actually removed.
    pub fn remove_features<T>(&mut self, features: &[T]) -> usize
    where
        T: AsRef<str>,
    {
        let mut removed = 0;
        for feature in features {
            if self.columns.shift_remove(feature.as_ref()).is_some() {
                removed += 1;
            }
        }
        debug!(removed, "Features removed from matrix");
        removed
    }
}

impl TermTable for DocumentTermMatrix {
    fn doc_count(&self) -> usize {
        self.labels.len()
    }

    fn vocab_size(&self) -> usize {
        self.columns.len()
    }

    /// Under duplicate labels this reads the first matching row; use
    /// [`DocumentTermMatrix::count_at`] to address rows positionally.
    fn count(&self, label: &str, token: &str) -> u64 {
        self.labels
            .iter()
            .position(|l| l == label)
            .map_or(0, |position| self.count_at(position, token))
    }

    fn corpus_frequency(&self, token: &str) -> u64 {
        self.columns
            .get(token)
            .map_or(0, |column| column.iter().sum())
    }
}

/// Sparse document-term matrix for large corpora.
///
/// Documents and types are mapped to integer identifiers through two
/// append-only [`Token2Id`] instances, and counts are keyed by
/// (document id, type id). Zero entries are never stored.
///
/// Because document ids come from an append-only mapping, duplicate document
/// labels are an error here, unlike in the dense representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparseTermMatrix {
    document_ids: Token2Id,
    type_ids: Token2Id,
    counts: BTreeMap<(u32, u32), u64>,
}

impl SparseTermMatrix {
    /// Build the indexed sparse representation from a tokenized corpus.
    ///
    /// # Errors
    /// * `Error::LengthMismatch` if `labels` and `corpus` differ in length.
    /// * `Error::DuplicateToken` if two documents carry the same label.
    pub fn from_corpus<T, L>(corpus: &[Vec<T>], labels: &[L]) -> Result<Self>
    where
        T: AsRef<str>,
        L: AsRef<str>,
    {
        if corpus.len() != labels.len() {
            return Err(Error::LengthMismatch {
                expected: corpus.len(),
                actual: labels.len(),
            });
        }

        let mut document_ids = Token2Id::new();
        let mut type_ids = Token2Id::new();
        let mut counts: BTreeMap<(u32, u32), u64> = BTreeMap::new();

        for (document, label) in corpus.iter().zip(labels) {
            let document_id = document_ids.add(label.as_ref())?;
            for token in document {
                let token = token.as_ref();
                let type_id = match type_ids.get(token) {
                    Some(id) => id,
                    None => type_ids.add(token)?,
                };
                *counts.entry((document_id, type_id)).or_insert(0) += 1;
            }
        }

        debug!(
            num_documents = document_ids.len(),
            vocab_size = type_ids.len(),
            nonzero_entries = counts.len(),
            "Sparse document-term matrix built"
        );
        Ok(SparseTermMatrix {
            document_ids,
            type_ids,
            counts,
        })
    }

    /// Mapping from document label to document id.
    #[inline]
    pub fn document_ids(&self) -> &Token2Id {
        &self.document_ids
    }

    /// Mapping from type string to type id.
    #[inline]
    pub fn type_ids(&self) -> &Token2Id {
        &self.type_ids
    }

    /// Non-zero entries in (document id, type id) order.
    pub fn entries(&self) -> impl Iterator<Item = (u32, u32, u64)> + '_ {
        self.counts
            .iter()
            .map(|(&(document, ty), &count)| (document, ty, count))
    }

    /// Number of stored (non-zero) cells.
    #[inline]
    pub fn nonzero_count(&self) -> usize {
        self.counts.len()
    }
}

impl TermTable for SparseTermMatrix {
    fn doc_count(&self) -> usize {
        self.document_ids.len()
    }

    fn vocab_size(&self) -> usize {
        self.type_ids.len()
    }

    fn count(&self, label: &str, token: &str) -> u64 {
        let (Some(document_id), Some(type_id)) =
            (self.document_ids.get(label), self.type_ids.get(token))
        else {
            return 0;
        };
        self.counts
            .get(&(document_id, type_id))
            .copied()
            .unwrap_or(0)
    }

    fn corpus_frequency(&self, token: &str) -> u64 {
        let Some(type_id) = self.type_ids.get(token) else {
            return 0;
        };
        self.counts
            .iter()
            .filter(|(&(_, ty), _)| ty == type_id)
            .map(|(_, &count)| count)
            .sum()
    }
}

/// Count token occurrences per document, in parallel when the corpus is
/// large enough to pay for the thread fan-out.
fn count_corpus<T>(corpus: &[Vec<T>]) -> Vec<IndexMap<String, u64>>
where
    T: AsRef<str> + Sync,
{
    if should_use_parallel(corpus) {
        debug!(num_documents = corpus.len(), "Counting tokens in parallel");
        corpus.par_iter().map(|doc| count_tokens(doc)).collect()
    } else {
        corpus.iter().map(|doc| count_tokens(doc)).collect()
    }
}

fn count_tokens<T>(document: &[T]) -> IndexMap<String, u64>
where
    T: AsRef<str>,
{
    let mut counts = IndexMap::new();
    for token in document {
        *counts.entry(token.as_ref().to_string()).or_insert(0) += 1;
    }
    counts
}

#[inline]
fn should_use_parallel<T>(corpus: &[Vec<T>]) -> bool {
    if corpus.len() >= MIN_DOCS_FOR_PARALLEL {
        return true;
    }
    let total_tokens: usize = corpus.iter().map(Vec::len).sum();
    total_tokens >= MIN_TOKENS_FOR_PARALLEL
}
