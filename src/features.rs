use std::collections::HashSet;

use tracing::debug;

use crate::matrix::DocumentTermMatrix;

/// Default number of most-frequent types treated as stopword candidates.
pub const DEFAULT_STOPWORD_COUNT: usize = 100;

/// Find hapax legomena: types whose maximum per-document count is exactly 1.
///
/// A hapax legomenon may occur in several documents, but never more than
/// once in any of them. Returned in matrix column order.
///
/// # Examples
/// ```
/// use topic_tools::{find_hapax_legomena, DocumentTermMatrix};
///
/// let corpus = vec![vec!["hapax", "stopword", "stopword"]];
/// let matrix = DocumentTermMatrix::from_corpus(&corpus, &["doc"]).unwrap();
/// assert_eq!(find_hapax_legomena(&matrix), ["hapax"]);
/// ```
pub fn find_hapax_legomena(matrix: &DocumentTermMatrix) -> Vec<String> {
    let hapax: Vec<String> = matrix
        .columns()
        .filter(|(_, column)| column.iter().max() == Some(&1))
        .map(|(token, _)| token.to_string())
        .collect();
    debug!(num_hapax = hapax.len(), "Hapax legomena determined");
    hapax
}

/// Take the first `most_frequent` column labels as stopword candidates.
///
/// Precondition: the matrix columns are sorted by descending corpus
/// frequency, which [`DocumentTermMatrix::from_corpus`] guarantees. On an
/// unsorted matrix this returns the first `most_frequent` columns in
/// whatever order they happen to be in, not the most frequent types —
/// keeping the matrix sorted is the caller's responsibility.
pub fn find_stopwords(matrix: &DocumentTermMatrix, most_frequent: usize) -> Vec<String> {
    matrix
        .tokens()
        .take(most_frequent)
        .map(str::to_string)
        .collect()
}

/// Remove the listed features from a tokenized corpus.
///
/// Drops every occurrence of a listed token from each document, preserving
/// the order of the remaining tokens. Tokens that occur in no document are
/// silently ignored.
pub fn remove_features_from_corpus<T, F>(corpus: &[Vec<T>], features: &[F]) -> Vec<Vec<String>>
where
    T: AsRef<str>,
    F: AsRef<str>,
{
    let features: HashSet<&str> = features.iter().map(AsRef::as_ref).collect();
    corpus
        .iter()
        .map(|document| {
            document
                .iter()
                .map(AsRef::as_ref)
                .filter(|token| !features.contains(token))
                .map(str::to_string)
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hapax_and_stopword_scenario() {
        let corpus = vec![vec!["hapax", "stopword", "stopword"]];
        let matrix = DocumentTermMatrix::from_corpus(&corpus, &["doc"]).unwrap();

        assert_eq!(find_hapax_legomena(&matrix), ["hapax"]);
        assert_eq!(find_stopwords(&matrix, 1), ["stopword"]);
    }

    #[test]
    fn hapax_may_appear_once_in_several_documents() {
        let corpus = vec![
            vec!["spread", "doubled", "doubled"],
            vec!["spread", "other"],
        ];
        let matrix = DocumentTermMatrix::from_corpus(&corpus, &["d1", "d2"]).unwrap();
        let hapax = find_hapax_legomena(&matrix);
        assert!(hapax.contains(&"spread".to_string()));
        assert!(hapax.contains(&"other".to_string()));
        assert!(!hapax.contains(&"doubled".to_string()));
    }

    #[test]
    fn hapax_order_follows_matrix_columns() {
        let corpus = vec![vec!["common", "common", "first", "second"]];
        let matrix = DocumentTermMatrix::from_corpus(&corpus, &["doc"]).unwrap();
        assert_eq!(find_hapax_legomena(&matrix), ["first", "second"]);
    }

    #[test]
    fn stopwords_respect_requested_count() {
        let corpus = vec![vec!["a", "a", "a", "b", "b", "c"]];
        let matrix = DocumentTermMatrix::from_corpus(&corpus, &["doc"]).unwrap();
        assert_eq!(find_stopwords(&matrix, 2), ["a", "b"]);
        // asking for more than the vocabulary has is fine
        assert_eq!(find_stopwords(&matrix, 10).len(), 3);
    }

    #[test]
    fn corpus_removal_preserves_remaining_order() {
        let corpus = vec![
            vec!["keep", "drop", "keep", "also"],
            vec!["drop", "drop", "keep"],
        ];
        let cleaned = remove_features_from_corpus(&corpus, &["drop", "unseen"]);
        assert_eq!(cleaned[0], ["keep", "keep", "also"]);
        assert_eq!(cleaned[1], ["keep"]);
    }

    #[test]
    fn corpus_removal_is_idempotent() {
        let corpus = vec![vec!["a", "b", "c"]];
        let once = remove_features_from_corpus(&corpus, &["b"]);
        let twice = remove_features_from_corpus(&once, &["b"]);
        assert_eq!(once, twice);
    }
}
