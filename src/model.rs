use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use num::Num;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::token2id::Id2Token;

/// Default number of top keys shown per topic.
pub const DEFAULT_KEY_COUNT: usize = 10;

/// Default number of keys joined into a document-topic row index.
pub const DEFAULT_INDEX_KEY_COUNT: usize = 3;

/// The output of an already-trained topic model, tagged by origin.
///
/// The three external tools this crate postprocesses expose their results in
/// three different shapes. The variant is selected explicitly by the caller;
/// there is no precedence between overlapping optional arguments.
///
/// Weights are generic over `N` so `f32` and `f64` matrices both work.
#[derive(Debug, Clone)]
pub enum ModelSource<N = f64>
where
    N: Num + PartialOrd + Copy,
{
    /// lda-style model: full topic-word and document-topic weight matrices
    /// plus the document-term-matrix vocabulary the model was trained on.
    Array {
        /// topics x vocabulary weights
        topic_word: Vec<Vec<N>>,
        /// documents x topics weights
        doc_topic: Vec<Vec<N>>,
        /// one entry per topic-word column
        vocabulary: Vec<String>,
    },
    /// Gensim-style model: per-topic (type id, weight) pairs resolved
    /// through the model's dictionary.
    Trained {
        /// one (type id, weight) list per topic
        topics: Vec<Vec<(u32, N)>>,
        /// documents x topics weights
        doc_topics: Vec<Vec<N>>,
        dictionary: Id2Token,
    },
    /// MALLET workflow: results are read from its native output files.
    MalletFiles {
        topic_keys: PathBuf,
        doc_topics: PathBuf,
    },
}

/// Topics table: one row per topic, one column per key rank.
///
/// Row labels are `"Topic 0"`, `"Topic 1"`, ...; column labels are
/// `"Key 0"` .. `"Key k-1"`; cells are the key tokens at that rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicsTable {
    index: Vec<String>,
    columns: Vec<String>,
    keys: Vec<Vec<String>>,
}

impl TopicsTable {
    fn from_keys(keys: Vec<Vec<String>>) -> Self {
        let key_count = keys.iter().map(Vec::len).max().unwrap_or(0);
        TopicsTable {
            index: (0..keys.len()).map(|n| format!("Topic {n}")).collect(),
            columns: (0..key_count).map(|n| format!("Key {n}")).collect(),
            keys,
        }
    }

    #[inline]
    pub fn topic_count(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn key_count(&self) -> usize {
        self.columns.len()
    }

    /// Row labels: `"Topic 0"`, `"Topic 1"`, ...
    #[inline]
    pub fn index(&self) -> &[String] {
        &self.index
    }

    /// Column labels: `"Key 0"` .. `"Key k-1"`.
    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The ranked keys of one topic.
    pub fn topic(&self, n: usize) -> Option<&[String]> {
        self.keys.get(n).map(Vec::as_slice)
    }

    /// Space-join the top `num_keys` keys of every topic. Used as the row
    /// index of the document-topic matrix.
    pub fn joined_keys(&self, num_keys: usize) -> Vec<String> {
        self.keys
            .iter()
            .map(|keys| keys[..num_keys.min(keys.len())].join(" "))
            .collect()
    }
}

/// Document-topic matrix: topic rows, document columns, native weights.
///
/// Values are the originating model's per-document topic weights and are not
/// required to sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTopicMatrix {
    index: Vec<String>,
    columns: Vec<String>,
    /// topics x documents
    values: Vec<Vec<f64>>,
}

impl DocumentTopicMatrix {
    #[inline]
    pub fn topic_count(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn doc_count(&self) -> usize {
        self.columns.len()
    }

    /// Row labels: space-joined top topic keys.
    #[inline]
    pub fn index(&self) -> &[String] {
        &self.index
    }

    /// Column labels: document labels.
    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Weight of one topic in one document.
    pub fn value(&self, topic: usize, document: usize) -> Option<f64> {
        self.values.get(topic).and_then(|row| row.get(document)).copied()
    }

    /// Rows in topic order, one weight per document.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.index
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(Vec::as_slice))
    }

    pub fn min_value(&self) -> Option<f64> {
        self.values
            .iter()
            .flatten()
            .copied()
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    }

    pub fn max_value(&self) -> Option<f64> {
        self.values
            .iter()
            .flatten()
            .copied()
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    }
}

/// Show the topics of a trained model as a [`TopicsTable`].
///
/// For each topic the top `num_keys` keys are selected by descending weight;
/// equal weights keep the lower array index first (stable descending sort).
///
/// # Errors
/// * `Error::VocabularyMismatch` if an array-based model's vocabulary length
///   differs from its topic-word column count. This is a precondition check,
///   not a recovery.
/// * `Error::ModelFormat` for type ids missing from a Gensim-style
///   dictionary or malformed MALLET files.
pub fn show_topics<N>(source: &ModelSource<N>, num_keys: usize) -> Result<TopicsTable>
where
    N: Num + PartialOrd + Copy,
{
    let keys = match source {
        ModelSource::Array {
            topic_word,
            vocabulary,
            ..
        } => {
            debug!(num_topics = topic_word.len(), "Ranking topic-word weights");
            topic_word
                .iter()
                .map(|weights| {
                    if weights.len() != vocabulary.len() {
                        return Err(Error::VocabularyMismatch {
                            vocabulary: vocabulary.len(),
                            columns: weights.len(),
                        });
                    }
                    Ok(rank_descending(weights)
                        .into_iter()
                        .take(num_keys)
                        .map(|i| vocabulary[i].clone())
                        .collect())
                })
                .collect::<Result<Vec<Vec<String>>>>()?
        }
        ModelSource::Trained {
            topics, dictionary, ..
        } => {
            debug!(num_topics = topics.len(), "Resolving topic type ids");
            topics
                .iter()
                .map(|pairs| {
                    let mut ranked = pairs.clone();
                    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
                    ranked
                        .into_iter()
                        .take(num_keys)
                        .map(|(type_id, _)| {
                            dictionary.get(type_id).map(str::to_string).ok_or_else(|| {
                                Error::ModelFormat(format!(
                                    "type id {type_id} is not in the dictionary"
                                ))
                            })
                        })
                        .collect()
                })
                .collect::<Result<Vec<Vec<String>>>>()?
        }
        ModelSource::MalletFiles { topic_keys, .. } => parse_topic_keys(topic_keys, num_keys)?,
    };
    Ok(TopicsTable::from_keys(keys))
}

/// Show the topic distribution of every document as a [`DocumentTopicMatrix`].
///
/// Rows are the space-joined top `num_keys` keys of each topic, columns the
/// supplied document labels, cells the model's native weights (the model's
/// documents x topics array, transposed).
///
/// For the MALLET variant an empty `document_labels` slice means the
/// document names recorded in the doc-topics file are used.
///
/// # Errors
/// `Error::LengthMismatch` if the label count differs from the model's
/// document count, plus everything [`show_topics`] can raise.
pub fn show_document_topics<N, L>(
    source: &ModelSource<N>,
    document_labels: &[L],
    num_keys: usize,
) -> Result<DocumentTopicMatrix>
where
    N: Num + PartialOrd + Copy + Into<f64>,
    L: AsRef<str>,
{
    let index = show_topics(source, num_keys)?.joined_keys(num_keys);

    let (columns, weights) = match source {
        ModelSource::Array { doc_topic, .. } => {
            (own_labels(document_labels), to_f64_rows(doc_topic))
        }
        ModelSource::Trained { doc_topics, .. } => {
            (own_labels(document_labels), to_f64_rows(doc_topics))
        }
        ModelSource::MalletFiles { doc_topics, .. } => {
            let (names, weights) = parse_doc_topics(doc_topics)?;
            let columns = if document_labels.is_empty() {
                names
            } else {
                own_labels(document_labels)
            };
            (columns, weights)
        }
    };

    if columns.len() != weights.len() {
        return Err(Error::LengthMismatch {
            expected: weights.len(),
            actual: columns.len(),
        });
    }
    for row in &weights {
        if row.len() != index.len() {
            return Err(Error::ModelFormat(format!(
                "document row has {} topic weights, expected {}",
                row.len(),
                index.len()
            )));
        }
    }

    // transpose documents x topics into topics x documents
    let values = (0..index.len())
        .map(|topic| weights.iter().map(|row| row[topic]).collect())
        .collect();

    debug!(
        num_topics = index.len(),
        num_documents = columns.len(),
        "Document-topic matrix assembled"
    );
    Ok(DocumentTopicMatrix {
        index,
        columns,
        values,
    })
}

/// Indices of `weights` sorted by descending weight, stable so equal weights
/// keep ascending index order.
fn rank_descending<N>(weights: &[N]) -> Vec<usize>
where
    N: PartialOrd + Copy,
{
    let mut indices: Vec<usize> = (0..weights.len()).collect();
    indices.sort_by(|&a, &b| weights[b].partial_cmp(&weights[a]).unwrap_or(Ordering::Equal));
    indices
}

fn own_labels<L: AsRef<str>>(labels: &[L]) -> Vec<String> {
    labels.iter().map(|l| l.as_ref().to_string()).collect()
}

fn to_f64_rows<N>(rows: &[Vec<N>]) -> Vec<Vec<f64>>
where
    N: Num + PartialOrd + Copy + Into<f64>,
{
    rows.iter()
        .map(|row| row.iter().map(|&w| w.into()).collect())
        .collect()
}

/// Parse MALLET's topic-keys file: `topic<TAB>alpha<TAB>key key key ...`.
fn parse_topic_keys(path: &Path, num_keys: usize) -> Result<Vec<Vec<String>>> {
    let content = fs::read_to_string(path)?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut fields = line.splitn(3, '\t');
            let (Some(_topic), Some(_alpha), Some(keys)) =
                (fields.next(), fields.next(), fields.next())
            else {
                return Err(Error::ModelFormat(format!(
                    "topic keys line is not tab-separated: {line:?}"
                )));
            };
            Ok(keys
                .split_whitespace()
                .take(num_keys)
                .map(str::to_string)
                .collect())
        })
        .collect()
}

/// Parse MALLET's doc-topics file: `doc<TAB>source<TAB>w0<TAB>w1 ...`,
/// `#` header lines skipped. Returns document names and their weight rows.
fn parse_doc_topics(path: &Path) -> Result<(Vec<String>, Vec<Vec<f64>>)> {
    let content = fs::read_to_string(path)?;
    let mut names = Vec::new();
    let mut weights = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 3 {
            return Err(Error::ModelFormat(format!(
                "doc topics line is not tab-separated: {line:?}"
            )));
        }
        names.push(fields[1].to_string());
        let row = fields[2..]
            .iter()
            .map(|field| {
                field.trim().parse::<f64>().map_err(|_| {
                    Error::ModelFormat(format!("doc topics weight is not a number: {field:?}"))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        weights.push(row);
    }
    Ok((names, weights))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn array_source() -> ModelSource<f64> {
        ModelSource::Array {
            topic_word: vec![
                vec![0.1, 0.4, 0.3, 0.2],
                vec![0.25, 0.25, 0.4, 0.1],
            ],
            doc_topic: vec![vec![0.7, 0.3], vec![0.2, 0.8], vec![0.5, 0.5]],
            vocabulary: ["alpha", "beta", "gamma", "delta"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    #[test]
    fn array_topics_rank_by_descending_weight() {
        let topics = show_topics(&array_source(), 3).unwrap();
        assert_eq!(topics.index(), ["Topic 0", "Topic 1"]);
        assert_eq!(topics.columns(), ["Key 0", "Key 1", "Key 2"]);
        assert_eq!(topics.topic(0).unwrap(), ["beta", "gamma", "delta"]);
        // 0.25 tie: lower index ("alpha") wins
        assert_eq!(topics.topic(1).unwrap(), ["gamma", "alpha", "beta"]);
    }

    #[test]
    fn equal_weights_break_ties_by_index() {
        assert_eq!(rank_descending(&[0.2, 0.5, 0.5, 0.1]), [1, 2, 0, 3]);
    }

    #[test]
    fn vocabulary_mismatch_is_a_precondition_error() {
        let source: ModelSource<f64> = ModelSource::Array {
            topic_word: vec![vec![0.5, 0.5]],
            doc_topic: vec![vec![1.0]],
            vocabulary: vec!["only_one".to_string()],
        };
        assert!(matches!(
            show_topics(&source, 2),
            Err(Error::VocabularyMismatch {
                vocabulary: 1,
                columns: 2
            })
        ));
    }

    #[test]
    fn document_topics_transpose_the_native_weights() {
        let labels = ["doc_a", "doc_b", "doc_c"];
        let matrix = show_document_topics(&array_source(), &labels, 2).unwrap();

        assert_eq!(matrix.topic_count(), 2);
        assert_eq!(matrix.doc_count(), 3);
        assert_eq!(matrix.index(), ["beta gamma", "gamma alpha"]);
        assert_eq!(matrix.columns(), ["doc_a", "doc_b", "doc_c"]);
        assert_eq!(matrix.value(0, 0), Some(0.7));
        assert_eq!(matrix.value(1, 0), Some(0.3));
        assert_eq!(matrix.value(0, 2), Some(0.5));
        assert_eq!(matrix.min_value(), Some(0.2));
        assert_eq!(matrix.max_value(), Some(0.8));
    }

    #[test]
    fn document_label_mismatch_is_an_error() {
        let labels = ["just_one"];
        assert!(matches!(
            show_document_topics(&array_source(), &labels, 2),
            Err(Error::LengthMismatch { .. })
        ));
    }

    #[test]
    fn trained_source_resolves_ids_through_the_dictionary() {
        let mut dictionary = Id2Token::new();
        dictionary.insert(0, "rivers");
        dictionary.insert(1, "mountains");
        dictionary.insert(2, "valleys");

        let source: ModelSource<f64> = ModelSource::Trained {
            topics: vec![vec![(0, 0.1), (1, 0.6), (2, 0.3)]],
            doc_topics: vec![vec![1.0], vec![1.0]],
            dictionary,
        };
        let topics = show_topics(&source, 2).unwrap();
        assert_eq!(topics.topic(0).unwrap(), ["mountains", "valleys"]);

        let matrix = show_document_topics(&source, &["d1", "d2"], 2).unwrap();
        assert_eq!(matrix.index(), ["mountains valleys"]);
        assert_eq!(matrix.value(0, 1), Some(1.0));
    }

    #[test]
    fn missing_dictionary_id_is_a_model_format_error() {
        let source: ModelSource<f64> = ModelSource::Trained {
            topics: vec![vec![(7, 0.9)]],
            doc_topics: vec![],
            dictionary: Id2Token::new(),
        };
        assert!(matches!(
            show_topics(&source, 1),
            Err(Error::ModelFormat(_))
        ));
    }

    #[test]
    fn mallet_files_parse_into_both_tables() {
        let dir = tempfile::tempdir().unwrap();
        let topic_keys = dir.path().join("topic_keys.txt");
        let doc_topics = dir.path().join("doc_topics.txt");

        let mut file = std::fs::File::create(&topic_keys).unwrap();
        writeln!(file, "0\t0.5\tsea ships harbour storm").unwrap();
        writeln!(file, "1\t0.5\tfields harvest plough rain").unwrap();

        let mut file = std::fs::File::create(&doc_topics).unwrap();
        writeln!(file, "#doc source topic proportion").unwrap();
        writeln!(file, "0\todyssey.txt\t0.9\t0.1").unwrap();
        writeln!(file, "1\tgeorgics.txt\t0.2\t0.8").unwrap();

        let source: ModelSource = ModelSource::MalletFiles {
            topic_keys,
            doc_topics,
        };

        let topics = show_topics(&source, 3).unwrap();
        assert_eq!(topics.topic(0).unwrap(), ["sea", "ships", "harbour"]);
        assert_eq!(topics.topic(1).unwrap(), ["fields", "harvest", "plough"]);

        // empty labels: document names come from the file
        let matrix = show_document_topics::<f64, &str>(&source, &[], 2).unwrap();
        assert_eq!(matrix.columns(), ["odyssey.txt", "georgics.txt"]);
        assert_eq!(matrix.index(), ["sea ships", "fields harvest"]);
        assert_eq!(matrix.value(1, 1), Some(0.8));
    }

    #[test]
    fn malformed_mallet_weight_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let doc_topics = dir.path().join("doc_topics.txt");
        std::fs::write(&doc_topics, "0\tdoc\tnot_a_number\n").unwrap();
        assert!(matches!(
            parse_doc_topics(&doc_topics),
            Err(Error::ModelFormat(_))
        ));
    }
}
