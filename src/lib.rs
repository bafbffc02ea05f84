/// This crate is a corpus preprocessing and topic model postprocessing toolkit.
/// It tokenizes raw text, builds document-term frequency matrices, filters
/// vocabulary (stopwords, hapax legomena), and reshapes the outputs of
/// external topic-modeling tools into a uniform tabular representation for
/// inspection and plotting.
pub mod error;
pub mod features;
pub mod heatmap;
pub mod io;
pub mod matrix;
pub mod model;
pub mod token2id;
pub mod tokenizer;

/// Crate-wide error type and result alias.
/// Every fallible operation in this crate fails synchronously with one of
/// these variants; there is no retry, recovery, or degraded-mode path.
pub use error::{Error, Result};

/// Unicode-aware word tokenizer.
/// Converts a document string into a lazy sequence of normalized word tokens
/// using a Unicode letter/punctuation pattern, lowercased by default.
/// Single-letter and purely numeric tokens are excluded by the default
/// pattern. Caller-supplied patterns are validated before any tokenization.
pub use tokenizer::{Tokenizer, Tokens, DEFAULT_TOKEN_PATTERN};

/// Dense document-term matrix for small corpora.
/// Rows are positional document labels, columns are types ordered by
/// descending total corpus frequency (ties keep first-seen order), cells are
/// occurrence counts with zero-fill for absent combinations.
pub use matrix::DocumentTermMatrix;

/// Indexed sparse document-term matrix for large corpora.
/// Maps documents and types to integer ids through two append-only
/// `Token2Id` mappings and stores counts keyed by (document id, type id),
/// omitting zero entries entirely.
pub use matrix::SparseTermMatrix;

/// Shared read-only view over both matrix representations.
/// Lets callers inspect document/type counts without caring whether the
/// underlying storage is dense or sparse.
pub use matrix::TermTable;

/// Append-only bijection from token string to integer identifier.
/// Identifiers increase strictly with insertion order; re-adding a token is
/// an error, never an overwrite.
pub use token2id::Token2Id;

/// Mapping from integer identifier to token string.
/// The direction stored in token2id CSV files and model dictionaries; kept
/// as a distinct type from `Token2Id` because the two directions are not
/// interchangeable.
pub use token2id::Id2Token;

/// Vocabulary feature filters and the corpus-side feature remover.
/// `find_hapax_legomena` and `find_stopwords` compute candidate token lists
/// from a frequency matrix; `remove_features_from_corpus` drops listed
/// tokens from a tokenized corpus. Matrix-side removal lives on
/// `DocumentTermMatrix::remove_features`.
pub use features::{
    find_hapax_legomena, find_stopwords, remove_features_from_corpus, DEFAULT_STOPWORD_COUNT,
};

/// Tagged source for the output of an already-trained topic model.
/// One variant per external representation: lda-style weight arrays,
/// Gensim-style (type id, weight) pairs with a dictionary, or MALLET's
/// native output files. The caller selects the variant explicitly, so there
/// is no precedence ambiguity between overlapping optional arguments.
pub use model::ModelSource;

/// Uniform tabular views of a trained model: `show_topics` ranks the top
/// keys of every topic into a `TopicsTable`; `show_document_topics`
/// transposes the native per-document weights into a `DocumentTopicMatrix`
/// indexed by the top topic keys.
pub use model::{
    show_document_topics, show_topics, DocumentTopicMatrix, TopicsTable,
    DEFAULT_INDEX_KEY_COUNT, DEFAULT_KEY_COUNT,
};

/// File readers for external exchange formats: Matrix Market sparse
/// matrices (`.mm` extension required) and headerless two-column token2id
/// CSV files (id first, token second).
pub use io::{read_matrix_market, read_token2id, CoordinateMatrix};

/// Document-topic heatmap figure builder.
/// Reshapes a `DocumentTopicMatrix` into long-format cells, maps the value
/// range linearly onto a color palette and emits a renderable figure object.
/// Pure presentation: data, not pixels.
pub use heatmap::{HeatmapConfig, HeatmapFigure, LinearColorMapper, PlotDocumentTopics, BLUES_9};
