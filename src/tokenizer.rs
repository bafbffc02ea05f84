use regex::{Matches, Regex};
use tracing::debug;

use crate::error::Result;

/// Default token pattern: one or more letters, optionally followed by a
/// single punctuation mark and one or more further letters. Single-letter
/// and purely numeric tokens never match.
pub const DEFAULT_TOKEN_PATTERN: &str = r"\p{L}+\p{P}?\p{L}+";

/// Unicode-aware word tokenizer.
///
/// Splits a document string into normalized word tokens by scanning for a
/// Unicode pattern, optionally lowercasing every match. Tokenization is lazy
/// and has no side effects; the tokenizer can be reused across documents.
///
/// # Examples
/// ```
/// use topic_tools::Tokenizer;
///
/// let tokenizer = Tokenizer::new();
/// let tokens: Vec<String> = tokenizer.tokenize("This is 1 example text.").collect();
/// assert_eq!(tokens, ["this", "is", "example", "text"]);
/// ```
#[derive(Debug, Clone)]
pub struct Tokenizer {
    pattern: Regex,
    lowercase: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    /// Create a tokenizer with the default pattern and lowercasing on.
    pub fn new() -> Self {
        Tokenizer {
            // the default pattern is a tested constant
            pattern: Regex::new(DEFAULT_TOKEN_PATTERN).expect("default token pattern compiles"),
            lowercase: true,
        }
    }

    /// Create a tokenizer from a caller-supplied Unicode pattern.
    ///
    /// # Errors
    /// `Error::Pattern` if the pattern does not compile. Nothing is
    /// tokenized before the pattern is validated.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        Ok(Tokenizer {
            pattern: Regex::new(pattern)?,
            lowercase: true,
        })
    }

    /// Toggle lowercasing of matched tokens.
    pub fn lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    /// Tokenize one document.
    ///
    /// Returns a lazy iterator over the matched substrings in left-to-right
    /// order. Empty input yields an empty iterator.
    pub fn tokenize<'t>(&'t self, text: &'t str) -> Tokens<'t> {
        Tokens {
            matches: self.pattern.find_iter(text),
            lowercase: self.lowercase,
        }
    }

    /// Tokenize a whole corpus, one token vector per document.
    pub fn tokenize_corpus<T>(&self, corpus: &[T]) -> Vec<Vec<String>>
    where
        T: AsRef<str>,
    {
        debug!(num_documents = corpus.len(), "Tokenizing corpus");
        corpus
            .iter()
            .map(|document| self.tokenize(document.as_ref()).collect())
            .collect()
    }
}

/// Lazy token stream over one document. Created by [`Tokenizer::tokenize`].
pub struct Tokens<'t> {
    matches: Matches<'t, 't>,
    lowercase: bool,
}

impl Iterator for Tokens<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.matches.next().map(|m| {
            if self.lowercase {
                m.as_str().to_lowercase()
            } else {
                m.as_str().to_string()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pattern_drops_numbers_and_single_letters() {
        let tokenizer = Tokenizer::new();
        let tokens: Vec<String> = tokenizer.tokenize("This is 1 example text.").collect();
        assert_eq!(tokens, ["this", "is", "example", "text"]);
    }

    #[test]
    fn empty_input_yields_empty_sequence() {
        let tokenizer = Tokenizer::new();
        assert_eq!(tokenizer.tokenize("").count(), 0);
    }

    #[test]
    fn lowering_can_be_disabled() {
        let tokenizer = Tokenizer::new().lowercase(false);
        let tokens: Vec<String> = tokenizer.tokenize("Quick Brown Fox").collect();
        assert_eq!(tokens, ["Quick", "Brown", "Fox"]);
    }

    #[test]
    fn inner_punctuation_is_kept() {
        let tokenizer = Tokenizer::new();
        let tokens: Vec<String> = tokenizer.tokenize("it's a mother-in-law thing").collect();
        assert_eq!(tokens, ["it's", "mother-in", "law", "thing"]);
    }

    #[test]
    fn custom_pattern() {
        let tokenizer = Tokenizer::with_pattern(r"\p{L}+").unwrap();
        let tokens: Vec<String> = tokenizer.tokenize("a b2c").collect();
        assert_eq!(tokens, ["a", "b", "c"]);
    }

    #[test]
    fn malformed_pattern_fails_before_tokenizing() {
        assert!(Tokenizer::with_pattern(r"\p{L").is_err());
    }

    #[test]
    fn tokenize_corpus_keeps_document_order() {
        let tokenizer = Tokenizer::new();
        let corpus = tokenizer.tokenize_corpus(&["First document.", "Second one follows."]);
        assert_eq!(corpus[0], ["first", "document"]);
        assert_eq!(corpus[1], ["second", "one", "follows"]);
    }
}
