use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Append-only mapping from token string to integer identifier.
///
/// Identifiers are assigned in strictly increasing insertion order starting
/// at 1, always above any previously assigned id. Adding a token that is
/// already present is an error; the mapping never overwrites.
///
/// # Examples
/// ```
/// use topic_tools::Token2Id;
///
/// let mut token2id = Token2Id::new();
/// assert_eq!(token2id.add("text").unwrap(), 1);
/// assert_eq!(token2id.add("example").unwrap(), 2);
/// assert!(token2id.add("text").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token2Id {
    #[serde(with = "indexmap::map::serde_seq")]
    ids: IndexMap<String, u32>,
    /// Next id to hand out. Monotonic, so ids are never reused.
    next_id: u32,
}

impl Default for Token2Id {
    fn default() -> Self {
        Self::new()
    }
}

impl Token2Id {
    /// Create an empty mapping. The first assigned id is 1.
    pub fn new() -> Self {
        Token2Id {
            ids: IndexMap::new(),
            next_id: 1,
        }
    }

    /// Assign the next identifier to `token`.
    ///
    /// # Errors
    /// `Error::DuplicateToken` if `token` already has an id. The mapping is
    /// left unchanged in that case, on every repeated attempt.
    pub fn add(&mut self, token: &str) -> Result<u32> {
        if self.ids.contains_key(token) {
            return Err(Error::DuplicateToken(token.to_string()));
        }
        let id = self.next_id;
        self.ids.insert(token.to_string(), id);
        self.next_id += 1;
        Ok(id)
    }

    /// Look up the id previously assigned to `token`.
    #[inline]
    pub fn get(&self, token: &str) -> Option<u32> {
        self.ids.get(token).copied()
    }

    #[inline]
    pub fn contains(&self, token: &str) -> bool {
        self.ids.contains_key(token)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate tokens and ids in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.ids.iter().map(|(token, &id)| (token.as_str(), id))
    }
}

/// Mapping from integer identifier to token string.
///
/// This is the direction stored in token2id CSV files and in Gensim-style
/// model dictionaries: id first, token second. It is deliberately a distinct
/// type from [`Token2Id`] — the two directions are not interchangeable, and
/// no inversion between them is provided.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id2Token {
    #[serde(with = "indexmap::map::serde_seq")]
    tokens: IndexMap<u32, String>,
}

impl Id2Token {
    pub fn new() -> Self {
        Id2Token {
            tokens: IndexMap::new(),
        }
    }

    /// Insert a (id, token) pair, replacing any previous token for that id.
    pub fn insert(&mut self, id: u32, token: impl Into<String>) {
        self.tokens.insert(id, token.into());
    }

    /// Look up the token stored for `id`.
    #[inline]
    pub fn get(&self, id: u32) -> Option<&str> {
        self.tokens.get(&id).map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate ids and tokens in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.tokens.iter().map(|(&id, token)| (id, token.as_str()))
    }
}

impl FromIterator<(u32, String)> for Id2Token {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        Id2Token {
            tokens: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one_and_increase() {
        let mut token2id = Token2Id::new();
        assert_eq!(token2id.add("this").unwrap(), 1);
        assert_eq!(token2id.add("is").unwrap(), 2);
        assert_eq!(token2id.add("example").unwrap(), 3);
        assert_eq!(token2id.len(), 3);
    }

    #[test]
    fn duplicate_insert_errors_every_time() {
        let mut token2id = Token2Id::new();
        token2id.add("example").unwrap();
        assert!(matches!(
            token2id.add("example"),
            Err(Error::DuplicateToken(token)) if token == "example"
        ));
        // still an error on the second attempt, size unchanged
        assert!(token2id.add("example").is_err());
        assert_eq!(token2id.len(), 1);
        assert_eq!(token2id.get("example"), Some(1));
    }

    #[test]
    fn each_success_grows_size_by_one() {
        let mut token2id = Token2Id::new();
        for (i, token) in ["a", "b", "c", "d"].iter().enumerate() {
            token2id.add(token).unwrap();
            assert_eq!(token2id.len(), i + 1);
        }
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut token2id = Token2Id::new();
        token2id.add("zebra").unwrap();
        token2id.add("apple").unwrap();
        let pairs: Vec<(&str, u32)> = token2id.iter().collect();
        assert_eq!(pairs, [("zebra", 1), ("apple", 2)]);
    }

    #[test]
    fn id2token_keeps_file_direction() {
        let id2token: Id2Token = vec![(0, "this".to_string()), (1, "is".to_string())]
            .into_iter()
            .collect();
        assert_eq!(id2token.get(0), Some("this"));
        assert_eq!(id2token.get(1), Some("is"));
        assert_eq!(id2token.get(2), None);
    }
}
