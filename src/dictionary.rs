//! Word list used to validate played words

use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use crate::error::AppError;

/// Set of legal words, stored lower-cased
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: HashSet<String>,
}

impl Dictionary {
    /// Build a dictionary from any list of words
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Load a newline-delimited word list
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| AppError::Dictionary {
                path: path.display().to_string(),
                source,
            })?;
        let dictionary = Self::from_words(contents.lines());
        info!("Loaded {} words from {}", dictionary.len(), path.display());
        Ok(dictionary)
    }

    /// Check membership (case-insensitive)
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
