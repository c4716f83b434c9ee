//! Word list loading.

use std::path::Path;

use crate::error::{Error, Result};

/// Ordered, read-only list of words used as the key space.
///
/// Words are raw bytes: word lists are often Latin-1 rather than UTF-8,
/// and keys are written to the stores exactly as they appear in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    words: Vec<Vec<u8>>,
}

impl Dictionary {
    /// Load a newline-delimited word list.
    ///
    /// Blank lines are skipped and a trailing `\r` is stripped from each
    /// line, so CRLF files load the same as LF files.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read(path).map_err(|source| Error::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

        let dict = Self::parse(&content);
        if dict.is_empty() {
            return Err(Error::EmptyDictionary {
                path: path.to_path_buf(),
            });
        }

        tracing::debug!(path = %path.display(), words = dict.len(), "dictionary loaded");
        Ok(dict)
    }

    /// Split already-read content into words. No encoding is assumed.
    pub fn parse(content: &[u8]) -> Self {
        let words = content
            .split(|&b| b == b'\n')
            .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
            .filter(|line| !line.is_empty())
            .map(<[u8]>::to_vec)
            .collect();
        Self { words }
    }

    /// Build a dictionary from in-memory words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Vec<u8>>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.words.get(index).map(Vec::as_slice)
    }

    pub fn words(&self) -> &[Vec<u8>] {
        &self.words
    }
}
