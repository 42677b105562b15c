//! Bulk sources and persistence sinks for dictionary data, plus a simple
//! binary file format implementing both.
//!
//! Dictionaries pull their initial contents through [`LexiconSource`] /
//! [`NgramSource`] and push learned entries through [`WordStore`] /
//! [`TrigramStore`]. Embedders are free to back these with whatever they
//! like; [`WordListFile`] and [`TrigramFile`] are the built-in file-backed
//! implementations: a four-byte magic, a version byte, then a bincode
//! payload of entries sorted by descending count so loaders insert the
//! hottest entries first.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const WORD_MAGIC: &[u8; 4] = b"SGWD";
const NGRAM_MAGIC: &[u8; 4] = b"SGNG";
const VERSION: u8 = 1;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("not a dictionary file (bad magic)")]
    BadMagic,
    #[error("unsupported dictionary version {0}")]
    UnsupportedVersion(u8),
    #[error("corrupt dictionary payload: {0}")]
    Corrupt(#[from] bincode::Error),
}

/// Bulk word supplier. The sink returns false to stop early (cancelled
/// load); implementations should yield entries in descending count order.
pub trait LexiconSource: Send {
    fn load_words(&mut self, sink: &mut dyn FnMut(&str, u32) -> bool)
        -> Result<(), StorageError>;
}

/// Bulk trigram supplier; same sink contract as [`LexiconSource`].
pub trait NgramSource: Send {
    fn load_trigrams(
        &mut self,
        sink: &mut dyn FnMut(&str, &str, &str, u32) -> bool,
    ) -> Result<(), StorageError>;
}

/// Persistence sink for learned words. Calls arrive on whatever thread
/// learning runs on; implementations handle their own buffering.
pub trait WordStore: Send + Sync {
    fn add_word(&self, word: &str, count: u32);
    fn delete_word(&self, word: &str);
}

/// Persistence sink for learned trigrams.
pub trait TrigramStore: Send + Sync {
    fn add_trigram(&self, word1: &str, word2: &str, word3: &str, count: u32);
    fn delete_word(&self, word: &str);
}

fn check_header(data: &[u8], magic: &[u8; 4]) -> Result<usize, StorageError> {
    if data.len() < 5 || &data[..4] != magic {
        return Err(StorageError::BadMagic);
    }
    if data[4] != VERSION {
        return Err(StorageError::UnsupportedVersion(data[4]));
    }
    Ok(5)
}

fn read_all(path: &Path) -> Result<Vec<u8>, StorageError> {
    let mut data = Vec::new();
    BufReader::new(File::open(path)?).read_to_end(&mut data)?;
    Ok(data)
}

/// A word list with counts, highest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordListFile {
    entries: Vec<(String, u32)>,
}

impl WordListFile {
    pub fn from_entries(mut entries: Vec<(String, u32)>) -> Self {
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        WordListFile { entries }
    }

    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Self::from_bytes(&read_all(path)?)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, StorageError> {
        let body = check_header(data, WORD_MAGIC)?;
        Ok(bincode::deserialize(&data[body..])?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, StorageError> {
        let mut buf = Vec::new();
        buf.extend_from_slice(WORD_MAGIC);
        buf.push(VERSION);
        bincode::serialize_into(&mut buf, self)?;
        Ok(buf)
    }

    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        Ok(fs::write(path, self.to_bytes()?)?)
    }

    pub fn entries(&self) -> &[(String, u32)] {
        &self.entries
    }
}

impl LexiconSource for WordListFile {
    fn load_words(
        &mut self,
        sink: &mut dyn FnMut(&str, u32) -> bool,
    ) -> Result<(), StorageError> {
        for (word, count) in &self.entries {
            if !sink(word, *count) {
                break;
            }
        }
        Ok(())
    }
}

/// Trigram counts, highest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrigramFile {
    entries: Vec<(String, String, String, u32)>,
}

impl TrigramFile {
    pub fn from_entries(mut entries: Vec<(String, String, String, u32)>) -> Self {
        entries.sort_by(|a, b| b.3.cmp(&a.3));
        TrigramFile { entries }
    }

    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Self::from_bytes(&read_all(path)?)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, StorageError> {
        let body = check_header(data, NGRAM_MAGIC)?;
        Ok(bincode::deserialize(&data[body..])?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, StorageError> {
        let mut buf = Vec::new();
        buf.extend_from_slice(NGRAM_MAGIC);
        buf.push(VERSION);
        bincode::serialize_into(&mut buf, self)?;
        Ok(buf)
    }

    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        Ok(fs::write(path, self.to_bytes()?)?)
    }

    pub fn entries(&self) -> &[(String, String, String, u32)] {
        &self.entries
    }
}

impl NgramSource for TrigramFile {
    fn load_trigrams(
        &mut self,
        sink: &mut dyn FnMut(&str, &str, &str, u32) -> bool,
    ) -> Result<(), StorageError> {
        for (w1, w2, w3, count) in &self.entries {
            if !sink(w1, w2, w3, *count) {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_list_round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.bin");
        let file = WordListFile::from_entries(vec![
            ("ten".to_string(), 50),
            ("the".to_string(), 1000),
        ]);
        file.save(&path).unwrap();

        let mut loaded = WordListFile::open(&path).unwrap();
        // Highest count first.
        assert_eq!(loaded.entries()[0], ("the".to_string(), 1000));

        let mut seen = Vec::new();
        loaded
            .load_words(&mut |word, count| {
                seen.push((word.to_string(), count));
                true
            })
            .unwrap();
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn trigram_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trigrams.bin");
        let file = TrigramFile::from_entries(vec![(
            "new".to_string(),
            "york".to_string(),
            "times".to_string(),
            40,
        )]);
        file.save(&path).unwrap();
        let loaded = TrigramFile::open(&path).unwrap();
        assert_eq!(loaded.entries(), file.entries());
    }

    #[test]
    fn sink_can_stop_a_load_early() {
        let mut file = WordListFile::from_entries(vec![
            ("a".to_string(), 3),
            ("b".to_string(), 2),
            ("c".to_string(), 1),
        ]);
        let mut seen = 0;
        file.load_words(&mut |_, _| {
            seen += 1;
            false
        })
        .unwrap();
        assert_eq!(seen, 1);
    }

    #[test]
    fn bad_magic_is_rejected() {
        let result = WordListFile::from_bytes(b"NOPE\x01");
        assert!(matches!(result, Err(StorageError::BadMagic)));
        // A trigram file is not a word list.
        let trigrams = TrigramFile::from_entries(Vec::new()).to_bytes().unwrap();
        assert!(matches!(
            WordListFile::from_bytes(&trigrams),
            Err(StorageError::BadMagic)
        ));
    }

    #[test]
    fn future_versions_are_rejected() {
        let mut bytes = WordListFile::from_entries(Vec::new()).to_bytes().unwrap();
        bytes[4] = 9;
        assert!(matches!(
            WordListFile::from_bytes(&bytes),
            Err(StorageError::UnsupportedVersion(9))
        ));
    }
}
