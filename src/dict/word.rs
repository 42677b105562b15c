//! The word dictionary: a bulk-loaded lexicon that also absorbs what the
//! user actually types.
//!
//! Scores are `|ln(count / count_sum)| + edit_distance`, so a frequent
//! word typed exactly approaches 0 and rarer or heavily repaired words
//! grow. Lower is better throughout the engine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread;

use tracing::debug;

use crate::dict::collator::KeyCollator;
use crate::dict::distance;
use crate::dict::fuzzy::{self, FuzzyQuery};
use crate::dict::radix::{RadixTrie, ROOT};
use crate::dict::{Dictionary, LearningDictionary};
use crate::storage::{LexiconSource, WordStore};
use crate::suggestions::{Expired, Suggestion, SuggestionList, SuggestionRequest};

pub struct WordDictionary {
    collator: Arc<KeyCollator>,
    trie: Arc<RwLock<RadixTrie>>,
    store: Option<Arc<dyn WordStore>>,
    cancel_load: Arc<AtomicBool>,
}

impl WordDictionary {
    pub fn new(collator: Arc<KeyCollator>) -> Self {
        WordDictionary {
            collator,
            trie: Arc::new(RwLock::new(RadixTrie::new())),
            store: None,
            cancel_load: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Attach the persistence sink for learned/forgotten words.
    pub fn with_store(mut self, store: Arc<dyn WordStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn insert(&self, word: &str, count: u32) {
        if let Ok(mut trie) = self.trie.write() {
            trie.insert(word, count);
        }
    }

    /// Override the frequency denominator. Bulk sources may carry a corpus
    /// total larger than the sum of the entries they ship.
    pub fn set_count_sum(&self, count_sum: u64) {
        if let Ok(mut trie) = self.trie.write() {
            trie.set_count_sum(count_sum);
        }
    }

    pub fn get_count(&self, word: &str) -> Option<u32> {
        let trie = self.trie.read().ok()?;
        trie.get_count(word, &|a, b| self.collator.chars_equal(a, b))
    }

    /// Populate from a bulk source on a background thread. Entries arrive
    /// ordered by descending count, so the hottest words are queryable
    /// first and sit nearest the top of each trie edge list.
    pub fn load_from(&self, mut source: Box<dyn LexiconSource>) -> thread::JoinHandle<()> {
        let trie = Arc::clone(&self.trie);
        let cancel = Arc::clone(&self.cancel_load);
        thread::Builder::new()
            .name("word-loader".into())
            .spawn(move || {
                let mut loaded = 0usize;
                let result = source.load_words(&mut |word, count| {
                    if cancel.load(Ordering::Relaxed) {
                        return false;
                    }
                    let Ok(mut trie) = trie.write() else {
                        return false;
                    };
                    trie.insert(word, count);
                    loaded += 1;
                    true
                });
                match result {
                    Ok(()) => debug!(loaded, "word dictionary loaded"),
                    Err(error) => debug!(%error, "word dictionary load failed"),
                }
            })
            .expect("failed to spawn word-loader thread")
    }

    /// Stop an in-flight bulk load, e.g. on language switch.
    pub fn cancel_load(&self) {
        self.cancel_load.store(true, Ordering::Relaxed);
    }

    fn persist(&self, word: &str, count: u32) {
        if let Some(store) = &self.store {
            store.add_word(word, count);
        }
    }
}

impl Dictionary for WordDictionary {
    fn suggestions(&self, request: &Arc<SuggestionRequest>) -> Result<SuggestionList, Expired> {
        let mut list = SuggestionList::new(Arc::clone(request));
        let Ok(trie) = self.trie.read() else {
            return Ok(list);
        };
        let count_sum = trie.count_sum().max(1) as f64;
        let query = FuzzyQuery {
            trie: &trie,
            collator: &self.collator,
            request: request.as_ref(),
            max_edit_distance: distance::max_edit_distance(request.composing()),
        };
        fuzzy::find_suggestions(&query, (ROOT, 0), &mut |word, count, edit_distance| {
            let frequency = f64::from(count) / count_sum;
            list.insert(Suggestion::Word {
                word: word.to_string(),
                score: frequency.ln().abs() + edit_distance,
                edit_distance,
            });
        })?;
        Ok(list)
    }

    fn contains(&self, word: &str) -> bool {
        let Ok(trie) = self.trie.read() else {
            return false;
        };
        trie.contains(word, &|a, b| self.collator.chars_equal(a, b))
    }

    fn matches(&self, word: &str) -> bool {
        let Ok(trie) = self.trie.read() else {
            return false;
        };
        trie.matches_prefix(word, &|a, b| self.collator.chars_equal(a, b))
    }
}

impl LearningDictionary for WordDictionary {
    /// Increment the matching entry, or insert the word lower-cased at
    /// count 1. New words fold to lower case so casual shift-key casing
    /// does not fragment counts; a word only keeps its capitals if an
    /// exact-cased entry already exists.
    fn learn(&self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        let Ok(mut trie) = self.trie.write() else {
            return false;
        };
        let eq = |a: char, b: char| self.collator.chars_equal(a, b);
        match trie.get_count(word, &eq) {
            Some(count) => {
                trie.set_count(word, &eq, count + 1);
                drop(trie);
                self.persist(&word.to_lowercase(), count + 1);
            }
            None => {
                let lower = word.to_lowercase();
                trie.insert(&lower, 1);
                drop(trie);
                self.persist(&lower, 1);
            }
        }
        true
    }

    fn forget(&self, word: &str) -> bool {
        let Ok(mut trie) = self.trie.write() else {
            return false;
        };
        let removed = trie.remove_entry(word, &|a, b| self.collator.chars_equal(a, b));
        drop(trie);
        if removed {
            if let Some(store) = &self.store {
                store.delete_word(word);
            }
        }
        removed
    }

    fn remember(&self, word: &str) -> bool {
        if word.is_empty() || self.contains(word) {
            return false;
        }
        let Ok(mut trie) = self.trie.write() else {
            return false;
        };
        trie.insert(word, 1);
        drop(trie);
        self.persist(word, 1);
        true
    }
}
