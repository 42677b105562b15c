//! Next-word prediction from 1-, 2- and 3-gram counts.
//!
//! Two tries: a bulk-loaded static model and a smaller user model fed by
//! learning. Keys are space-joined word sequences; a depth-1 query roots
//! at `"last "` and a depth-2 query at `"secondlast last "`, then runs the
//! fuzzy search with the composing string as the query. An n-gram prefix's
//! own entry holds the aggregate count of everything below it, which is
//! the frequency denominator for that depth.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread;

use tracing::debug;

use crate::dict::collator::KeyCollator;
use crate::dict::distance;
use crate::dict::fuzzy::{self, FuzzyQuery};
use crate::dict::radix::RadixTrie;
use crate::dict::{Dictionary, LearningDictionary};
use crate::storage::{NgramSource, TrigramStore};
use crate::suggestions::{Expired, Suggestion, SuggestionList, SuggestionRequest};

/// User observations below this count are suppressed; one stray typo must
/// not become a prediction.
const MIN_USER_COUNT: u32 = 2;

/// Padding added to the user-trie denominator so a handful of
/// observations cannot outscore a well-established static prediction.
const USER_COUNT_PADDING: f64 = 5000.0;

pub struct LookAheadDictionary {
    collator: Arc<KeyCollator>,
    static_trie: Arc<RwLock<RadixTrie>>,
    user_trie: Arc<RwLock<RadixTrie>>,
    store: Option<Arc<dyn TrigramStore>>,
    cancel_load: Arc<AtomicBool>,
}

impl LookAheadDictionary {
    pub fn new(collator: Arc<KeyCollator>) -> Self {
        LookAheadDictionary {
            collator,
            static_trie: Arc::new(RwLock::new(RadixTrie::new())),
            user_trie: Arc::new(RwLock::new(RadixTrie::new())),
            store: None,
            cancel_load: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Attach the persistence sink for learned trigrams.
    pub fn with_store(mut self, store: Arc<dyn TrigramStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Insert a space-joined n-gram into the static model. Bulk loading
    /// normally goes through [`load_from`]; direct insertion is for
    /// embedders that manage aggregate counts themselves.
    ///
    /// [`load_from`]: LookAheadDictionary::load_from
    pub fn insert_static(&self, ngram: &str, count: u32) {
        if let Ok(mut trie) = self.static_trie.write() {
            trie.insert(ngram, count);
        }
    }

    /// Populate the static model from a trigram source on a background
    /// thread. 1- and 2-gram aggregates are derived from the trigram rows,
    /// then each gram size is inserted in descending count order.
    pub fn load_from(&self, source: Box<dyn NgramSource>) -> thread::JoinHandle<()> {
        Self::load_into(
            Arc::clone(&self.static_trie),
            Arc::clone(&self.cancel_load),
            source,
            "lookahead-loader",
        )
    }

    /// Same as [`load_from`] but into the user model, for restoring the
    /// user's persisted trigrams at startup.
    ///
    /// [`load_from`]: LookAheadDictionary::load_from
    pub fn load_user_from(&self, source: Box<dyn NgramSource>) -> thread::JoinHandle<()> {
        Self::load_into(
            Arc::clone(&self.user_trie),
            Arc::clone(&self.cancel_load),
            source,
            "lookahead-user-loader",
        )
    }

    fn load_into(
        trie: Arc<RwLock<RadixTrie>>,
        cancel: Arc<AtomicBool>,
        mut source: Box<dyn NgramSource>,
        thread_name: &str,
    ) -> thread::JoinHandle<()> {
        thread::Builder::new()
            .name(thread_name.into())
            .spawn(move || {
                let mut rows: Vec<(String, String, String, u32)> = Vec::new();
                let result = source.load_trigrams(&mut |w1, w2, w3, count| {
                    if cancel.load(Ordering::Relaxed) {
                        return false;
                    }
                    rows.push((w1.to_string(), w2.to_string(), w3.to_string(), count));
                    true
                });
                if let Err(error) = result {
                    debug!(%error, "lookahead load failed");
                    return;
                }

                let mut unigrams: HashMap<String, u32> = HashMap::new();
                let mut bigrams: HashMap<String, u32> = HashMap::new();
                for (w1, w2, _, count) in &rows {
                    *unigrams.entry(w1.clone()).or_insert(0) += count;
                    *bigrams.entry(format!("{w1} {w2}")).or_insert(0) += count;
                }

                let mut unigrams: Vec<(String, u32)> = unigrams.into_iter().collect();
                let mut bigrams: Vec<(String, u32)> = bigrams.into_iter().collect();
                unigrams.sort_by(|a, b| b.1.cmp(&a.1));
                bigrams.sort_by(|a, b| b.1.cmp(&a.1));
                rows.sort_by(|a, b| b.3.cmp(&a.3));

                let Ok(mut trie) = trie.write() else {
                    return;
                };
                for (gram, count) in &unigrams {
                    trie.insert(gram, *count);
                }
                for (gram, count) in &bigrams {
                    trie.insert(gram, *count);
                }
                for (w1, w2, w3, count) in &rows {
                    trie.insert(&format!("{w1} {w2} {w3}"), *count);
                }
                debug!(trigrams = rows.len(), "lookahead dictionary loaded");
            })
            .expect("failed to spawn lookahead-loader thread")
    }

    pub fn cancel_load(&self) {
        self.cancel_load.store(true, Ordering::Relaxed);
    }

    #[cfg(test)]
    pub(crate) fn user_count(&self, ngram: &str) -> Option<u32> {
        let trie = self.user_trie.read().ok()?;
        trie.get_count(ngram, &|a, b| self.collator.chars_equal(a, b))
    }

    fn search_depth(
        &self,
        list: &mut SuggestionList,
        request: &SuggestionRequest,
        prefix: &str,
        depth: u8,
    ) -> Result<(), Expired> {
        let eq = |a: char, b: char| self.collator.chars_equal(a, b);
        let rooted = format!("{prefix} ");
        let max_edit_distance = distance::max_edit_distance(request.composing());

        if let Ok(trie) = self.static_trie.read() {
            let count_sum = trie.get_count(prefix, &eq).unwrap_or(0);
            if count_sum > 0 {
                if let Some(start) = trie.find_node(&rooted, &eq) {
                    let query = FuzzyQuery {
                        trie: &trie,
                        collator: &self.collator,
                        request,
                        max_edit_distance,
                    };
                    fuzzy::find_suggestions(&query, start, &mut |word, count, edit_distance| {
                        let frequency = f64::from(count) / f64::from(count_sum);
                        list.insert(Suggestion::LookAhead {
                            word: word.to_string(),
                            score: frequency.log10().abs() + edit_distance,
                            edit_distance,
                            depth,
                        });
                    })?;
                }
            }
        }

        if let Ok(trie) = self.user_trie.read() {
            let count_sum =
                f64::from(trie.get_count(prefix, &eq).unwrap_or(0)) + USER_COUNT_PADDING;
            if let Some(start) = trie.find_node(&rooted, &eq) {
                let query = FuzzyQuery {
                    trie: &trie,
                    collator: &self.collator,
                    request,
                    max_edit_distance,
                };
                fuzzy::find_suggestions(&query, start, &mut |word, count, edit_distance| {
                    if count < MIN_USER_COUNT {
                        return;
                    }
                    let score = (f64::from(count) / count_sum).log10().abs() + edit_distance;
                    merge_user_suggestion(list, word, score, edit_distance, depth);
                })?;
            }
        }

        Ok(())
    }
}

/// A user observation for a word the static model already suggested
/// smooths the existing score instead of replacing it.
fn merge_user_suggestion(
    list: &mut SuggestionList,
    word: &str,
    score: f64,
    edit_distance: f64,
    depth: u8,
) {
    let existing = list
        .items()
        .iter()
        .position(|s| matches!(s, Suggestion::LookAhead { .. }) && s.word() == word);
    match existing {
        Some(index) => {
            let old = list.remove(index);
            let (old_edit_distance, old_depth) = match &old {
                Suggestion::LookAhead {
                    edit_distance,
                    depth,
                    ..
                } => (*edit_distance, *depth),
                _ => (edit_distance, depth),
            };
            list.insert(Suggestion::LookAhead {
                word: word.to_string(),
                score: 0.5 * old.score() + 0.5 * score,
                edit_distance: old_edit_distance.min(edit_distance),
                depth: old_depth.max(depth),
            });
        }
        None => list.insert(Suggestion::LookAhead {
            word: word.to_string(),
            score,
            edit_distance,
            depth,
        }),
    }
}

impl Dictionary for LookAheadDictionary {
    fn suggestions(&self, request: &Arc<SuggestionRequest>) -> Result<SuggestionList, Expired> {
        let mut list = SuggestionList::new(Arc::clone(request));
        let (word1, word2) = request.previous_words();
        if word2.is_empty() {
            return Ok(list);
        }
        if !word1.is_empty() {
            let prefix = format!("{word1} {word2}");
            self.search_depth(&mut list, request, &prefix, 2)?;
        }
        self.search_depth(&mut list, request, word2, 1)?;
        Ok(list)
    }

    fn contains(&self, word: &str) -> bool {
        let Ok(trie) = self.static_trie.read() else {
            return false;
        };
        trie.contains(word, &|a, b| self.collator.chars_equal(a, b))
    }
}

impl LearningDictionary for LookAheadDictionary {
    /// Learn a space-separated trigram: each of the 1-, 2- and 3-gram
    /// prefixes is incremented, or inserted at count 1. Anything that is
    /// not exactly three words is rejected.
    fn learn(&self, input: &str) -> bool {
        let words: Vec<&str> = input.split_whitespace().collect();
        let [w1, w2, w3] = words.as_slice() else {
            return false;
        };
        let (w1, w2, w3) = (w1.to_lowercase(), w2.to_lowercase(), w3.to_lowercase());
        let grams = [
            w1.clone(),
            format!("{w1} {w2}"),
            format!("{w1} {w2} {w3}"),
        ];

        let Ok(mut trie) = self.user_trie.write() else {
            return false;
        };
        let eq = |a: char, b: char| self.collator.chars_equal(a, b);
        let mut trigram_count = 1;
        for gram in &grams {
            trigram_count = match trie.get_count(gram, &eq) {
                Some(count) => {
                    trie.set_count(gram, &eq, count + 1);
                    count + 1
                }
                None => {
                    trie.insert(gram, 1);
                    1
                }
            };
        }
        drop(trie);

        if let Some(store) = &self.store {
            store.add_trigram(&w1, &w2, &w3, trigram_count);
        }
        true
    }

    fn forget(&self, word: &str) -> bool {
        if self.contains(word) {
            return false;
        }
        let Ok(mut trie) = self.user_trie.write() else {
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

    /// Promote a user unigram to the visibility threshold. Rejected when
    /// the static model owns the word.
    fn remember(&self, word: &str) -> bool {
        if self.contains(word) {
            return false;
        }
        let Ok(mut trie) = self.user_trie.write() else {
            return false;
        };
        let eq = |a: char, b: char| self.collator.chars_equal(a, b);
        match trie.get_count(word, &eq) {
            Some(count) if count >= MIN_USER_COUNT => false,
            Some(_) => {
                trie.set_count(word, &eq, MIN_USER_COUNT);
                true
            }
            None => {
                trie.insert(&word.to_lowercase(), MIN_USER_COUNT);
                true
            }
        }
    }
}
