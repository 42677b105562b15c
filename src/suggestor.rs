//! The orchestrator: pulls candidates from every dictionary for a
//! keystroke, ranks and post-processes them, and hands the finished list
//! to the embedder.
//!
//! Each keystroke supersedes the previous request, so a slow query for
//! "te" never overwrites the results for "teh" that follow it. Queries
//! and learning run on a small worker pool; the embedder decides whether
//! to call synchronously or get a callback.

use std::sync::{Arc, Mutex};

use serde::Deserialize;
use tracing::debug;

use crate::dict::collator::KeyCollator;
use crate::dict::number::NumberDictionary;
use crate::dict::shortcuts::ShortcutsDictionary;
use crate::dict::{Dictionary, LearningDictionary};
use crate::suggestions::{Expired, Suggestion, SuggestionList, SuggestionRequest};
use crate::worker::WorkerPool;

/// What the suggestor needs to know about the editor at each keystroke.
/// Implemented by the embedding IME.
pub trait InputContext: Send + Sync {
    /// The two words before the cursor, `(second_last, last)`. Either may
    /// be empty.
    fn words_before_cursor(&self) -> (String, String);

    fn is_shifted(&self) -> bool {
        false
    }

    fn is_caps_lock(&self) -> bool {
        false
    }

    /// Whether the editor auto-capitalizes sentence starts. Learning
    /// undoes that capital so sentence-initial words do not fragment.
    fn is_auto_caps(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SuggestorConfig {
    /// Offer next-word predictions from the n-gram model.
    pub predict_next_word: bool,
    /// Query the contacts dictionary, when one is attached.
    pub include_contacts: bool,
    /// A default suggestion scoring above this is too far-fetched to
    /// auto-commit; the list keeps it but loses its default.
    pub score_ceiling: f64,
}

impl Default for SuggestorConfig {
    fn default() -> Self {
        SuggestorConfig {
            predict_next_word: true,
            include_contacts: false,
            score_ceiling: 13.0,
        }
    }
}

struct Inner {
    collator: Arc<KeyCollator>,
    words: Arc<dyn LearningDictionary>,
    lookahead: Arc<dyn LearningDictionary>,
    numbers: NumberDictionary,
    shortcuts: Arc<ShortcutsDictionary>,
    contacts: Option<Arc<dyn Dictionary>>,
    context: Arc<dyn InputContext>,
    config: SuggestorConfig,
    pending: Mutex<Option<Arc<SuggestionRequest>>>,
    pool: WorkerPool,
}

#[derive(Clone)]
pub struct Suggestor {
    inner: Arc<Inner>,
}

pub struct SuggestorBuilder {
    collator: Arc<KeyCollator>,
    words: Arc<dyn LearningDictionary>,
    lookahead: Arc<dyn LearningDictionary>,
    context: Arc<dyn InputContext>,
    shortcuts: Arc<ShortcutsDictionary>,
    contacts: Option<Arc<dyn Dictionary>>,
    config: SuggestorConfig,
}

impl SuggestorBuilder {
    pub fn new(
        collator: Arc<KeyCollator>,
        words: Arc<dyn LearningDictionary>,
        lookahead: Arc<dyn LearningDictionary>,
        context: Arc<dyn InputContext>,
    ) -> Self {
        SuggestorBuilder {
            collator,
            words,
            lookahead,
            context,
            shortcuts: Arc::new(ShortcutsDictionary::new()),
            contacts: None,
            config: SuggestorConfig::default(),
        }
    }

    pub fn shortcuts(mut self, shortcuts: Arc<ShortcutsDictionary>) -> Self {
        self.shortcuts = shortcuts;
        self
    }

    pub fn contacts(mut self, contacts: Arc<dyn Dictionary>) -> Self {
        self.contacts = Some(contacts);
        self
    }

    pub fn config(mut self, config: SuggestorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Suggestor {
        Suggestor {
            inner: Arc::new(Inner {
                collator: self.collator,
                words: self.words,
                lookahead: self.lookahead,
                numbers: NumberDictionary::new(),
                shortcuts: self.shortcuts,
                contacts: self.contacts,
                context: self.context,
                config: self.config,
                pending: Mutex::new(None),
                pool: WorkerPool::new(),
            }),
        }
    }
}

impl Suggestor {
    /// Snapshot the editor state into a request and supersede the previous
    /// one. Whatever thread still holds the old request sees it expire.
    pub fn new_request(&self, composing: &str) -> Arc<SuggestionRequest> {
        let (word1, word2) = self.inner.context.words_before_cursor();
        let request = Arc::new(SuggestionRequest::new(
            composing,
            word1.to_lowercase(),
            word2.to_lowercase(),
            self.inner.context.is_shifted(),
            self.inner.context.is_caps_lock(),
        ));
        if let Ok(mut pending) = self.inner.pending.lock() {
            if let Some(previous) = pending.replace(Arc::clone(&request)) {
                previous.expire();
            }
        }
        request
    }

    /// Query every dictionary on the calling thread. A superseded request
    /// comes back as an empty list with no default.
    pub fn find_suggestions(&self, composing: &str) -> SuggestionList {
        let request = self.new_request(composing);
        match self.inner.find_for_request(&request) {
            Ok(list) => list,
            Err(Expired) => {
                debug!(composing, "suggestion request superseded");
                let mut list = SuggestionList::new(request);
                list.clear_default();
                list
            }
        }
    }

    /// Query on a pooled worker and deliver through `on_ready`. The
    /// callback is skipped entirely when the request expires first.
    pub fn find_suggestions_async(
        &self,
        composing: &str,
        on_ready: impl FnOnce(SuggestionList) + Send + 'static,
    ) {
        let request = self.new_request(composing);
        let inner = Arc::clone(&self.inner);
        self.inner.pool.run(Box::new(move || {
            match inner.find_for_request(&request) {
                Ok(list) => {
                    if !list.is_expired() {
                        on_ready(list);
                    }
                }
                Err(Expired) => {
                    debug!(composing = request.composing(), "suggestion request superseded");
                }
            }
        }));
    }

    /// Feed committed text to the learning dictionaries on a pooled
    /// worker: every word, and every three-word window as a trigram.
    pub fn learn_suggestions(&self, text: impl Into<String>) {
        let text = text.into();
        let inner = Arc::clone(&self.inner);
        let auto_caps = self.inner.context.is_auto_caps();
        self.inner.pool.run(Box::new(move || {
            learn_text(
                inner.words.as_ref(),
                inner.lookahead.as_ref(),
                &text,
                auto_caps,
            );
            debug!(chars = text.len(), "learned committed text");
        }));
    }

    /// Remove a suggestion the user rejected. Only word-dictionary
    /// suggestions can be forgotten.
    pub fn forget(&self, suggestion: &Suggestion) -> bool {
        match suggestion {
            Suggestion::Word { word, .. } | Suggestion::Prefix { word, .. } => {
                self.inner.words.forget(word)
            }
            _ => false,
        }
    }

    pub fn remember(&self, word: &str) -> bool {
        self.inner.words.remember(word)
    }

    /// Whether any dictionary recognizes `word`, for spell-check style
    /// queries.
    pub fn contains_ignore_case(&self, word: &str) -> bool {
        if self.inner.words.contains(word) || self.inner.numbers.contains(word) {
            return true;
        }
        if self.inner.config.include_contacts {
            if let Some(contacts) = &self.inner.contacts {
                return contacts.contains(word);
            }
        }
        false
    }
}

impl Inner {
    fn find_for_request(&self, request: &Arc<SuggestionRequest>) -> Result<SuggestionList, Expired> {
        let mut list = SuggestionList::new(Arc::clone(request));

        if self.config.predict_next_word {
            list.merge(self.lookahead.suggestions(request)?)?;
        }

        // Nothing to match: predictions only, and nothing to auto-commit.
        if request.composing().is_empty() {
            list.clear_default();
            remove_duplicates(&mut list);
            return Ok(list);
        }

        list.merge(self.words.suggestions(request)?)?;
        list.merge(self.numbers.suggestions(request)?)?;
        list.merge(self.shortcuts.suggestions(request)?)?;
        if self.config.include_contacts {
            if let Some(contacts) = &self.contacts {
                list.merge(contacts.suggestions(request)?)?;
            }
        }

        list.match_case_all();
        self.ensure_composing(&mut list);
        self.apply_score_gate(&mut list);
        remove_duplicates(&mut list);
        request.check()?;
        Ok(list)
    }

    /// Guarantee the composing string appears in the list, and settle the
    /// default index.
    ///
    /// Suggestions equivalent to the composing string are promoted into
    /// the prefix band at the top, keeping their scores. When none of them
    /// matches the typed case exactly, the raw composing string is added
    /// too, but the default stays on the best promoted correction. A
    /// composing string the word dictionary does not know is never its own
    /// default.
    fn ensure_composing(&self, list: &mut SuggestionList) {
        let composing = list.composing().to_string();
        let mut promoted: Vec<Suggestion> = Vec::new();
        let mut has_perfect = false;
        let mut has_shortcut = false;

        let mut i = 0;
        while i < list.len() {
            let suggestion = &list.items()[i];
            if self.collator.words_equal(&composing, suggestion.word()) {
                if suggestion.word() == composing {
                    has_perfect = true;
                }
                let removed = list.remove(i);
                promoted.push(Suggestion::Prefix {
                    word: removed.word().to_string(),
                    score: removed.score(),
                });
            } else {
                if matches!(suggestion, Suggestion::Shortcut { .. }) {
                    has_shortcut = true;
                }
                i += 1;
            }
        }

        if promoted.is_empty() {
            list.insert(Suggestion::Prefix {
                word: composing.clone(),
                score: 0.0,
            });
            let default = if self.words.contains(&composing) { 0 } else { 1 };
            list.set_default_index(Some(default));
        } else {
            let count = promoted.len();
            for prefix in promoted {
                list.insert(prefix);
            }
            // A shortcut beats the user's own spelling as the default.
            let mut default = if has_shortcut { count } else { 0 };
            if !has_perfect {
                list.insert(Suggestion::Prefix {
                    word: composing.clone(),
                    score: 0.0,
                });
                default += 1;
            }
            list.set_default_index(Some(default));
        }
    }

    fn apply_score_gate(&self, list: &mut SuggestionList) {
        if let Some(default) = list.default_suggestion() {
            if default.score() > self.config.score_ceiling {
                list.clear_default();
            }
        }
    }
}

/// Drop repeated words, keeping the first occurrence, except that the
/// default survives even as a duplicate (its earlier twin does not shift
/// it out from under the embedder).
fn remove_duplicates(list: &mut SuggestionList) {
    let mut seen: Vec<String> = Vec::new();
    let mut i = 0;
    while i < list.len() {
        let word = list.items()[i].word().to_lowercase();
        if !seen.contains(&word) {
            seen.push(word);
            i += 1;
            continue;
        }
        match list.default_index() {
            Some(default) if i == default => i += 1,
            Some(default) if i < default => {
                list.remove(i);
                list.set_default_index(Some(default - 1));
            }
            _ => {
                list.remove(i);
            }
        }
    }
}

fn decapitalize_first(sentence: &str) -> String {
    let mut chars = sentence.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn is_word_token(token: &str) -> bool {
    token
        .chars()
        .any(|c| c.is_alphabetic() || c == '\'' || c == '-')
}

/// Split committed text into sentences and words, learn every word, and
/// learn every three-word window as a trigram.
fn learn_text(
    words: &dyn LearningDictionary,
    lookahead: &dyn LearningDictionary,
    text: &str,
    auto_caps: bool,
) {
    for sentence in text.split(['.', '!', '?', '\n']) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }
        let sentence = if auto_caps {
            decapitalize_first(sentence)
        } else {
            sentence.to_string()
        };

        let tokens: Vec<&str> = sentence
            .split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-'))
            .filter(|token| !token.is_empty())
            .collect();

        for token in &tokens {
            words.learn(token);
        }
        for window in tokens.windows(3) {
            if window.iter().all(|token| is_word_token(token)) {
                let trigram = format!("{} {} {}", window[0], window[1], window[2]);
                lookahead.learn(&trigram.to_lowercase());
            }
        }
    }
}
