//! Suggestion values, ranking, the bounded result set and the request
//! handle that ties a result back to the keystroke that asked for it.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

use thiserror::Error;

use crate::textcase;

/// A request was superseded by a newer one; whatever work remains for it is
/// wasted and should stop at the next opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("suggestion request superseded")]
pub struct Expired;

/// Immutable snapshot of the editor state at the moment of a keystroke.
///
/// The expiration flag is the only mutable part and it only ever moves from
/// live to expired. Dictionary code polls it through [`check`] at each
/// recursion step so an abandoned search unwinds quickly.
///
/// [`check`]: SuggestionRequest::check
#[derive(Debug)]
pub struct SuggestionRequest {
    composing: String,
    word1: String,
    word2: String,
    shifted: bool,
    caps_lock: bool,
    expired: AtomicBool,
}

impl SuggestionRequest {
    pub fn new(
        composing: impl Into<String>,
        word1: impl Into<String>,
        word2: impl Into<String>,
        shifted: bool,
        caps_lock: bool,
    ) -> Self {
        SuggestionRequest {
            composing: composing.into(),
            word1: word1.into(),
            word2: word2.into(),
            shifted,
            caps_lock,
            expired: AtomicBool::new(false),
        }
    }

    pub fn composing(&self) -> &str {
        &self.composing
    }

    /// The two words before the cursor, `(second_last, last)`, lower-cased.
    /// Either may be empty.
    pub fn previous_words(&self) -> (&str, &str) {
        (&self.word1, &self.word2)
    }

    pub fn is_shifted(&self) -> bool {
        self.shifted
    }

    pub fn is_caps_lock(&self) -> bool {
        self.caps_lock
    }

    pub fn expire(&self) {
        self.expired.store(true, AtomicOrdering::Release);
    }

    pub fn is_expired(&self) -> bool {
        self.expired.load(AtomicOrdering::Acquire)
    }

    pub fn check(&self) -> Result<(), Expired> {
        if self.is_expired() {
            Err(Expired)
        } else {
            Ok(())
        }
    }
}

/// One candidate. The variant encodes where it came from, which in turn
/// fixes its rank band in the result list.
#[derive(Debug, Clone, PartialEq)]
pub enum Suggestion {
    /// The composing string itself, or a dictionary word equivalent to it.
    Prefix { word: String, score: f64 },
    /// A configured keystroke expansion.
    Shortcut { word: String },
    /// A numeric rendering of a digit-only composing string.
    Numeric { word: String },
    /// From an externally supplied contacts dictionary.
    Contact { word: String, score: f64 },
    /// Next-word prediction from the n-gram model.
    LookAhead {
        word: String,
        score: f64,
        edit_distance: f64,
        depth: u8,
    },
    /// Fuzzy match from the word dictionary.
    Word {
        word: String,
        score: f64,
        edit_distance: f64,
    },
}

impl Suggestion {
    /// Rank band; lower sorts first.
    pub fn rank(&self) -> u8 {
        match self {
            Suggestion::Prefix { .. } => 0,
            Suggestion::Shortcut { .. } => 1,
            Suggestion::Numeric { .. } => 2,
            Suggestion::Contact { .. } => 3,
            Suggestion::LookAhead { .. } => 4,
            Suggestion::Word { .. } => 5,
        }
    }

    pub fn word(&self) -> &str {
        match self {
            Suggestion::Prefix { word, .. }
            | Suggestion::Shortcut { word }
            | Suggestion::Numeric { word }
            | Suggestion::Contact { word, .. }
            | Suggestion::LookAhead { word, .. }
            | Suggestion::Word { word, .. } => word,
        }
    }

    pub(crate) fn set_word(&mut self, new: String) {
        match self {
            Suggestion::Prefix { word, .. }
            | Suggestion::Shortcut { word }
            | Suggestion::Numeric { word }
            | Suggestion::Contact { word, .. }
            | Suggestion::LookAhead { word, .. }
            | Suggestion::Word { word, .. } => *word = new,
        }
    }

    /// Lower is better. Variants without a frequency model score 0.
    pub fn score(&self) -> f64 {
        match self {
            Suggestion::Prefix { score, .. }
            | Suggestion::Contact { score, .. }
            | Suggestion::LookAhead { score, .. }
            | Suggestion::Word { score, .. } => *score,
            Suggestion::Shortcut { .. } | Suggestion::Numeric { .. } => 0.0,
        }
    }
}

fn cmp_score(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Total order used by [`SuggestionList::insert`]. `composing_len` is the
/// char length of the request's composing string, needed for the
/// exact-match tie-break between predictions.
pub(crate) fn compare(a: &Suggestion, b: &Suggestion, composing_len: usize) -> Ordering {
    if a.rank() != b.rank() {
        return a.rank().cmp(&b.rank());
    }
    match (a, b) {
        (
            Suggestion::LookAhead {
                word: wa,
                score: sa,
                edit_distance: ea,
                depth: da,
            },
            Suggestion::LookAhead {
                word: wb,
                score: sb,
                edit_distance: eb,
                depth: db,
            },
        ) => {
            // Deeper context wins outright.
            if da != db {
                return db.cmp(da);
            }
            let a_exact = *ea == 0.0 && wa.chars().count() == composing_len;
            let b_exact = *eb == 0.0 && wb.chars().count() == composing_len;
            if a_exact != b_exact {
                return if a_exact { Ordering::Less } else { Ordering::Greater };
            }
            cmp_score(*sa, *sb).then_with(|| wa.cmp(wb))
        }
        (
            Suggestion::Word {
                word: wa, score: sa, ..
            },
            Suggestion::Word {
                word: wb, score: sb, ..
            },
        ) => cmp_score(*sa, *sb).then_with(|| wa.cmp(wb)),
        (Suggestion::Prefix { score: sa, .. }, Suggestion::Prefix { score: sb, .. })
        | (Suggestion::Contact { score: sa, .. }, Suggestion::Contact { score: sb, .. }) => {
            cmp_score(*sa, *sb)
        }
        _ => Ordering::Equal,
    }
}

/// Upper bound on suggestions kept per request.
pub const MAX_SUGGESTIONS: usize = 12;

/// Rank-ordered, bounded set of suggestions for one request.
#[derive(Debug)]
pub struct SuggestionList {
    request: Arc<SuggestionRequest>,
    items: Vec<Suggestion>,
    default_index: Option<usize>,
}

impl SuggestionList {
    pub fn new(request: Arc<SuggestionRequest>) -> Self {
        SuggestionList {
            request,
            items: Vec::new(),
            default_index: Some(0),
        }
    }

    pub fn request(&self) -> &Arc<SuggestionRequest> {
        &self.request
    }

    pub fn composing(&self) -> &str {
        self.request.composing()
    }

    pub fn is_expired(&self) -> bool {
        self.request.is_expired()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Suggestion] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Suggestion> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Suggestion> {
        self.items.get(index)
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(Suggestion::word)
    }

    /// The index the IME should commit on space, if any.
    pub fn default_index(&self) -> Option<usize> {
        self.default_index.filter(|&i| i < self.items.len())
    }

    pub fn default_suggestion(&self) -> Option<&Suggestion> {
        self.default_index().and_then(|i| self.items.get(i))
    }

    pub(crate) fn set_default_index(&mut self, index: Option<usize>) {
        self.default_index = index;
    }

    pub fn clear_default(&mut self) {
        self.default_index = None;
    }

    /// Insert in rank order, dropping the worst item past capacity.
    pub fn insert(&mut self, suggestion: Suggestion) {
        let composing_len = self.request.composing().chars().count();
        let pos = self
            .items
            .iter()
            .position(|existing| compare(&suggestion, existing, composing_len) == Ordering::Less)
            .unwrap_or(self.items.len());
        self.items.insert(pos, suggestion);
        self.items.truncate(MAX_SUGGESTIONS);
    }

    pub(crate) fn merge(&mut self, other: SuggestionList) -> Result<(), Expired> {
        self.request.check()?;
        for suggestion in other.items {
            self.insert(suggestion);
        }
        Ok(())
    }

    pub(crate) fn remove(&mut self, index: usize) -> Suggestion {
        self.items.remove(index)
    }

    /// Transfer the composing string's case onto every suggestion except
    /// shortcuts, which expand to their configured text verbatim.
    pub(crate) fn match_case_all(&mut self) {
        let composing = self.request.composing().to_string();
        let shifted = self.request.is_shifted();
        let caps_lock = self.request.is_caps_lock();
        for suggestion in &mut self.items {
            if matches!(suggestion, Suggestion::Shortcut { .. }) {
                continue;
            }
            let cased = textcase::match_case(&composing, suggestion.word(), shifted, caps_lock);
            suggestion.set_word(cased);
        }
    }
}

impl<'a> IntoIterator for &'a SuggestionList {
    type Item = &'a Suggestion;
    type IntoIter = std::slice::Iter<'a, Suggestion>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
