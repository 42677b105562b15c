//! Dictionary sources.
//!
//! Every source that can put candidates in front of the user implements
//! [`Dictionary`]; sources that additionally adapt to the user implement
//! [`LearningDictionary`]. The orchestrator only ever talks to these
//! traits, so static lexicons, n-gram predictors, caches and auxiliary
//! generators compose freely.

pub mod cache;
pub mod collator;
pub mod distance;
mod fuzzy;
pub mod lookahead;
pub mod number;
pub mod radix;
pub mod shortcuts;
pub mod word;

use std::sync::Arc;

use crate::suggestions::{Expired, SuggestionList, SuggestionRequest};

pub trait Dictionary: Send + Sync {
    /// Gather candidates for the request into a fresh list. Returns
    /// `Err(Expired)` as soon as the request is superseded.
    fn suggestions(&self, request: &Arc<SuggestionRequest>) -> Result<SuggestionList, Expired>;

    /// Case-insensitive whole-word membership.
    fn contains(&self, word: &str) -> bool;

    /// Whether `word` is at least a prefix of a stored entry.
    fn matches(&self, word: &str) -> bool {
        self.contains(word)
    }
}

/// A dictionary the user's own typing can change.
pub trait LearningDictionary: Dictionary {
    /// Record one observation. Returns false when the input is rejected
    /// (for example an n-gram learner given the wrong number of words).
    fn learn(&self, input: &str) -> bool;

    /// Remove a user-owned word. Rejected for words owned by the shipped
    /// lexicon.
    fn forget(&self, word: &str) -> bool;

    /// Reinstate a word the user wants offered. Rejected when the shipped
    /// lexicon already owns it.
    fn remember(&self, word: &str) -> bool;
}
