//! Predictive-text engine for soft keyboards.
//!
//! As the user types, [`Suggestor`] queries a set of dictionaries — a
//! fuzzy-matching word lexicon, an n-gram next-word predictor, numeric
//! renderings, shortcut expansions and optionally contacts — then ranks,
//! cases, and deduplicates the candidates into a [`SuggestionList`] with
//! a default the IME can commit on space. Committed text flows back in
//! through [`Suggestor::learn_suggestions`] so the word and n-gram models
//! adapt to the user.
//!
//! Every keystroke supersedes the previous request; in-flight searches
//! poll the expiration flag and unwind instead of finishing stale work.

pub mod dict;
pub mod layout;
pub mod storage;
pub mod suggestions;
pub mod suggestor;
pub mod textcase;
pub mod trace_init;
mod worker;

pub use dict::cache::CachedDictionary;
pub use dict::collator::KeyCollator;
pub use dict::lookahead::LookAheadDictionary;
pub use dict::number::NumberDictionary;
pub use dict::shortcuts::ShortcutsDictionary;
pub use dict::word::WordDictionary;
pub use dict::{Dictionary, LearningDictionary};
pub use layout::{KeyboardLayout, QwertyLayout};
pub use suggestions::{Expired, Suggestion, SuggestionList, SuggestionRequest, MAX_SUGGESTIONS};
pub use suggestor::{InputContext, Suggestor, SuggestorBuilder, SuggestorConfig};
