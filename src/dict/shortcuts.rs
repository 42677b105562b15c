//! Keystroke expansions ("omw" -> "On my way!"). Matching is exact on the
//! lower-cased composing string; expansions are committed verbatim, so
//! case matching skips them.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::dict::Dictionary;
use crate::suggestions::{Expired, Suggestion, SuggestionList, SuggestionRequest};

#[derive(Default)]
pub struct ShortcutsDictionary {
    entries: RwLock<HashMap<String, String>>,
}

impl ShortcutsDictionary {
    pub fn new() -> Self {
        ShortcutsDictionary::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let dict = ShortcutsDictionary::new();
        for (keystroke, expansion) in entries {
            dict.add(&keystroke.into(), expansion.into());
        }
        dict
    }

    pub fn add(&self, keystroke: &str, expansion: String) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(keystroke.to_lowercase(), expansion);
        }
    }

    pub fn remove(&self, keystroke: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(&keystroke.to_lowercase());
        }
    }
}

impl Dictionary for ShortcutsDictionary {
    fn suggestions(&self, request: &Arc<SuggestionRequest>) -> Result<SuggestionList, Expired> {
        let mut list = SuggestionList::new(Arc::clone(request));
        let Ok(entries) = self.entries.read() else {
            return Ok(list);
        };
        if let Some(expansion) = entries.get(&request.composing().to_lowercase()) {
            list.insert(Suggestion::Shortcut {
                word: expansion.clone(),
            });
        }
        Ok(list)
    }

    // Expansions are not words; never veto learning or spell checks.
    fn contains(&self, _word: &str) -> bool {
        false
    }
}
