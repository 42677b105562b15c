//! Result cache for short composing strings.
//!
//! The first one or two keystrokes of a word hit the widest part of the
//! trie and dominate query cost, yet their results depend only on the
//! composing string. This wrapper memoizes those; longer queries are
//! cheap enough to always run fresh.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::dict::{Dictionary, LearningDictionary};
use crate::suggestions::{Expired, Suggestion, SuggestionList, SuggestionRequest};

/// Composing strings longer than this bypass the cache.
const MAX_CACHED_CHARS: usize = 2;

pub struct CachedDictionary<D> {
    inner: D,
    cache: Mutex<HashMap<String, Vec<Suggestion>>>,
}

impl<D: Dictionary> CachedDictionary<D> {
    pub fn new(inner: D) -> Self {
        CachedDictionary {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }
}

impl<D: Dictionary> Dictionary for CachedDictionary<D> {
    fn suggestions(&self, request: &Arc<SuggestionRequest>) -> Result<SuggestionList, Expired> {
        let composing = request.composing();
        if composing.chars().count() > MAX_CACHED_CHARS {
            return self.inner.suggestions(request);
        }

        if let Ok(cache) = self.cache.lock() {
            if let Some(items) = cache.get(composing) {
                let mut list = SuggestionList::new(Arc::clone(request));
                for suggestion in items {
                    list.insert(suggestion.clone());
                }
                return Ok(list);
            }
        }

        let list = self.inner.suggestions(request)?;
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(composing.to_string(), list.items().to_vec());
        }
        Ok(list)
    }

    fn contains(&self, word: &str) -> bool {
        self.inner.contains(word)
    }

    fn matches(&self, word: &str) -> bool {
        self.inner.matches(word)
    }
}

// Learning goes straight through; cached entries for the affected prefixes
// go stale until `clear`.
impl<D: LearningDictionary> LearningDictionary for CachedDictionary<D> {
    fn learn(&self, input: &str) -> bool {
        self.inner.learn(input)
    }

    fn forget(&self, word: &str) -> bool {
        self.inner.forget(word)
    }

    fn remember(&self, word: &str) -> bool {
        self.inner.remember(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::collator::KeyCollator;
    use crate::dict::word::WordDictionary;
    use crate::layout::QwertyLayout;

    fn cached(entries: &[(&str, u32)]) -> CachedDictionary<WordDictionary> {
        let collator = Arc::new(KeyCollator::new(Arc::new(QwertyLayout)));
        let dict = WordDictionary::new(collator);
        for (word, count) in entries {
            dict.insert(word, *count);
        }
        CachedDictionary::new(dict)
    }

    fn request(composing: &str) -> Arc<SuggestionRequest> {
        Arc::new(SuggestionRequest::new(composing, "", "", false, false))
    }

    #[test]
    fn short_queries_are_served_from_cache() {
        let dict = cached(&[("ten", 100), ("tea", 50)]);
        let first: Vec<String> = dict
            .suggestions(&request("te"))
            .unwrap()
            .words()
            .map(str::to_string)
            .collect();
        assert!(first.contains(&"ten".to_string()));

        // The cached result survives a mutation underneath it.
        dict.forget("ten");
        let second: Vec<String> = dict
            .suggestions(&request("te"))
            .unwrap()
            .words()
            .map(str::to_string)
            .collect();
        assert_eq!(first, second);

        dict.clear();
        let third = dict.suggestions(&request("te")).unwrap();
        assert!(!third.words().any(|w| w == "ten"));
    }

    #[test]
    fn long_queries_bypass_the_cache() {
        let dict = cached(&[("tenth", 100)]);
        assert!(dict.suggestions(&request("ten")).unwrap().words().any(|w| w == "tenth"));
        dict.forget("tenth");
        assert!(dict.suggestions(&request("ten")).unwrap().is_empty());
    }

    #[test]
    fn cached_list_is_bound_to_the_new_request() {
        let dict = cached(&[("ten", 100)]);
        dict.suggestions(&request("te")).unwrap();
        let req = request("te");
        let list = dict.suggestions(&req).unwrap();
        assert!(Arc::ptr_eq(list.request(), &req));
    }
}
