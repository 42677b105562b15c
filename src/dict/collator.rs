//! Character and word comparison for a language/layout pair.
//!
//! Two chars are *equivalent* when they lower-case to the same char or sit
//! in the same configured equivalence class (languages that type diacritics
//! through the base key, e.g. `a`/`á`, register classes). On top of that,
//! the collator folds in layout adjacency to give fuzzy search a per-key
//! substitution distance.

use std::sync::Arc;

use crate::dict::distance;
use crate::layout::KeyboardLayout;

pub struct KeyCollator {
    layout: Arc<dyn KeyboardLayout>,
    equivalences: Vec<Vec<char>>,
}

impl KeyCollator {
    pub fn new(layout: Arc<dyn KeyboardLayout>) -> Self {
        KeyCollator {
            layout,
            equivalences: Vec::new(),
        }
    }

    /// Register equivalence classes, one string per class. Members are
    /// stored lower-cased.
    pub fn with_equivalences(mut self, classes: &[&str]) -> Self {
        self.equivalences = classes
            .iter()
            .map(|class| class.chars().flat_map(char::to_lowercase).collect())
            .collect();
        self
    }

    pub fn chars_equal(&self, a: char, b: char) -> bool {
        let a = lower(a);
        let b = lower(b);
        if a == b {
            return true;
        }
        self.equivalences
            .iter()
            .any(|class| class.contains(&a) && class.contains(&b))
    }

    /// Case-insensitive whole-word comparison under the same equivalences.
    pub fn words_equal(&self, a: &str, b: &str) -> bool {
        let mut ca = a.chars();
        let mut cb = b.chars();
        loop {
            match (ca.next(), cb.next()) {
                (None, None) => return true,
                (Some(x), Some(y)) if self.chars_equal(x, y) => {}
                _ => return false,
            }
        }
    }

    /// Substitution cost between a dictionary char and the key the user
    /// pressed: 0 when equivalent, cheap when the keys are physically
    /// adjacent, the full substitution cost otherwise.
    pub fn key_distance(&self, dict_char: char, key: char) -> f64 {
        if self.chars_equal(dict_char, key) {
            0.0
        } else if self.layout.is_adjacent(key, dict_char) {
            distance::ADJACENT
        } else {
            distance::SUBSTITUTE
        }
    }
}

fn lower(c: char) -> char {
    // to_lowercase() may expand to several chars; the first one is the
    // right fold for every alphabet this engine targets.
    c.to_lowercase().next().unwrap_or(c)
}
