//! Renderings of digit-only composing strings: the literal number, a
//! thousands-grouped form, the matching ordinal, and the spelled-out word
//! for small values.

use std::sync::Arc;

use crate::dict::Dictionary;
use crate::suggestions::{Expired, Suggestion, SuggestionList, SuggestionRequest};

const NUMBER_WORDS: [&str; 21] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen", "twenty",
];

#[derive(Default)]
pub struct NumberDictionary;

impl NumberDictionary {
    pub fn new() -> Self {
        NumberDictionary
    }
}

fn is_numeric(composing: &str) -> bool {
    !composing.is_empty() && composing.chars().all(|c| c.is_ascii_digit())
}

/// `1234567` -> `1,234,567`.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Ordinal suffix per English rules: 11th, 12th, 13th take `th` despite
/// ending in 1, 2, 3.
fn ordinal(grouped: &str) -> String {
    let digits: Vec<char> = grouped.chars().filter(|c| c.is_ascii_digit()).collect();
    let teen = digits.len() >= 2 && digits[digits.len() - 2] == '1';
    let suffix = if teen {
        "th"
    } else {
        match digits.last() {
            Some('1') => "st",
            Some('2') => "nd",
            Some('3') => "rd",
            _ => "th",
        }
    };
    format!("{grouped}{suffix}")
}

impl Dictionary for NumberDictionary {
    fn suggestions(&self, request: &Arc<SuggestionRequest>) -> Result<SuggestionList, Expired> {
        let mut list = SuggestionList::new(Arc::clone(request));
        let composing = request.composing();
        if !is_numeric(composing) {
            return Ok(list);
        }

        list.insert(Suggestion::Numeric {
            word: composing.to_string(),
        });
        if let Ok(value) = composing.parse::<usize>() {
            if let Some(word) = NUMBER_WORDS.get(value) {
                list.insert(Suggestion::Numeric {
                    word: (*word).to_string(),
                });
            }
        }
        let grouped = group_thousands(composing);
        if grouped != composing {
            list.insert(Suggestion::Numeric {
                word: grouped.clone(),
            });
        }
        list.insert(Suggestion::Numeric {
            word: ordinal(&grouped),
        });
        Ok(list)
    }

    fn contains(&self, word: &str) -> bool {
        is_numeric(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words_for(composing: &str) -> Vec<String> {
        let request = Arc::new(SuggestionRequest::new(composing, "", "", false, false));
        NumberDictionary::new()
            .suggestions(&request)
            .unwrap()
            .words()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn small_numbers_are_spelled_out() {
        let words = words_for("3");
        assert!(words.contains(&"3".to_string()));
        assert!(words.contains(&"three".to_string()));
        assert!(words.contains(&"3rd".to_string()));
    }

    #[test]
    fn large_numbers_are_grouped() {
        let words = words_for("1234567");
        assert!(words.contains(&"1,234,567".to_string()));
        assert!(words.contains(&"1,234,567th".to_string()));
        assert!(!words.contains(&"1234567th".to_string()));
    }

    #[test]
    fn short_numbers_are_not_grouped() {
        let words = words_for("123");
        assert_eq!(words.iter().filter(|w| *w == "123").count(), 1);
        assert!(words.contains(&"123rd".to_string()));
    }

    #[test]
    fn teens_take_th() {
        assert!(words_for("11").contains(&"11th".to_string()));
        assert!(words_for("12").contains(&"12th".to_string()));
        assert!(words_for("13").contains(&"13th".to_string()));
        assert!(words_for("111").contains(&"111th".to_string()));
        assert!(words_for("21").contains(&"21st".to_string()));
        assert!(words_for("22").contains(&"22nd".to_string()));
        assert!(words_for("23").contains(&"23rd".to_string()));
    }

    #[test]
    fn non_numeric_composing_yields_nothing() {
        assert!(words_for("12a").is_empty());
        assert!(words_for("").is_empty());
    }

    #[test]
    fn contains_accepts_digit_strings_only() {
        let dict = NumberDictionary::new();
        assert!(dict.contains("42"));
        assert!(!dict.contains("42nd"));
        assert!(!dict.contains(""));
    }
}
