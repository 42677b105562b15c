//! Case classification and case transfer from the composing string onto
//! suggested words.

pub fn is_all_caps(s: &str) -> bool {
    !s.is_empty() && s == s.to_uppercase()
}

pub fn is_capitalized(s: &str) -> bool {
    s.chars().next().is_some_and(char::is_uppercase)
}

/// Uppercase anywhere past the first char ("iPhone", "McDonald").
pub fn is_mixed_case(s: &str) -> bool {
    s.chars().skip(1).any(char::is_uppercase)
}

pub fn cap_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Shape `word` after the case of what the user actually typed. Words that
/// carry their own casing (all-caps or mixed-case) pass through unchanged.
/// An empty match string falls back to the keyboard state.
pub fn match_case(matched: &str, word: &str, shifted: bool, caps_lock: bool) -> String {
    if matched.is_empty() {
        return if caps_lock {
            word.to_uppercase()
        } else if shifted {
            cap_first(word)
        } else {
            word.to_string()
        };
    }
    if is_all_caps(word) || is_mixed_case(word) {
        return word.to_string();
    }
    if is_all_caps(matched) {
        return if matched.chars().count() == 1 {
            cap_first(word)
        } else {
            word.to_uppercase()
        };
    }
    if is_capitalized(matched) {
        return cap_first(word);
    }
    word.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(is_all_caps("NYC"));
        assert!(!is_all_caps("Nyc"));
        assert!(!is_all_caps(""));
        assert!(is_capitalized("Hello"));
        assert!(!is_capitalized("hello"));
        assert!(is_mixed_case("iPhone"));
        assert!(is_mixed_case("McDonald"));
        assert!(!is_mixed_case("Hello"));
    }

    #[test]
    fn lowercase_match_passes_through() {
        assert_eq!(match_case("teh", "the", false, false), "the");
    }

    #[test]
    fn capitalized_match_capitalizes() {
        assert_eq!(match_case("Teh", "the", false, false), "The");
    }

    #[test]
    fn all_caps_match_uppercases() {
        assert_eq!(match_case("TEH", "the", false, false), "THE");
        // A single uppercase char only proves a capital, not caps lock.
        assert_eq!(match_case("T", "the", false, false), "The");
    }

    #[test]
    fn cased_words_are_exempt() {
        assert_eq!(match_case("nyc", "NYC", false, false), "NYC");
        assert_eq!(match_case("IPHONE", "iPhone", false, false), "iPhone");
    }

    #[test]
    fn empty_match_uses_keyboard_state() {
        assert_eq!(match_case("", "the", false, false), "the");
        assert_eq!(match_case("", "the", true, false), "The");
        assert_eq!(match_case("", "the", true, true), "THE");
    }
}
