//! Keyboard layout boundary.
//!
//! The engine only needs one fact from a layout: whether two keys sit next
//! to each other, which makes a substitution between them cheaper to the
//! fuzzy search. Everything else about the keyboard (geometry, touch,
//! rendering) stays on the other side of this trait.

pub trait KeyboardLayout: Send + Sync {
    /// Whether `other` is one of the keys physically adjacent to `key`.
    fn is_adjacent(&self, key: char, other: char) -> bool;
}

/// en-US QWERTY. Row neighbors plus the staggered key below/above, matching
/// what a thumb actually fat-fingers.
pub struct QwertyLayout;

/// Adjacency per letter, indexed by `c - 'a'`.
const ADJACENT_KEYS: [&str; 26] = [
    "as",  // a
    "bnv", // b
    "cvx", // c
    "dsf", // d
    "erw", // e
    "fdg", // f
    "gfh", // g
    "hgj", // h
    "iou", // i
    "jhk", // j
    "kjl", // k
    "lk",  // l
    "mn",  // m
    "nmb", // n
    "oip", // o
    "po",  // p
    "qw",  // q
    "ret", // r
    "sad", // s
    "try", // t
    "uyi", // u
    "vcb", // v
    "weq", // w
    "xcz", // x
    "ytu", // y
    "zx",  // z
];

impl KeyboardLayout for QwertyLayout {
    fn is_adjacent(&self, key: char, other: char) -> bool {
        let key = key.to_ascii_lowercase();
        let other = other.to_ascii_lowercase();
        if !key.is_ascii_lowercase() {
            return false;
        }
        ADJACENT_KEYS[(key as u8 - b'a') as usize].contains(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_are_symmetric() {
        let layout = QwertyLayout;
        for (i, neighbors) in ADJACENT_KEYS.iter().enumerate() {
            let key = (b'a' + i as u8) as char;
            for other in neighbors.chars() {
                assert!(
                    layout.is_adjacent(other, key),
                    "{key} -> {other} listed but not the reverse"
                );
            }
        }
    }

    #[test]
    fn adjacency_ignores_case() {
        let layout = QwertyLayout;
        assert!(layout.is_adjacent('T', 'r'));
        assert!(layout.is_adjacent('t', 'Y'));
        assert!(!layout.is_adjacent('t', 'q'));
    }

    #[test]
    fn non_letters_are_never_adjacent() {
        let layout = QwertyLayout;
        assert!(!layout.is_adjacent('1', 'q'));
        assert!(!layout.is_adjacent('\'', 'a'));
    }
}
