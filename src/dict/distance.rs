//! Edit-distance cost model for fuzzy lookup.
//!
//! Costs are fractional so an adjacent-key slip can rank strictly better
//! than an arbitrary substitution while both stay inside the same budget.

/// Dictionary has a char the user did not type.
pub const DELETE: f64 = 1.0;
/// User typed a char the dictionary word lacks (double-tap repair).
pub const INSERT: f64 = 1.0;
/// Two neighboring chars typed in the wrong order.
pub const TRANSPOSE: f64 = 1.0;
/// Substituting one letter for an unrelated one.
pub const SUBSTITUTE: f64 = 1.0;
/// Substituting a letter for one physically adjacent on the layout.
pub const ADJACENT: f64 = 0.5;
/// Two words joined without the separating space. Reserved.
pub const JOINED: f64 = 1.0;

/// Error budget scales with how much has been typed: short composing
/// strings give the search little signal, so only one repair is allowed.
pub fn max_edit_distance(composing: &str) -> f64 {
    if composing.chars().count() <= 4 {
        1.0
    } else {
        2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_by_length() {
        assert_eq!(max_edit_distance(""), 1.0);
        assert_eq!(max_edit_distance("t"), 1.0);
        assert_eq!(max_edit_distance("tehq"), 1.0);
        assert_eq!(max_edit_distance("tehqu"), 2.0);
        assert_eq!(max_edit_distance("misspelled"), 2.0);
    }

    #[test]
    fn budget_counts_chars_not_bytes() {
        assert_eq!(max_edit_distance("héllo"), 2.0);
        assert_eq!(max_edit_distance("héll"), 1.0);
    }

    #[test]
    fn adjacent_beats_plain_substitution() {
        assert!(ADJACENT < SUBSTITUTE);
    }
}
