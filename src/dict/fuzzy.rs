//! Bounded fuzzy search over a radix trie.
//!
//! The search walks trie labels against the composing string, repairing as
//! it goes: substitutions (cheap for adjacent keys), missing chars,
//! transposed neighbors, double-tapped chars, and free passthrough of
//! non-letter label chars the user never types. Once the composing string
//! is consumed the walk switches to collect mode and emits every entry
//! below the current node.
//!
//! Every recursion step polls the request's expiration flag, so a
//! superseded request unwinds with `Err(Expired)` instead of finishing
//! work nobody wants.

use crate::dict::collator::KeyCollator;
use crate::dict::distance::{DELETE, INSERT, TRANSPOSE};
use crate::dict::radix::{NodeId, RadixTrie};
use crate::suggestions::{Expired, SuggestionRequest};

pub(crate) struct FuzzyQuery<'a> {
    pub trie: &'a RadixTrie,
    pub collator: &'a KeyCollator,
    pub request: &'a SuggestionRequest,
    pub max_edit_distance: f64,
}

/// Emits `(word, count, edit_distance)` for every entry within the budget.
/// `start` is a `(node, label_offset)` pair from `RadixTrie::find_node`,
/// letting callers root the search below an n-gram prefix.
pub(crate) fn find_suggestions(
    query: &FuzzyQuery<'_>,
    start: (NodeId, usize),
    sink: &mut dyn FnMut(&str, u32, f64),
) -> Result<(), Expired> {
    let mut buf: Vec<char> = query.request.composing().chars().collect();
    search(query, &mut buf, 0, start.0, start.1, 0.0, sink)
}

#[allow(clippy::too_many_arguments)]
fn search(
    query: &FuzzyQuery<'_>,
    buf: &mut Vec<char>,
    i_prefix: usize,
    node: NodeId,
    i_label: usize,
    edit_distance: f64,
    sink: &mut dyn FnMut(&str, u32, f64),
) -> Result<(), Expired> {
    if edit_distance > query.max_edit_distance {
        return Ok(());
    }
    query.request.check()?;

    let label = &query.trie.node(node).label;

    // Composing consumed: everything below is a completion.
    if i_prefix >= buf.len() {
        let base_len = buf.len();
        buf.extend_from_slice(&label[i_label.min(label.len())..]);
        collect(query, node, buf, edit_distance, sink)?;
        buf.truncate(base_len);
        return Ok(());
    }

    // Label consumed: descend.
    if i_label >= label.len() {
        for &child in &query.trie.node(node).children {
            search(query, buf, i_prefix, child, 0, edit_distance, sink)?;
        }
        return Ok(());
    }

    let c = label[i_label];

    // Chars the user never types (apostrophes etc.) pass through free.
    if !c.is_alphabetic() {
        buf.insert(i_prefix, c);
        let result = search(query, buf, i_prefix + 1, node, i_label + 1, edit_distance, sink);
        buf.remove(i_prefix);
        return result;
    }

    let key = buf[i_prefix];

    // Substitution (exact, adjacent, or plain).
    let key_distance = query.collator.key_distance(c, key);
    if edit_distance + key_distance <= query.max_edit_distance {
        buf[i_prefix] = c;
        let result = search(
            query,
            buf,
            i_prefix + 1,
            node,
            i_label + 1,
            edit_distance + key_distance,
            sink,
        );
        buf[i_prefix] = key;
        result?;
        // An exact key match is authoritative; repairs would only produce
        // noise around it.
        if key_distance == 0.0 {
            return Ok(());
        }
    }

    // Dictionary char missing from the typed string.
    buf.insert(i_prefix, c);
    let result = search(
        query,
        buf,
        i_prefix + 1,
        node,
        i_label + 1,
        edit_distance + DELETE,
        sink,
    );
    buf.remove(i_prefix);
    result?;

    // Two neighboring keys typed in the wrong order.
    if i_prefix + 1 < buf.len()
        && i_label + 1 < label.len()
        && query.collator.chars_equal(buf[i_prefix + 1], c)
        && query.collator.chars_equal(key, label[i_label + 1])
    {
        let (a, b) = (label[i_label], label[i_label + 1]);
        let (olda, oldb) = (buf[i_prefix], buf[i_prefix + 1]);
        buf[i_prefix] = a;
        buf[i_prefix + 1] = b;
        let result = search(
            query,
            buf,
            i_prefix + 2,
            node,
            i_label + 2,
            edit_distance + TRANSPOSE,
            sink,
        );
        buf[i_prefix] = olda;
        buf[i_prefix + 1] = oldb;
        result?;
    }

    // Double-tapped key: drop the repeat and resume at the same label char.
    if i_prefix > 1 && query.collator.chars_equal(buf[i_prefix - 1], key) {
        let repeat = buf.remove(i_prefix);
        let result = search(query, buf, i_prefix, node, i_label, edit_distance + INSERT, sink);
        buf.insert(i_prefix, repeat);
        result?;
    }

    Ok(())
}

/// Emit every entry at or below `node`. `buf` already holds the full word
/// for `node` itself.
fn collect(
    query: &FuzzyQuery<'_>,
    node: NodeId,
    buf: &mut Vec<char>,
    edit_distance: f64,
    sink: &mut dyn FnMut(&str, u32, f64),
) -> Result<(), Expired> {
    query.request.check()?;

    let n = query.trie.node(node);
    if n.is_entry() {
        let word: String = buf.iter().collect();
        sink(&word, n.count(), edit_distance);
    }
    for &child in &query.trie.node(node).children {
        let base_len = buf.len();
        buf.extend_from_slice(&query.trie.node(child).label);
        collect(query, child, buf, edit_distance, sink)?;
        buf.truncate(base_len);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::dict::collator::KeyCollator;
    use crate::dict::distance;
    use crate::layout::QwertyLayout;
    use crate::suggestions::SuggestionRequest;

    fn collator() -> KeyCollator {
        KeyCollator::new(Arc::new(QwertyLayout))
    }

    fn results(trie: &RadixTrie, composing: &str, max: f64) -> Vec<(String, f64)> {
        let request = SuggestionRequest::new(composing, "", "", false, false);
        let collator = collator();
        let query = FuzzyQuery {
            trie,
            collator: &collator,
            request: &request,
            max_edit_distance: max,
        };
        let mut out = Vec::new();
        find_suggestions(&query, (crate::dict::radix::ROOT, 0), &mut |word, _, ed| {
            out.push((word.to_string(), ed));
        })
        .unwrap();
        out
    }

    fn words_of(results: Vec<(String, f64)>) -> Vec<String> {
        results.into_iter().map(|(w, _)| w).collect()
    }

    fn sample_trie() -> RadixTrie {
        let mut trie = RadixTrie::new();
        trie.insert("the", 1000);
        trie.insert("then", 400);
        trie.insert("ten", 300);
        trie.insert("tea", 200);
        trie.insert("hello", 100);
        trie
    }

    #[test]
    fn exact_prefix_collects_completions() {
        let trie = sample_trie();
        let found = results(&trie, "te", 1.0);
        let ed = |w: &str| found.iter().find(|(x, _)| x == w).map(|(_, e)| *e);
        assert_eq!(ed("ten"), Some(0.0));
        assert_eq!(ed("tea"), Some(0.0));
        // Only reachable by substituting the first char.
        assert_eq!(ed("hello"), Some(distance::SUBSTITUTE));
    }

    #[test]
    fn exact_match_has_zero_distance() {
        let trie = sample_trie();
        let found = results(&trie, "the", 1.0);
        let the = found.iter().find(|(w, _)| w == "the").unwrap();
        assert_eq!(the.1, 0.0);
    }

    #[test]
    fn transposition_costs_one() {
        let trie = sample_trie();
        let found = results(&trie, "teh", distance::max_edit_distance("teh"));
        let the = found.iter().find(|(w, _)| w == "the");
        assert_eq!(the.map(|(_, ed)| *ed), Some(distance::TRANSPOSE));
    }

    #[test]
    fn plain_substitution_within_budget() {
        // 'h' -> 'n' is not adjacent; still one repair.
        let trie = sample_trie();
        let found = results(&trie, "teh", 1.0);
        let ten = found.iter().find(|(w, _)| w == "ten");
        assert_eq!(ten.map(|(_, ed)| *ed), Some(distance::SUBSTITUTE));
    }

    #[test]
    fn adjacent_key_substitution_is_cheaper() {
        let mut trie = RadixTrie::new();
        trie.insert("yes", 10);
        // 't' is adjacent to 'y'
        let found = results(&trie, "tes", 1.0);
        let yes = found.iter().find(|(w, _)| w == "yes");
        assert_eq!(yes.map(|(_, ed)| *ed), Some(distance::ADJACENT));
    }

    #[test]
    fn budget_is_respected() {
        let trie = sample_trie();
        // Two repairs needed, budget one: nothing comes back.
        let words = words_of(results(&trie, "tqq", 1.0));
        assert!(words.is_empty(), "got {words:?}");
    }

    #[test]
    fn double_tap_is_repaired() {
        let trie = sample_trie();
        let words = words_of(results(&trie, "teen", 1.0));
        assert!(words.contains(&"ten".to_string()), "got {words:?}");
    }

    #[test]
    fn apostrophes_pass_through_free() {
        let mut trie = RadixTrie::new();
        trie.insert("don't", 10);
        let found = results(&trie, "dont", 0.0);
        assert_eq!(found, vec![("don't".to_string(), 0.0)]);
    }

    #[test]
    fn empty_composing_collects_all_entries() {
        let trie = sample_trie();
        let words = words_of(results(&trie, "", 1.0));
        assert_eq!(words.len(), 5);
    }

    #[test]
    fn expired_request_aborts() {
        let trie = sample_trie();
        let request = SuggestionRequest::new("te", "", "", false, false);
        request.expire();
        let collator = collator();
        let query = FuzzyQuery {
            trie: &trie,
            collator: &collator,
            request: &request,
            max_edit_distance: 1.0,
        };
        let result = find_suggestions(&query, (crate::dict::radix::ROOT, 0), &mut |_, _, _| {
            panic!("expired search must not emit");
        });
        assert_eq!(result, Err(Expired));
    }

    #[test]
    fn search_can_be_rooted_below_a_prefix() {
        let mut trie = RadixTrie::new();
        trie.insert("new york", 40);
        trie.insert("new jersey", 10);
        let start = trie.find_node("new ", &|a: char, b: char| a == b).unwrap();
        let request = SuggestionRequest::new("yo", "", "", false, false);
        let collator = collator();
        let query = FuzzyQuery {
            trie: &trie,
            collator: &collator,
            request: &request,
            max_edit_distance: 1.0,
        };
        let mut out = Vec::new();
        find_suggestions(&query, start, &mut |word, _, _| out.push(word.to_string())).unwrap();
        assert_eq!(out, vec!["york".to_string()]);
    }
}
