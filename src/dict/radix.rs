//! Arena-backed compressed radix trie.
//!
//! Nodes live in one `Vec`; edges are `u32` indices into it. Each node
//! carries a multi-char label and a count; `count > 0` marks the node as a
//! dictionary entry, so removal is just zeroing the count and never
//! restructures the tree. Lookups take a char comparator so the same trie
//! serves exact, case-insensitive and diacritic-folded queries.

pub type NodeId = u32;

pub(crate) const ROOT: NodeId = 0;

pub struct Node {
    pub(crate) label: Vec<char>,
    pub(crate) count: u32,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub fn is_entry(&self) -> bool {
        self.count > 0
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

pub struct RadixTrie {
    nodes: Vec<Node>,
    count_sum: u64,
}

impl Default for RadixTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl RadixTrie {
    pub fn new() -> Self {
        RadixTrie {
            nodes: vec![Node {
                label: Vec::new(),
                count: 0,
                children: Vec::new(),
            }],
            count_sum: 0,
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    /// Sum of all entry counts, the denominator for frequency scores.
    pub fn count_sum(&self) -> u64 {
        self.count_sum
    }

    pub fn set_count_sum(&mut self, count_sum: u64) {
        self.count_sum = count_sum;
    }

    /// Insert `word` with `count`. Re-inserting an existing word overwrites
    /// its count (last write wins); `count_sum` tracks the delta.
    pub fn insert(&mut self, word: &str, count: u32) {
        let chars: Vec<char> = word.chars().collect();
        if chars.is_empty() {
            return;
        }
        self.insert_at(ROOT, &chars, count);
    }

    fn insert_at(&mut self, node: NodeId, s: &[char], count: u32) {
        let slots = self.nodes[node as usize].children.len();
        for slot in 0..slots {
            let child_id = self.nodes[node as usize].children[slot];
            let shared = common_prefix(&self.nodes[child_id as usize].label, s);
            if shared == 0 {
                continue;
            }
            let label_len = self.nodes[child_id as usize].label.len();
            if shared == label_len && shared == s.len() {
                let old = self.nodes[child_id as usize].count;
                self.nodes[child_id as usize].count = count;
                self.count_sum = self.count_sum - u64::from(old) + u64::from(count);
                return;
            }
            if shared == label_len {
                self.insert_at(child_id, &s[shared..], count);
                return;
            }
            // The new word diverges inside this child's label: split it.
            let suffix = self.nodes[child_id as usize].label.split_off(shared);
            let prefix = std::mem::replace(&mut self.nodes[child_id as usize].label, suffix);
            let split_id = self.push(Node {
                label: prefix,
                count: 0,
                children: vec![child_id],
            });
            self.nodes[node as usize].children[slot] = split_id;
            if shared < s.len() {
                let leaf = self.push(Node {
                    label: s[shared..].to_vec(),
                    count,
                    children: Vec::new(),
                });
                self.nodes[split_id as usize].children.push(leaf);
            } else {
                self.nodes[split_id as usize].count = count;
            }
            self.count_sum += u64::from(count);
            return;
        }
        let leaf = self.push(Node {
            label: s.to_vec(),
            count,
            children: Vec::new(),
        });
        self.nodes[node as usize].children.push(leaf);
        self.count_sum += u64::from(count);
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        id
    }

    /// Walk `prefix` under `eq` and return the node it ends in plus the
    /// offset into that node's label where it ended. Non-letter label chars
    /// that the prefix lacks are skipped for free, so `"dont"` still finds
    /// `"don't"`.
    pub(crate) fn find_node<F>(&self, prefix: &str, eq: &F) -> Option<(NodeId, usize)>
    where
        F: Fn(char, char) -> bool,
    {
        let chars: Vec<char> = prefix.chars().collect();
        if chars.is_empty() {
            return Some((ROOT, 0));
        }
        self.find_from(ROOT, &chars, 0, eq)
    }

    fn find_from<F>(&self, node: NodeId, prefix: &[char], i: usize, eq: &F) -> Option<(NodeId, usize)>
    where
        F: Fn(char, char) -> bool,
    {
        for &child_id in &self.nodes[node as usize].children {
            let child = &self.nodes[child_id as usize];
            let (consumed, used) = match_label(&child.label, prefix, i, eq);
            if consumed == 0 {
                continue;
            }
            if i + consumed >= prefix.len() {
                return Some((child_id, used));
            }
            if used < child.label.len() {
                continue;
            }
            if let Some(found) = self.find_from(child_id, prefix, i + consumed, eq) {
                return Some(found);
            }
        }
        None
    }

    /// Entry count of the exact word, `None` when the word is not an entry.
    pub fn get_count<F>(&self, word: &str, eq: &F) -> Option<u32>
    where
        F: Fn(char, char) -> bool,
    {
        let (id, used) = self.find_node(word, eq)?;
        let node = self.node(id);
        if node.is_entry() && used == node.label.len() {
            Some(node.count)
        } else {
            None
        }
    }

    pub fn contains<F>(&self, word: &str, eq: &F) -> bool
    where
        F: Fn(char, char) -> bool,
    {
        self.get_count(word, eq).is_some()
    }

    /// Whether the word is at least a prefix of something stored.
    pub fn matches_prefix<F>(&self, prefix: &str, eq: &F) -> bool
    where
        F: Fn(char, char) -> bool,
    {
        self.find_node(prefix, eq).is_some()
    }

    /// Overwrite an existing entry's count. Returns false when the word is
    /// not an entry.
    pub fn set_count<F>(&mut self, word: &str, eq: &F, count: u32) -> bool
    where
        F: Fn(char, char) -> bool,
    {
        match self.find_node(word, eq) {
            Some((id, used))
                if self.nodes[id as usize].is_entry()
                    && used == self.nodes[id as usize].label.len() =>
            {
                let old = self.nodes[id as usize].count;
                self.nodes[id as usize].count = count;
                self.count_sum = self.count_sum - u64::from(old) + u64::from(count);
                true
            }
            _ => false,
        }
    }

    /// Remove a word by zeroing its count; the node stays as a branch point.
    pub fn remove_entry<F>(&mut self, word: &str, eq: &F) -> bool
    where
        F: Fn(char, char) -> bool,
    {
        match self.find_node(word, eq) {
            Some((id, used))
                if self.nodes[id as usize].is_entry()
                    && used == self.nodes[id as usize].label.len() =>
            {
                let old = self.nodes[id as usize].count;
                self.nodes[id as usize].count = 0;
                self.count_sum -= u64::from(old);
                true
            }
            _ => false,
        }
    }
}

fn common_prefix(a: &[char], b: &[char]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

/// Match `label` against `prefix[i..]`: `consumed` prefix chars matched,
/// `used` label chars passed (matches plus skipped non-letters).
fn match_label<F>(label: &[char], prefix: &[char], i: usize, eq: &F) -> (usize, usize)
where
    F: Fn(char, char) -> bool,
{
    let mut consumed = 0;
    let mut used = 0;
    for &c in label {
        let Some(&p) = prefix.get(i + consumed) else {
            break;
        };
        if eq(p, c) {
            consumed += 1;
            used += 1;
        } else if !c.is_alphabetic() {
            used += 1;
        } else {
            break;
        }
    }
    (consumed, used)
}
