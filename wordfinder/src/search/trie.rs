use std::collections::HashMap;

use crate::errors::{SearchError, SearchResult};

/// Handle of a node inside a [`PrefixIndex`].
pub type NodeId = usize;

/// Index of the root node.
pub const ROOT: NodeId = 0;

#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<char, NodeId>,
    /// The complete word when this node is terminal.
    word: Option<String>,
}

/// Arena-backed trie of the words being searched for.
///
/// Nodes live in one `Vec` and link to their children by index, so a built
/// index can be shared read-only across scanner threads.
#[derive(Debug)]
pub struct PrefixIndex {
    nodes: Vec<TrieNode>,
    words: usize,
}

impl Default for PrefixIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixIndex {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            words: 0,
        }
    }

    /// Adds `word` to the index.
    ///
    /// Returns `Ok(false)` if the word was already present. Empty words are
    /// rejected with [`SearchError::InvalidInput`].
    pub fn insert(&mut self, word: &str) -> SearchResult<bool> {
        if word.is_empty() {
            return Err(SearchError::invalid_input(
                "Cannot index an empty word.",
            ));
        }

        let mut node = ROOT;
        for ch in word.chars() {
            node = match self.nodes[node].children.get(&ch) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[node].children.insert(ch, child);
                    child
                }
            };
        }

        let terminal = &mut self.nodes[node];
        if terminal.word.is_some() {
            return Ok(false);
        }
        terminal.word = Some(word.to_owned());
        self.words += 1;
        Ok(true)
    }

    /// Follows the edge labelled `ch` out of `node`.
    #[inline]
    pub fn child(&self, node: NodeId, ch: char) -> Option<NodeId> {
        self.nodes[node].children.get(&ch).copied()
    }

    /// The word stored at `node`, if it is terminal.
    #[inline]
    pub fn word_at(&self, node: NodeId) -> Option<&str> {
        self.nodes[node].word.as_deref()
    }

    pub fn is_terminal(&self, node: NodeId) -> bool {
        self.nodes[node].word.is_some()
    }

    pub fn contains(&self, word: &str) -> bool {
        let mut node = ROOT;
        for ch in word.chars() {
            match self.child(node, ch) {
                Some(next) => node = next,
                None => return false,
            }
        }
        self.is_terminal(node)
    }

    /// Number of distinct words indexed.
    pub fn len(&self) -> usize {
        self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    /// Number of nodes in the arena, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
