//! Compressed trie engine.
//!
//! A radix trie over `a..=z` whose edge labels are [`Span`]s into one shared
//! [`TextArena`]. Inserting splits edges, deleting merges a pass-through node
//! into its only child, so no node without a word ever keeps a single child.
//!
//! Every node records the arena index where its full path string starts
//! (`origin`). Labels are always carved out of that contiguous run, which is
//! what lets a merge produce a single contiguous label without copying and
//! lets [`Trie::derive`] read any substring of a stored word in place.

use std::fmt;

use tracing::{debug, trace};

use crate::arena::{Span, TextArena};
use crate::config::TrieConfig;
use crate::error::{Error, Result};
use crate::node::{slot, Node, NodeId, NodeStore};

/// Identifier handed out for every successfully inserted word.
///
/// Ids start at 0, grow by one per insertion and are never reused until the
/// trie is cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WordId(u32);

impl WordId {
    pub const fn new(id: u32) -> Self {
        WordId(id)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for WordId {
    fn from(id: u32) -> Self {
        WordId(id)
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a walk for a word stops.
#[derive(Clone, Copy, Debug)]
enum Landing {
    /// The trie has no root yet.
    Empty,
    /// The word ends exactly at this node.
    Node(NodeId),
    /// The word ends `at` bytes into the label of `child`.
    InsideEdge { child: NodeId, at: usize },
    /// The word leaves the label of `child` after `at` matching bytes, with
    /// `consumed` bytes of the word matched in total.
    Diverge {
        child: NodeId,
        at: usize,
        consumed: usize,
    },
    /// `parent` has no child for the next letter.
    Missing { parent: NodeId, consumed: usize },
}

/// Size and usage counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrieStats {
    /// Live nodes, root included.
    pub nodes: usize,
    /// Node slots allocated, live or free.
    pub node_slots: usize,
    /// Words currently stored.
    pub words: usize,
    /// Bytes written to the text arena.
    pub arena_bytes: usize,
    /// Id the next successful insertion will receive.
    pub next_id: u32,
}

/// Dictionary of distinct lowercase words keyed by [`WordId`].
///
/// ```rust
/// use patricia_dict::Trie;
///
/// let mut trie = Trie::new();
/// let hello = trie.insert("hello").unwrap();
/// let ell = trie.derive(hello, 1, 3).unwrap();
///
/// assert!(trie.find("el"));
/// assert_eq!(trie.word(ell).as_deref(), Some("ell"));
/// assert_eq!(trie.delete(hello).unwrap(), hello);
/// assert!(!trie.find("hello"));
/// ```
#[derive(Debug)]
pub struct Trie {
    arena: TextArena,
    nodes: NodeStore,
    root: NodeId,
    /// `ids[id]` is the node holding word `id`, `None` once deleted.
    ids: Vec<Option<NodeId>>,
    next_id: u32,
    words: usize,
    config: TrieConfig,
}

impl Trie {
    pub fn new() -> Self {
        Self::with_config(TrieConfig::default())
    }

    pub fn with_config(config: TrieConfig) -> Self {
        Self {
            arena: TextArena::default(),
            nodes: NodeStore::default(),
            root: NodeId::NULL,
            ids: Vec::new(),
            next_id: 0,
            words: 0,
            config,
        }
    }

    pub fn config(&self) -> &TrieConfig {
        &self.config
    }

    /// Insert `word` and return its new id.
    ///
    /// Fails with [`Error::Duplicate`] if the word is already stored or empty,
    /// and with [`Error::InvalidWord`] for bytes outside `a..=z` or words over
    /// the configured length limit.
    pub fn insert(&mut self, word: &str) -> Result<WordId> {
        let word = word.as_bytes();
        if word.is_empty() {
            return Err(Error::Duplicate);
        }
        self.check_word(word)?;

        let landing = self.locate(word);
        trace!(len = word.len(), ?landing, "insert");
        self.place(landing, word.len(), |arena| {
            arena.append(word).map(|span| span.start())
        })
    }

    /// Insert the substring `start..=end` of word `id` as a new word.
    ///
    /// The new word shares the arena bytes of its source; nothing is copied.
    pub fn derive(&mut self, id: WordId, start: usize, end: usize) -> Result<WordId> {
        let node = self.word_node(id)?;
        let path = self.nodes[node].path();
        if start > end || end >= path.len() {
            return Err(Error::InvalidRange {
                start,
                end,
                len: path.len(),
            });
        }

        let origin = path.start() + start;
        let span = Span::new(origin, path.start() + end + 1);
        let landing = self.locate(self.arena.get(span));
        trace!(%id, start, end, ?landing, "derive");
        self.place(landing, span.len(), |_| Ok(origin))
    }

    /// Delete word `id` and return it.
    pub fn delete(&mut self, id: WordId) -> Result<WordId> {
        let node = self.word_node(id)?;

        if self.nodes.live() == 2 {
            debug!(%id, "last word deleted, tearing down trie");
            self.teardown();
            return Ok(id);
        }

        self.nodes[node].word = None;
        self.ids[id.index()] = None;
        self.words -= 1;

        let parent = self.nodes[node].parent;
        match self.nodes[node].child_count {
            0 => {
                self.detach(node);
                self.collapse(parent);
            }
            1 => self.merge_down(node),
            _ => {}
        }
        trace!(%id, nodes = self.nodes.live(), "delete");
        Ok(id)
    }

    /// Whether any stored word starts with `pattern`.
    ///
    /// Prefixes that end in the middle of an edge count as present.
    pub fn find(&self, pattern: &str) -> bool {
        let pattern = pattern.as_bytes();
        if !pattern.iter().all(u8::is_ascii_lowercase) {
            return false;
        }
        matches!(
            self.locate(pattern),
            Landing::Node(_) | Landing::InsideEdge { .. }
        )
    }

    /// Drop every word, node and arena byte, and restart ids from 0.
    pub fn clear(&mut self) {
        self.teardown();
        self.ids = Vec::new();
        self.next_id = 0;
    }

    /// Live nodes, root included. Zero for an empty trie.
    pub fn node_count(&self) -> usize {
        self.nodes.live()
    }

    /// Number of words stored.
    pub fn len(&self) -> usize {
        self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    pub fn contains_id(&self, id: WordId) -> bool {
        self.word_node(id).is_ok()
    }

    /// Text of word `id`, read straight from the arena.
    pub fn word(&self, id: WordId) -> Option<String> {
        let node = self.word_node(id).ok()?;
        let bytes = self.arena.get(self.nodes[node].path());
        String::from_utf8(bytes.to_vec()).ok()
    }

    /// Live words in id order.
    pub fn words(&self) -> impl Iterator<Item = (WordId, &[u8])> + '_ {
        self.ids.iter().enumerate().filter_map(move |(i, &node)| {
            node.map(|n| (WordId(i as u32), self.arena.get(self.nodes[n].path())))
        })
    }

    pub fn stats(&self) -> TrieStats {
        TrieStats {
            nodes: self.nodes.live(),
            node_slots: self.nodes.capacity(),
            words: self.words,
            arena_bytes: self.arena.len(),
            next_id: self.next_id,
        }
    }

    fn check_word(&self, word: &[u8]) -> Result<()> {
        if word.len() > self.config.max_word_len {
            return Err(Error::invalid_word(format!(
                "length {} exceeds limit {}",
                word.len(),
                self.config.max_word_len
            )));
        }
        if let Some(&b) = word.iter().find(|b| !b.is_ascii_lowercase()) {
            return Err(Error::invalid_word(format!(
                "byte {:?} outside a..=z",
                b as char
            )));
        }
        Ok(())
    }

    fn word_node(&self, id: WordId) -> Result<NodeId> {
        self.ids
            .get(id.index())
            .copied()
            .flatten()
            .ok_or(Error::UnknownId(id))
    }

    /// Walk `word` from the root without touching anything.
    fn locate(&self, word: &[u8]) -> Landing {
        if self.root.is_null() {
            return Landing::Empty;
        }

        let mut node = self.root;
        let mut consumed = 0;
        loop {
            if consumed == word.len() {
                return Landing::Node(node);
            }
            let child = self.nodes[node].child(word[consumed]);
            if child.is_null() {
                return Landing::Missing {
                    parent: node,
                    consumed,
                };
            }

            let label = self.arena.get(self.nodes[child].label);
            let rest = &word[consumed..];
            let common = label
                .iter()
                .zip(rest)
                .take_while(|(a, b)| a == b)
                .count();

            if common == label.len() {
                consumed += common;
                node = child;
            } else if common == rest.len() {
                return Landing::InsideEdge { child, at: common };
            } else {
                return Landing::Diverge {
                    child,
                    at: common,
                    consumed: consumed + common,
                };
            }
        }
    }

    /// Apply a landing computed by [`Self::locate`].
    ///
    /// `store` places the word's bytes and returns the arena index where the
    /// word starts. It runs before any structural change so that a failed
    /// append leaves the trie untouched.
    fn place<F>(&mut self, landing: Landing, len: usize, store: F) -> Result<WordId>
    where
        F: FnOnce(&mut TextArena) -> Result<usize>,
    {
        match landing {
            Landing::Empty => {
                self.arena.reserve(self.config.arena_capacity.max(len))?;
                let origin = store(&mut self.arena)?;
                let root = self.ensure_root();
                let leaf = self.attach_leaf(root, origin, 0, len);
                Ok(self.bind(leaf))
            }
            Landing::Node(node) => {
                if node == self.root || self.nodes[node].is_word() {
                    return Err(Error::Duplicate);
                }
                Ok(self.bind(node))
            }
            Landing::InsideEdge { child, at } => {
                let mid = self.split(child, at);
                Ok(self.bind(mid))
            }
            Landing::Diverge {
                child,
                at,
                consumed,
            } => {
                let origin = store(&mut self.arena)?;
                let mid = self.split(child, at);
                let leaf = self.attach_leaf(mid, origin, consumed, len);
                Ok(self.bind(leaf))
            }
            Landing::Missing { parent, consumed } => {
                let origin = store(&mut self.arena)?;
                let leaf = self.attach_leaf(parent, origin, consumed, len);
                Ok(self.bind(leaf))
            }
        }
    }

    fn ensure_root(&mut self) -> NodeId {
        if self.root.is_null() {
            self.nodes = NodeStore::with_capacity(self.config.node_capacity);
            self.root = self.nodes.alloc(Node::root());
            debug!("trie root created");
        }
        self.root
    }

    /// Give `node` the next id.
    fn bind(&mut self, node: NodeId) -> WordId {
        let id = WordId(self.next_id);
        self.next_id += 1;
        debug_assert_eq!(self.ids.len(), id.index());
        self.ids.push(Some(node));
        self.nodes[node].word = Some(id);
        self.words += 1;
        id
    }

    /// Hang a leaf for the word at `origin..origin+len` under `parent`, which
    /// already spells its first `consumed` bytes.
    fn attach_leaf(&mut self, parent: NodeId, origin: usize, consumed: usize, len: usize) -> NodeId {
        debug_assert_eq!(self.nodes[parent].depth(), consumed);
        let label = Span::new(origin + consumed, origin + len);
        let letter = self.arena.byte(label.start());
        let leaf = self.nodes.alloc(Node::new(label, origin, parent));

        let p = &mut self.nodes[parent];
        debug_assert!(p.child(letter).is_null());
        p.children[slot(letter)] = leaf;
        p.child_count += 1;
        leaf
    }

    /// Cut the edge into `child` after `at` label bytes and return the new
    /// node sitting at the cut.
    fn split(&mut self, child: NodeId, at: usize) -> NodeId {
        let (parent, label, origin) = {
            let c = &self.nodes[child];
            (c.parent, c.label, c.origin())
        };
        debug_assert!(at > 0 && at < label.len());
        let (head, tail) = label.split_at(at);

        let mut mid = Node::new(head, origin, parent);
        mid.children[slot(self.arena.byte(tail.start()))] = child;
        mid.child_count = 1;
        let mid = self.nodes.alloc(mid);

        self.nodes[parent].children[slot(self.arena.byte(head.start()))] = mid;
        let c = &mut self.nodes[child];
        c.label = tail;
        c.parent = mid;

        debug!(head = head.len(), tail = tail.len(), "edge split");
        mid
    }

    /// Unlink a childless node from its parent and free it.
    fn detach(&mut self, node: NodeId) {
        let (parent, letter) = {
            let n = &self.nodes[node];
            (n.parent, self.arena.byte(n.label.start()))
        };
        let p = &mut self.nodes[parent];
        p.children[slot(letter)] = NodeId::NULL;
        p.child_count -= 1;
        self.nodes.release(node);
    }

    /// Merge `parent` into its only child if it no longer earns its place.
    fn collapse(&mut self, parent: NodeId) {
        if parent == self.root {
            return;
        }
        let p = &self.nodes[parent];
        if p.is_word() || p.child_count != 1 {
            debug_assert!(p.is_word() || p.child_count >= 2);
            return;
        }
        self.merge_down(parent);
    }

    /// Remove a word-less node with one child, extending the child's label up
    /// to the grandparent.
    ///
    /// The merged label is read from the child's own origin run, so it is
    /// always contiguous even when the two labels came from different words.
    fn merge_down(&mut self, node: NodeId) {
        let (parent, child, letter) = {
            let n = &self.nodes[node];
            debug_assert!(!n.is_word());
            (n.parent, n.sole_child(), self.arena.byte(n.label.start()))
        };
        let parent_depth = self.nodes[parent].depth();

        let c = &mut self.nodes[child];
        c.label = Span::new(c.origin() + parent_depth, c.label.end());
        c.parent = parent;
        let merged = c.label.len();

        self.nodes[parent].children[slot(letter)] = child;
        self.nodes.release(node);
        debug!(merged, "node merged into child");
    }

    /// Release everything except the id counter.
    ///
    /// The trie is empty afterwards, but the next insert is not fully like one
    /// on a fresh trie: it takes the next unused id rather than 0, so ids stay
    /// unique until an explicit [`Trie::clear`].
    fn teardown(&mut self) {
        self.nodes.clear();
        self.arena.clear();
        self.root = NodeId::NULL;
        self.words = 0;
        self.ids.iter_mut().for_each(|entry| *entry = None);
    }

    /// Walk the whole trie and report every broken structural invariant.
    pub fn verify_integrity(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.root.is_null() {
            if self.nodes.live() != 0 {
                issues.push(format!("no root but {} live nodes", self.nodes.live()));
            }
            if self.words != 0 {
                issues.push(format!("no root but {} words", self.words));
            }
            return issues;
        }

        let root = &self.nodes[self.root];
        if root.is_word() {
            issues.push("root holds a word".to_string());
        }
        if !root.parent.is_null() {
            issues.push("root has a parent".to_string());
        }

        let mut reachable = 0usize;
        let mut word_nodes = 0usize;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            reachable += 1;
            let node = &self.nodes[id];
            let path = self.arena.get(node.path());

            if let Some(word) = node.word {
                word_nodes += 1;
                if self.ids.get(word.index()).copied().flatten() != Some(id) {
                    issues.push(format!("word {word} not mapped back to its node"));
                }
            } else if id != self.root && node.child_count < 2 {
                issues.push(format!(
                    "pass-through node {:?} has {} children",
                    String::from_utf8_lossy(path),
                    node.child_count
                ));
            }

            let mut count = 0u8;
            for (letter, &child) in (b'a'..=b'z').zip(node.children.iter()) {
                if child.is_null() {
                    continue;
                }
                count += 1;
                let c = &self.nodes[child];
                if c.parent != id {
                    issues.push(format!("child {child:?} does not point back to {id:?}"));
                }
                if c.label.is_empty() {
                    issues.push(format!("child {child:?} has an empty label"));
                    continue;
                }
                if self.arena.byte(c.label.start()) != letter {
                    issues.push(format!(
                        "child {child:?} in slot {:?} starts with {:?}",
                        letter as char,
                        self.arena.byte(c.label.start()) as char
                    ));
                }
                if c.label.start() != c.origin() + node.depth() {
                    issues.push(format!("child {child:?} label not anchored at its origin"));
                }
                if !self.arena.get(c.path()).starts_with(path) {
                    issues.push(format!("child {child:?} path does not extend its parent"));
                }
                stack.push(child);
            }
            if count != node.child_count {
                issues.push(format!(
                    "node {id:?} counts {} children but has {count}",
                    node.child_count
                ));
            }
        }

        if reachable != self.nodes.live() {
            issues.push(format!(
                "{reachable} reachable nodes but {} live",
                self.nodes.live()
            ));
        }
        if word_nodes != self.words {
            issues.push(format!("{word_nodes} word nodes but {} words", self.words));
        }
        issues
    }
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}
