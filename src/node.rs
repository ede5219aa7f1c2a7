//! Trie vertices and the slab that owns them.
//!
//! Nodes are addressed by 32-bit [`NodeId`] indices instead of pointers, so
//! the parent back-reference is a plain index and there is no ownership
//! cycle. Freed slots are recycled through a free list.

use crate::arena::Span;
use crate::WordId;

/// Number of letters in the alphabet (`a..=z`).
pub const ALPHABET_SIZE: usize = 26;

/// Child slot for a letter.
#[inline]
pub fn slot(letter: u8) -> usize {
    debug_assert!(letter.is_ascii_lowercase());
    (letter - b'a') as usize
}

/// A 32-bit reference to a node in the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub const NULL: NodeId = NodeId(u32::MAX);

    #[inline]
    pub fn is_null(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    fn new(idx: usize) -> Self {
        debug_assert!(idx < u32::MAX as usize);
        NodeId(idx as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One vertex of the compressed trie.
#[derive(Clone, Debug)]
pub struct Node {
    /// Edge text from the parent to this node. Empty for the root.
    pub label: Span,
    /// Arena index where the full path string ending here begins:
    /// `arena[origin..label.end()]` spells every label from the root down.
    pub origin: u32,
    /// Word stored at this node, if any.
    pub word: Option<WordId>,
    pub parent: NodeId,
    pub children: [NodeId; ALPHABET_SIZE],
    pub child_count: u8,
}

impl Node {
    pub fn root() -> Self {
        Self::new(Span::EMPTY, 0, NodeId::NULL)
    }

    pub fn new(label: Span, origin: usize, parent: NodeId) -> Self {
        debug_assert!(origin <= label.start());
        Self {
            label,
            origin: origin as u32,
            word: None,
            parent,
            children: [NodeId::NULL; ALPHABET_SIZE],
            child_count: 0,
        }
    }

    #[inline]
    pub fn origin(&self) -> usize {
        self.origin as usize
    }

    /// Length of the path string ending at this node.
    #[inline]
    pub fn depth(&self) -> usize {
        self.label.end() - self.origin()
    }

    /// Full path string ending at this node.
    #[inline]
    pub fn path(&self) -> Span {
        Span::new(self.origin(), self.label.end())
    }

    #[inline]
    pub fn child(&self, letter: u8) -> NodeId {
        self.children[slot(letter)]
    }

    /// The only child of a node with `child_count == 1`.
    pub fn sole_child(&self) -> NodeId {
        debug_assert_eq!(self.child_count, 1);
        self.children
            .iter()
            .copied()
            .find(|c| !c.is_null())
            .unwrap_or(NodeId::NULL)
    }

    pub fn is_word(&self) -> bool {
        self.word.is_some()
    }
}

/// Slab of nodes with slot reuse.
#[derive(Debug, Default)]
pub struct NodeStore {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    live: usize,
}

impl NodeStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Store a node and return its id.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        self.live += 1;
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = node;
                id
            }
            None => {
                let id = NodeId::new(self.nodes.len());
                self.nodes.push(node);
                id
            }
        }
    }

    /// Return a slot to the free list. The node must already be unlinked.
    pub fn release(&mut self, id: NodeId) {
        debug_assert!(self.live > 0);
        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NULL;
        node.word = None;
        node.child_count = 0;
        node.children = [NodeId::NULL; ALPHABET_SIZE];
        self.free.push(id);
        self.live -= 1;
    }

    /// Number of live nodes.
    pub fn live(&self) -> usize {
        self.live
    }

    /// Slots ever allocated, live or free.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    pub fn clear(&mut self) {
        self.nodes = Vec::new();
        self.free = Vec::new();
        self.live = 0;
    }
}

impl std::ops::Index<NodeId> for NodeStore {
    type Output = Node;

    #[inline]
    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl std::ops::IndexMut<NodeId> for NodeStore {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
}
