//! Tunables for a [`Trie`](crate::Trie).

/// Longest word accepted by default, matching the input line limit of the
/// command reader.
pub const DEFAULT_MAX_WORD_LEN: usize = 100_000;

/// Configuration for a trie.
#[derive(Debug, Clone)]
pub struct TrieConfig {
    /// Words longer than this are rejected as invalid.
    pub max_word_len: usize,
    /// Initial capacity of the text arena, in bytes.
    pub arena_capacity: usize,
    /// Initial capacity of the node store, in nodes.
    pub node_capacity: usize,
}

impl Default for TrieConfig {
    fn default() -> Self {
        Self {
            max_word_len: DEFAULT_MAX_WORD_LEN,
            arena_capacity: 4096,
            node_capacity: 256,
        }
    }
}

impl TrieConfig {
    /// Override the word length limit.
    pub fn with_max_word_len(mut self, max_word_len: usize) -> Self {
        self.max_word_len = max_word_len;
        self
    }
}
