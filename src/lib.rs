//! # patricia-dict
//!
//! A dictionary of distinct lowercase words stored in a compressed
//! (radix/Patricia) trie. Each word receives a stable [`WordId`] when it is
//! inserted; words can be deleted by id, tested by prefix, and new words can
//! be derived from a substring of a stored one.
//!
//! Edge labels are ranges into one append-only text arena shared by the whole
//! trie, so splitting and merging edges never copies text, and a derived word
//! reuses the bytes of the word it was cut from.
//!
//! ## Example
//!
//! ```rust
//! use patricia_dict::Trie;
//!
//! let mut trie = Trie::new();
//! let cat = trie.insert("cat").unwrap();
//! trie.insert("car").unwrap();
//!
//! assert!(trie.find("ca"));
//! trie.delete(cat).unwrap();
//! assert!(!trie.find("cat"));
//! assert!(trie.find("car"));
//! ```

#![deny(unsafe_code)]

pub mod arena;
pub mod command;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod node;
pub mod trie;

pub use command::Command;
pub use config::TrieConfig;
pub use dictionary::Dictionary;
pub use error::{Error, Result};
pub use trie::{Trie, TrieStats, WordId};

#[cfg(test)]
mod proptests;
