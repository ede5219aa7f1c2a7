//! Append-only text arena.
//!
//! Every word that needs new bytes is copied here exactly once. Edge labels
//! and whole words are then [`Span`]s into the same buffer, so splitting or
//! merging an edge only re-partitions index ranges and never copies text.
//!
//! Bytes are never modified or removed; the whole arena is released at once
//! by [`TextArena::clear`].

use crate::error::{Error, Result};

/// A half-open `start..end` range of arena bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Span {
    start: u32,
    end: u32,
}

impl Span {
    /// The empty span at offset 0, used for the root label.
    pub const EMPTY: Span = Span { start: 0, end: 0 };

    /// Create a span over `start..end`.
    ///
    /// # Panics
    /// Panics if `end < start` or either bound does not fit in 32 bits.
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "span start {start} past end {end}");
        assert!(end <= u32::MAX as usize, "arena offset too large");
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    #[inline]
    pub fn start(self) -> usize {
        self.start as usize
    }

    #[inline]
    pub fn end(self) -> usize {
        self.end as usize
    }

    #[inline]
    pub fn len(self) -> usize {
        (self.end - self.start) as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Split into `start..start+at` and `start+at..end`.
    #[inline]
    pub fn split_at(self, at: usize) -> (Span, Span) {
        debug_assert!(at <= self.len());
        let mid = self.start() + at;
        (Span::new(self.start(), mid), Span::new(mid, self.end()))
    }

    /// Sub-span `start+from..end`.
    #[inline]
    pub fn skip(self, from: usize) -> Span {
        self.split_at(from).1
    }
}

/// Growable byte buffer backing every label in the trie.
#[derive(Debug, Default)]
pub struct TextArena {
    data: Vec<u8>,
}

impl TextArena {
    /// Create an empty arena able to hold `capacity` bytes before growing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Copy `bytes` to the end of the arena and return their span.
    ///
    /// Growth is fallible: a failed reservation leaves the arena untouched and
    /// is reported as [`Error::OutOfMemory`].
    pub fn append(&mut self, bytes: &[u8]) -> Result<Span> {
        if self.data.len() + bytes.len() > u32::MAX as usize {
            return Err(Error::OutOfMemory(bytes.len()));
        }
        self.reserve(bytes.len())?;
        let start = self.data.len();
        self.data.extend_from_slice(bytes);
        Ok(Span::new(start, self.data.len()))
    }

    /// Make room for at least `additional` more bytes.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.data
            .try_reserve(additional)
            .map_err(|_| Error::OutOfMemory(additional))
    }

    /// Bytes covered by `span`.
    #[inline]
    pub fn get(&self, span: Span) -> &[u8] {
        &self.data[span.start()..span.end()]
    }

    #[inline]
    pub fn byte(&self, at: usize) -> u8 {
        self.data[at]
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Release every byte. All previously returned spans become invalid.
    pub fn clear(&mut self) {
        self.data = Vec::new();
    }
}
