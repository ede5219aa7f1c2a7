//! Line-oriented command reader.
//!
//! Grammar, one command per line (only ASCII space separates tokens):
//!
//! ```text
//! insert <word>
//! prev <n> <n> <n>
//! delete <n>
//! find <word>
//! clear
//! ```
//!
//! `<word>` is one or more of `a..=z`. `<n>` is at most six decimal digits
//! with no leading zero unless the number is `0`. Leading and trailing spaces
//! are allowed; anything else makes the line [`Command::Ignore`].

use crate::WordId;

/// Most digits accepted in a numeric argument.
pub const MAX_NUMBER_DIGITS: usize = 6;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insert(String),
    Prev {
        id: WordId,
        start: usize,
        end: usize,
    },
    Delete(WordId),
    Find(String),
    Clear,
    /// Malformed or unknown line.
    Ignore,
}

impl Command {
    /// Parse a line with its `\n` already stripped. Any byte outside the
    /// grammar, including `\r` and non-ASCII, makes the line `Ignore`.
    pub fn parse(line: impl AsRef<[u8]>) -> Command {
        Self::try_parse(line.as_ref()).unwrap_or(Command::Ignore)
    }

    fn try_parse(line: &[u8]) -> Option<Command> {
        let mut cur = Cursor::new(line);
        cur.skip_spaces();

        let command = match cur.peek()? {
            b'i' => {
                cur.keyword("insert")?;
                cur.gap()?;
                Command::Insert(cur.word()?)
            }
            b'p' => {
                cur.keyword("prev")?;
                cur.gap()?;
                let id = cur.number()?;
                cur.gap()?;
                let start = cur.number()?;
                cur.gap()?;
                let end = cur.number()?;
                Command::Prev {
                    id: WordId::new(id),
                    start: start as usize,
                    end: end as usize,
                }
            }
            b'd' => {
                cur.keyword("delete")?;
                cur.gap()?;
                Command::Delete(WordId::new(cur.number()?))
            }
            b'f' => {
                cur.keyword("find")?;
                cur.gap()?;
                Command::Find(cur.word()?)
            }
            b'c' => {
                cur.keyword("clear")?;
                Command::Clear
            }
            _ => return None,
        };

        cur.finish()?;
        Some(command)
    }
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_spaces(&mut self) -> usize {
        let start = self.pos;
        while self.peek() == Some(b' ') {
            self.pos += 1;
        }
        self.pos - start
    }

    fn take_while(&mut self, f: impl Fn(u8) -> bool) -> &'a [u8] {
        let start = self.pos;
        while self.peek().is_some_and(&f) {
            self.pos += 1;
        }
        &self.bytes[start..self.pos]
    }

    fn keyword(&mut self, keyword: &str) -> Option<()> {
        let rest = &self.bytes[self.pos..];
        if !rest.starts_with(keyword.as_bytes()) {
            return None;
        }
        self.pos += keyword.len();
        Some(())
    }

    /// One or more spaces.
    fn gap(&mut self) -> Option<()> {
        (self.skip_spaces() > 0).then_some(())
    }

    fn word(&mut self) -> Option<String> {
        let word = self.take_while(|b| b.is_ascii_lowercase());
        if word.is_empty() {
            return None;
        }
        std::str::from_utf8(word).ok().map(str::to_owned)
    }

    fn number(&mut self) -> Option<u32> {
        let digits = self.take_while(|b| b.is_ascii_digit());
        if digits.is_empty() || digits.len() > MAX_NUMBER_DIGITS {
            return None;
        }
        if digits.len() > 1 && digits[0] == b'0' {
            return None;
        }
        Some(
            digits
                .iter()
                .fold(0u32, |n, d| n * 10 + u32::from(d - b'0')),
        )
    }

    /// Trailing spaces, then end of line.
    fn finish(&mut self) -> Option<()> {
        self.skip_spaces();
        (self.pos == self.bytes.len()).then_some(())
    }
}
