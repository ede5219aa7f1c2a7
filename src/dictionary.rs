//! Interactive dictionary session.
//!
//! Feeds parsed [`Command`]s to a [`Trie`] and reports each outcome on one
//! line:
//!
//! | Command | Success | Failure |
//! |---|---|---|
//! | `insert`, `prev` | `word number: <id>` | `ignored` |
//! | `delete` | `deleted: <id>` | `ignored` |
//! | `find` | `YES` | `NO` |
//! | `clear` | `cleared` | |
//!
//! Malformed lines print `ignored`. In verbose mode the live node count is
//! written to the diagnostic stream as `nodes: <n>` after every command
//! except `find` and ignored ones.

use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

use crate::command::Command;
use crate::error::Result;
use crate::trie::{Trie, WordId};

/// A trie bound to an output stream and a diagnostic stream.
pub struct Dictionary<O, D> {
    trie: Trie,
    out: O,
    diag: D,
    verbose: bool,
}

impl<O: Write, D: Write> Dictionary<O, D> {
    pub fn new(trie: Trie, out: O, diag: D) -> Self {
        Self {
            trie,
            out,
            diag,
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    /// Execute one command and print its outcome.
    pub fn execute(&mut self, command: Command) -> Result<()> {
        let report_nodes = match command {
            Command::Insert(word) => {
                let result = self.trie.insert(&word);
                self.report_id("word number", result)?
            }
            Command::Prev { id, start, end } => {
                let result = self.trie.derive(id, start, end);
                self.report_id("word number", result)?
            }
            Command::Delete(id) => {
                let result = self.trie.delete(id);
                self.report_id("deleted", result)?
            }
            Command::Find(pattern) => {
                let answer = if self.trie.find(&pattern) { "YES" } else { "NO" };
                writeln!(self.out, "{answer}")?;
                false
            }
            Command::Clear => {
                self.trie.clear();
                writeln!(self.out, "cleared")?;
                true
            }
            Command::Ignore => {
                writeln!(self.out, "ignored")?;
                false
            }
        };

        if self.verbose && report_nodes {
            writeln!(self.diag, "nodes: {}", self.trie.node_count())?;
        }
        Ok(())
    }

    /// Parse and execute every line of `input`, then clear the trie.
    ///
    /// Lines are split on `\n` only and handed over as raw bytes, so a `\r`
    /// or invalid UTF-8 makes just that line `ignored`. A final line without
    /// a newline is still executed.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        let mut commands = 0usize;
        for line in input.split(b'\n') {
            let line = line?;
            self.execute(Command::parse(&line))?;
            commands += 1;
        }
        self.trie.clear();
        self.out.flush()?;
        self.diag.flush()?;
        info!(commands, "end of input");
        Ok(())
    }

    /// Print a successful id, or `ignored` for a rejected operation.
    /// Returns whether the node count should be reported.
    fn report_id(&mut self, prefix: &str, result: Result<WordId>) -> Result<bool> {
        match result {
            Ok(id) => {
                writeln!(self.out, "{prefix}: {id}")?;
                Ok(true)
            }
            Err(e) if e.is_rejection() => {
                debug!(error = %e, "operation rejected");
                writeln!(self.out, "ignored")?;
                Ok(false)
            }
            Err(e) => {
                warn!(error = %e, "operation failed");
                Err(e)
            }
        }
    }

    pub fn into_inner(self) -> (Trie, O, D) {
        (self.trie, self.out, self.diag)
    }
}

impl<O, D> std::fmt::Debug for Dictionary<O, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dictionary")
            .field("trie", &self.trie.stats())
            .field("verbose", &self.verbose)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: impl AsRef<[u8]>, verbose: bool) -> (String, String) {
        let mut dict = Dictionary::new(Trie::new(), Vec::new(), Vec::new()).verbose(verbose);
        dict.run(input.as_ref()).unwrap();
        let (trie, out, diag) = dict.into_inner();
        assert_eq!(trie.node_count(), 0);
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(diag).unwrap(),
        )
    }

    #[test]
    fn test_session_outcomes() {
        let input = "\
insert hello
insert hello
prev 0 1 3
prev 0 3 1
find ell
find elk
delete 1
delete 1
bogus
clear
insert again
";
        let (out, diag) = run(input, false);
        assert_eq!(
            out,
            "\
word number: 0
ignored
word number: 1
ignored
YES
NO
deleted: 1
ignored
ignored
cleared
word number: 0
"
        );
        assert!(diag.is_empty());
    }

    #[test]
    fn test_verbose_node_counts() {
        let input = "insert cat\ninsert car\nfind ca\ninsert cat\ndelete 0\nclear\n";
        let (out, diag) = run(input, true);
        assert_eq!(out, "word number: 0\nword number: 1\nYES\nignored\ndeleted: 0\ncleared\n");
        assert_eq!(diag, "nodes: 2\nnodes: 4\nnodes: 2\nnodes: 0\n");
    }

    #[test]
    fn test_last_line_without_newline() {
        let (out, _) = run("insert a\nfind a", false);
        assert_eq!(out, "word number: 0\nYES\n");
    }

    #[test]
    fn test_carriage_return_is_ignored() {
        let (out, _) = run("insert abc\r\nfind abc\r\ninsert abc\nfind abc \r\n", false);
        assert_eq!(out, "ignored\nignored\nword number: 0\nignored\n");
    }

    #[test]
    fn test_invalid_utf8_line_is_ignored() {
        let (out, _) = run(&b"insert abc\ninsert \xff\xfe\ninsert abd\nfind abd\n"[..], false);
        assert_eq!(out, "word number: 0\nignored\nword number: 1\nYES\n");
    }
}
