//! Command-line dictionary.
//!
//! Reads commands from stdin, one per line, and prints each outcome to
//! stdout. With `-v` the live node count goes to stderr after every command
//! that can change it.
//!
//! ```bash
//! printf 'insert hello\nprev 0 1 3\nfind ell\n' | patricia-dict -v
//! ```

use std::io::{self, BufWriter};
use std::process::ExitCode;

use clap::Parser;
use patricia_dict::config::DEFAULT_MAX_WORD_LEN;
use patricia_dict::{Dictionary, Trie, TrieConfig};
use tracing::error;

/// Word dictionary on a compressed trie
#[derive(Parser, Debug)]
#[command(name = "patricia-dict")]
#[command(about = "Insert, derive, delete and prefix-search lowercase words")]
struct Args {
    /// Print the node count to stderr after each command
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Longest word accepted
    #[arg(long, default_value_t = DEFAULT_MAX_WORD_LEN)]
    max_word_len: usize,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = TrieConfig::default().with_max_word_len(args.max_word_len);

    let mut dict = Dictionary::new(
        Trie::with_config(config),
        BufWriter::new(io::stdout().lock()),
        io::stderr(),
    )
    .verbose(args.verbose);

    match dict.run(io::stdin().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "session aborted");
            ExitCode::FAILURE
        }
    }
}
