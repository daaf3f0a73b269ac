//! CLI argument definitions

use crate::variant::Variant;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fracmorse")]
#[command(about = "Morse-fraction ciphers: encode puzzles and watch them solved")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encode a message into a puzzle
    Encode {
        /// The message to encode
        text: String,

        /// Cipher variant
        #[arg(short, long, default_value = "morbit")]
        variant: Variant,

        /// Seed for key generation and class choices
        #[arg(short, long, default_value = "1")]
        seed: u64,

        /// Assign ciphertext characters to groups in table order instead
        /// of shuffling them
        #[arg(long)]
        table_key: bool,

        /// Display width in ciphertext characters per line
        #[arg(short = 'w', long, default_value = "30")]
        width: usize,
    },

    /// Encode a message, then solve it from hints or a crib, step by step
    Solve {
        /// The message behind the puzzle
        text: String,

        /// Cipher variant
        #[arg(short, long, default_value = "morbit")]
        variant: Variant,

        /// Hint characters whose mapping is given outright
        #[arg(long, conflicts_with = "crib")]
        hints: Option<String>,

        /// Known plaintext fragment to locate and seed from
        #[arg(long, conflicts_with = "hints")]
        crib: Option<String>,

        /// Seed for key generation and class choices
        #[arg(short, long, default_value = "1")]
        seed: u64,

        /// Assign ciphertext characters to groups in table order instead
        /// of shuffling them
        #[arg(long)]
        table_key: bool,

        /// Display width in ciphertext characters per line
        #[arg(short = 'w', long, default_value = "30")]
        width: usize,

        /// Bound on solve iterations
        #[arg(long, default_value = "20")]
        cap: usize,

        /// Emit the solve report as JSON instead of text (needs the
        /// serialization feature)
        #[arg(long)]
        json: bool,
    },

    /// Print the symbol-group table of a variant
    Table {
        /// Cipher variant
        #[arg(short, long, default_value = "morbit")]
        variant: Variant,

        /// Seed for key generation
        #[arg(short, long, default_value = "1")]
        seed: u64,

        /// Assign ciphertext characters to groups in table order instead
        /// of shuffling them
        #[arg(long)]
        table_key: bool,
    },
}
