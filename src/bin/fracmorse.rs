//! CLI tool for the fracmorse cipher family.
//!
//! Encodes messages into Morbit, Pollux or Fractionated Morse puzzles
//! and replays the solver's deductions step by step.

use anyhow::Result;
use clap::Parser;
use fracmorse::cli::{execute, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    execute(cli.command)
}
