//! CLI command implementations

use anyhow::{bail, Context, Result};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::alphabet::{CipherKey, SymbolGroup};
use crate::encode::{Encoder, Puzzle};
use crate::morse::MorseCode;
use crate::solver::{Seed, SolveReport, SolveStatus, Solver};
use crate::variant::Variant;

use super::args::Commands;

/// Execute a CLI command
pub fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Encode {
            text,
            variant,
            seed,
            table_key,
            width,
        } => cmd_encode(&text, variant, seed, table_key, width),
        Commands::Solve {
            text,
            variant,
            hints,
            crib,
            seed,
            table_key,
            width,
            cap,
            json,
        } => cmd_solve(
            &text,
            variant,
            hints.as_deref(),
            crib.as_deref(),
            seed,
            table_key,
            width,
            cap,
            json,
        ),
        Commands::Table {
            variant,
            seed,
            table_key,
        } => cmd_table(variant, seed, table_key),
    }
}

/// Build a key for a variant, shuffled by the seed unless table order
/// was asked for.
fn build_key(variant: Variant, seed: u64, table_key: bool) -> Result<CipherKey> {
    let alphabet = variant.symbol_alphabet();
    let chars = variant.cipher_chars();
    let mut rng = StdRng::seed_from_u64(seed);
    let key = if variant.bijective_key() {
        if table_key {
            CipherKey::in_table_order(alphabet, chars)
        } else {
            CipherKey::random(alphabet, chars, &mut rng)
        }
    } else if table_key {
        // Classes round-robin over the digits: deterministic and total.
        let pairs: Vec<(char, SymbolGroup)> = chars
            .chars()
            .enumerate()
            .map(|(i, c)| (c, alphabet.group((i % alphabet.len()) as u8).clone()))
            .collect();
        CipherKey::new(alphabet, &pairs, false)
    } else {
        CipherKey::random_classes(alphabet, chars, &mut rng)
    };
    key.with_context(|| format!("building a {} key", variant))
}

fn print_lines(puzzle_lines: &[crate::encode::EncodedLine], width: usize) {
    for line in puzzle_lines {
        let spaced: String = line
            .cipher
            .chars()
            .flat_map(|c| {
                std::iter::once(c).chain(std::iter::repeat(' ').take(width - 1))
            })
            .collect();
        println!("  {}", spaced.bold());
        println!("  {}", line.morse.dimmed());
        println!("  {}", line.plain.green());
        println!();
    }
}

fn cmd_encode(
    text: &str,
    variant: Variant,
    seed: u64,
    table_key: bool,
    width: usize,
) -> Result<()> {
    let codec = MorseCode::new();
    let key = build_key(variant, seed, table_key)?;
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    let puzzle = Encoder::new(&key, &codec)
        .with_line_width(width)
        .encode(text, &mut rng)
        .context("encoding the message")?;
    if puzzle.cipher.is_empty() {
        bail!("nothing to encode: the message has no letters or digits");
    }

    println!("{} ({})", "Encoded puzzle".bold(), variant);
    println!();
    print_lines(&puzzle.lines, puzzle.width);
    println!("{} {}", "Ciphertext:".bold(), puzzle.cipher_text());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_solve(
    text: &str,
    variant: Variant,
    hints: Option<&str>,
    crib: Option<&str>,
    seed: u64,
    table_key: bool,
    width: usize,
    cap: usize,
    json: bool,
) -> Result<()> {
    let codec = MorseCode::new();
    let key = build_key(variant, seed, table_key)?;
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    let puzzle = Encoder::new(&key, &codec)
        .with_line_width(width)
        .encode(text, &mut rng)
        .context("encoding the message")?;
    if puzzle.cipher.is_empty() {
        bail!("nothing to solve: the message has no letters or digits");
    }

    let seed_mode = match (hints, crib) {
        (Some(h), None) => Seed::Hints(h),
        (None, Some(c)) => Seed::Crib(c),
        (None, None) => bail!("pass --hints or --crib to seed the solve"),
        (Some(_), Some(_)) => unreachable!("clap rejects both"),
    };

    let solver = Solver::new(variant, &key, &codec, &puzzle).with_iteration_cap(cap);
    let report = solver.solve(seed_mode);

    if json {
        #[cfg(feature = "serialization")]
        {
            println!("{}", crate::serialization::report_to_json(&report)?);
            return Ok(());
        }
        #[cfg(not(feature = "serialization"))]
        bail!("this build has no serialization support; rebuild with --features serialization");
    }

    print_report(&puzzle, &report, variant);
    Ok(())
}

fn print_report(puzzle: &Puzzle, report: &SolveReport, variant: Variant) {
    println!("{} ({})", "Puzzle".bold(), variant);
    println!();
    println!("  {}", puzzle.cipher_text().bold());
    println!();
    println!("{}", "Steps".bold());
    for (i, step) in report.trace.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, step);
    }
    println!();
    print_lines(&report.lines, puzzle.width);

    match report.status {
        SolveStatus::Resolved => {
            let plaintext = report.plaintext.as_deref().unwrap_or("");
            println!("{} {}", "Solved:".green().bold(), plaintext);
        }
        SolveStatus::Stalled => {
            println!("{}", "Stalled: the rules ran dry.".yellow().bold());
        }
        SolveStatus::Failed => {
            println!("{}", "Failed: see the steps above.".red().bold());
        }
    }
}

fn cmd_table(variant: Variant, seed: u64, table_key: bool) -> Result<()> {
    let key = build_key(variant, seed, table_key)?;
    println!("{} ({})", "Key table".bold(), variant);
    for &ch in key.cipher_chars() {
        let group = key
            .group_of(ch)
            .map(|g| key.alphabet().group(g).to_string())
            .unwrap_or_default();
        println!("  {}  {}", ch.to_string().bold(), group);
    }
    Ok(())
}
