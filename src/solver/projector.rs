//! Mapping projector: re-derives the display rows from the model.
//!
//! The projection is recomputed in full after every model mutation;
//! puzzle sizes are small enough that an incremental path would buy
//! nothing but complexity.

use crate::alphabet::SymbolAlphabet;
use crate::encode::{assemble_lines, EncodedLine, Puzzle};
use crate::morse::{MorseCode, MorseSymbol};
use crate::solver::model::MappingModel;

/// One projected symbol column.
///
/// `Unknown` is the consolidated placeholder for a column the surviving
/// candidates disagree on. Candidates only agree through the fixed merge
/// table: matching dots and matching dashes survive, everything else —
/// including matching separators from an unresolved character — merges
/// to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// The column is pinned to one symbol.
    Known(MorseSymbol),
    /// The column cannot be named yet; rendered `?`.
    Unknown,
}

impl Cell {
    /// Display character for this column.
    pub fn as_char(&self) -> char {
        match self {
            Cell::Known(s) => s.as_char(),
            Cell::Unknown => '?',
        }
    }

    /// Whether this column is a known separator.
    #[inline(always)]
    pub fn is_known_sep(&self) -> bool {
        matches!(self, Cell::Known(s) if s.is_sep())
    }

    /// Whether this column is a known dot or dash.
    #[inline(always)]
    pub fn is_known_mark(&self) -> bool {
        matches!(self, Cell::Known(s) if !s.is_sep())
    }
}

/// The projected view of a puzzle under the current model.
#[derive(Debug, Clone)]
pub struct Projection {
    /// Group width, copied from the puzzle.
    pub width: usize,
    /// One entry per symbol column of the ciphertext stream.
    pub cells: Vec<Cell>,
    /// Display chunking of the projected rows.
    pub lines: Vec<EncodedLine>,
    /// The decodable text so far: letters, spaces at word breaks, `?`
    /// for every span that cannot be named yet.
    pub plaintext: String,
}

/// Project the puzzle through the model's possibility sets.
pub fn project(
    puzzle: &Puzzle,
    model: &MappingModel,
    alphabet: &SymbolAlphabet,
    codec: &MorseCode,
) -> Projection {
    let width = puzzle.width;
    let mut cells: Vec<Cell> = Vec::with_capacity(puzzle.cipher.len() * width);
    for &ch in &puzzle.cipher {
        let cands = model.candidates(ch);
        if let [g] = cands {
            cells.extend(
                alphabet
                    .group(*g)
                    .symbols()
                    .iter()
                    .map(|&s| Cell::Known(s)),
            );
        } else {
            for pos in 0..width {
                cells.push(merge_column(cands, pos, alphabet));
            }
        }
    }

    let (plain_row, plaintext) = decode_cells(&cells, codec);
    let morse_row: Vec<char> = cells.iter().map(Cell::as_char).collect();
    let lines = assemble_lines(
        &puzzle.cipher,
        &morse_row,
        &plain_row,
        width,
        puzzle.max_line_width,
        &puzzle.word_breaks,
    );

    Projection {
        width,
        cells,
        lines,
        plaintext,
    }
}

/// Merge one symbol column across every surviving candidate.
fn merge_column(
    candidates: &[crate::alphabet::GroupId],
    pos: usize,
    alphabet: &SymbolAlphabet,
) -> Cell {
    let mut merged: Option<MorseSymbol> = None;
    for &g in candidates {
        let s = alphabet.group(g).symbols()[pos];
        if s.is_sep() {
            return Cell::Unknown;
        }
        match merged {
            None => merged = Some(s),
            Some(prev) if prev == s => {}
            Some(_) => return Cell::Unknown,
        }
    }
    match merged {
        Some(s) => Cell::Known(s),
        None => Cell::Unknown,
    }
}

/// Segment a projected stream on its known separators and decode it.
///
/// Returns the aligned plaintext row (letters at the first column of
/// their code, `/` at word breaks, `?` over undecodable spans) and the
/// running plaintext.
pub(crate) fn decode_cells(cells: &[Cell], codec: &MorseCode) -> (Vec<char>, String) {
    let mut plain_row = vec![' '; cells.len()];
    let mut plaintext = String::new();

    let mut i = 0usize;
    let mut sep_run = 0usize;
    while i < cells.len() {
        if cells[i].is_known_sep() {
            sep_run += 1;
            if sep_run == 2 {
                plain_row[i - 1] = '/';
                plaintext.push(' ');
            }
            i += 1;
            continue;
        }
        sep_run = 0;

        // A maximal segment free of known separators.
        let start = i;
        while i < cells.len() && !cells[i].is_known_sep() {
            i += 1;
        }
        let segment = &cells[start..i];
        let decoded = if segment.iter().all(Cell::is_known_mark) {
            let symbols: Vec<MorseSymbol> = segment
                .iter()
                .map(|c| match c {
                    Cell::Known(s) => *s,
                    Cell::Unknown => unreachable!(),
                })
                .collect();
            codec.from_morse(&symbols)
        } else {
            None
        };
        match decoded {
            Some(ch) => {
                plain_row[start] = ch;
                plaintext.push(ch);
            }
            None => {
                for slot in plain_row.iter_mut().take(i).skip(start) {
                    *slot = '?';
                }
                plaintext.push('?');
            }
        }
    }

    while plaintext.ends_with(' ') {
        plaintext.pop();
    }
    (plain_row, plaintext)
}
