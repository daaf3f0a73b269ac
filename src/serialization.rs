//! Puzzle and report persistence.
//!
//! Sessions serialize to JSON state objects: the generated [`Puzzle`]
//! and the [`SolveReport`] a session produced. The surrounding
//! application treats both as opaque.
//!
//! # Example
//!
//! ```rust,ignore
//! use fracmorse::serialization::{load_puzzle, save_puzzle};
//! use std::fs::File;
//!
//! let file = File::create("puzzle.json")?;
//! save_puzzle(&puzzle, file)?;
//!
//! let file = File::open("puzzle.json")?;
//! let restored = load_puzzle(file)?;
//! ```

use crate::encode::Puzzle;
use crate::error::{CipherError, Result};
use crate::solver::SolveReport;
use std::io::{Read, Write};

/// Write a puzzle as JSON.
pub fn save_puzzle<W: Write>(puzzle: &Puzzle, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, puzzle)
        .map_err(|e| CipherError::Serialization(e.to_string()))
}

/// Read a puzzle back from JSON.
pub fn load_puzzle<R: Read>(reader: R) -> Result<Puzzle> {
    serde_json::from_reader(reader).map_err(|e| CipherError::Serialization(e.to_string()))
}

/// Write a solve report as JSON.
pub fn save_report<W: Write>(report: &SolveReport, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, report)
        .map_err(|e| CipherError::Serialization(e.to_string()))
}

/// Render a solve report as a JSON string.
pub fn report_to_json(report: &SolveReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| CipherError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::{CipherKey, SymbolAlphabet};
    use crate::encode::Encoder;
    use crate::morse::MorseCode;
    use crate::solver::{Seed, Solver};
    use crate::variant::Variant;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::fs::File;

    #[test]
    fn test_puzzle_round_trips_through_json() {
        let codec = MorseCode::new();
        let key = CipherKey::in_table_order(SymbolAlphabet::morbit(), "123456789").unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let puzzle = Encoder::new(&key, &codec)
            .encode("SAVE ME FOR LATER", &mut rng)
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("puzzle.json");
        save_puzzle(&puzzle, File::create(&path).unwrap()).unwrap();
        let restored = load_puzzle(File::open(&path).unwrap()).unwrap();
        assert_eq!(restored, puzzle);
    }

    #[test]
    fn test_report_serializes() {
        let codec = MorseCode::new();
        let key = CipherKey::in_table_order(SymbolAlphabet::morbit(), "123456789").unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let puzzle = Encoder::new(&key, &codec).encode("SOS", &mut rng).unwrap();
        let report =
            Solver::new(Variant::Morbit, &key, &codec, &puzzle).solve(Seed::Hints("123456789"));
        let json = report_to_json(&report).unwrap();
        assert!(json.contains("Resolved"));
        assert!(json.contains("trace"));
    }

    #[test]
    fn test_garbage_input_is_a_serialization_error() {
        let err = load_puzzle("not json".as_bytes()).unwrap_err();
        assert!(matches!(err, CipherError::Serialization(_)));
    }
}
