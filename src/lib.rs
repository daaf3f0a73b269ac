//! # fracmorse
//!
//! Morse-fractionation ciphers — Morbit, Pollux and Fractionated Morse —
//! with an encoder and an incremental constraint-propagation solver.
//!
//! A fractionation cipher writes the message as one continuous morse
//! stream (`O` dot, `-` dash, `X` separator), carves the stream into
//! fixed-width symbol groups and substitutes a ciphertext character for
//! each group. The solver starts from partial knowledge of that
//! substitution — hint characters or a crib — and narrows per-character
//! possibility sets with a battery of deduction rules until the mapping
//! resolves, justifying every step in words.
//!
//! ## Example
//!
//! ```rust
//! use fracmorse::prelude::*;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let codec = MorseCode::new();
//! let key = CipherKey::in_table_order(SymbolAlphabet::morbit(), "123456789").unwrap();
//! let mut rng = StdRng::seed_from_u64(1);
//! let puzzle = Encoder::new(&key, &codec).encode("COME AT ONCE", &mut rng).unwrap();
//!
//! let solver = Solver::new(Variant::Morbit, &key, &codec, &puzzle);
//! let report = solver.solve(Seed::Hints("123456789"));
//! assert!(report.is_resolved());
//! assert_eq!(report.plaintext.as_deref(), Some("COME AT ONCE"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alphabet;
pub mod encode;
pub mod error;
pub mod morse;
pub mod solver;
pub mod variant;

#[cfg(feature = "serialization")]
pub mod serialization;

/// CLI interface and utilities
#[cfg(feature = "cli")]
pub mod cli;

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::alphabet::{CipherKey, GroupId, SymbolAlphabet, SymbolGroup};
    pub use crate::encode::{decode, EncodedLine, Encoder, Puzzle};
    pub use crate::error::{CipherError, Result};
    pub use crate::morse::{MorseCode, MorseSymbol};
    pub use crate::solver::{MappingModel, Seed, SolveReport, SolveStatus, Solver};
    pub use crate::variant::Variant;
}
