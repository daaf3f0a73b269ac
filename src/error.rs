//! Error types for cipher configuration and solving.

use thiserror::Error;

/// Errors that can occur while configuring or solving a morse-fraction cipher.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CipherError {
    /// A symbol-group alphabet or key assignment is malformed.
    ///
    /// Raised eagerly at construction time: mixed group widths, duplicate
    /// groups, a group missing from the assignment, or a group assigned
    /// more than once where the key must be a bijection.
    #[error("Illegal symbol group configuration: {0}")]
    IllegalSymbolGroup(String),

    /// The morse stream produced a group the alphabet does not contain.
    ///
    /// This can only happen with a custom alphabet that does not cover
    /// every group the encoder can emit.
    #[error("Symbol group {0} has no ciphertext assignment")]
    UnencodableGroup(String),

    /// Fewer hint characters were supplied than the cipher variant needs
    /// to start solving.
    #[error("Need at least {required} hint characters to start, got {got}")]
    InsufficientHint {
        /// Minimum number of distinct hint characters for the variant.
        required: usize,
        /// Number of usable hint characters actually supplied.
        got: usize,
    },

    /// The crib text does not occur anywhere in the message.
    #[error("Crib {0:?} was not found in the message")]
    CribNotFound(String),

    /// The crib is structurally too short to seed a solve.
    #[error("Crib {crib:?} is too short: need at least {required} letters")]
    CribTooShort {
        /// The offending crib, cleaned.
        crib: String,
        /// Minimum crib length in letters.
        required: usize,
    },

    /// A possibility set was emptied by a restriction.
    ///
    /// The mapping can no longer be completed consistently. This is always
    /// surfaced, never silently rendered as garbage output.
    #[error("Contradiction: no possibility remains for ciphertext character {0}")]
    Contradiction(char),

    /// A hint character is not part of the cipher alphabet.
    #[error("Hint character {0:?} is not in the cipher alphabet")]
    UnknownCipherChar(char),

    /// Serialization failure when persisting or restoring state.
    #[cfg(feature = "serialization")]
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

/// A specialized `Result` type for cipher operations.
pub type Result<T> = std::result::Result<T, CipherError>;
