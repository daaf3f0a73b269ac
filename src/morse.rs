//! Bidirectional morse code table.
//!
//! Dots are written `O`, dashes `-` and separators `X` throughout the
//! crate; this is the notation the fractionation alphabets use.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// One symbol of a fractionated morse stream.
///
/// `Sep` is the unit separator: one ends a letter, two in a row end a
/// word. `MorseSymbol` is `Copy` so symbol buffers can be sliced and
/// shuffled without allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum MorseSymbol {
    /// A dot, written `O`.
    Dot,
    /// A dash, written `-`.
    Dash,
    /// A separator, written `X`.
    Sep,
}

impl MorseSymbol {
    /// The display character for this symbol.
    pub fn as_char(&self) -> char {
        match self {
            MorseSymbol::Dot => 'O',
            MorseSymbol::Dash => '-',
            MorseSymbol::Sep => 'X',
        }
    }

    /// Parse a single symbol character (`O`, `-` or `X`, case-insensitive).
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'O' | 'o' | '.' => Some(MorseSymbol::Dot),
            '-' => Some(MorseSymbol::Dash),
            'X' | 'x' => Some(MorseSymbol::Sep),
            _ => None,
        }
    }

    /// Whether this symbol is the separator.
    #[inline(always)]
    pub fn is_sep(&self) -> bool {
        matches!(self, MorseSymbol::Sep)
    }
}

impl std::fmt::Display for MorseSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            MorseSymbol::Dot => "O",
            MorseSymbol::Dash => "-",
            MorseSymbol::Sep => "X",
        })
    }
}

/// A buffer of morse symbols, inline up to the longest code.
pub type SymbolSeq = SmallVec<[MorseSymbol; 8]>;

/// The compiled-in code table: A–Z, 0–9 and common punctuation.
///
/// Codes are written in `O`/`-` notation. The table is data, not layout:
/// [`MorseCode`] builds its lookup maps from it at construction.
const CODE_TABLE: &[(char, &str)] = &[
    ('A', "O-"),
    ('B', "-OOO"),
    ('C', "-O-O"),
    ('D', "-OO"),
    ('E', "O"),
    ('F', "OO-O"),
    ('G', "--O"),
    ('H', "OOOO"),
    ('I', "OO"),
    ('J', "O---"),
    ('K', "-O-"),
    ('L', "O-OO"),
    ('M', "--"),
    ('N', "-O"),
    ('O', "---"),
    ('P', "O--O"),
    ('Q', "--O-"),
    ('R', "O-O"),
    ('S', "OOO"),
    ('T', "-"),
    ('U', "OO-"),
    ('V', "OOO-"),
    ('W', "O--"),
    ('X', "-OO-"),
    ('Y', "-O--"),
    ('Z', "--OO"),
    ('0', "-----"),
    ('1', "O----"),
    ('2', "OO---"),
    ('3', "OOO--"),
    ('4', "OOOO-"),
    ('5', "OOOOO"),
    ('6', "-OOOO"),
    ('7', "--OOO"),
    ('8', "---OO"),
    ('9', "----O"),
    ('.', "O-O-O-"),
    (',', "--OO--"),
    ('?', "OO--OO"),
    ('\'', "O----O"),
    ('!', "-O-O--"),
    ('/', "-OO-O"),
    ('(', "-O--O"),
    (')', "-O--O-"),
    ('&', "O-OOO"),
    (':', "---OOO"),
    (';', "-O-O-O"),
    ('=', "-OOO-"),
    ('+', "O-O-O"),
    ('-', "-OOOO-"),
    ('_', "OO--O-"),
    ('"', "O-OO-O"),
    ('@', "O--O-O"),
];

/// Bidirectional lookup between characters and their morse codes.
///
/// Built once per session and shared by reference; the table itself is
/// immutable configuration data, not a process-wide global.
///
/// # Example
///
/// ```rust
/// use fracmorse::morse::{MorseCode, MorseSymbol};
///
/// let codec = MorseCode::new();
/// let sos = codec.to_morse('S').unwrap();
/// assert_eq!(sos.len(), 3);
/// assert_eq!(codec.from_morse(sos), Some('S'));
/// ```
#[derive(Debug, Clone)]
pub struct MorseCode {
    encode: FxHashMap<char, SymbolSeq>,
    decode: FxHashMap<String, char>,
}

impl MorseCode {
    /// Build the lookup maps from the compiled-in table.
    pub fn new() -> Self {
        let mut encode = FxHashMap::default();
        let mut decode = FxHashMap::default();
        for &(ch, code) in CODE_TABLE {
            let seq: SymbolSeq = code
                .chars()
                .map(|c| MorseSymbol::from_char(c).unwrap())
                .collect();
            encode.insert(ch, seq);
            decode.insert(code.to_string(), ch);
        }
        Self { encode, decode }
    }

    /// Look up the code for a character. `None` means the character has
    /// no morse code and cannot appear in a message.
    pub fn to_morse(&self, ch: char) -> Option<&[MorseSymbol]> {
        self.encode
            .get(&ch.to_ascii_uppercase())
            .map(|seq| seq.as_slice())
    }

    /// Look up the character for a dot/dash sequence.
    ///
    /// `None` means "not a legal morse character" — a valid outcome the
    /// caller must handle, not an error. Sequences containing separators
    /// never decode.
    pub fn from_morse(&self, seq: &[MorseSymbol]) -> Option<char> {
        if seq.is_empty() || seq.iter().any(|s| s.is_sep()) {
            return None;
        }
        let key: String = seq.iter().map(|s| s.as_char()).collect();
        self.decode.get(&key).copied()
    }

    /// Longest code length in the table restricted to letters and digits.
    ///
    /// Messages are cleaned to letters and digits before encoding, so a
    /// legal letter run in a puzzle never exceeds this many symbols.
    pub fn max_message_code_len(&self) -> usize {
        5
    }

    /// Whether a character can appear in a cleaned message.
    pub fn is_message_char(&self, ch: char) -> bool {
        let up = ch.to_ascii_uppercase();
        up.is_ascii_alphanumeric() && self.encode.contains_key(&up)
    }
}

impl Default for MorseCode {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a string of `O`/`-`/`X` characters into a symbol buffer.
pub fn parse_symbols(s: &str) -> Option<SymbolSeq> {
    s.chars().map(MorseSymbol::from_char).collect()
}

/// Render a symbol slice as an `O`/`-`/`X` string.
pub fn symbols_to_string(seq: &[MorseSymbol]) -> String {
    seq.iter().map(|s| s.as_char()).collect()
}
