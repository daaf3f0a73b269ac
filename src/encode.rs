//! Symbol segmentation encoder.
//!
//! Turns a plaintext message into a continuous morse stream (`X` between
//! letters, `XX` between words), carves the stream into fixed-width
//! symbol groups front to back, and substitutes one ciphertext character
//! per group. The trailing partial group is padded with separators.
//!
//! The encoder also records everything a solving session needs to know
//! about the puzzle it generated: the true group of every ciphertext
//! character, the symbol span of every plaintext letter (for crib
//! location) and the aligned display rows.

use crate::alphabet::{CipherKey, GroupId};
use crate::error::{CipherError, Result};
use crate::morse::{symbols_to_string, MorseCode, MorseSymbol};
use rand::Rng;

/// Default display width, in ciphertext characters per line.
pub const DEFAULT_LINE_WIDTH: usize = 30;

/// The symbol span of one plaintext letter within the morse stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct LetterSpan {
    /// The plaintext letter.
    pub ch: char,
    /// First symbol index of its code.
    pub start: usize,
    /// One past the last symbol index of its code.
    pub end: usize,
}

/// One display line: aligned ciphertext, morse and plaintext rows.
///
/// The morse and plaintext rows are in symbol columns (`group_width`
/// columns per ciphertext character); plaintext letters sit at the first
/// column of their code, `/` marks a word break, `?` marks a column the
/// solver cannot name yet.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct EncodedLine {
    /// Ciphertext characters on this line.
    pub cipher: String,
    /// Morse symbols for those characters.
    pub morse: String,
    /// Plaintext letters aligned under the morse row.
    pub plain: String,
}

/// A generated puzzle: the ciphertext plus the answer-side bookkeeping a
/// solving session seeds from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Puzzle {
    /// Symbol group width.
    pub width: usize,
    /// Ciphertext characters, in stream order.
    pub cipher: Vec<char>,
    /// The true group of each ciphertext character, parallel to `cipher`.
    pub groups: Vec<GroupId>,
    /// Symbol span of every plaintext letter, in order.
    pub letters: Vec<LetterSpan>,
    /// The cleaned plaintext, words joined with single spaces.
    pub plaintext: String,
    /// Ciphertext indices after which a word ends, for line breaking.
    pub word_breaks: Vec<usize>,
    /// Display chunking of the full encoding.
    pub lines: Vec<EncodedLine>,
    /// Display width used for `lines`.
    pub max_line_width: usize,
}

impl Puzzle {
    /// The ciphertext as one string.
    pub fn cipher_text(&self) -> String {
        self.cipher.iter().collect()
    }

    /// Whether a ciphertext character occurs in this puzzle.
    pub fn occurs(&self, ch: char) -> bool {
        let ch = ch.to_ascii_uppercase();
        self.cipher.contains(&ch)
    }

    /// The cleaned plaintext with word breaks removed.
    pub fn letters_only(&self) -> String {
        self.letters.iter().map(|s| s.ch).collect()
    }
}

/// Symbol segmentation encoder over one key.
#[derive(Debug, Clone)]
pub struct Encoder<'a> {
    key: &'a CipherKey,
    codec: &'a MorseCode,
    max_line_width: usize,
}

impl<'a> Encoder<'a> {
    /// Create an encoder with the default display width.
    pub fn new(key: &'a CipherKey, codec: &'a MorseCode) -> Self {
        Self {
            key,
            codec,
            max_line_width: DEFAULT_LINE_WIDTH,
        }
    }

    /// Override the display width in ciphertext characters per line.
    pub fn with_line_width(mut self, max_line_width: usize) -> Self {
        self.max_line_width = max_line_width.max(1);
        self
    }

    /// Encode a message.
    ///
    /// Cleaning keeps letters and digits, uppercases them, and splits
    /// words on whitespace runs; everything else is dropped. The RNG is
    /// consulted only by class-based keys, to pick among the characters
    /// of a class; pass a seeded one for reproducible puzzles.
    pub fn encode<R: Rng>(&self, plaintext: &str, rng: &mut R) -> Result<Puzzle> {
        let words = clean_words(plaintext, self.codec);
        let width = self.key.alphabet().width();

        // Continuous stream: X between letters, XX between words.
        let mut symbols: Vec<MorseSymbol> = Vec::new();
        let mut letters: Vec<LetterSpan> = Vec::new();
        let mut word_gap_ends: Vec<usize> = Vec::new();
        for (wi, word) in words.iter().enumerate() {
            if wi > 0 {
                symbols.push(MorseSymbol::Sep);
                symbols.push(MorseSymbol::Sep);
                word_gap_ends.push(symbols.len() - 1);
            }
            for (li, &ch) in word.iter().enumerate() {
                if li > 0 {
                    symbols.push(MorseSymbol::Sep);
                }
                let code = self
                    .codec
                    .to_morse(ch)
                    .expect("cleaned characters have codes");
                let start = symbols.len();
                symbols.extend_from_slice(code);
                letters.push(LetterSpan {
                    ch,
                    start,
                    end: symbols.len(),
                });
            }
        }

        // Pad the trailing partial group with separators. The stream ends
        // on a dot or dash, so the final group is never all separators.
        while symbols.len() % width != 0 {
            symbols.push(MorseSymbol::Sep);
        }

        let mut groups: Vec<GroupId> = Vec::with_capacity(symbols.len() / width);
        for chunk in symbols.chunks(width) {
            let id = self.key.alphabet().position(chunk).ok_or_else(|| {
                CipherError::UnencodableGroup(symbols_to_string(chunk))
            })?;
            groups.push(id);
        }

        let mut cipher: Vec<char> = Vec::with_capacity(groups.len());
        for &id in &groups {
            let ch = if self.key.is_bijective() {
                self.key
                    .char_for(id)
                    .expect("bijective key covers every group")
            } else {
                let options: Vec<char> = self.key.chars_for(id).collect();
                options[rng.gen_range(0..options.len())]
            };
            cipher.push(ch);
        }

        let word_breaks: Vec<usize> = word_gap_ends.iter().map(|&p| p / width).collect();

        let morse_row: Vec<char> = symbols.iter().map(|s| s.as_char()).collect();
        let mut plain_row: Vec<char> = vec![' '; symbols.len()];
        for span in &letters {
            plain_row[span.start] = span.ch;
        }
        for &p in &word_gap_ends {
            plain_row[p - 1] = '/';
        }

        let plaintext: String = words
            .iter()
            .map(|w| w.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join(" ");

        let lines = assemble_lines(
            &cipher,
            &morse_row,
            &plain_row,
            width,
            self.max_line_width,
            &word_breaks,
        );

        Ok(Puzzle {
            width,
            cipher,
            groups,
            letters,
            plaintext,
            word_breaks,
            lines,
            max_line_width: self.max_line_width,
        })
    }
}

/// Decode a ciphertext with its true key.
///
/// Independent of the solver: maps characters back to groups, strips the
/// trailing padding separators and re-splits the stream on separator
/// runs (one ends a letter, two end a word). Unrecognized letter runs
/// come out as `?`.
pub fn decode(ciphertext: &str, key: &CipherKey, codec: &MorseCode) -> Result<String> {
    let mut symbols: Vec<MorseSymbol> = Vec::new();
    for ch in ciphertext.chars() {
        if ch.is_whitespace() {
            continue;
        }
        let id = key
            .group_of(ch)
            .ok_or(CipherError::UnknownCipherChar(ch))?;
        symbols.extend_from_slice(key.alphabet().group(id).symbols());
    }
    while symbols.last().map(|s| s.is_sep()).unwrap_or(false) {
        symbols.pop();
    }

    let mut out = String::new();
    let mut token: Vec<MorseSymbol> = Vec::new();
    let mut sep_run = 0usize;
    for &sym in &symbols {
        if sym.is_sep() {
            if !token.is_empty() {
                out.push(codec.from_morse(&token).unwrap_or('?'));
                token.clear();
            }
            sep_run += 1;
            if sep_run == 2 {
                out.push(' ');
            }
        } else {
            sep_run = 0;
            token.push(sym);
        }
    }
    if !token.is_empty() {
        out.push(codec.from_morse(&token).unwrap_or('?'));
    }
    Ok(out)
}

/// Clean a message into words of encodable characters.
fn clean_words(plaintext: &str, codec: &MorseCode) -> Vec<Vec<char>> {
    let mut words: Vec<Vec<char>> = Vec::new();
    let mut current: Vec<char> = Vec::new();
    for ch in plaintext.chars() {
        if ch.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if codec.is_message_char(ch) {
            current.push(ch.to_ascii_uppercase());
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Split `n_chars` ciphertext characters into line ranges of at most
/// `max_width`, preferring to break after the last word boundary on the
/// line and hard-breaking mid-word otherwise.
pub(crate) fn chunk_ranges(
    n_chars: usize,
    max_width: usize,
    word_breaks: &[usize],
) -> Vec<std::ops::Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0usize;
    while start < n_chars {
        if n_chars - start <= max_width {
            ranges.push(start..n_chars);
            break;
        }
        let hard_end = start + max_width;
        let end = word_breaks
            .iter()
            .filter(|&&b| b >= start && b + 1 <= hard_end)
            .map(|&b| b + 1)
            .max()
            .unwrap_or(hard_end);
        ranges.push(start..end);
        start = end;
    }
    ranges
}

/// Assemble display lines from full-length rows.
pub(crate) fn assemble_lines(
    cipher: &[char],
    morse_row: &[char],
    plain_row: &[char],
    width: usize,
    max_line_width: usize,
    word_breaks: &[usize],
) -> Vec<EncodedLine> {
    chunk_ranges(cipher.len(), max_line_width, word_breaks)
        .into_iter()
        .map(|r| EncodedLine {
            cipher: cipher[r.clone()].iter().collect(),
            morse: morse_row[r.start * width..r.end * width].iter().collect(),
            plain: plain_row[r.start * width..r.end * width].iter().collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::SymbolAlphabet;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn morbit_key() -> CipherKey {
        CipherKey::in_table_order(SymbolAlphabet::morbit(), "123456789").unwrap()
    }

    #[test]
    fn test_sos_stream_shape() {
        // S = OOO, O = ---; stream OOOX---XOOO plus one padding X.
        let codec = MorseCode::new();
        let key = morbit_key();
        let mut rng = StdRng::seed_from_u64(0);
        let puzzle = Encoder::new(&key, &codec).encode("SOS", &mut rng).unwrap();
        let morse: String = puzzle.lines.iter().map(|l| l.morse.clone()).collect();
        assert_eq!(morse, "OOOX---XOOOX");
        // Pairs OO OX -- -X OO OX under the table-order key.
        assert_eq!(puzzle.cipher_text(), "135613");
        assert_eq!(puzzle.plaintext, "SOS");
    }

    #[test]
    fn test_letter_spans_cover_codes() {
        let codec = MorseCode::new();
        let key = morbit_key();
        let mut rng = StdRng::seed_from_u64(0);
        let puzzle = Encoder::new(&key, &codec)
            .encode("AB CD", &mut rng)
            .unwrap();
        assert_eq!(puzzle.letters.len(), 4);
        assert_eq!(puzzle.letters[0].ch, 'A');
        assert_eq!(puzzle.letters[0].start, 0);
        assert_eq!(puzzle.letters[0].end, 2); // A = O-
        // B starts after the letter separator.
        assert_eq!(puzzle.letters[1].start, 3);
        assert_eq!(puzzle.letters_only(), "ABCD");
    }

    #[test]
    fn test_cleaning_drops_punctuation_and_case() {
        let codec = MorseCode::new();
        let key = morbit_key();
        let mut rng = StdRng::seed_from_u64(0);
        let puzzle = Encoder::new(&key, &codec)
            .encode("hello,   world!", &mut rng)
            .unwrap();
        assert_eq!(puzzle.plaintext, "HELLO WORLD");
    }

    #[test]
    fn test_round_trip_morbit() {
        let codec = MorseCode::new();
        let key = morbit_key();
        let mut rng = StdRng::seed_from_u64(0);
        let puzzle = Encoder::new(&key, &codec)
            .encode("THE QUICK BROWN FOX", &mut rng)
            .unwrap();
        let decoded = decode(&puzzle.cipher_text(), &key, &codec).unwrap();
        assert_eq!(decoded, "THE QUICK BROWN FOX");
    }

    #[test]
    fn test_round_trip_fractionated() {
        let codec = MorseCode::new();
        let key = CipherKey::in_table_order(
            SymbolAlphabet::fractionated(),
            "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let puzzle = Encoder::new(&key, &codec)
            .encode("COME AT ONCE", &mut rng)
            .unwrap();
        let decoded = decode(&puzzle.cipher_text(), &key, &codec).unwrap();
        assert_eq!(decoded, "COME AT ONCE");
    }

    #[test]
    fn test_round_trip_pollux_classes() {
        let codec = MorseCode::new();
        let mut rng = StdRng::seed_from_u64(3);
        let key =
            CipherKey::random_classes(SymbolAlphabet::pollux(), "0123456789", &mut rng).unwrap();
        let puzzle = Encoder::new(&key, &codec)
            .encode("LUCK HELPS", &mut rng)
            .unwrap();
        let decoded = decode(&puzzle.cipher_text(), &key, &codec).unwrap();
        assert_eq!(decoded, "LUCK HELPS");
    }

    #[test]
    fn test_line_break_prefers_word_boundary() {
        let codec = MorseCode::new();
        let key = morbit_key();
        let mut rng = StdRng::seed_from_u64(0);
        let puzzle = Encoder::new(&key, &codec)
            .with_line_width(8)
            .encode("AN OLD SILENT POND", &mut rng)
            .unwrap();
        assert!(puzzle.lines.len() > 1);
        for line in &puzzle.lines {
            assert!(line.cipher.chars().count() <= 8);
            assert_eq!(line.morse.chars().count(), line.cipher.chars().count() * 2);
        }
        // Rows reassemble to the full encoding.
        let total: usize = puzzle.lines.iter().map(|l| l.cipher.chars().count()).sum();
        assert_eq!(total, puzzle.cipher.len());
    }

    #[test]
    fn test_hard_break_without_word_boundary() {
        let codec = MorseCode::new();
        let key = morbit_key();
        let mut rng = StdRng::seed_from_u64(0);
        let puzzle = Encoder::new(&key, &codec)
            .with_line_width(4)
            .encode("ABRACADABRA", &mut rng)
            .unwrap();
        for line in &puzzle.lines {
            assert!(line.cipher.chars().count() <= 4);
        }
    }

    #[test]
    fn test_unknown_cipher_char_decode_error() {
        let codec = MorseCode::new();
        let key = morbit_key();
        let err = decode("12Z", &key, &codec).unwrap_err();
        assert_eq!(err, CipherError::UnknownCipherChar('Z'));
    }

    #[test]
    fn test_custom_partial_alphabet_is_unencodable() {
        let codec = MorseCode::new();
        let alphabet = SymbolAlphabet::parse("OO O-").unwrap();
        let pairs = vec![
            ('1', "OO".parse().unwrap()),
            ('2', "O-".parse().unwrap()),
        ];
        let key = CipherKey::new(alphabet, &pairs, true).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let err = Encoder::new(&key, &codec).encode("SOS", &mut rng).unwrap_err();
        assert!(matches!(err, CipherError::UnencodableGroup(_)));
    }
}
