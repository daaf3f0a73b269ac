//! Symbol-group alphabets and ciphertext key assignments.
//!
//! A morse-fraction cipher carves the morse stream into fixed-width
//! groups of symbols and substitutes one ciphertext character for each
//! group. The [`SymbolAlphabet`] is the ordered set of groups a variant
//! uses; a [`CipherKey`] assigns ciphertext characters to those groups.

use crate::error::{CipherError, Result};
use crate::morse::{symbols_to_string, MorseSymbol};
use rand::seq::SliceRandom;
use rand::Rng;
use smallvec::SmallVec;

/// Index of a group within its [`SymbolAlphabet`].
pub type GroupId = u8;

/// A fixed-width group of morse symbols, e.g. `O-` or `XO-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolGroup(SmallVec<[MorseSymbol; 3]>);

impl SymbolGroup {
    /// Build a group from a symbol slice.
    pub fn new(symbols: &[MorseSymbol]) -> Self {
        Self(SmallVec::from_slice(symbols))
    }

    /// The group's symbols.
    #[inline(always)]
    pub fn symbols(&self) -> &[MorseSymbol] {
        &self.0
    }

    /// The group's width in symbols.
    #[inline(always)]
    pub fn width(&self) -> usize {
        self.0.len()
    }

    /// Number of separator symbols in the group.
    pub fn sep_count(&self) -> usize {
        self.0.iter().filter(|s| s.is_sep()).count()
    }

    /// Whether the group contains at least one separator.
    pub fn has_sep(&self) -> bool {
        self.0.iter().any(|s| s.is_sep())
    }

    /// Whether every symbol in the group is a separator.
    pub fn is_all_sep(&self) -> bool {
        self.0.iter().all(|s| s.is_sep())
    }
}

impl std::fmt::Display for SymbolGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&symbols_to_string(&self.0))
    }
}

impl std::str::FromStr for SymbolGroup {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self> {
        let symbols: Option<SmallVec<[MorseSymbol; 3]>> =
            s.chars().map(MorseSymbol::from_char).collect();
        match symbols {
            Some(v) if !v.is_empty() => Ok(Self(v)),
            _ => Err(CipherError::IllegalSymbolGroup(format!(
                "{:?} is not a group of O/-/X symbols",
                s
            ))),
        }
    }
}

/// An ordered, duplicate-free set of equal-width symbol groups.
///
/// Construction validates the set eagerly: any width mismatch or
/// duplicate group is an [`CipherError::IllegalSymbolGroup`]
/// configuration error, rejected before any encoding happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolAlphabet {
    groups: Vec<SymbolGroup>,
    width: usize,
}

impl SymbolAlphabet {
    /// Build an alphabet from groups, validating width uniformity and
    /// uniqueness.
    pub fn new(groups: Vec<SymbolGroup>) -> Result<Self> {
        let width = match groups.first() {
            Some(g) => g.width(),
            None => {
                return Err(CipherError::IllegalSymbolGroup(
                    "alphabet has no groups".into(),
                ))
            }
        };
        if !(1..=3).contains(&width) {
            return Err(CipherError::IllegalSymbolGroup(format!(
                "group width {} is out of range (1-3)",
                width
            )));
        }
        for g in &groups {
            if g.width() != width {
                return Err(CipherError::IllegalSymbolGroup(format!(
                    "group {} has width {}, expected {}",
                    g,
                    g.width(),
                    width
                )));
            }
        }
        for (i, g) in groups.iter().enumerate() {
            if groups[..i].contains(g) {
                return Err(CipherError::IllegalSymbolGroup(format!(
                    "group {} appears more than once",
                    g
                )));
            }
        }
        Ok(Self { groups, width })
    }

    /// Parse an alphabet from whitespace- or comma-separated group strings.
    pub fn parse(spec: &str) -> Result<Self> {
        let groups: Result<Vec<SymbolGroup>> = spec
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect();
        Self::new(groups?)
    }

    /// The nine 2-symbol groups of the Morbit cipher, in table order.
    pub fn morbit() -> Self {
        Self::parse("OO O- OX -O -- -X XO X- XX").expect("table is well-formed")
    }

    /// The three 1-symbol classes of the Pollux cipher.
    pub fn pollux() -> Self {
        Self::parse("O - X").expect("table is well-formed")
    }

    /// The twenty-six 3-symbol groups of the Fractionated Morse cipher,
    /// in table order. `XXX` never appears in a morse stream and is not
    /// part of the alphabet.
    pub fn fractionated() -> Self {
        let mut groups = Vec::with_capacity(26);
        let symbols = [MorseSymbol::Dot, MorseSymbol::Dash, MorseSymbol::Sep];
        for a in symbols {
            for b in symbols {
                for c in symbols {
                    if a.is_sep() && b.is_sep() && c.is_sep() {
                        continue;
                    }
                    groups.push(SymbolGroup::new(&[a, b, c]));
                }
            }
        }
        Self::new(groups).expect("table is well-formed")
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the alphabet is empty (never true for a validated alphabet).
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group width in symbols.
    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    /// The group with the given id.
    pub fn group(&self, id: GroupId) -> &SymbolGroup {
        &self.groups[id as usize]
    }

    /// Exact-match lookup of a group's id, in table order.
    pub fn position(&self, symbols: &[MorseSymbol]) -> Option<GroupId> {
        self.groups
            .iter()
            .position(|g| g.symbols() == symbols)
            .map(|i| i as GroupId)
    }

    /// Iterate over `(id, group)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &SymbolGroup)> {
        self.groups
            .iter()
            .enumerate()
            .map(|(i, g)| (i as GroupId, g))
    }

    /// All group ids in table order.
    pub fn ids(&self) -> impl Iterator<Item = GroupId> {
        0..self.groups.len() as GroupId
    }
}

/// Assignment of ciphertext characters to symbol groups.
///
/// Two shapes exist:
///
/// - **bijective** (Morbit, Fractionated Morse): every group is assigned
///   to exactly one ciphertext character and vice versa;
/// - **class-based** (Pollux): several ciphertext characters may share a
///   group, but every group must be used at least once.
///
/// Both shapes are validated eagerly at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherKey {
    alphabet: SymbolAlphabet,
    chars: Vec<char>,
    assignment: Vec<GroupId>,
    bijective: bool,
}

impl CipherKey {
    /// Build a key from `(character, group)` pairs over an alphabet.
    ///
    /// `bijective` selects the validation shape described on the type.
    pub fn new(
        alphabet: SymbolAlphabet,
        pairs: &[(char, SymbolGroup)],
        bijective: bool,
    ) -> Result<Self> {
        let mut chars = Vec::with_capacity(pairs.len());
        let mut assignment = Vec::with_capacity(pairs.len());
        for (ch, group) in pairs {
            let ch = ch.to_ascii_uppercase();
            if chars.contains(&ch) {
                return Err(CipherError::IllegalSymbolGroup(format!(
                    "ciphertext character {} is assigned twice",
                    ch
                )));
            }
            let id = alphabet.position(group.symbols()).ok_or_else(|| {
                CipherError::IllegalSymbolGroup(format!(
                    "group {} is not in the alphabet",
                    group
                ))
            })?;
            chars.push(ch);
            assignment.push(id);
        }
        let mut uses = vec![0usize; alphabet.len()];
        for &id in &assignment {
            uses[id as usize] += 1;
        }
        if bijective {
            if chars.len() != alphabet.len() {
                return Err(CipherError::IllegalSymbolGroup(format!(
                    "need exactly {} assignments, got {}",
                    alphabet.len(),
                    chars.len()
                )));
            }
            if let Some(missing) = uses.iter().position(|&n| n != 1) {
                return Err(CipherError::IllegalSymbolGroup(format!(
                    "group {} must be assigned exactly once",
                    alphabet.group(missing as GroupId)
                )));
            }
        } else if let Some(missing) = uses.iter().position(|&n| n == 0) {
            return Err(CipherError::IllegalSymbolGroup(format!(
                "group {} has no ciphertext character",
                alphabet.group(missing as GroupId)
            )));
        }
        Ok(Self {
            alphabet,
            chars,
            assignment,
            bijective,
        })
    }

    /// Build a bijective key assigning `chars` to groups in table order.
    pub fn in_table_order(alphabet: SymbolAlphabet, chars: &str) -> Result<Self> {
        let pairs: Vec<(char, SymbolGroup)> = chars
            .chars()
            .zip(alphabet.iter().map(|(_, g)| g.clone()))
            .collect();
        Self::new(alphabet, &pairs, true)
    }

    /// Build a random bijective key over `chars` with an injected seeded
    /// source of randomness, so key generation is reproducible.
    pub fn random<R: Rng>(
        alphabet: SymbolAlphabet,
        chars: &str,
        rng: &mut R,
    ) -> Result<Self> {
        let mut groups: Vec<SymbolGroup> =
            alphabet.iter().map(|(_, g)| g.clone()).collect();
        groups.shuffle(rng);
        let pairs: Vec<(char, SymbolGroup)> =
            chars.chars().zip(groups.into_iter()).collect();
        Self::new(alphabet, &pairs, true)
    }

    /// Build a random class-based key over `chars`: every group gets at
    /// least one character, the rest are spread at random.
    pub fn random_classes<R: Rng>(
        alphabet: SymbolAlphabet,
        chars: &str,
        rng: &mut R,
    ) -> Result<Self> {
        let chars: Vec<char> = chars.chars().collect();
        if chars.len() < alphabet.len() {
            return Err(CipherError::IllegalSymbolGroup(format!(
                "need at least {} ciphertext characters, got {}",
                alphabet.len(),
                chars.len()
            )));
        }
        let mut ids: Vec<GroupId> = alphabet.ids().collect();
        for _ in alphabet.len()..chars.len() {
            ids.push(rng.gen_range(0..alphabet.len()) as GroupId);
        }
        ids.shuffle(rng);
        let pairs: Vec<(char, SymbolGroup)> = chars
            .iter()
            .zip(ids.iter())
            .map(|(&c, &id)| (c, alphabet.group(id).clone()))
            .collect();
        Self::new(alphabet, &pairs, false)
    }

    /// The alphabet this key assigns.
    pub fn alphabet(&self) -> &SymbolAlphabet {
        &self.alphabet
    }

    /// Whether the key is a bijection between characters and groups.
    pub fn is_bijective(&self) -> bool {
        self.bijective
    }

    /// The ciphertext characters, in assignment order.
    pub fn cipher_chars(&self) -> &[char] {
        &self.chars
    }

    /// The group assigned to a ciphertext character.
    pub fn group_of(&self, ch: char) -> Option<GroupId> {
        let ch = ch.to_ascii_uppercase();
        self.chars
            .iter()
            .position(|&c| c == ch)
            .map(|i| self.assignment[i])
    }

    /// The ciphertext characters assigned to a group, in assignment order.
    pub fn chars_for(&self, id: GroupId) -> impl Iterator<Item = char> + '_ {
        self.chars
            .iter()
            .zip(self.assignment.iter())
            .filter(move |(_, g)| **g == id)
            .map(|(c, _)| *c)
    }

    /// The single character for a group of a bijective key.
    pub fn char_for(&self, id: GroupId) -> Option<char> {
        self.chars_for(id).next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_morbit_alphabet_shape() {
        let a = SymbolAlphabet::morbit();
        assert_eq!(a.len(), 9);
        assert_eq!(a.width(), 2);
        assert_eq!(a.group(0).to_string(), "OO");
        assert_eq!(a.group(8).to_string(), "XX");
    }

    #[test]
    fn test_fractionated_alphabet_excludes_all_sep() {
        let a = SymbolAlphabet::fractionated();
        assert_eq!(a.len(), 26);
        assert_eq!(a.width(), 3);
        assert!(a.iter().all(|(_, g)| !g.is_all_sep()));
        assert_eq!(a.group(0).to_string(), "OOO");
    }

    #[test]
    fn test_duplicate_group_rejected() {
        let err = SymbolAlphabet::parse("OO O- OO").unwrap_err();
        assert!(matches!(err, CipherError::IllegalSymbolGroup(_)));
    }

    #[test]
    fn test_mixed_width_rejected() {
        let err = SymbolAlphabet::parse("OO O-X").unwrap_err();
        assert!(matches!(err, CipherError::IllegalSymbolGroup(_)));
    }

    #[test]
    fn test_bijective_key_in_table_order() {
        let key = CipherKey::in_table_order(SymbolAlphabet::morbit(), "123456789").unwrap();
        assert_eq!(key.group_of('1'), Some(0));
        assert_eq!(key.group_of('9'), Some(8));
        assert_eq!(key.char_for(4), Some('5'));
        assert!(key.is_bijective());
    }

    #[test]
    fn test_bijective_key_wrong_size_rejected() {
        let err = CipherKey::in_table_order(SymbolAlphabet::morbit(), "1234").unwrap_err();
        assert!(matches!(err, CipherError::IllegalSymbolGroup(_)));
    }

    #[test]
    fn test_duplicate_cipher_char_rejected() {
        let a = SymbolAlphabet::pollux();
        let pairs: Vec<(char, SymbolGroup)> = vec![
            ('1', "O".parse().unwrap()),
            ('1', "-".parse().unwrap()),
            ('2', "X".parse().unwrap()),
        ];
        let err = CipherKey::new(a, &pairs, false).unwrap_err();
        assert!(matches!(err, CipherError::IllegalSymbolGroup(_)));
    }

    #[test]
    fn test_class_key_requires_full_coverage() {
        let a = SymbolAlphabet::pollux();
        let pairs: Vec<(char, SymbolGroup)> = vec![
            ('1', "O".parse().unwrap()),
            ('2', "O".parse().unwrap()),
            ('3', "-".parse().unwrap()),
        ];
        let err = CipherKey::new(a, &pairs, false).unwrap_err();
        assert!(matches!(err, CipherError::IllegalSymbolGroup(_)));
    }

    #[test]
    fn test_random_key_is_reproducible() {
        let mut rng1 = StdRng::seed_from_u64(7);
        let mut rng2 = StdRng::seed_from_u64(7);
        let k1 = CipherKey::random(SymbolAlphabet::morbit(), "123456789", &mut rng1).unwrap();
        let k2 = CipherKey::random(SymbolAlphabet::morbit(), "123456789", &mut rng2).unwrap();
        assert_eq!(k1, k2);
    }

    #[test]
    fn test_random_class_key_covers_all_groups() {
        let mut rng = StdRng::seed_from_u64(11);
        let key =
            CipherKey::random_classes(SymbolAlphabet::pollux(), "0123456789", &mut rng).unwrap();
        for id in key.alphabet().ids() {
            assert!(key.chars_for(id).next().is_some());
        }
    }
}
