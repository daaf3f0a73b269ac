//! Known-mapping model: one possibility set per ciphertext character.
//!
//! Possibility sets only ever shrink. A character is *resolved* when one
//! candidate remains; an emptied set is a [`CipherError::Contradiction`],
//! surfaced immediately rather than decoded into garbage.

use crate::alphabet::{CipherKey, GroupId, SymbolAlphabet};
use crate::encode::Puzzle;
use crate::error::{CipherError, Result};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// A possibility set, inline up to the Morbit alphabet size.
pub type PossibilitySet = SmallVec<[GroupId; 9]>;

/// Minimum crib length, in letters.
pub const MIN_CRIB_LEN: usize = 4;

/// Per-character possibility sets for one solve session.
///
/// The model owns every set exclusively; inference rules narrow them
/// through [`restrict`](MappingModel::restrict) and
/// [`assign`](MappingModel::assign), and nothing outside the model holds
/// an aliased mutable view. One model serves one session; a new attempt
/// gets a fresh model.
#[derive(Debug, Clone)]
pub struct MappingModel {
    chars: Vec<char>,
    sets: Vec<PossibilitySet>,
    index: FxHashMap<char, usize>,
    bijective: bool,
}

impl MappingModel {
    /// Build a fully ambiguous model over a key's cipher alphabet: every
    /// character starts with the entire group alphabet as candidates.
    pub fn new(key: &CipherKey) -> Self {
        let chars: Vec<char> = key.cipher_chars().to_vec();
        let full: PossibilitySet = key.alphabet().ids().collect();
        let sets = vec![full; chars.len()];
        let index = chars.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self {
            chars,
            sets,
            index,
            bijective: key.is_bijective(),
        }
    }

    /// The cipher alphabet, in key order.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Whether the underlying key maps characters and groups one-to-one.
    pub fn bijective(&self) -> bool {
        self.bijective
    }

    /// The surviving candidates for a character, in table order.
    ///
    /// Characters outside the cipher alphabet have no candidates.
    pub fn candidates(&self, ch: char) -> &[GroupId] {
        match self.index.get(&ch.to_ascii_uppercase()) {
            Some(&i) => &self.sets[i],
            None => &[],
        }
    }

    /// Whether a character's possibility set has exactly one entry.
    pub fn is_resolved(&self, ch: char) -> bool {
        self.candidates(ch).len() == 1
    }

    /// The single candidate of a resolved character.
    pub fn resolved_group(&self, ch: char) -> Option<GroupId> {
        match self.candidates(ch) {
            [g] => Some(*g),
            _ => None,
        }
    }

    /// Whether any character occurring in the puzzle is still ambiguous.
    pub fn has_unknowns(&self, puzzle: &Puzzle) -> bool {
        puzzle.cipher.iter().any(|&c| !self.is_resolved(c))
    }

    /// Remove every candidate of `ch` that fails the predicate.
    ///
    /// Returns whether anything was removed. A resolved character is
    /// never touched again. Emptying the set is a hard
    /// [`CipherError::Contradiction`].
    pub fn restrict<F>(&mut self, ch: char, mut keep: F) -> Result<bool>
    where
        F: FnMut(GroupId) -> bool,
    {
        let i = match self.index.get(&ch.to_ascii_uppercase()) {
            Some(&i) => i,
            None => return Err(CipherError::UnknownCipherChar(ch)),
        };
        if self.sets[i].len() == 1 {
            return Ok(false);
        }
        let before = self.sets[i].len();
        self.sets[i].retain(|g| keep(*g));
        let after = self.sets[i].len();
        if after == 0 {
            return Err(CipherError::Contradiction(self.chars[i]));
        }
        Ok(after < before)
    }

    /// Collapse a character to exactly one group.
    ///
    /// Assigning a resolved character its own group is a no-op; assigning
    /// it a different group is a contradiction. Collapsing says nothing
    /// about the other characters here: for bijective keys that
    /// conclusion belongs to the uniqueness rule, where it leaves a
    /// trace entry.
    pub fn assign(&mut self, ch: char, group: GroupId) -> Result<bool> {
        let i = match self.index.get(&ch.to_ascii_uppercase()) {
            Some(&i) => i,
            None => return Err(CipherError::UnknownCipherChar(ch)),
        };
        if let [g] = self.sets[i][..] {
            if g == group {
                return Ok(false);
            }
            return Err(CipherError::Contradiction(self.chars[i]));
        }
        if !self.sets[i].contains(&group) {
            return Err(CipherError::Contradiction(self.chars[i]));
        }
        self.sets[i].clear();
        self.sets[i].push(group);
        Ok(true)
    }

    /// Seed from hint characters: each collapses to its key group.
    ///
    /// Validates before mutating; fewer than `min_seed` distinct usable
    /// hint characters is [`CipherError::InsufficientHint`]. Returns the
    /// seeded characters in hint order.
    pub fn seed_from_hints(
        &mut self,
        hints: &str,
        key: &CipherKey,
        min_seed: usize,
    ) -> Result<Vec<char>> {
        let mut seeds: Vec<(char, GroupId)> = Vec::new();
        for ch in hints.chars() {
            if ch.is_whitespace() || ch == ',' {
                continue;
            }
            let up = ch.to_ascii_uppercase();
            if seeds.iter().any(|(c, _)| *c == up) {
                continue;
            }
            let group = key
                .group_of(up)
                .ok_or(CipherError::UnknownCipherChar(ch))?;
            seeds.push((up, group));
        }
        if seeds.len() < min_seed {
            return Err(CipherError::InsufficientHint {
                required: min_seed,
                got: seeds.len(),
            });
        }
        for &(ch, group) in &seeds {
            self.assign(ch, group)?;
        }
        Ok(seeds.iter().map(|(c, _)| *c).collect())
    }

    /// Seed from a crib: locate it in the message and collapse the
    /// ciphertext characters its letters cover to their true groups.
    ///
    /// Matching runs over the letter sequence, so a crib may straddle a
    /// word break. The first match is used. The crib must be at least
    /// [`MIN_CRIB_LEN`] letters ([`CipherError::CribTooShort`]); a crib
    /// absent from the message is [`CipherError::CribNotFound`] and
    /// leaves the model untouched. Returns the affected characters.
    pub fn seed_from_crib(&mut self, crib: &str, puzzle: &Puzzle) -> Result<Vec<char>> {
        let wanted: Vec<char> = crib
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_uppercase())
            .collect();
        if wanted.len() < MIN_CRIB_LEN {
            return Err(CipherError::CribTooShort {
                crib: wanted.iter().collect(),
                required: MIN_CRIB_LEN,
            });
        }
        let letters: Vec<char> = puzzle.letters.iter().map(|s| s.ch).collect();
        let at = (0..letters.len().saturating_sub(wanted.len() - 1))
            .find(|&i| letters[i..i + wanted.len()] == wanted[..]);
        let at = match at {
            Some(i) => i,
            None => return Err(CipherError::CribNotFound(wanted.iter().collect())),
        };

        let sym_start = puzzle.letters[at].start;
        let sym_end = puzzle.letters[at + wanted.len() - 1].end;
        let first = sym_start / puzzle.width;
        let last = (sym_end + puzzle.width - 1) / puzzle.width;

        let mut affected: Vec<char> = Vec::new();
        for idx in first..last {
            let ch = puzzle.cipher[idx];
            self.assign(ch, puzzle.groups[idx])?;
            if !affected.contains(&ch) {
                affected.push(ch);
            }
        }
        Ok(affected)
    }

    /// Render every possibility set for reporting.
    pub fn snapshot(&self, alphabet: &SymbolAlphabet) -> Vec<(char, Vec<String>)> {
        self.chars
            .iter()
            .zip(self.sets.iter())
            .map(|(&c, set)| {
                (
                    c,
                    set.iter().map(|&g| alphabet.group(g).to_string()).collect(),
                )
            })
            .collect()
    }
}
