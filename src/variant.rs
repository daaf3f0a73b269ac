//! Cipher variant selection.

use crate::alphabet::SymbolAlphabet;
use crate::solver::rules::{RuleSet, RuleSetBuilder};

/// Morse-fraction cipher variant.
///
/// The variants share one engine and differ only in group width, cipher
/// alphabet, key shape and which inference rules are worth running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Default)]
pub enum Variant {
    /// Morbit: 2-symbol groups over the digits 1–9.
    #[default]
    Morbit,

    /// Pollux: 1-symbol classes over the digits 0–9; several digits may
    /// stand for the same symbol.
    Pollux,

    /// Fractionated Morse: 3-symbol groups over the letters A–Z.
    FractionatedMorse,
}

impl Variant {
    /// Get a human-readable name for this variant
    pub fn name(&self) -> &'static str {
        match self {
            Variant::Morbit => "morbit",
            Variant::Pollux => "pollux",
            Variant::FractionatedMorse => "fractionated-morse",
        }
    }

    /// Width of one symbol group in morse symbols.
    pub fn group_width(&self) -> usize {
        match self {
            Variant::Morbit => 2,
            Variant::Pollux => 1,
            Variant::FractionatedMorse => 3,
        }
    }

    /// The canonical symbol alphabet for this variant.
    pub fn symbol_alphabet(&self) -> SymbolAlphabet {
        match self {
            Variant::Morbit => SymbolAlphabet::morbit(),
            Variant::Pollux => SymbolAlphabet::pollux(),
            Variant::FractionatedMorse => SymbolAlphabet::fractionated(),
        }
    }

    /// The usual ciphertext alphabet for this variant.
    pub fn cipher_chars(&self) -> &'static str {
        match self {
            Variant::Morbit => "123456789",
            Variant::Pollux => "0123456789",
            Variant::FractionatedMorse => "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
        }
    }

    /// Whether the key is a bijection between characters and groups.
    pub fn bijective_key(&self) -> bool {
        !matches!(self, Variant::Pollux)
    }

    /// Minimum number of distinct hint characters needed to start a solve.
    pub fn min_seed(&self) -> usize {
        match self {
            Variant::Morbit | Variant::Pollux => 3,
            Variant::FractionatedMorse => 4,
        }
    }

    /// The inference rules this variant runs, in priority order.
    ///
    /// Fractionated Morse keeps to the structural rules plus
    /// illegal-morse elimination: its 3-wide groups give that rule
    /// enough purchase, and the run heuristics rarely see a window they
    /// can use. Morbit and Pollux run the full battery.
    pub fn rule_set(&self) -> RuleSet {
        match self {
            Variant::Morbit | Variant::Pollux => RuleSetBuilder::new()
                .with_uniqueness()
                .with_separator_adjacency()
                .with_triple_run()
                .with_spacer_run()
                .with_illegal_morse()
                .with_substring_heuristic()
                .build(),
            Variant::FractionatedMorse => RuleSetBuilder::new()
                .with_uniqueness()
                .with_separator_adjacency()
                .with_triple_run()
                .with_illegal_morse()
                .build(),
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morbit" => Ok(Variant::Morbit),
            "pollux" => Ok(Variant::Pollux),
            "fractionated-morse" | "fractionated" | "fracmorse" => {
                Ok(Variant::FractionatedMorse)
            }
            _ => Err(format!(
                "Unknown variant: {}. Valid options: morbit, pollux, fractionated-morse",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths_match_alphabets() {
        for v in [Variant::Morbit, Variant::Pollux, Variant::FractionatedMorse] {
            assert_eq!(v.group_width(), v.symbol_alphabet().width());
        }
    }

    #[test]
    fn test_cipher_alphabet_sizes() {
        assert_eq!(Variant::Morbit.cipher_chars().len(), 9);
        assert_eq!(Variant::Pollux.cipher_chars().len(), 10);
        assert_eq!(Variant::FractionatedMorse.cipher_chars().len(), 26);
    }

    #[test]
    fn test_rule_sets_are_explicit() {
        assert_eq!(Variant::Morbit.rule_set().len(), 6);
        assert_eq!(Variant::Pollux.rule_set().len(), 6);
        assert_eq!(Variant::FractionatedMorse.rule_set().len(), 4);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("morbit".parse::<Variant>().unwrap(), Variant::Morbit);
        assert_eq!("Pollux".parse::<Variant>().unwrap(), Variant::Pollux);
        assert_eq!(
            "fractionated".parse::<Variant>().unwrap(),
            Variant::FractionatedMorse
        );
        assert!("hill".parse::<Variant>().is_err());
    }
}
