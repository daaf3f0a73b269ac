//! Inference rule battery.
//!
//! Each rule inspects the model together with the current projection and
//! narrows possibility sets when it can justify doing so. Rules share
//! one seam, [`InferenceRule`], so they can be unit-tested in isolation
//! and composed per cipher variant through [`RuleSetBuilder`].
//!
//! The first four rules are purely structural. The last two lean on the
//! message itself and are only as good as the puzzle is well-formed;
//! they run last for that reason.

use crate::alphabet::{GroupId, SymbolAlphabet, SymbolGroup};
use crate::encode::Puzzle;
use crate::error::Result;
use crate::morse::{MorseCode, MorseSymbol};
use crate::solver::model::MappingModel;
use crate::solver::projector::{Cell, Projection};

/// Read-only context shared by every rule.
pub struct RuleCtx<'a> {
    /// The puzzle being solved.
    pub puzzle: &'a Puzzle,
    /// The symbol alphabet of the key in play.
    pub alphabet: &'a SymbolAlphabet,
    /// The morse table.
    pub codec: &'a MorseCode,
}

/// One successful rule firing: what was deduced and why, in words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deduction {
    /// Name of the rule that fired.
    pub rule: &'static str,
    /// Human-readable justification for the narrowing.
    pub message: String,
}

/// The common seam all inference rules implement.
///
/// `try_fire` either narrows the model and returns a [`Deduction`], or
/// returns `None` having touched nothing. Narrowing goes through
/// [`MappingModel::restrict`]/[`MappingModel::assign`] only, so the
/// monotonicity and contradiction guarantees hold for every rule.
pub trait InferenceRule {
    /// Short stable name, used in traces and tests.
    fn name(&self) -> &'static str;

    /// Attempt one deduction against the current model and projection.
    fn try_fire(
        &self,
        model: &mut MappingModel,
        proj: &Projection,
        ctx: &RuleCtx<'_>,
    ) -> Result<Option<Deduction>>;
}

/// An ordered battery of inference rules.
pub struct RuleSet {
    rules: Vec<Box<dyn InferenceRule>>,
}

impl RuleSet {
    /// Number of rules in the battery.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the battery is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over the rules in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn InferenceRule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    /// The rule names in priority order.
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RuleSet").field(&self.names()).finish()
    }
}

/// Builder composing a [`RuleSet`] in priority order.
///
/// # Example
///
/// ```rust
/// use fracmorse::solver::rules::RuleSetBuilder;
///
/// let rules = RuleSetBuilder::new()
///     .with_uniqueness()
///     .with_triple_run()
///     .build();
/// assert_eq!(rules.len(), 2);
/// ```
#[derive(Default)]
pub struct RuleSetBuilder {
    rules: Vec<Box<dyn InferenceRule>>,
}

impl RuleSetBuilder {
    /// Start an empty battery.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an arbitrary rule.
    pub fn with_rule(mut self, rule: Box<dyn InferenceRule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Add [`Uniqueness`].
    pub fn with_uniqueness(self) -> Self {
        self.with_rule(Box::new(Uniqueness))
    }

    /// Add [`SeparatorAdjacency`].
    pub fn with_separator_adjacency(self) -> Self {
        self.with_rule(Box::new(SeparatorAdjacency))
    }

    /// Add [`TripleRun`].
    pub fn with_triple_run(self) -> Self {
        self.with_rule(Box::new(TripleRun))
    }

    /// Add [`SpacerRun`].
    pub fn with_spacer_run(self) -> Self {
        self.with_rule(Box::new(SpacerRun))
    }

    /// Add [`IllegalMorse`].
    pub fn with_illegal_morse(self) -> Self {
        self.with_rule(Box::new(IllegalMorse))
    }

    /// Add [`SubstringHeuristic`].
    pub fn with_substring_heuristic(self) -> Self {
        self.with_rule(Box::new(SubstringHeuristic))
    }

    /// Finish the battery.
    pub fn build(self) -> RuleSet {
        RuleSet { rules: self.rules }
    }
}

/// Render a list of group ids for a trace message.
fn group_list(ids: &[GroupId], alphabet: &SymbolAlphabet) -> String {
    ids.iter()
        .map(|&g| alphabet.group(g).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Bijective keys: a group belongs to exactly one character.
///
/// Two deductions follow. A group already fixed on a resolved character
/// is removed from every other possibility set, and a group that
/// survives in a single ambiguous set resolves that character outright.
pub struct Uniqueness;

impl InferenceRule for Uniqueness {
    fn name(&self) -> &'static str {
        "uniqueness"
    }

    fn try_fire(
        &self,
        model: &mut MappingModel,
        _proj: &Projection,
        ctx: &RuleCtx<'_>,
    ) -> Result<Option<Deduction>> {
        if !model.bijective() {
            return Ok(None);
        }

        // Fixed groups cannot repeat elsewhere. Sweep to a fixpoint:
        // removals can resolve further characters whose groups are then
        // spoken for too. One sweep is one firing.
        let mut removed_from: Vec<char> = Vec::new();
        loop {
            let owned: Vec<GroupId> = model
                .chars()
                .iter()
                .filter_map(|&c| model.resolved_group(c))
                .collect();
            let mut changed = false;
            for &ch in &model.chars().to_vec() {
                if model.is_resolved(ch) {
                    continue;
                }
                if model.restrict(ch, |g| !owned.contains(&g))? {
                    changed = true;
                    if !removed_from.contains(&ch) {
                        removed_from.push(ch);
                    }
                }
            }
            if !changed {
                break;
            }
        }
        if !removed_from.is_empty() {
            let shown: String = removed_from
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return Ok(Some(Deduction {
                rule: self.name(),
                message: format!(
                    "Groups already fixed cannot repeat; dropping them from {}.",
                    shown
                ),
            }));
        }

        // A group left in exactly one possibility set must live there.
        for g in 0..ctx.alphabet.len() as GroupId {
            let mut holder: Option<char> = None;
            let mut count = 0usize;
            for &ch in model.chars() {
                if model.candidates(ch).contains(&g) {
                    count += 1;
                    holder = Some(ch);
                }
            }
            let ch = match (count, holder) {
                (1, Some(c)) => c,
                _ => continue,
            };
            // Characters absent from the puzzle change nothing on the page.
            if model.is_resolved(ch) || !ctx.puzzle.occurs(ch) {
                continue;
            }
            model.assign(ch, g)?;
            return Ok(Some(Deduction {
                rule: self.name(),
                message: format!(
                    "{} fits no other character, so {} must stand for {}.",
                    ctx.alphabet.group(g),
                    ch,
                    ctx.alphabet.group(g)
                ),
            }));
        }
        Ok(None)
    }
}

/// Whether placing `group` at ciphertext position `p` would put three or
/// more separators in a row, judged against the known columns nearby.
fn creates_triple_sep(cells: &[Cell], width: usize, p: usize, group: &SymbolGroup) -> bool {
    let start = p * width;
    let end = start + width;
    let lo = start.saturating_sub(2);
    let hi = (end + 2).min(cells.len());
    let mut run = 0usize;
    for i in lo..hi {
        let is_sep = if (start..end).contains(&i) {
            group.symbols()[i - start].is_sep()
        } else {
            cells[i].is_known_sep()
        };
        if is_sep {
            run += 1;
            if run >= 3 {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// No morse stream carries three separators in a row: candidates that
/// would extend a known separator pair are eliminated.
pub struct SeparatorAdjacency;

impl InferenceRule for SeparatorAdjacency {
    fn name(&self) -> &'static str {
        "separator-adjacency"
    }

    fn try_fire(
        &self,
        model: &mut MappingModel,
        proj: &Projection,
        ctx: &RuleCtx<'_>,
    ) -> Result<Option<Deduction>> {
        let width = proj.width;
        for (p, &ch) in ctx.puzzle.cipher.iter().enumerate() {
            if model.is_resolved(ch) {
                continue;
            }
            let bad: Vec<GroupId> = model
                .candidates(ch)
                .iter()
                .copied()
                .filter(|&g| creates_triple_sep(&proj.cells, width, p, ctx.alphabet.group(g)))
                .collect();
            if bad.is_empty() {
                continue;
            }
            model.restrict(ch, |g| !bad.contains(&g))?;
            return Ok(Some(Deduction {
                rule: self.name(),
                message: format!(
                    "{} sits against a known separator pair at position {}; \
                     it cannot be {} without putting three separators in a row.",
                    ch,
                    p + 1,
                    group_list(&bad, ctx.alphabet)
                ),
            }));
        }
        Ok(None)
    }
}

/// A character repeated three times in a row cannot carry a group that,
/// repeated, would chain three separators together.
pub struct TripleRun;

impl InferenceRule for TripleRun {
    fn name(&self) -> &'static str {
        "triple-run"
    }

    fn try_fire(
        &self,
        model: &mut MappingModel,
        _proj: &Projection,
        ctx: &RuleCtx<'_>,
    ) -> Result<Option<Deduction>> {
        let cipher = &ctx.puzzle.cipher;
        for window in cipher.windows(3) {
            let ch = window[0];
            if window[1] != ch || window[2] != ch || model.is_resolved(ch) {
                continue;
            }
            let bad: Vec<GroupId> = model
                .candidates(ch)
                .iter()
                .copied()
                .filter(|&g| tripled_has_sep_run(ctx.alphabet.group(g)))
                .collect();
            if bad.is_empty() {
                continue;
            }
            model.restrict(ch, |g| !bad.contains(&g))?;
            return Ok(Some(Deduction {
                rule: self.name(),
                message: format!(
                    "There are three {}s in a row, so {} cannot stand for {}: \
                     that would put three separators together.",
                    ch,
                    ch,
                    group_list(&bad, ctx.alphabet)
                ),
            }));
        }
        Ok(None)
    }
}

/// Whether three copies of a group chain three or more separators.
fn tripled_has_sep_run(group: &SymbolGroup) -> bool {
    let mut run = 0usize;
    for _ in 0..3 {
        for s in group.symbols() {
            if s.is_sep() {
                run += 1;
                if run >= 3 {
                    return true;
                }
            } else {
                run = 0;
            }
        }
    }
    false
}

/// Morse letters and digits never run past five dots and dashes. A
/// candidate that would stretch a known mark run beyond that must bring
/// a separator, or it is out.
pub struct SpacerRun;

impl InferenceRule for SpacerRun {
    fn name(&self) -> &'static str {
        "spacer-run"
    }

    fn try_fire(
        &self,
        model: &mut MappingModel,
        proj: &Projection,
        ctx: &RuleCtx<'_>,
    ) -> Result<Option<Deduction>> {
        let width = proj.width;
        let cap = ctx.codec.max_message_code_len();
        for (p, &ch) in ctx.puzzle.cipher.iter().enumerate() {
            if model.is_resolved(ch) {
                continue;
            }
            let start = p * width;
            let end = start + width;
            let left = known_marks_before(&proj.cells, start);
            let right = known_marks_after(&proj.cells, end);
            let bad: Vec<GroupId> = model
                .candidates(ch)
                .iter()
                .copied()
                .filter(|&g| {
                    longest_mark_run(left, ctx.alphabet.group(g), right) > cap
                })
                .collect();
            if bad.is_empty() {
                continue;
            }
            model.restrict(ch, |g| !bad.contains(&g))?;
            let survivors = group_list(model.candidates(ch), ctx.alphabet);
            return Ok(Some(Deduction {
                rule: self.name(),
                message: format!(
                    "Around position {} a run of more than {} dots and dashes would \
                     appear unless {} brings a separator; {} is out, leaving {}.",
                    p + 1,
                    cap,
                    ch,
                    group_list(&bad, ctx.alphabet),
                    survivors
                ),
            }));
        }
        Ok(None)
    }
}

/// Known dot/dash columns immediately before `at`.
fn known_marks_before(cells: &[Cell], at: usize) -> usize {
    cells[..at].iter().rev().take_while(|c| c.is_known_mark()).count()
}

/// Known dot/dash columns immediately from `at` on.
fn known_marks_after(cells: &[Cell], at: usize) -> usize {
    cells[at..].iter().take_while(|c| c.is_known_mark()).count()
}

/// Longest run of non-separator symbols in `left` known marks, the
/// group, then `right` known marks.
fn longest_mark_run(left: usize, group: &SymbolGroup, right: usize) -> usize {
    let mut best = 0usize;
    let mut run = left;
    for s in group.symbols() {
        if s.is_sep() {
            best = best.max(run);
            run = 0;
        } else {
            run += 1;
        }
    }
    best.max(run + right)
}

/// Between two known separators every complete letter must decode. A
/// candidate whose substitution leaves an impossible dot/dash sequence
/// in such a span is eliminated.
pub struct IllegalMorse;

impl InferenceRule for IllegalMorse {
    fn name(&self) -> &'static str {
        "illegal-morse"
    }

    fn try_fire(
        &self,
        model: &mut MappingModel,
        proj: &Projection,
        ctx: &RuleCtx<'_>,
    ) -> Result<Option<Deduction>> {
        let width = proj.width;
        for (p, &ch) in ctx.puzzle.cipher.iter().enumerate() {
            if model.is_resolved(ch) {
                continue;
            }
            let start = p * width;
            let end = start + width;
            let left = match bounded_marks_before(&proj.cells, start) {
                Some(marks) => marks,
                None => continue,
            };
            let right = match bounded_marks_after(&proj.cells, end) {
                Some(marks) => marks,
                None => continue,
            };
            let bad: Vec<GroupId> = model
                .candidates(ch)
                .iter()
                .copied()
                .filter(|&g| {
                    !tokens_decode(&left, ctx.alphabet.group(g), &right, ctx.codec)
                })
                .collect();
            if bad.is_empty() {
                continue;
            }
            model.restrict(ch, |g| !bad.contains(&g))?;
            let survivors = group_list(model.candidates(ch), ctx.alphabet);
            return Ok(Some(Deduction {
                rule: self.name(),
                message: format!(
                    "Between the separators around position {}, {} cannot spell a \
                     morse letter as {}; {} remains.",
                    p + 1,
                    ch,
                    group_list(&bad, ctx.alphabet),
                    survivors
                ),
            }));
        }
        Ok(None)
    }
}

/// The known marks between `at` and the separator (or stream start)
/// bounding it on the left. `None` when an unknown column intervenes.
fn bounded_marks_before(cells: &[Cell], at: usize) -> Option<Vec<MorseSymbol>> {
    let mut marks = Vec::new();
    for i in (0..at).rev() {
        match cells[i] {
            Cell::Known(s) if s.is_sep() => break,
            Cell::Known(s) => marks.push(s),
            Cell::Unknown => return None,
        }
    }
    marks.reverse();
    Some(marks)
}

/// The known marks between `at` and the separator (or stream end)
/// bounding it on the right. `None` when an unknown column intervenes.
fn bounded_marks_after(cells: &[Cell], at: usize) -> Option<Vec<MorseSymbol>> {
    let mut marks = Vec::new();
    for cell in &cells[at..] {
        match cell {
            Cell::Known(s) if s.is_sep() => break,
            Cell::Known(s) => marks.push(*s),
            Cell::Unknown => return None,
        }
    }
    Some(marks)
}

/// Substitute the group between its bounded neighbors and check every
/// complete token against the morse table.
fn tokens_decode(
    left: &[MorseSymbol],
    group: &SymbolGroup,
    right: &[MorseSymbol],
    codec: &MorseCode,
) -> bool {
    let mut stream: Vec<MorseSymbol> = Vec::with_capacity(left.len() + group.width() + right.len());
    stream.extend_from_slice(left);
    stream.extend_from_slice(group.symbols());
    stream.extend_from_slice(right);

    stream
        .split(|s| s.is_sep())
        .filter(|tok| !tok.is_empty())
        .all(|tok| codec.from_morse(tok).is_some())
}

/// Last resort: substitute each candidate in turn and keep only those
/// whose decodable text occurs somewhere in the message. Sound for
/// well-formed puzzles; it runs after every structural rule.
pub struct SubstringHeuristic;

impl InferenceRule for SubstringHeuristic {
    fn name(&self) -> &'static str {
        "substring-heuristic"
    }

    fn try_fire(
        &self,
        model: &mut MappingModel,
        proj: &Projection,
        ctx: &RuleCtx<'_>,
    ) -> Result<Option<Deduction>> {
        let width = proj.width;
        let mut tried: Vec<char> = Vec::new();
        for &ch in &ctx.puzzle.cipher {
            if model.is_resolved(ch) || tried.contains(&ch) {
                continue;
            }
            tried.push(ch);
            let bad: Vec<GroupId> = model
                .candidates(ch)
                .iter()
                .copied()
                .filter(|&g| {
                    !trial_decode_consistent(proj, ctx, ch, g, width)
                })
                .collect();
            if bad.is_empty() {
                continue;
            }
            model.restrict(ch, |g| !bad.contains(&g))?;
            let survivors = group_list(model.candidates(ch), ctx.alphabet);
            return Ok(Some(Deduction {
                rule: self.name(),
                message: format!(
                    "Trying each possibility for {}: {} would spell text that never \
                     occurs in the message, leaving {}.",
                    ch,
                    group_list(&bad, ctx.alphabet),
                    survivors
                ),
            }));
        }
        Ok(None)
    }
}

/// Substitute `group` at every occurrence of `ch` and check the result
/// against the message: every complete letter between known separators
/// must decode, and every decoded fragment must occur in the message.
fn trial_decode_consistent(
    proj: &Projection,
    ctx: &RuleCtx<'_>,
    ch: char,
    group: GroupId,
    width: usize,
) -> bool {
    let mut cells = proj.cells.clone();
    let symbols = ctx.alphabet.group(group).symbols();
    for (p, &c) in ctx.puzzle.cipher.iter().enumerate() {
        if c == ch {
            for (k, &s) in symbols.iter().enumerate() {
                cells[p * width + k] = Cell::Known(s);
            }
        }
    }

    let fragment_occurs = |frag: &str| {
        let frag = frag.trim();
        frag.is_empty() || ctx.puzzle.plaintext.contains(frag)
    };

    let mut frag = String::new();
    let mut i = 0usize;
    let mut sep_run = 0usize;
    while i < cells.len() {
        if cells[i].is_known_sep() {
            sep_run += 1;
            if sep_run == 2 {
                frag.push(' ');
            }
            i += 1;
            continue;
        }
        sep_run = 0;
        let start = i;
        while i < cells.len() && !cells[i].is_known_sep() {
            i += 1;
        }
        let segment = &cells[start..i];
        if segment.iter().all(Cell::is_known_mark) {
            let marks: Vec<MorseSymbol> = segment
                .iter()
                .filter_map(|c| match c {
                    Cell::Known(s) => Some(*s),
                    Cell::Unknown => None,
                })
                .collect();
            match ctx.codec.from_morse(&marks) {
                Some(letter) => frag.push(letter),
                // A complete letter that is no letter at all.
                None => return false,
            }
        } else {
            // The segment is still open; judge what we have so far.
            if !fragment_occurs(&frag) {
                return false;
            }
            frag.clear();
        }
    }
    fragment_occurs(&frag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::CipherKey;
    use crate::encode::Encoder;
    use crate::solver::projector::project;
    use crate::variant::Variant;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn morbit_key() -> CipherKey {
        CipherKey::in_table_order(SymbolAlphabet::morbit(), "123456789").unwrap()
    }

    fn pollux_key() -> CipherKey {
        // 0-2 dot, 3-5 dash, 6-9 separator.
        let alphabet = SymbolAlphabet::pollux();
        let pairs: Vec<(char, SymbolGroup)> = "0123456789"
            .chars()
            .map(|c| {
                let sym = match c {
                    '0'..='2' => "O",
                    '3'..='5' => "-",
                    _ => "X",
                };
                (c, sym.parse().unwrap())
            })
            .collect();
        CipherKey::new(alphabet, &pairs, false).unwrap()
    }

    /// A puzzle stub over an explicit ciphertext, for rule isolation.
    fn stub_puzzle(cipher: &str, key: &CipherKey, plaintext: &str) -> Puzzle {
        let width = key.alphabet().width();
        let cipher: Vec<char> = cipher.chars().collect();
        let groups: Vec<GroupId> =
            cipher.iter().map(|&c| key.group_of(c).unwrap()).collect();
        Puzzle {
            width,
            cipher,
            groups,
            letters: Vec::new(),
            plaintext: plaintext.to_string(),
            word_breaks: Vec::new(),
            lines: Vec::new(),
            max_line_width: 30,
        }
    }

    #[test]
    fn test_triple_run_drops_separator_groups() {
        let codec = MorseCode::new();
        let key = morbit_key();
        let puzzle = stub_puzzle("9119111", &key, "");
        let mut model = MappingModel::new(&key);
        let ctx = RuleCtx {
            puzzle: &puzzle,
            alphabet: key.alphabet(),
            codec: &codec,
        };
        let proj = project(&puzzle, &model, key.alphabet(), &codec);
        let ded = TripleRun
            .try_fire(&mut model, &proj, &ctx)
            .unwrap()
            .expect("rule fires on the 111 run");
        assert!(ded.message.contains("three 1s in a row"));
        // XX is gone from digit 1; the other eight groups survive.
        assert!(!model.candidates('1').contains(&8));
        assert_eq!(model.candidates('1').len(), 8);
        // Other characters are untouched.
        assert_eq!(model.candidates('9').len(), 9);
    }

    #[test]
    fn test_triple_run_pollux_drops_separator_class() {
        let codec = MorseCode::new();
        let key = pollux_key();
        let puzzle = stub_puzzle("0555012", &key, "");
        let mut model = MappingModel::new(&key);
        let ctx = RuleCtx {
            puzzle: &puzzle,
            alphabet: key.alphabet(),
            codec: &codec,
        };
        let proj = project(&puzzle, &model, key.alphabet(), &codec);
        let ded = TripleRun
            .try_fire(&mut model, &proj, &ctx)
            .unwrap()
            .expect("rule fires on the 555 run");
        assert!(ded.message.contains("three 5s in a row"));
        let sep = key.alphabet().position(&[MorseSymbol::Sep]).unwrap();
        assert!(!model.candidates('5').contains(&sep));
    }

    #[test]
    fn test_triple_run_needs_a_run() {
        let codec = MorseCode::new();
        let key = morbit_key();
        let puzzle = stub_puzzle("121212", &key, "");
        let mut model = MappingModel::new(&key);
        let ctx = RuleCtx {
            puzzle: &puzzle,
            alphabet: key.alphabet(),
            codec: &codec,
        };
        let proj = project(&puzzle, &model, key.alphabet(), &codec);
        assert!(TripleRun.try_fire(&mut model, &proj, &ctx).unwrap().is_none());
    }

    #[test]
    fn test_separator_adjacency_blocks_a_third_separator() {
        let codec = MorseCode::new();
        let key = pollux_key();
        // 6 and 7 are separators; 0 after them cannot be one too.
        let puzzle = stub_puzzle("167012", &key, "");
        let mut model = MappingModel::new(&key);
        let sep = key.alphabet().position(&[MorseSymbol::Sep]).unwrap();
        model.assign('6', sep).unwrap();
        model.assign('7', sep).unwrap();
        let ctx = RuleCtx {
            puzzle: &puzzle,
            alphabet: key.alphabet(),
            codec: &codec,
        };
        let proj = project(&puzzle, &model, key.alphabet(), &codec);
        let ded = SeparatorAdjacency
            .try_fire(&mut model, &proj, &ctx)
            .unwrap()
            .expect("rule fires next to the known pair");
        assert!(ded.message.contains("three separators"));
        assert!(!model.candidates('1').contains(&sep) || !model.candidates('0').contains(&sep));
    }

    #[test]
    fn test_uniqueness_assigns_last_holder() {
        let codec = MorseCode::new();
        let key = morbit_key();
        let puzzle = stub_puzzle("123456789", &key, "");
        let mut model = MappingModel::new(&key);
        // Strip group XX from everything but digit 9; it has nowhere
        // else to go.
        for c in "12345678".chars() {
            model.restrict(c, |g| g != 8).unwrap();
        }
        let ctx = RuleCtx {
            puzzle: &puzzle,
            alphabet: key.alphabet(),
            codec: &codec,
        };
        let proj = project(&puzzle, &model, key.alphabet(), &codec);
        let ded = Uniqueness
            .try_fire(&mut model, &proj, &ctx)
            .unwrap()
            .expect("only digit 9 can hold XX");
        assert_eq!(ded.rule, "uniqueness");
        assert_eq!(model.resolved_group('9'), Some(8));
    }

    #[test]
    fn test_uniqueness_sweeps_fixed_groups_from_others() {
        let codec = MorseCode::new();
        let key = morbit_key();
        let puzzle = stub_puzzle("123456789", &key, "");
        let mut model = MappingModel::new(&key);
        model.assign('1', 0).unwrap();
        model.assign('2', 1).unwrap();
        let ctx = RuleCtx {
            puzzle: &puzzle,
            alphabet: key.alphabet(),
            codec: &codec,
        };
        let proj = project(&puzzle, &model, key.alphabet(), &codec);
        let ded = Uniqueness
            .try_fire(&mut model, &proj, &ctx)
            .unwrap()
            .expect("fixed groups are dropped elsewhere");
        assert!(ded.message.contains("cannot repeat"));
        for c in "3456789".chars() {
            assert_eq!(model.candidates(c).len(), 7);
            assert!(!model.candidates(c).contains(&0));
            assert!(!model.candidates(c).contains(&1));
        }
        // A second pass has nothing further to say.
        let proj = project(&puzzle, &model, key.alphabet(), &codec);
        assert!(Uniqueness.try_fire(&mut model, &proj, &ctx).unwrap().is_none());
    }

    #[test]
    fn test_uniqueness_ignores_class_keys() {
        let codec = MorseCode::new();
        let key = pollux_key();
        let puzzle = stub_puzzle("0123", &key, "");
        let mut model = MappingModel::new(&key);
        let ctx = RuleCtx {
            puzzle: &puzzle,
            alphabet: key.alphabet(),
            codec: &codec,
        };
        let proj = project(&puzzle, &model, key.alphabet(), &codec);
        assert!(Uniqueness.try_fire(&mut model, &proj, &ctx).unwrap().is_none());
    }

    #[test]
    fn test_spacer_run_forces_separator() {
        let codec = MorseCode::new();
        let key = pollux_key();
        // Six known marks around an ambiguous digit force a separator.
        let puzzle = stub_puzzle("0004555", &key, "");
        let mut model = MappingModel::new(&key);
        let dot = key.alphabet().position(&[MorseSymbol::Dot]).unwrap();
        let dash = key.alphabet().position(&[MorseSymbol::Dash]).unwrap();
        model.assign('0', dot).unwrap();
        model.assign('5', dash).unwrap();
        let ctx = RuleCtx {
            puzzle: &puzzle,
            alphabet: key.alphabet(),
            codec: &codec,
        };
        let proj = project(&puzzle, &model, key.alphabet(), &codec);
        let ded = SpacerRun
            .try_fire(&mut model, &proj, &ctx)
            .unwrap()
            .expect("digit 4 must be the separator");
        assert_eq!(ded.rule, "spacer-run");
        let sep = key.alphabet().position(&[MorseSymbol::Sep]).unwrap();
        assert_eq!(model.resolved_group('4'), Some(sep));
    }

    #[test]
    fn test_illegal_morse_eliminates_non_letters() {
        let codec = MorseCode::new();
        let key = pollux_key();
        // Projected stream X ? - O - - X. A dot makes O-O--, a dash makes
        // --O--, neither of which is in the table; a separator leaves
        // -O--, the letter Y. Digit 1 resolves to the separator.
        let puzzle = stub_puzzle("6130446", &key, "");
        let mut model = MappingModel::new(&key);
        let dot = key.alphabet().position(&[MorseSymbol::Dot]).unwrap();
        let dash = key.alphabet().position(&[MorseSymbol::Dash]).unwrap();
        let sep = key.alphabet().position(&[MorseSymbol::Sep]).unwrap();
        model.assign('6', sep).unwrap();
        model.assign('3', dash).unwrap();
        model.assign('0', dot).unwrap();
        model.assign('4', dash).unwrap();
        let ctx = RuleCtx {
            puzzle: &puzzle,
            alphabet: key.alphabet(),
            codec: &codec,
        };
        let proj = project(&puzzle, &model, key.alphabet(), &codec);
        let ded = IllegalMorse
            .try_fire(&mut model, &proj, &ctx)
            .unwrap();
        assert!(ded.is_some());
        assert_eq!(model.resolved_group('1'), Some(sep));
    }

    #[test]
    fn test_substring_heuristic_keeps_consistent_candidates() {
        let codec = MorseCode::new();
        let key = morbit_key();
        let mut rng = StdRng::seed_from_u64(0);
        let puzzle = Encoder::new(&key, &codec)
            .encode("COME AT ONCE", &mut rng)
            .unwrap();
        let mut model = MappingModel::new(&key);
        // Resolve everything except one character that occurs.
        let target = puzzle.cipher[0];
        for &c in &puzzle.cipher {
            if c != target {
                model.assign(c, key.group_of(c).unwrap()).unwrap();
            }
        }
        assert!(!model.is_resolved(target));
        let ctx = RuleCtx {
            puzzle: &puzzle,
            alphabet: key.alphabet(),
            codec: &codec,
        };
        let proj = project(&puzzle, &model, key.alphabet(), &codec);
        let fired = SubstringHeuristic
            .try_fire(&mut model, &proj, &ctx)
            .unwrap();
        // The true group always survives the trial.
        if fired.is_some() {
            assert!(model
                .candidates(target)
                .contains(&key.group_of(target).unwrap()));
        }
    }

    #[test]
    fn test_rule_sets_compose_in_order() {
        let rules = Variant::Morbit.rule_set();
        assert_eq!(
            rules.names(),
            vec![
                "uniqueness",
                "separator-adjacency",
                "triple-run",
                "spacer-run",
                "illegal-morse",
                "substring-heuristic"
            ]
        );
    }
}
