//! Fixpoint solve driver.
//!
//! One driver owns one session: seed the model, then alternate
//! projection and the rule battery until the puzzle is resolved, the
//! rules run dry, or the iteration cap trips. Every firing leaves one
//! justification in the trace, in firing order.

use crate::alphabet::CipherKey;
use crate::encode::{EncodedLine, Puzzle};
use crate::morse::MorseCode;
use crate::solver::model::MappingModel;
use crate::solver::projector::{project, Projection};
use crate::solver::rules::{RuleCtx, RuleSet};
use crate::variant::Variant;

/// Default bound on solve iterations.
pub const DEFAULT_ITERATION_CAP: usize = 20;

/// How a solve session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum SolveStatus {
    /// Every character occurring in the puzzle is resolved.
    Resolved,
    /// No rule makes further progress; the mapping is incomplete and
    /// manual trial and error is needed. A legitimate terminal state,
    /// not an error.
    Stalled,
    /// Seeding failed or a contradiction surfaced; partial results are
    /// retained.
    Failed,
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SolveStatus::Resolved => "resolved",
            SolveStatus::Stalled => "stalled",
            SolveStatus::Failed => "failed",
        })
    }
}

/// How to seed a session. Exactly one mode is active per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seed<'a> {
    /// Characters whose mapping is given outright.
    Hints(&'a str),
    /// A known plaintext fragment to locate and reverse-derive from.
    Crib(&'a str),
}

/// Everything a session produced, whatever way it ended.
///
/// Failures are reported here, in the status and trace, never thrown
/// across the caller boundary: the caller renders whatever came back.
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct SolveReport {
    /// Terminal state of the session.
    pub status: SolveStatus,
    /// One justification per rule firing, in firing order, plus the
    /// seeding and terminal messages.
    pub trace: Vec<String>,
    /// The decoded message, present only when resolved.
    pub plaintext: Option<String>,
    /// Final projected display rows, partial placeholders included.
    pub lines: Vec<EncodedLine>,
    /// Final possibility sets, rendered per character.
    pub mapping: Vec<(char, Vec<String>)>,
    /// Iterations spent before reaching the terminal state.
    pub iterations: usize,
}

impl SolveReport {
    /// Whether the session fully resolved the mapping.
    pub fn is_resolved(&self) -> bool {
        self.status == SolveStatus::Resolved
    }
}

/// Solve driver for one puzzle.
///
/// Each [`solve`](Solver::solve) call builds a fresh model, so a driver
/// can run several independent sessions over the same puzzle.
///
/// # Example
///
/// ```rust,ignore
/// use fracmorse::prelude::*;
///
/// let codec = MorseCode::new();
/// let key = CipherKey::in_table_order(SymbolAlphabet::morbit(), "123456789")?;
/// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
/// let puzzle = Encoder::new(&key, &codec).encode("COME AT ONCE", &mut rng)?;
/// let solver = Solver::new(Variant::Morbit, &key, &codec, &puzzle);
/// let report = solver.solve(Seed::Hints("123"));
/// for step in &report.trace {
///     println!("{}", step);
/// }
/// ```
pub struct Solver<'a> {
    variant: Variant,
    key: &'a CipherKey,
    codec: &'a MorseCode,
    puzzle: &'a Puzzle,
    rules: RuleSet,
    iteration_cap: usize,
}

impl<'a> Solver<'a> {
    /// Create a driver with the variant's rule battery and the default
    /// iteration cap.
    pub fn new(
        variant: Variant,
        key: &'a CipherKey,
        codec: &'a MorseCode,
        puzzle: &'a Puzzle,
    ) -> Self {
        Self {
            variant,
            key,
            codec,
            puzzle,
            rules: variant.rule_set(),
            iteration_cap: DEFAULT_ITERATION_CAP,
        }
    }

    /// Override the iteration cap.
    pub fn with_iteration_cap(mut self, cap: usize) -> Self {
        self.iteration_cap = cap.max(1);
        self
    }

    /// Override the rule battery.
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Run one session: seed, iterate to a fixpoint, report.
    ///
    /// Deterministic: the same seed yields the same trace and mapping
    /// every time.
    pub fn solve(&self, seed: Seed<'_>) -> SolveReport {
        let mut model = MappingModel::new(self.key);
        let mut trace: Vec<String> = Vec::new();

        let seeded = match seed {
            Seed::Hints(hints) => {
                model.seed_from_hints(hints, self.key, self.variant.min_seed())
            }
            Seed::Crib(crib) => model.seed_from_crib(crib, self.puzzle),
        };
        match seeded {
            Ok(chars) => {
                let shown: String = chars
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                trace.push(match seed {
                    Seed::Hints(_) => {
                        format!("Hint characters {} take their groups from the key.", shown)
                    }
                    Seed::Crib(crib) => format!(
                        "The crib {:?} pins down characters {}.",
                        crib.to_ascii_uppercase(),
                        shown
                    ),
                });
            }
            Err(e) => {
                trace.push(e.to_string());
                return self.report(SolveStatus::Failed, trace, &model, 0);
            }
        }

        let ctx = RuleCtx {
            puzzle: self.puzzle,
            alphabet: self.key.alphabet(),
            codec: self.codec,
        };

        let mut iterations = 0usize;
        while iterations < self.iteration_cap {
            iterations += 1;
            let proj = project(self.puzzle, &model, self.key.alphabet(), self.codec);
            if !model.has_unknowns(self.puzzle) {
                trace.push("Every character in the puzzle is resolved.".to_string());
                return self.finish_resolved(trace, model, proj, iterations);
            }

            let mut fired = false;
            for rule in self.rules.iter() {
                match rule.try_fire(&mut model, &proj, &ctx) {
                    Ok(Some(deduction)) => {
                        trace.push(deduction.message);
                        fired = true;
                        break;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        trace.push(e.to_string());
                        return self.report(SolveStatus::Failed, trace, &model, iterations);
                    }
                }
            }
            if !fired {
                trace.push(
                    "No rule makes further progress; continue with manual trial and error."
                        .to_string(),
                );
                return self.report(SolveStatus::Stalled, trace, &model, iterations);
            }
        }

        // The cap tripped; the last firing may still have finished the job.
        let proj = project(self.puzzle, &model, self.key.alphabet(), self.codec);
        if !model.has_unknowns(self.puzzle) {
            trace.push("Every character in the puzzle is resolved.".to_string());
            return self.finish_resolved(trace, model, proj, self.iteration_cap);
        }
        trace.push(format!(
            "Stopped after {} passes without full resolution; continue with \
             manual trial and error.",
            self.iteration_cap
        ));
        self.report(SolveStatus::Stalled, trace, &model, self.iteration_cap)
    }

    fn finish_resolved(
        &self,
        trace: Vec<String>,
        model: MappingModel,
        proj: Projection,
        iterations: usize,
    ) -> SolveReport {
        SolveReport {
            status: SolveStatus::Resolved,
            trace,
            plaintext: Some(proj.plaintext.clone()),
            lines: proj.lines,
            mapping: model.snapshot(self.key.alphabet()),
            iterations,
        }
    }

    fn report(
        &self,
        status: SolveStatus,
        trace: Vec<String>,
        model: &MappingModel,
        iterations: usize,
    ) -> SolveReport {
        let proj = project(self.puzzle, model, self.key.alphabet(), self.codec);
        SolveReport {
            status,
            trace,
            plaintext: None,
            lines: proj.lines,
            mapping: model.snapshot(self.key.alphabet()),
            iterations,
        }
    }
}
