//! Incremental constraint-propagation solver for morse-fraction ciphers.
//!
//! The solver keeps one possibility set per ciphertext character and
//! narrows the sets by a battery of deduction rules until the mapping is
//! resolved or no rule makes progress. Each firing is justified in
//! words, so a session doubles as a worked solution.
//!
//! The pieces:
//!
//! - [`model`] — the possibility sets and their seeding
//! - [`projector`] — re-derives the display rows from the model
//! - [`rules`] — the deduction rules and their composition
//! - [`driver`] — the fixpoint loop tying it together

pub mod driver;
pub mod model;
pub mod projector;
pub mod rules;

pub use driver::{Seed, SolveReport, SolveStatus, Solver, DEFAULT_ITERATION_CAP};
pub use model::{MappingModel, PossibilitySet, MIN_CRIB_LEN};
pub use projector::{project, Cell, Projection};
pub use rules::{Deduction, InferenceRule, RuleCtx, RuleSet, RuleSetBuilder};
