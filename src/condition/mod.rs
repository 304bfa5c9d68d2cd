//! Condition grammar for declarative record filters.
//!
//! Callers describe a filter as a `serde_json::Value` — either an object of
//! field/value pairs (a conjunction) or an array starting with an operator
//! tag. The [`compile`] function turns that dynamic shape into the closed
//! [`Condition`] tree once, so evaluation is a statically exhaustive match
//! with no "unknown operator" failure mode left at runtime.

mod compiler;
mod eval;

pub use compiler::{compile, prune_empty};

use serde_json::Value;

/// Ordering operators for field-against-value comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
}

/// A compiled condition node.
///
/// The tree is finite and acyclic; its depth equals the nesting depth of the
/// source expression. Operators that SQL spells with a `NOT` prefix carry a
/// `negated` flag instead of a wrapping [`Condition::Not`] node.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Matches every record. Compiled from an empty object or empty array.
    True,

    /// Loose equality of a field against a value (`=` or an object entry).
    Equals { field: String, value: Value },

    /// Ordering comparison of a field against a value.
    Compare {
        field: String,
        op: CompareOp,
        value: Value,
    },

    /// Set membership (`in` / `not in`).
    In {
        field: String,
        values: Vec<Value>,
        negated: bool,
    },

    /// Inclusive range test (`between` / `not between`). Negation inverts the
    /// whole test, not the bounds; swapped bounds match nothing.
    Between {
        field: String,
        low: Value,
        high: Value,
        negated: bool,
    },

    /// Case-sensitive substring containment (`like` / `not like`).
    Like {
        field: String,
        pattern: String,
        negated: bool,
    },

    /// All children must match. Empty is vacuously true.
    And(Vec<Condition>),

    /// At least one child must match. Empty is vacuously false.
    Or(Vec<Condition>),

    /// Logical negation of the child.
    Not(Box<Condition>),
}

impl Condition {
    /// Evaluate this condition against one record.
    ///
    /// Total over any record: missing fields read as null and simply do not
    /// match, they never raise.
    pub fn matches(&self, record: &Value) -> bool {
        eval::matches(self, record)
    }

    /// Logical negation.
    ///
    /// Flips the `negated` flag on operators that carry one and collapses a
    /// direct double negation; everything else is wrapped in
    /// [`Condition::Not`].
    pub fn negate(self) -> Condition {
        match self {
            Condition::In {
                field,
                values,
                negated,
            } => Condition::In {
                field,
                values,
                negated: !negated,
            },
            Condition::Between {
                field,
                low,
                high,
                negated,
            } => Condition::Between {
                field,
                low,
                high,
                negated: !negated,
            },
            Condition::Like {
                field,
                pattern,
                negated,
            } => Condition::Like {
                field,
                pattern,
                negated: !negated,
            },
            Condition::Not(inner) => *inner,
            other => Condition::Not(Box::new(other)),
        }
    }
}
