//! Predicate evaluator: walks a compiled [`Condition`] against one record.
//!
//! The recursion mirrors the grammar's recursion, and every arm is total —
//! missing fields and non-comparable operand types mean "does not match".

use std::cmp::Ordering;

use serde_json::Value;

use crate::value::{get_field, loose_equal, to_match_string, try_compare};

use super::{CompareOp, Condition};

pub(super) fn matches(condition: &Condition, record: &Value) -> bool {
    match condition {
        Condition::True => true,

        Condition::Equals { field, value } => loose_equal(&get_field(record, field), value),

        Condition::Compare { field, op, value } => {
            match try_compare(&get_field(record, field), value) {
                Some(ordering) => match op {
                    CompareOp::Gt => ordering == Ordering::Greater,
                    CompareOp::Gte => ordering != Ordering::Less,
                    CompareOp::Lt => ordering == Ordering::Less,
                    CompareOp::Lte => ordering != Ordering::Greater,
                },
                None => false,
            }
        }

        Condition::In {
            field,
            values,
            negated,
        } => {
            let actual = get_field(record, field);
            let found = values.iter().any(|value| loose_equal(&actual, value));
            found != *negated
        }

        Condition::Between {
            field,
            low,
            high,
            negated,
        } => {
            let actual = get_field(record, field);
            let inside = matches!(
                try_compare(&actual, low),
                Some(Ordering::Greater | Ordering::Equal)
            ) && matches!(
                try_compare(&actual, high),
                Some(Ordering::Less | Ordering::Equal)
            );
            inside != *negated
        }

        Condition::Like {
            field,
            pattern,
            negated,
        } => {
            let haystack = to_match_string(&get_field(record, field));
            haystack.contains(pattern.as_str()) != *negated
        }

        Condition::And(children) => children.iter().all(|child| matches(child, record)),

        Condition::Or(children) => children.iter().any(|child| matches(child, record)),

        Condition::Not(child) => !matches(child, record),
    }
}
