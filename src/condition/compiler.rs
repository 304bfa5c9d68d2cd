//! Compiler from declarative condition expressions to [`Condition`] trees.
//!
//! Two entry points:
//! - [`compile`]: strict compilation; any shape that matches no grammar
//!   production is a `MalformedCondition` error.
//! - [`prune_empty`]: the first phase of filtering composition — strip
//!   empty-valued leaves from an expression before strict compilation, so
//!   `filterWhere`-style operations share the ordinary compiler instead of
//!   duplicating its logic.

use serde_json::Value;

use crate::error::{QueryError, QueryResult};
use crate::value::is_empty;

use super::{CompareOp, Condition};

/// Compile a condition expression into a [`Condition`] tree.
///
/// An object compiles to a conjunction of per-field checks (an array value
/// means set membership); an array compiles by its leading operator tag.
/// Empty objects and arrays compile to [`Condition::True`].
pub fn compile(expr: &Value) -> QueryResult<Condition> {
    match expr {
        Value::Object(fields) => {
            let mut children = Vec::with_capacity(fields.len());
            for (field, value) in fields {
                children.push(match value {
                    Value::Array(values) => Condition::In {
                        field: field.clone(),
                        values: values.clone(),
                        negated: false,
                    },
                    other => Condition::Equals {
                        field: field.clone(),
                        value: other.clone(),
                    },
                });
            }
            Ok(match children.len() {
                0 => Condition::True,
                1 => children.remove(0),
                _ => Condition::And(children),
            })
        }
        Value::Array(items) => match items.split_first() {
            Some((tag, operands)) => {
                let tag = match tag.as_str() {
                    Some(t) => t.to_lowercase(),
                    None => {
                        return Err(QueryError::MalformedCondition(
                            "operator tag must be a string".to_string(),
                        ))
                    }
                };
                compile_operator(&tag, operands)
            }
            None => Ok(Condition::True),
        },
        other => Err(QueryError::MalformedCondition(format!(
            "expected an object or operator array, got {}",
            other
        ))),
    }
}

/// Compile one operator production. `tag` is already lowercased.
fn compile_operator(tag: &str, operands: &[Value]) -> QueryResult<Condition> {
    match tag {
        "and" | "or" => {
            if operands.is_empty() {
                return Err(QueryError::MalformedCondition(format!(
                    "'{}' requires at least one operand",
                    tag
                )));
            }
            let children = operands.iter().map(compile).collect::<QueryResult<Vec<_>>>()?;
            Ok(if tag == "and" {
                Condition::And(children)
            } else {
                Condition::Or(children)
            })
        }

        "not" => {
            if operands.len() != 1 {
                return Err(QueryError::MalformedCondition(format!(
                    "'not' requires exactly one operand, got {}",
                    operands.len()
                )));
            }
            Ok(compile(&operands[0])?.negate())
        }

        "=" => {
            let (field, value) = field_and_value(tag, operands)?;
            Ok(Condition::Equals { field, value })
        }

        "!=" => {
            let (field, value) = field_and_value(tag, operands)?;
            Ok(Condition::Equals { field, value }.negate())
        }

        ">" | ">=" | "<" | "<=" => {
            let (field, value) = field_and_value(tag, operands)?;
            let op = match tag {
                ">" => CompareOp::Gt,
                ">=" => CompareOp::Gte,
                "<" => CompareOp::Lt,
                _ => CompareOp::Lte,
            };
            Ok(Condition::Compare { field, op, value })
        }

        "in" | "not in" => {
            let (field, value) = field_and_value(tag, operands)?;
            match value {
                Value::Array(values) => Ok(Condition::In {
                    field,
                    values,
                    negated: tag == "not in",
                }),
                other => Err(QueryError::MalformedCondition(format!(
                    "'{}' requires an array of values, got {}",
                    tag, other
                ))),
            }
        }

        "between" | "not between" => {
            if operands.len() != 3 {
                return Err(QueryError::MalformedCondition(format!(
                    "'{}' requires exactly three operands (field, low, high), got {}",
                    tag,
                    operands.len()
                )));
            }
            Ok(Condition::Between {
                field: field_name(tag, &operands[0])?,
                low: operands[1].clone(),
                high: operands[2].clone(),
                negated: tag == "not between",
            })
        }

        "like" | "not like" => {
            let (field, value) = field_and_value(tag, operands)?;
            let pattern = match &value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => String::new(),
                other => {
                    return Err(QueryError::MalformedCondition(format!(
                        "'{}' requires a scalar pattern, got {}",
                        tag, other
                    )))
                }
            };
            Ok(Condition::Like {
                field,
                pattern,
                negated: tag == "not like",
            })
        }

        _ => Err(QueryError::MalformedCondition(format!(
            "unknown operator '{}'",
            tag
        ))),
    }
}

fn field_and_value(tag: &str, operands: &[Value]) -> QueryResult<(String, Value)> {
    if operands.len() != 2 {
        return Err(QueryError::MalformedCondition(format!(
            "'{}' requires exactly two operands (field, value), got {}",
            tag,
            operands.len()
        )));
    }
    Ok((field_name(tag, &operands[0])?, operands[1].clone()))
}

fn field_name(tag: &str, operand: &Value) -> QueryResult<String> {
    match operand.as_str() {
        Some(field) => Ok(field.to_string()),
        None => Err(QueryError::MalformedCondition(format!(
            "'{}' requires a string field name, got {}",
            tag, operand
        ))),
    }
}

/// Strip empty-valued leaves from a condition expression.
///
/// "Empty" is null, an empty string, or an empty array. Leaf operators whose
/// value operand is empty are dropped, `between` is dropped when either bound
/// is empty, and composite nodes that lose all operands vanish with them.
/// Returns None when nothing is left, which filtering composition treats as
/// "match all" / no-op.
///
/// Expressions the strict compiler would reject are returned unchanged so the
/// caller still sees the `MalformedCondition` error.
pub fn prune_empty(expr: &Value) -> Option<Value> {
    match expr {
        Value::Object(fields) => {
            let kept: serde_json::Map<String, Value> = fields
                .iter()
                .filter(|(_, value)| !is_empty(value))
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect();
            if kept.is_empty() {
                None
            } else {
                Some(Value::Object(kept))
            }
        }
        Value::Array(items) => {
            let (tag_value, operands) = match items.split_first() {
                Some(parts) => parts,
                None => return None,
            };
            let tag = match tag_value.as_str() {
                Some(t) => t.to_lowercase(),
                None => return Some(expr.clone()),
            };
            match tag.as_str() {
                "and" | "or" => {
                    let kept: Vec<Value> = operands.iter().filter_map(prune_empty).collect();
                    if kept.is_empty() {
                        None
                    } else {
                        let mut items = Vec::with_capacity(kept.len() + 1);
                        items.push(tag_value.clone());
                        items.extend(kept);
                        Some(Value::Array(items))
                    }
                }
                "not" => {
                    if operands.len() != 1 {
                        return Some(expr.clone());
                    }
                    let inner = prune_empty(&operands[0])?;
                    Some(Value::Array(vec![tag_value.clone(), inner]))
                }
                "between" | "not between" => {
                    if operands.len() == 3
                        && (is_empty(&operands[1]) || is_empty(&operands[2]))
                    {
                        None
                    } else {
                        Some(expr.clone())
                    }
                }
                "=" | "!=" | ">" | ">=" | "<" | "<=" | "in" | "not in" | "like" | "not like" => {
                    if operands.len() == 2 && is_empty(&operands[1]) {
                        None
                    } else {
                        Some(expr.clone())
                    }
                }
                _ => Some(expr.clone()),
            }
        }
        other => Some(other.clone()),
    }
}
