//! Predicate compiler: structured filter objects to boolean condition
//! fragments.
//!
//! A filter is either a flat mapping `field -> scalar | operator map` or an
//! array of such mappings ("alternatives"). Every condition produced by one
//! mapping is AND-combined, so `{"field": {"$lt": [2, 3]}}` means
//! `field<2 AND field<3`, not an OR of the two. Alternatives are
//! OR-combined, each parenthesized. Field names are rendered as raw text
//! and must come from declared property names, never from external data.

mod errors;

pub use errors::PredicateError;

use crate::cypher;
use crate::fragment::{Fragment, Var};
use lazy_static::lazy_static;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Builds one condition from a field reference and the operator's raw
/// value.
type ConditionBuilder = fn(Fragment, &Value) -> Fragment;

lazy_static! {
    /// Operator key -> condition builder. Keys missing from this table are
    /// ignored.
    static ref OPERATORS: HashMap<&'static str, ConditionBuilder> = {
        let mut m: HashMap<&'static str, ConditionBuilder> = HashMap::new();
        m.insert("$gt", gt);
        m.insert("$gte", gte);
        m.insert("$lt", lt);
        m.insert("$lte", lte);
        m.insert("$exists", exists);
        m.insert("$startsWith", starts_with);
        m.insert("$endsWith", ends_with);
        m.insert("$contains", contains);
        m.insert("$has", has);
        m.insert("$in", within);
        m
    };
}

fn gt(field: Fragment, value: &Value) -> Fragment {
    cypher!({field} ">" {value.clone()})
}

fn gte(field: Fragment, value: &Value) -> Fragment {
    cypher!({field} ">=" {value.clone()})
}

fn lt(field: Fragment, value: &Value) -> Fragment {
    cypher!({field} "<" {value.clone()})
}

fn lte(field: Fragment, value: &Value) -> Fragment {
    cypher!({field} "<=" {value.clone()})
}

fn exists(field: Fragment, value: &Value) -> Fragment {
    if is_truthy(value) {
        cypher!("exists(" {field} ")")
    } else {
        cypher!("NOT exists(" {field} ")")
    }
}

fn starts_with(field: Fragment, value: &Value) -> Fragment {
    cypher!({field} " STARTS WITH " {value.clone()})
}

fn ends_with(field: Fragment, value: &Value) -> Fragment {
    cypher!({field} " ENDS WITH " {value.clone()})
}

fn contains(field: Fragment, value: &Value) -> Fragment {
    cypher!({field} " CONTAINS " {value.clone()})
}

/// Scalar membership in a container property: `V IN field`.
fn has(field: Fragment, value: &Value) -> Fragment {
    cypher!({value.clone()} " IN " {field})
}

fn within(field: Fragment, value: &Value) -> Fragment {
    cypher!({field} " IN " {value.clone()})
}

/// Compiles a filter into a `WHERE …` fragment, or an empty fragment when
/// the filter has nothing to say (no clause gets emitted either way).
pub fn where_clause(var: Var, predicate: &Value) -> Result<Fragment, PredicateError> {
    match predicate {
        Value::Object(mapping) => Ok(match and_join(conditions(var, mapping)) {
            Some(expr) => cypher!("WHERE " {expr}),
            None => Fragment::empty(),
        }),
        Value::Array(alternatives) => where_alternatives(var, alternatives),
        other => Err(PredicateError::InvalidShape {
            found: json_type_name(other),
        }),
    }
}

/// Builds one condition fragment per (field, operator-instance) pair of a
/// flat mapping, in mapping order. The caller combines them.
pub fn conditions(var: Var, mapping: &Map<String, Value>) -> Vec<Fragment> {
    let mut out = Vec::new();
    for (field, raw) in mapping {
        let token = field_token(var, field);
        match raw {
            Value::Object(operator_map) => {
                for (key, value) in operator_map {
                    let Some(build) = OPERATORS.get(key.as_str()) else {
                        log::debug!("ignoring unrecognized operator '{key}' in predicate");
                        continue;
                    };
                    if fans_out(key, value) {
                        if let Value::Array(items) = value {
                            for item in items {
                                out.push(build(token.clone(), item));
                            }
                        }
                    } else {
                        out.push(build(token.clone(), value));
                    }
                }
            }
            scalar => out.push(cypher!({token.clone()} " = " {scalar.clone()})),
        }
    }
    out
}

fn where_alternatives(var: Var, alternatives: &[Value]) -> Result<Fragment, PredicateError> {
    if alternatives.is_empty() {
        return Ok(Fragment::empty());
    }
    if alternatives.len() == 1 {
        return match &alternatives[0] {
            mapping @ Value::Object(_) => where_clause(var, mapping),
            other => Err(PredicateError::InvalidAlternative {
                index: 0,
                found: json_type_name(other),
            }),
        };
    }
    let mut combined: Option<Fragment> = None;
    for (index, alternative) in alternatives.iter().enumerate() {
        let Value::Object(mapping) = alternative else {
            return Err(PredicateError::InvalidAlternative {
                index,
                found: json_type_name(alternative),
            });
        };
        // Alternatives with nothing to say contribute no branch.
        let Some(expr) = and_join(conditions(var, mapping)) else {
            continue;
        };
        combined = Some(match combined {
            Some(acc) => cypher!({acc} " OR (" {expr} ")"),
            None => cypher!("WHERE (" {expr} ")"),
        });
    }
    Ok(combined.unwrap_or_else(Fragment::empty))
}

fn and_join(conditions: Vec<Fragment>) -> Option<Fragment> {
    conditions
        .into_iter()
        .reduce(|acc, condition| cypher!({acc} " AND " {condition}))
}

fn field_token(var: Var, field: &str) -> Fragment {
    cypher!({var} "." {Fragment::raw(field)})
}

/// `$in` keeps a plain array as one membership test and fans out only for
/// an array of arrays; every other operator fans out per element.
fn fans_out(key: &str, value: &Value) -> bool {
    match value {
        Value::Array(items) => {
            if key == "$in" {
                matches!(items.first(), Some(Value::Array(_)))
            } else {
                true
            }
        }
        _ => false,
    }
}

/// JS-style truthiness for operator values like `$exists`.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
