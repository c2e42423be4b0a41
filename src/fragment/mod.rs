//! Query fragment model and construction API.
//!
//! Fragments are immutable template trees: literal text, trusted raw
//! identifiers, values to be parameterized, pattern variables, and the
//! composite/spread/map-literal combinators. A tree is built fresh per
//! logical query and handed to [`crate::compiler::compile`], which resolves
//! variables and placeholders into a single statement plus a parameter
//! table.
//!
//! The [`cypher!`](crate::cypher) macro is the primary constructor and
//! stands in for template literals: string-literal tokens become template
//! text, braced expressions become embedded fragments.

use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_VAR_ID: AtomicU64 = AtomicU64::new(0);

/// Opaque token for a graph pattern variable.
///
/// A `Var` has no inherent name; the compiler's scope assigns one on first
/// use and returns the same name for the same token throughout a pass.
/// Tokens compare by identity, so one `Var` can be reused across a MATCH
/// pattern, a WHERE clause and a RETURN clause and resolve to a single
/// name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Var(u64);

impl Var {
    /// Allocates a token distinct from every other token in the process.
    pub fn new() -> Self {
        Var(NEXT_VAR_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn id(self) -> u64 {
        self.0
    }
}

impl Default for Var {
    fn default() -> Self {
        Self::new()
    }
}

/// A node in the query template tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Template text emitted as-is.
    Literal(String),
    /// Verbatim text, never parameterized. Only for identifiers the calling
    /// layer controls: labels, declared property names, operator keywords.
    Raw(String),
    /// A value registered in the parameter table and referenced by a
    /// generated placeholder.
    Param(Value),
    /// A pattern variable resolved to a generated name at compile time.
    Var(Var),
    /// Alternating literal segments and embedded fragments;
    /// `literals.len() == values.len() + 1`.
    Composite {
        literals: Vec<String>,
        values: Vec<Fragment>,
    },
    /// Fragments concatenated with no separator.
    Spread(Vec<Fragment>),
    /// Renders as `k1:{p0},k2:{p1}`, one placeholder per pair.
    MapLiteral(Vec<(String, Value)>),
}

/// A single piece of a template: literal text or an embedded fragment.
/// Consumed by [`Fragment::from_parts`], normally via the `cypher!` macro.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    Embed(Fragment),
}

impl Fragment {
    /// The empty fragment; compiles to nothing.
    pub fn empty() -> Fragment {
        Fragment::Literal(String::new())
    }

    /// Template text.
    pub fn text(text: impl Into<String>) -> Fragment {
        Fragment::Literal(text.into())
    }

    /// Verbatim text. Must only ever be built from identifiers the calling
    /// layer controls, never from externally supplied data.
    pub fn raw(text: impl Into<String>) -> Fragment {
        Fragment::Raw(text.into())
    }

    /// A value to be parameterized.
    pub fn param(value: impl Into<Value>) -> Fragment {
        Fragment::Param(value.into())
    }

    /// Composite from pre-split segments, the shape a template literal
    /// produces. The alternation invariant is checked at compile time.
    pub fn tag(literals: Vec<String>, values: Vec<Fragment>) -> Fragment {
        Fragment::Composite { literals, values }
    }

    /// Fragments concatenated with no separator.
    pub fn spread(items: Vec<Fragment>) -> Fragment {
        Fragment::Spread(items)
    }

    /// Map constructor over all keys of `object`, in its key order.
    pub fn map_literal(object: &Map<String, Value>) -> Fragment {
        Fragment::MapLiteral(
            object
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )
    }

    /// Map constructor over an explicit key order; keys absent from
    /// `object` are skipped.
    pub fn map_literal_keys(object: &Map<String, Value>, keys: &[&str]) -> Fragment {
        Fragment::MapLiteral(
            keys.iter()
                .filter_map(|key| object.get(*key).map(|value| (key.to_string(), value.clone())))
                .collect(),
        )
    }

    /// Normalizing constructor behind the `cypher!` macro: merges adjacent
    /// text parts and pads empty literal segments so the composite
    /// alternation invariant holds.
    pub fn from_parts(parts: Vec<Part>) -> Fragment {
        let mut literals = vec![String::new()];
        let mut values = Vec::new();
        for part in parts {
            match part {
                Part::Text(text) => {
                    if let Some(last) = literals.last_mut() {
                        last.push_str(&text);
                    }
                }
                Part::Embed(fragment) => {
                    values.push(fragment);
                    literals.push(String::new());
                }
            }
        }
        if values.is_empty() {
            Fragment::Literal(literals.swap_remove(0))
        } else {
            Fragment::Composite { literals, values }
        }
    }

    /// Flattens this fragment to plain raw text: nested composites are
    /// inlined and embedded params are rendered verbatim instead of
    /// parameterized. Only for internally controlled text. Pattern
    /// variables have no name outside a compilation pass and render as
    /// nothing.
    pub fn to_raw(&self) -> Fragment {
        let mut text = String::new();
        interpolate(self, &mut text);
        Fragment::Raw(text)
    }
}

fn interpolate(fragment: &Fragment, out: &mut String) {
    match fragment {
        Fragment::Literal(text) | Fragment::Raw(text) => out.push_str(text),
        Fragment::Param(value) => out.push_str(&plain_text(value)),
        Fragment::Var(_) => {}
        Fragment::Composite { literals, values } => {
            for (index, value) in values.iter().enumerate() {
                if let Some(segment) = literals.get(index) {
                    out.push_str(segment);
                }
                interpolate(value, out);
            }
            if let Some(trailing) = literals.get(values.len()) {
                out.push_str(trailing);
            }
        }
        Fragment::Spread(items) => {
            for item in items {
                interpolate(item, out);
            }
        }
        Fragment::MapLiteral(pairs) => {
            for (index, (key, value)) in pairs.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                out.push_str(key);
                out.push(':');
                out.push_str(&plain_text(value));
            }
        }
    }
}

fn plain_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl From<Var> for Fragment {
    fn from(var: Var) -> Fragment {
        Fragment::Var(var)
    }
}

impl From<Value> for Fragment {
    fn from(value: Value) -> Fragment {
        Fragment::Param(value)
    }
}

impl From<&str> for Fragment {
    fn from(value: &str) -> Fragment {
        Fragment::Param(Value::from(value))
    }
}

impl From<String> for Fragment {
    fn from(value: String) -> Fragment {
        Fragment::Param(Value::from(value))
    }
}

impl From<i64> for Fragment {
    fn from(value: i64) -> Fragment {
        Fragment::Param(Value::from(value))
    }
}

impl From<i32> for Fragment {
    fn from(value: i32) -> Fragment {
        Fragment::Param(Value::from(value))
    }
}

impl From<u64> for Fragment {
    fn from(value: u64) -> Fragment {
        Fragment::Param(Value::from(value))
    }
}

impl From<f64> for Fragment {
    fn from(value: f64) -> Fragment {
        Fragment::Param(Value::from(value))
    }
}

impl From<bool> for Fragment {
    fn from(value: bool) -> Fragment {
        Fragment::Param(Value::from(value))
    }
}

impl From<Vec<Fragment>> for Fragment {
    fn from(items: Vec<Fragment>) -> Fragment {
        Fragment::Spread(items)
    }
}

/// Template-literal style constructor: string-literal tokens become
/// template text, braced expressions become embedded fragments via
/// `Into<Fragment>`.
///
/// ```
/// use cyphergen::{compile, cypher, Var};
///
/// let node = Var::new();
/// let query = cypher!("MATCH (" {node} ") RETURN " {node});
/// let compiled = compile(&query).unwrap();
/// assert_eq!(compiled.statement, "MATCH (p0) RETURN p0");
/// ```
#[macro_export]
macro_rules! cypher {
    ($($part:tt)*) => {
        $crate::fragment::Fragment::from_parts(::std::vec![$($crate::__cypher_part!($part)),*])
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __cypher_part {
    ({ $embed:expr }) => {
        $crate::fragment::Part::Embed(::core::convert::Into::into($embed))
    };
    ($text:literal) => {
        $crate::fragment::Part::Text(::std::string::String::from($text))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cypher;
    use serde_json::json;

    #[test]
    fn test_var_tokens_are_distinct() {
        assert_ne!(Var::new(), Var::new());
    }

    #[test]
    fn test_empty_macro_is_empty_literal() {
        assert_eq!(cypher!(), Fragment::empty());
    }

    #[test]
    fn test_from_parts_merges_adjacent_text() {
        let fragment = cypher!("MATCH " "(n)" " RETURN n");
        assert_eq!(fragment, Fragment::Literal("MATCH (n) RETURN n".into()));
    }

    #[test]
    fn test_from_parts_pads_adjacent_embeds() {
        let fragment = cypher!("a" {1i64} {2i64} "b");
        match fragment {
            Fragment::Composite { literals, values } => {
                assert_eq!(literals, vec!["a".to_string(), String::new(), "b".to_string()]);
                assert_eq!(values.len(), 2);
            }
            other => panic!("expected composite, got {:?}", other),
        }
    }

    #[test]
    fn test_to_raw_renders_param_verbatim() {
        let fragment = cypher!("test" {"Var"});
        assert_eq!(fragment.to_raw(), Fragment::Raw("testVar".into()));
    }

    #[test]
    fn test_to_raw_inlines_nested_composites() {
        let fragment = cypher!("test" {cypher!("Var" {1i64})});
        assert_eq!(fragment.to_raw(), Fragment::Raw("testVar1".into()));
    }

    #[test]
    fn test_map_literal_keys_preserves_order_and_skips_missing() {
        let object = match json!({"a": 1, "b": 2}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        let fragment = Fragment::map_literal_keys(&object, &["b", "missing", "a"]);
        assert_eq!(
            fragment,
            Fragment::MapLiteral(vec![("b".into(), json!(2)), ("a".into(), json!(1))])
        );
    }
}
