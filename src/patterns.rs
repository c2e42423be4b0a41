//! Node and relationship pattern helpers.
//!
//! Labels and relationship types are trusted identifiers supplied by the
//! mapping layer, rendered as raw text; property values go through the
//! parameter table like everything else.

use crate::cypher;
use crate::fragment::{Fragment, Var};
use serde_json::{Map, Value};

/// Direction of a relationship pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outgoing,
    Incoming,
    Undirected,
}

/// `(var:Label)`, or `(var:Label {k:{p}})` when properties are given.
pub fn node(var: Var, label: &str, properties: Option<&Map<String, Value>>) -> Fragment {
    match properties {
        Some(props) if !props.is_empty() => {
            cypher!("(" {var} ":" {Fragment::raw(label)} " {" {Fragment::map_literal(props)} "})")
        }
        _ => cypher!("(" {var} ":" {Fragment::raw(label)} ")"),
    }
}

/// `-[var:TYPE]->`, `<-[var:TYPE]-` or `-[var:TYPE]-`.
pub fn relationship(var: Var, rel_type: &str, direction: Direction) -> Fragment {
    let from = if direction == Direction::Incoming { "<-" } else { "-" };
    let to = if direction == Direction::Outgoing { "->" } else { "-" };
    cypher!({Fragment::raw(from)} "[" {var} ":" {Fragment::raw(rel_type)} "]" {Fragment::raw(to)})
}
