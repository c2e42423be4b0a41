//! Trailing ORDER BY / SKIP / LIMIT builders.
//!
//! Ordering fields are trusted identifiers supplied by the mapping layer
//! and may carry a direction suffix (`"idx ASC"`); counts render as raw
//! text because they are typed integers, never external strings.

use crate::cypher;
use crate::fragment::{Fragment, Var};

/// Trailing-clause options for a find-style query.
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// Ordering fields in output order; empty means no ORDER BY.
    pub order: Vec<String>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

/// `ORDER BY var.f1, var.f2, …` preserving input order; empty input (or
/// all-empty entries) yields an empty fragment.
pub fn order<S: AsRef<str>>(var: Var, fields: &[S]) -> Fragment {
    let mut clause: Option<Fragment> = None;
    for field in fields {
        let field = field.as_ref();
        if field.is_empty() {
            continue;
        }
        let entry = cypher!({var} "." {Fragment::raw(field)});
        clause = Some(match clause {
            Some(acc) => cypher!({acc} ", " {entry}),
            None => cypher!("ORDER BY " {entry}),
        });
    }
    clause.unwrap_or_else(Fragment::empty)
}

/// `SKIP n` for a non-zero count, else nothing.
pub fn offset(count: Option<u64>) -> Fragment {
    match count {
        Some(n) if n > 0 => Fragment::raw(format!("SKIP {n}")),
        _ => Fragment::empty(),
    }
}

/// `LIMIT n` for a non-zero count, else nothing.
pub fn limit(count: Option<u64>) -> Fragment {
    match count {
        Some(n) if n > 0 => Fragment::raw(format!("LIMIT {n}")),
        _ => Fragment::empty(),
    }
}

/// The three trailing clauses on separate lines; statement cleanup drops
/// the blank ones.
pub fn page_clause(var: Var, page: &Page) -> Fragment {
    cypher!(
        "\n" {order(var, &page.order)}
        "\n" {offset(page.offset)}
        "\n" {limit(page.limit)}
    )
}
