//! cyphergen - template-fragment compiler for parameterized Cypher
//!
//! This crate is the query-compilation core of a graph data-mapping layer:
//! - [`fragment`] - the immutable query template model and construction API
//! - [`compiler`] - fragment trees to `{ statement, parameters }` pairs
//! - [`predicate`] - structured filter objects to boolean condition fragments
//! - [`pagination`] - ORDER BY / SKIP / LIMIT builders
//! - [`patterns`] - node and relationship pattern helpers
//!
//! Every statement is fully parameterized for user-supplied data; only
//! internally controlled identifiers (labels, property keys) appear as raw
//! text. The compiled output is handed verbatim to a database driver - this
//! crate never executes anything itself.

pub mod compiler;
pub mod fragment;
pub mod pagination;
pub mod patterns;
pub mod predicate;

pub use compiler::{compile, compile_with, CompileError, CompileOptions, CompiledQuery};
pub use fragment::{Fragment, Part, Var};
pub use predicate::{where_clause, PredicateError};
