//! Fragment-tree compiler.
//!
//! Walks a [`Fragment`] tree under a per-pass [`Scope`] and emits a
//! [`CompiledQuery`]: the statement text plus the table of parameter
//! bindings a driver executes it with. Compound fragments compile in a
//! derived naming frame, so arbitrarily nested sub-queries never collide on
//! placeholder names.

mod errors;
mod scope;

pub use errors::CompileError;
pub use scope::Scope;

use crate::fragment::Fragment;
use serde::Serialize;
use serde_json::{Map, Value};

/// Options for one compilation pass.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Prefix for generated placeholder and pattern-variable names.
    pub placeholder_prefix: String,
    /// Structural bound on fragment nesting.
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            placeholder_prefix: "p".to_string(),
            max_depth: 64,
        }
    }
}

/// A fully compiled statement plus its parameter bindings, handed verbatim
/// to the database driver. The parameter table keeps insertion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    pub statement: String,
    pub parameters: Map<String, Value>,
}

/// Compiles a fragment tree with default options.
pub fn compile(fragment: &Fragment) -> Result<CompiledQuery, CompileError> {
    compile_with(fragment, &CompileOptions::default())
}

/// Compiles a fragment tree. Each call owns its naming state, so
/// independent compilations can run concurrently without coordination.
pub fn compile_with(
    fragment: &Fragment,
    options: &CompileOptions,
) -> Result<CompiledQuery, CompileError> {
    let mut table = scope::NameTable::default();
    let mut root = Scope::root(&mut table, &options.placeholder_prefix);
    let mut statement = String::new();
    let mut parameters = Map::new();
    emit(
        fragment,
        &mut root,
        0,
        options.max_depth,
        &mut statement,
        &mut parameters,
    )?;
    let statement = cleanup(&statement);
    log::debug!("compiled statement: {statement}");
    Ok(CompiledQuery {
        statement,
        parameters,
    })
}

fn emit(
    fragment: &Fragment,
    scope: &mut Scope<'_>,
    depth: usize,
    max_depth: usize,
    out: &mut String,
    parameters: &mut Map<String, Value>,
) -> Result<(), CompileError> {
    if depth > max_depth {
        return Err(CompileError::DepthExceeded { max: max_depth });
    }
    match fragment {
        Fragment::Literal(text) | Fragment::Raw(text) => out.push_str(text),
        Fragment::Var(var) => out.push_str(&scope.assign(*var)),
        Fragment::Param(value) => {
            let name = scope.fresh();
            push_placeholder(out, &name);
            let previous = parameters.insert(name, value.clone());
            debug_assert!(previous.is_none(), "placeholder name collision");
        }
        Fragment::Composite { literals, values } => {
            if literals.len() != values.len() + 1 {
                return Err(CompileError::MalformedComposite {
                    literals: literals.len(),
                    values: values.len(),
                });
            }
            for (index, value) in values.iter().enumerate() {
                out.push_str(&literals[index]);
                emit_embedded(value, scope, index, depth, max_depth, out, parameters)?;
            }
            if let Some(trailing) = literals.last() {
                out.push_str(trailing);
            }
        }
        Fragment::Spread(items) => {
            for (index, item) in items.iter().enumerate() {
                emit_embedded(item, scope, index, depth, max_depth, out, parameters)?;
            }
        }
        Fragment::MapLiteral(pairs) => {
            for (index, (key, value)) in pairs.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                out.push_str(key);
                out.push(':');
                let name = scope.fresh();
                push_placeholder(out, &name);
                let previous = parameters.insert(name, value.clone());
                debug_assert!(previous.is_none(), "placeholder name collision");
            }
        }
    }
    Ok(())
}

/// Compound fragments get a namespace of their own; leaves resolve against
/// the frame that embeds them.
fn emit_embedded(
    value: &Fragment,
    scope: &mut Scope<'_>,
    index: usize,
    depth: usize,
    max_depth: usize,
    out: &mut String,
    parameters: &mut Map<String, Value>,
) -> Result<(), CompileError> {
    match value {
        Fragment::Composite { .. } | Fragment::Spread(_) | Fragment::MapLiteral(_) => {
            let mut child = scope.child(index);
            emit(value, &mut child, depth + 1, max_depth, out, parameters)
        }
        leaf => emit(leaf, scope, depth + 1, max_depth, out, parameters),
    }
}

fn push_placeholder(out: &mut String, name: &str) {
    out.push('{');
    out.push_str(name);
    out.push('}');
}

/// Cosmetic whitespace cleanup: trim every line, drop blank lines.
/// Statement semantics and parameter identity are untouched.
fn cleanup(statement: &str) -> String {
    statement
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
