//! Per-pass naming authority.

use crate::fragment::Var;
use std::collections::HashMap;

/// Identity table shared by every scope frame within one compilation pass.
/// Maps a pattern-variable token to its generated name.
#[derive(Debug, Default)]
pub(crate) struct NameTable {
    vars: HashMap<u64, String>,
}

/// One naming frame of a compilation pass.
///
/// Frames form a tree mirroring the fragment tree: [`Scope::child`] derives
/// a frame whose generated names are disjoint from the parent's and from
/// any sibling derived at a different index. Name generation is purely
/// structural (`path + counter`), so no counter is shared across frames and
/// independent top-level compilations never need to coordinate.
#[derive(Debug)]
pub struct Scope<'a> {
    table: &'a mut NameTable,
    path: String,
    next: usize,
}

impl<'a> Scope<'a> {
    pub(crate) fn root(table: &'a mut NameTable, prefix: &str) -> Self {
        Scope {
            table,
            path: prefix.to_string(),
            next: 0,
        }
    }

    /// Resolves a pattern-variable token to its generated name, assigning a
    /// fresh one on first sight. The same token resolves to the same name
    /// throughout the pass, no matter which frame first saw it.
    pub fn assign(&mut self, var: Var) -> String {
        if let Some(name) = self.table.vars.get(&var.id()) {
            return name.clone();
        }
        let name = self.next_name();
        self.table.vars.insert(var.id(), name.clone());
        name
    }

    /// Generates the next placeholder name owned by this frame.
    pub fn fresh(&mut self) -> String {
        self.next_name()
    }

    /// Derives the frame for the embedded fragment at `index`.
    pub fn child(&mut self, index: usize) -> Scope<'_> {
        let path = format!("{}{}_", self.path, index);
        Scope {
            table: &mut *self.table,
            path,
            next: 0,
        }
    }

    fn next_name(&mut self) -> String {
        let name = format!("{}{}", self.path, self.next);
        self.next += 1;
        name
    }
}
