use thiserror::Error;

/// Errors raised while translating a filter object, before any fragment
/// compilation work occurs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredicateError {
    /// The filter was neither an object mapping nor an array of mappings.
    #[error("predicate must be an object mapping or an array of mappings (got {found})")]
    InvalidShape { found: &'static str },
    /// An alternatives array held something other than an object mapping.
    #[error("predicate alternative at index {index} must be an object mapping (got {found})")]
    InvalidAlternative { index: usize, found: &'static str },
}
