use thiserror::Error;

/// Errors raised while compiling a fragment tree.
///
/// All compiler errors are synchronous and surface before any statement
/// text or parameter table is returned; there is no partial result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// Fragment nesting ran past the structural bound. An owned tree cannot
    /// contain a true cycle, so this fires only on runaway nesting.
    #[error("fragment tree exceeds maximum nesting depth of {max}")]
    DepthExceeded { max: usize },
    /// A composite fragment broke the alternation invariant
    /// (`literals.len() == values.len() + 1`).
    #[error("malformed composite: {literals} literal segments for {values} embedded values")]
    MalformedComposite { literals: usize, values: usize },
}
