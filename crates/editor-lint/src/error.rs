use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced by the linting core.
pub enum LintError {
    #[error("invalid change {from}..{to} for a document of length {len}")]
    /// An edit range is reversed or reaches past the end of the document.
    InvalidChange {
        /// Edit start offset (chars).
        from: usize,
        /// Edit end offset (chars).
        to: usize,
        /// Document length the change was built against.
        len: usize,
    },

    #[error("overlapping changes at offset {0}")]
    /// Two edits of the same change set overlap.
    OverlappingChanges(usize),

    #[error("change set expects a document of length {expected}, found {actual}")]
    /// A change set was applied to a document it was not built for.
    LengthMismatch {
        /// Length recorded in the change set.
        expected: usize,
        /// Actual document length.
        actual: usize,
    },

    #[error("diagnostic has no action at index {0}")]
    /// An action index does not exist on the diagnostic.
    UnknownAction(usize),

    #[error("diagnostic source failed: {0}")]
    /// The diagnostic source returned an error. Previously published diagnostics are kept.
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}
