use implfold_types::InvariantViolation;
use miette::Diagnostic;
use thiserror::Error;

/// Result type for clustering
pub type GroupResult<T> = Result<T, GroupError>;

/// Errors that stop the clustering loop.
///
/// Signatures that fail to parse are not errors here; they end up in their
/// own unparsed group.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum GroupError {
    #[error("cannot normalize signature {text:?}")]
    #[diagnostic(code(implfold_group::normalize))]
    Normalize {
        /// The signature as it was pushed
        text: String,
        #[source]
        #[diagnostic_source]
        source: InvariantViolation,
    },
}
