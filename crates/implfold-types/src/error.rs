use miette::Diagnostic;
use thiserror::Error;

/// Result type for normalization
pub type NormalizeResult<T> = Result<T, InvariantViolation>;

/// A parsed signature that cannot be normalized.
///
/// These indicate malformed input rather than a bug: the grammar accepts
/// where-clauses that refer to anything, but normalization only knows how to
/// merge them into parameters the signature declares.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum InvariantViolation {
    /// The where-clause constrains a parameter that is not declared
    #[error("where-clause refers to undeclared generic parameter `{name}`")]
    #[diagnostic(
        code(implfold_types::undeclared_parameter),
        help("declare the parameter in the impl's generic list")
    )]
    UndeclaredParameter {
        /// Parameter name as written in the where-clause
        name: String,
    },

    /// The where-clause uses a lifetime as a type parameter or vice versa
    #[error("where-clause bound on `{name}` does not match the parameter's kind")]
    #[diagnostic(code(implfold_types::parameter_kind_mismatch))]
    ParameterKindMismatch {
        /// Parameter name as written in the where-clause
        name: String,
    },
}
