//! Canonicalization and comparison of implementation signatures.
//!
//! Signatures parsed by `implfold-syntax` are normalized so that parameter
//! names and bound placement no longer matter, then compared with a total
//! order (for sorting bound lists) and a partial "includes" relation (for
//! deciding whether one signature generalizes another).

// Declare modules
pub mod compare;
pub mod error;
pub mod includes;
pub mod normalize;

// Re-export key types for external use
pub use compare::{compare_type, compare_type_param_bound, sort_dedup};
pub use error::{InvariantViolation, NormalizeResult};
pub use includes::{includes, includes_type};
pub use normalize::{normalize, NormalizedImpl};
