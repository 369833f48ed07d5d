//! Folding families of generated implementations behind one representative.
//!
//! Documentation pages often list the same impl once per tuple arity or
//! function-pointer arity. [`cluster`] groups such listings so a renderer can
//! show the most general one and hide the rest; [`collapse`] runs that whole
//! pass against a [`Renderer`].

pub mod cluster;
pub mod error;
pub mod render;

pub use cluster::{cluster, Clusterer, Group, Member, MemberKind};
pub use error::{GroupError, GroupResult};
pub use render::{collapse, Renderer};
