//! Parsing of implementation signatures as rendered in generated API docs.
//!
//! The grammar is a deliberately small subset of Rust's `impl` header syntax:
//! enough for the signatures documentation generators emit, without const
//! generics, qualified paths or associated type constraints.
//!
//! ```
//! use implfold_syntax::{parse_impl, Type};
//!
//! let decl = parse_impl("impl<A, B> Trait for (A, B)").unwrap();
//! assert!(matches!(decl.self_ty, Type::Tuple(ref elements) if elements.len() == 2));
//! ```

pub mod ast;
pub mod display;
pub mod error;
pub mod parser;

pub use ast::*;
pub use error::{ParseError, Position};
pub use parser::{parse_impl, ImplParser};
