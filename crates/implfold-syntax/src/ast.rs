//! Syntax tree for implementation signatures.
//!
//! The tree mirrors the surface syntax closely: nothing is resolved and no
//! names are rewritten here. Canonicalization happens in `implfold-types`.

/// A parsed `impl` header, e.g. `impl<T: Clone> From<T> for Wrapper<T> where T: Send`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImplDecl {
    /// Generic parameters in declaration order.
    pub generics: Vec<GenericParam>,
    /// `unsafe impl ...`
    pub is_unsafe: bool,
    /// `impl !Trait for ...`
    pub negated: bool,
    /// The implemented trait. `None` for inherent impls.
    pub trait_ref: Option<TypePath>,
    pub self_ty: Type,
    pub where_clause: Option<Vec<GenericParam>>,
}

impl ImplDecl {
    pub fn is_inherent(&self) -> bool {
        self.trait_ref.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenericParam {
    Lifetime(LifetimeParam),
    Type(TypeParam),
}

impl GenericParam {
    /// The declared name. Lifetime names keep their leading `'`.
    pub fn name(&self) -> &str {
        match self {
            GenericParam::Lifetime(param) => &param.name,
            GenericParam::Type(param) => &param.name,
        }
    }

    pub fn is_lifetime(&self) -> bool {
        matches!(self, GenericParam::Lifetime(_))
    }
}

/// `'a: 'b + 'c`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LifetimeParam {
    pub name: String,
    pub bounds: Vec<String>,
}

/// `T: Clone + 'a = Default`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeParam {
    pub name: String,
    pub bounds: Vec<TypeParamBound>,
    pub default: Option<Type>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeParamBound {
    Lifetime(String),
    Trait(TraitBound),
}

impl TypeParamBound {
    pub fn as_trait(&self) -> Option<&TraitBound> {
        match self {
            TypeParamBound::Trait(bound) => Some(bound),
            TypeParamBound::Lifetime(_) => None,
        }
    }
}

/// A trait reference used as a bound. `optional` is set for relaxed bounds such as `?Sized`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraitBound {
    pub optional: bool,
    pub path: TypePath,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypePath {
    Path(Path),
    Fn(FnPath),
}

impl TypePath {
    /// A plain path without generic arguments, e.g. `Clone` or `core::marker::Send`.
    pub fn simple(segments: impl Into<String>) -> Self {
        TypePath::Path(Path {
            segments: segments.into(),
            generic_args: None,
        })
    }
}

/// `std::collections::HashMap<K, V>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    /// Segments joined with `::`.
    pub segments: String,
    /// `None` when no angle brackets were written, `Some(vec![])` for `<>`.
    pub generic_args: Option<Vec<GenericArg>>,
}

impl Path {
    /// Type-valued generic arguments, leading lifetime arguments skipped.
    pub fn type_args(&self) -> Vec<&Type> {
        self.generic_args
            .iter()
            .flatten()
            .skip_while(|arg| matches!(arg, GenericArg::Lifetime(_)))
            .filter_map(GenericArg::as_type)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenericArg {
    Lifetime(String),
    Type(Type),
}

impl GenericArg {
    pub fn as_type(&self) -> Option<&Type> {
        match self {
            GenericArg::Type(ty) => Some(ty),
            GenericArg::Lifetime(_) => None,
        }
    }
}

/// Function-like paths: `fn(A) -> B`, `extern "C" fn(A)`, `FnMut(&T) -> bool`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FnPath {
    /// `unsafe`, `extern` and `"C"` tokens joined by single spaces.
    pub modifiers: String,
    pub name: String,
    pub inputs: Vec<Type>,
    pub output: Option<Box<Type>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Never,
    Path(TypePath),
    Tuple(Vec<Type>),
    Array { element: Box<Type>, size: u64 },
    Slice(Box<Type>),
    Pointer { mutable: bool, element: Box<Type> },
    Reference {
        lifetime: Option<String>,
        mutable: bool,
        element: Box<Type>,
    },
    ImplTrait(Vec<TypeParamBound>),
    TraitObject(Vec<TypeParamBound>),
    ImplTraitOneBound(TraitBound),
    TraitObjectOneBound(TraitBound),
}

impl Type {
    /// Name of the variant. Variants are ordered by this name when sorting types.
    pub fn tag(&self) -> &'static str {
        match self {
            Type::Never => "never",
            Type::Path(_) => "typePath",
            Type::Tuple(_) => "tuple",
            Type::Array { .. } => "array",
            Type::Slice(_) => "slice",
            Type::Pointer { .. } => "pointer",
            Type::Reference { .. } => "reference",
            Type::ImplTrait(_) => "implTrait",
            Type::TraitObject(_) => "traitObject",
            Type::ImplTraitOneBound(_) => "implTraitOneBound",
            Type::TraitObjectOneBound(_) => "traitObjectOneBound",
        }
    }

    pub fn path(segments: impl Into<String>) -> Self {
        Type::Path(TypePath::simple(segments))
    }
}
