//! Canonicalization of parsed signatures.
//!
//! Two signatures that differ only in the names chosen for their type
//! parameters, or in whether bounds were written inline or in a `where`
//! clause, normalize to the same trait and self type.

use indexmap::IndexMap;
use log::trace;
use rustc_hash::FxHashMap;

use implfold_syntax::{
    FnPath, GenericArg, GenericParam, ImplDecl, Path, TraitBound, Type, TypeParamBound, TypePath,
};

use crate::compare::{compare_type_param_bound, sort_dedup};
use crate::error::{InvariantViolation, NormalizeResult};
use crate::includes;

/// A signature with canonical type parameter names.
///
/// `generics` keeps the names as declared; only `trait_ref` and `self_ty`
/// are rewritten. Nothing in the inclusion relation reads `generics`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImpl {
    pub generics: IndexMap<String, GenericParam>,
    pub negated: bool,
    pub trait_ref: Option<TypePath>,
    pub self_ty: Type,
}

impl NormalizedImpl {
    /// See [`includes::includes`].
    pub fn includes(&self, other: &NormalizedImpl) -> bool {
        includes::includes(self, other)
    }

    /// Equality of the parts the inclusion relation looks at.
    pub fn same_shape(&self, other: &NormalizedImpl) -> bool {
        self.negated == other.negated
            && self.trait_ref == other.trait_ref
            && self.self_ty == other.self_ty
    }
}

/// Placeholder for the type parameter declared at `index`, counting type parameters only.
pub fn canonical_name(index: usize) -> String {
    format!("T{}", index)
}

pub fn normalize(decl: ImplDecl) -> NormalizeResult<NormalizedImpl> {
    let mut generics: IndexMap<String, GenericParam> = decl
        .generics
        .into_iter()
        .map(|param| (param.name().to_string(), param))
        .collect();

    for clause in decl.where_clause.into_iter().flatten() {
        merge_where_clause(&mut generics, clause)?;
    }

    let renames: FxHashMap<String, String> = generics
        .values()
        .filter(|param| !param.is_lifetime())
        .enumerate()
        .map(|(index, param)| (param.name().to_string(), canonical_name(index)))
        .collect();
    trace!("canonical names: {:?}", renames);

    let trait_ref = decl
        .trait_ref
        .map(|path| rename_type_path(&path, &renames));
    let self_ty = rename_type(&decl.self_ty, &renames);

    Ok(NormalizedImpl {
        generics,
        negated: decl.negated,
        trait_ref,
        self_ty,
    })
}

fn merge_where_clause(
    generics: &mut IndexMap<String, GenericParam>,
    clause: GenericParam,
) -> NormalizeResult<()> {
    let Some(param) = generics.get_mut(clause.name()) else {
        return Err(InvariantViolation::UndeclaredParameter {
            name: clause.name().to_string(),
        });
    };
    match (param, clause) {
        (GenericParam::Lifetime(param), GenericParam::Lifetime(clause)) => {
            param.bounds.extend(clause.bounds);
            param.bounds.sort();
            param.bounds.dedup();
        }
        (GenericParam::Type(param), GenericParam::Type(clause)) => {
            param.bounds.extend(clause.bounds);
            sort_dedup(&mut param.bounds, compare_type_param_bound);
        }
        (_, clause) => {
            return Err(InvariantViolation::ParameterKindMismatch {
                name: clause.name().to_string(),
            })
        }
    }
    Ok(())
}

/// Rewrites every type parameter named in `renames`.
pub fn rename_type(ty: &Type, renames: &FxHashMap<String, String>) -> Type {
    match ty {
        Type::Never => Type::Never,
        Type::Path(path) => Type::Path(rename_type_path(path, renames)),
        Type::Tuple(elements) => Type::Tuple(
            elements
                .iter()
                .map(|element| rename_type(element, renames))
                .collect(),
        ),
        Type::Array { element, size } => Type::Array {
            element: Box::new(rename_type(element, renames)),
            size: *size,
        },
        Type::Slice(element) => Type::Slice(Box::new(rename_type(element, renames))),
        Type::Pointer { mutable, element } => Type::Pointer {
            mutable: *mutable,
            element: Box::new(rename_type(element, renames)),
        },
        Type::Reference {
            lifetime,
            mutable,
            element,
        } => Type::Reference {
            lifetime: lifetime.clone(),
            mutable: *mutable,
            element: Box::new(rename_type(element, renames)),
        },
        Type::ImplTrait(bounds) => Type::ImplTrait(rename_bounds(bounds, renames)),
        Type::TraitObject(bounds) => Type::TraitObject(rename_bounds(bounds, renames)),
        Type::ImplTraitOneBound(bound) => {
            Type::ImplTraitOneBound(rename_trait_bound(bound, renames))
        }
        Type::TraitObjectOneBound(bound) => {
            Type::TraitObjectOneBound(rename_trait_bound(bound, renames))
        }
    }
}

pub fn rename_type_path(path: &TypePath, renames: &FxHashMap<String, String>) -> TypePath {
    match path {
        TypePath::Path(path) => TypePath::Path(rename_path(path, renames)),
        TypePath::Fn(path) => TypePath::Fn(FnPath {
            modifiers: path.modifiers.clone(),
            name: path.name.clone(),
            inputs: path
                .inputs
                .iter()
                .map(|input| rename_type(input, renames))
                .collect(),
            output: path
                .output
                .as_ref()
                .map(|output| Box::new(rename_type(output, renames))),
        }),
    }
}

/// Only the leading segment can name a parameter: `T::Output` becomes `T0::Output`.
fn rename_path(path: &Path, renames: &FxHashMap<String, String>) -> Path {
    let (head, rest) = match path.segments.find("::") {
        Some(at) => path.segments.split_at(at),
        None => (path.segments.as_str(), ""),
    };
    let segments = match renames.get(head) {
        Some(canonical) => format!("{}{}", canonical, rest),
        None => path.segments.clone(),
    };
    let generic_args = path.generic_args.as_ref().map(|args| {
        args.iter()
            .map(|arg| match arg {
                GenericArg::Lifetime(lifetime) => GenericArg::Lifetime(lifetime.clone()),
                GenericArg::Type(ty) => GenericArg::Type(rename_type(ty, renames)),
            })
            .collect()
    });
    Path {
        segments,
        generic_args,
    }
}

fn rename_trait_bound(bound: &TraitBound, renames: &FxHashMap<String, String>) -> TraitBound {
    TraitBound {
        optional: bound.optional,
        path: rename_type_path(&bound.path, renames),
    }
}

fn rename_bounds(
    bounds: &[TypeParamBound],
    renames: &FxHashMap<String, String>,
) -> Vec<TypeParamBound> {
    bounds
        .iter()
        .map(|bound| match bound {
            TypeParamBound::Lifetime(lifetime) => TypeParamBound::Lifetime(lifetime.clone()),
            TypeParamBound::Trait(bound) => {
                TypeParamBound::Trait(rename_trait_bound(bound, renames))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;
    use implfold_syntax::parse_impl;

    fn normalized(source: &str) -> NormalizedImpl {
        let decl = parse_impl(source)
            .unwrap_or_else(|e| panic!("Expected {:?} to parse, got: {}", source, e));
        normalize(decl).expect("normalization failed")
    }

    fn header(item: &NormalizedImpl) -> String {
        match &item.trait_ref {
            Some(trait_ref) => format!("{} for {}", trait_ref, item.self_ty),
            None => item.self_ty.to_string(),
        }
    }

    #[test]
    fn test_parameter_names_are_canonical() {
        let a = normalized("impl<X, Y> Trait<X> for Wrapper<Y>");
        let b = normalized("impl<P, Q> Trait<P> for Wrapper<Q>");
        assert!(a.same_shape(&b));
        expect!["Trait<T0> for Wrapper<T1>"].assert_eq(&header(&a));
        // Declared names survive in the generics table.
        assert_eq!(a.generics.keys().collect::<Vec<_>>(), ["X", "Y"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_lifetimes_keep_their_names_and_do_not_count() {
        let item = normalized("impl<'a, A: 'a, 'b, B> Trait<'b> for &'a mut (A, B)");
        expect!["Trait<'b> for &'a mut (T0, T1)"].assert_eq(&header(&item));
    }

    #[test]
    fn test_renaming_reaches_nested_positions() {
        let item = normalized(
            "impl<F, R, E> Foo for Box<dyn Fn(&[F; 2], *const E) -> R + Send> where F: Copy",
        );
        expect!["Foo for Box<dyn Fn(&[T0; 2], *const T2) -> T1 + Send>"]
            .assert_eq(&header(&item));

        let item = normalized("impl<I> Iterator for Wrap<I::Item, Item>");
        expect!["Iterator for Wrap<T0::Item, Item>"].assert_eq(&header(&item));
    }

    #[test]
    fn test_where_clause_bounds_are_merged() {
        let inline = normalized("impl<T: Clone + Send> Foo for Bar<T>");
        let split = normalized("impl<T: Send> Foo for Bar<T> where T: Clone, T: Send");
        assert_eq!(inline.generics["T"], split.generics["T"]);
        let GenericParam::Type(param) = &split.generics["T"] else {
            panic!("expected a type parameter");
        };
        assert_eq!(param.bounds.len(), 2);
    }

    #[test]
    fn test_lifetime_where_clause_is_sorted() {
        let item = normalized("impl<'a: 'c> Foo for &'a u8 where 'a: 'b + 'c");
        let GenericParam::Lifetime(param) = &item.generics["'a"] else {
            panic!("expected a lifetime parameter");
        };
        assert_eq!(param.bounds, ["'b", "'c"]);
    }

    #[test]
    fn test_where_clause_must_name_a_declared_parameter() {
        let decl = parse_impl("impl<T> Foo for Bar<T> where U: Clone").unwrap();
        assert_eq!(
            normalize(decl),
            Err(InvariantViolation::UndeclaredParameter {
                name: "U".to_string()
            })
        );
    }

    #[test]
    fn test_where_clause_must_match_parameter_kind() {
        // Lifetime names keep their `'`, so the grammar cannot produce this
        // clash; build the tree directly.
        let decl = ImplDecl {
            generics: vec![GenericParam::Type(implfold_syntax::TypeParam {
                name: "T".to_string(),
                bounds: Vec::new(),
                default: None,
            })],
            is_unsafe: false,
            negated: false,
            trait_ref: Some(TypePath::simple("Foo")),
            self_ty: Type::path("T"),
            where_clause: Some(vec![GenericParam::Lifetime(implfold_syntax::LifetimeParam {
                name: "T".to_string(),
                bounds: vec!["'static".to_string()],
            })]),
        };
        assert_eq!(
            normalize(decl),
            Err(InvariantViolation::ParameterKindMismatch {
                name: "T".to_string()
            })
        );
    }
}
