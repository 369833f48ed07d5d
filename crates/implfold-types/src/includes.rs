//! The "at least as general as" relation between normalized impls.
//!
//! `includes(a, b)` holds when `a` could stand in for `b` as the representative
//! of a family of generated impls. It is reflexive but neither symmetric nor
//! antisymmetric, and it is a heuristic rather than subtyping: a longer
//! tuple or argument list includes a shorter one whose positions it covers,
//! so `(T0, T1, T2)` includes `(T0, T1)`.

use implfold_syntax::{FnPath, TraitBound, Type, TypeParamBound, TypePath};

use crate::normalize::NormalizedImpl;

/// `a` includes `b` when every shared position is included, `a` is at
/// least as long, and a non-empty `a` is not matched against an empty `b`.
pub fn includes_slice<T>(a: &[T], b: &[T], mut include: impl FnMut(&T, &T) -> bool) -> bool {
    if !a.iter().zip(b).all(|(x, y)| include(x, y)) {
        return false;
    }
    if !a.is_empty() && b.is_empty() {
        return false;
    }
    a.len() >= b.len()
}

pub fn includes(a: &NormalizedImpl, b: &NormalizedImpl) -> bool {
    if a.negated != b.negated {
        return false;
    }
    if let (Some(trait_a), Some(trait_b)) = (&a.trait_ref, &b.trait_ref) {
        if !includes_type_path(trait_a, trait_b) {
            return false;
        }
    }
    includes_type(&a.self_ty, &b.self_ty)
}

pub fn includes_type(a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Never, Type::Never) => true,
        (Type::Path(a), Type::Path(b)) => includes_type_path(a, b),
        (Type::Tuple(a), Type::Tuple(b)) => includes_slice(a, b, includes_type),
        (
            Type::Array {
                element: element_a,
                size: size_a,
            },
            Type::Array {
                element: element_b,
                size: size_b,
            },
        ) => size_a >= size_b && includes_type(element_a, element_b),
        (Type::Slice(a), Type::Slice(b)) => includes_type(a, b),
        (
            Type::Pointer {
                mutable: mutable_a,
                element: element_a,
            },
            Type::Pointer {
                mutable: mutable_b,
                element: element_b,
            },
        ) => mutable_a == mutable_b && includes_type(element_a, element_b),
        // Lifetimes are not compared.
        (
            Type::Reference {
                mutable: mutable_a,
                element: element_a,
                ..
            },
            Type::Reference {
                mutable: mutable_b,
                element: element_b,
                ..
            },
        ) => mutable_a == mutable_b && includes_type(element_a, element_b),
        (Type::ImplTrait(a), Type::ImplTrait(b))
        | (Type::TraitObject(a), Type::TraitObject(b)) => includes_bounds(a, b),
        (Type::ImplTraitOneBound(a), Type::ImplTraitOneBound(b))
        | (Type::TraitObjectOneBound(a), Type::TraitObjectOneBound(b)) => {
            includes_trait_bound(a, b)
        }
        _ => false,
    }
}

pub fn includes_type_path(a: &TypePath, b: &TypePath) -> bool {
    match (a, b) {
        (TypePath::Path(a), TypePath::Path(b)) => {
            a.segments == b.segments
                && includes_slice(&a.type_args(), &b.type_args(), |x, y| includes_type(x, y))
        }
        (TypePath::Fn(a), TypePath::Fn(b)) => includes_fn_path(a, b),
        _ => false,
    }
}

fn includes_fn_path(a: &FnPath, b: &FnPath) -> bool {
    a.name == b.name
        && a.modifiers == b.modifiers
        && includes_slice(&a.inputs, &b.inputs, includes_type)
        && match (&a.output, &b.output) {
            (Some(a), Some(b)) => includes_type(a, b),
            (None, None) => true,
            _ => false,
        }
}

fn includes_trait_bound(a: &TraitBound, b: &TraitBound) -> bool {
    if !a.optional && b.optional {
        return false;
    }
    includes_type_path(&a.path, &b.path)
}

/// Bound lists compare their trait bounds only; lifetimes are skipped.
fn includes_bounds(a: &[TypeParamBound], b: &[TypeParamBound]) -> bool {
    includes_slice(&trait_bounds(a), &trait_bounds(b), |x, y| {
        includes_trait_bound(x, y)
    })
}

fn trait_bounds(bounds: &[TypeParamBound]) -> Vec<&TraitBound> {
    bounds
        .iter()
        .skip_while(|bound| matches!(bound, TypeParamBound::Lifetime(_)))
        .filter_map(TypeParamBound::as_trait)
        .collect()
}
