//! A total order over syntax trees.
//!
//! The order only needs to be deterministic so bound lists can be sorted and
//! deduplicated; it carries no meaning beyond that. Types of different
//! variants are ordered by [`Type::tag`].

use std::cmp::Ordering;

use implfold_syntax::{FnPath, TraitBound, Type, TypeParamBound, TypePath};

/// Lexicographic comparison of two sequences.
///
/// Shared positions decide first, then the shorter sequence sorts first.
/// Sequences of equal length settle on their last elements.
pub fn compare_slice<T>(a: &[T], b: &[T], mut compare: impl FnMut(&T, &T) -> Ordering) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        let ord = compare(x, y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    match a.len().cmp(&b.len()) {
        Ordering::Equal => match (a.last(), b.last()) {
            (Some(x), Some(y)) => compare(x, y),
            _ => Ordering::Equal,
        },
        unequal => unequal,
    }
}

pub fn compare_type(a: &Type, b: &Type) -> Ordering {
    a.tag().cmp(b.tag()).then_with(|| match (a, b) {
        (Type::Never, Type::Never) => Ordering::Equal,
        (Type::Path(a), Type::Path(b)) => compare_type_path(a, b),
        (Type::Tuple(a), Type::Tuple(b)) => compare_slice(a, b, compare_type),
        (
            Type::Array {
                element: element_a,
                size: size_a,
            },
            Type::Array {
                element: element_b,
                size: size_b,
            },
        ) => compare_type(element_a, element_b).then(size_a.cmp(size_b)),
        (Type::Slice(a), Type::Slice(b)) => compare_type(a, b),
        (
            Type::Pointer {
                mutable: mutable_a,
                element: element_a,
            },
            Type::Pointer {
                mutable: mutable_b,
                element: element_b,
            },
        ) => mutable_a
            .cmp(mutable_b)
            .then_with(|| compare_type(element_a, element_b)),
        (
            Type::Reference {
                lifetime: lifetime_a,
                mutable: mutable_a,
                element: element_a,
            },
            Type::Reference {
                lifetime: lifetime_b,
                mutable: mutable_b,
                element: element_b,
            },
        ) => lifetime_a
            .cmp(lifetime_b)
            .then(mutable_a.cmp(mutable_b))
            .then_with(|| compare_type(element_a, element_b)),
        (Type::ImplTrait(a), Type::ImplTrait(b))
        | (Type::TraitObject(a), Type::TraitObject(b)) => {
            compare_slice(a, b, compare_type_param_bound)
        }
        (Type::ImplTraitOneBound(a), Type::ImplTraitOneBound(b))
        | (Type::TraitObjectOneBound(a), Type::TraitObjectOneBound(b)) => compare_trait_bound(a, b),
        _ => unreachable!("types with equal tags are the same variant"),
    })
}

/// Paths compare by their segments, then by their type arguments.
/// Lifetime arguments never take part.
pub fn compare_type_path(a: &TypePath, b: &TypePath) -> Ordering {
    match (a, b) {
        (TypePath::Path(a), TypePath::Path(b)) => a.segments.cmp(&b.segments).then_with(|| {
            compare_slice(&a.type_args(), &b.type_args(), |x, y| compare_type(x, y))
        }),
        (TypePath::Fn(a), TypePath::Fn(b)) => compare_fn_path(a, b),
        (TypePath::Path(_), TypePath::Fn(_)) => Ordering::Less,
        (TypePath::Fn(_), TypePath::Path(_)) => Ordering::Greater,
    }
}

fn compare_fn_path(a: &FnPath, b: &FnPath) -> Ordering {
    a.name
        .cmp(&b.name)
        .then_with(|| a.modifiers.cmp(&b.modifiers))
        .then_with(|| compare_slice(&a.inputs, &b.inputs, compare_type))
        .then_with(|| match (&a.output, &b.output) {
            (Some(a), Some(b)) => compare_type(a, b),
            (a, b) => a.is_some().cmp(&b.is_some()),
        })
}

/// Lifetimes sort before trait bounds, required bounds before relaxed ones.
pub fn compare_type_param_bound(a: &TypeParamBound, b: &TypeParamBound) -> Ordering {
    match (a, b) {
        (TypeParamBound::Lifetime(a), TypeParamBound::Lifetime(b)) => a.cmp(b),
        (TypeParamBound::Lifetime(_), TypeParamBound::Trait(_)) => Ordering::Less,
        (TypeParamBound::Trait(_), TypeParamBound::Lifetime(_)) => Ordering::Greater,
        (TypeParamBound::Trait(a), TypeParamBound::Trait(b)) => compare_trait_bound(a, b),
    }
}

pub fn compare_trait_bound(a: &TraitBound, b: &TraitBound) -> Ordering {
    a.optional
        .cmp(&b.optional)
        .then_with(|| compare_type_path(&a.path, &b.path))
}

/// Sort with `compare` and drop neighbours it considers equal.
pub fn sort_dedup<T>(items: &mut Vec<T>, compare: impl Fn(&T, &T) -> Ordering) {
    items.sort_by(|a, b| compare(a, b));
    items.dedup_by(|a, b| compare(a, b) == Ordering::Equal);
}
