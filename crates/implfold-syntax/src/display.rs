//! Canonical surface syntax for syntax trees.
//!
//! The output is always accepted by [`crate::ImplParser`] and parses back to
//! an equal tree. It is not byte-identical to the original input: whitespace
//! is normalized and one-element tuples always carry a trailing comma.

use std::fmt::{self, Display, Formatter};

use crate::ast::*;

fn join<T: Display>(f: &mut Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl Display for ImplDecl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_unsafe {
            f.write_str("unsafe ")?;
        }
        f.write_str("impl")?;
        if !self.generics.is_empty() {
            f.write_str("<")?;
            join(f, &self.generics, ", ")?;
            f.write_str(">")?;
        }
        f.write_str(" ")?;
        if let Some(trait_ref) = &self.trait_ref {
            if self.negated {
                f.write_str("!")?;
            }
            write!(f, "{} for ", trait_ref)?;
        }
        write!(f, "{}", self.self_ty)?;
        if let Some(where_clause) = &self.where_clause {
            f.write_str(" where ")?;
            join(f, where_clause, ", ")?;
        }
        Ok(())
    }
}

impl Display for GenericParam {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            GenericParam::Lifetime(param) => write!(f, "{}", param),
            GenericParam::Type(param) => write!(f, "{}", param),
        }
    }
}

impl Display for LifetimeParam {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.bounds.is_empty() {
            write!(f, ": {}", self.bounds.join(" + "))?;
        }
        Ok(())
    }
}

impl Display for TypeParam {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.bounds.is_empty() {
            f.write_str(": ")?;
            join(f, &self.bounds, " + ")?;
        }
        if let Some(default) = &self.default {
            write!(f, " = {}", default)?;
        }
        Ok(())
    }
}

impl Display for TypeParamBound {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeParamBound::Lifetime(lifetime) => f.write_str(lifetime),
            TypeParamBound::Trait(bound) => write!(f, "{}", bound),
        }
    }
}

impl Display for TraitBound {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.optional {
            f.write_str("?")?;
        }
        write!(f, "{}", self.path)
    }
}

impl Display for TypePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypePath::Path(path) => write!(f, "{}", path),
            TypePath::Fn(path) => write!(f, "{}", path),
        }
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments)?;
        if let Some(args) = &self.generic_args {
            f.write_str("<")?;
            join(f, args, ", ")?;
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl Display for GenericArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            GenericArg::Lifetime(lifetime) => f.write_str(lifetime),
            GenericArg::Type(ty) => write!(f, "{}", ty),
        }
    }
}

impl Display for FnPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if !self.modifiers.is_empty() {
            write!(f, "{} ", self.modifiers)?;
        }
        write!(f, "{}(", self.name)?;
        join(f, &self.inputs, ", ")?;
        f.write_str(")")?;
        if let Some(output) = &self.output {
            write!(f, " -> {}", output)?;
        }
        Ok(())
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Type::Never => f.write_str("!"),
            Type::Path(path) => write!(f, "{}", path),
            Type::Tuple(elements) => {
                f.write_str("(")?;
                join(f, elements, ", ")?;
                if elements.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Type::Array { element, size } => write!(f, "[{}; {}]", element, size),
            Type::Slice(element) => write!(f, "[{}]", element),
            Type::Pointer { mutable, element } => {
                let kind = if *mutable { "mut" } else { "const" };
                write!(f, "*{} {}", kind, element)
            }
            Type::Reference {
                lifetime,
                mutable,
                element,
            } => {
                f.write_str("&")?;
                if let Some(lifetime) = lifetime {
                    write!(f, "{} ", lifetime)?;
                }
                if *mutable {
                    f.write_str("mut ")?;
                }
                write!(f, "{}", element)
            }
            Type::ImplTrait(bounds) => {
                f.write_str("impl ")?;
                join(f, bounds, " + ")
            }
            Type::TraitObject(bounds) => {
                f.write_str("dyn ")?;
                join(f, bounds, " + ")
            }
            Type::ImplTraitOneBound(bound) => write!(f, "impl {}", bound),
            Type::TraitObjectOneBound(bound) => write!(f, "dyn {}", bound),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parse_impl;
    use expect_test::expect;

    fn canonical(source: &str) -> String {
        parse_impl(source)
            .unwrap_or_else(|e| panic!("Expected {:?} to parse, got: {}", source, e))
            .to_string()
    }

    #[test]
    fn test_canonical_spacing() {
        expect!["impl<A, B> Trait for (A, B)"].assert_eq(&canonical("impl<A,B>Trait for(A,B)"));
        expect!["impl<A> Trait for (A,)"].assert_eq(&canonical("impl<A> Trait for (A)"));
        expect!["unsafe impl<T: ?Sized + Sync> Send for &'a T"]
            .assert_eq(&canonical("unsafe impl<T:?Sized+Sync> Send for &'a T"));
    }

    #[test]
    fn test_canonical_where_clause_and_fn_paths() {
        expect![[r#"impl<Ret, A> PartialEq for extern "C" fn(A) -> Ret where A: Eq, 'a: 'b"#]]
            .assert_eq(&canonical(
                "impl<Ret,A> PartialEq for extern \"C\" fn(A)->Ret where A:Eq,'a:'b",
            ));
        expect!["impl !Send for *mut [u8; 4]"].assert_eq(&canonical("impl !Send for *mut [u8;4]"));
    }

    #[test]
    fn test_canonical_empty_forms() {
        expect!["impl Foo<> for ()"].assert_eq(&canonical("impl Foo<> for ( )"));
        expect!["impl Trait for dyn Any + Send"].assert_eq(&canonical("impl Trait for dyn Any+Send"));
    }
}
