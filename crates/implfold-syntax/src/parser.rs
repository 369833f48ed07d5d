//! Combinator grammar for implementation signatures.
//!
//! Every alternative is tried in order and rolls back on failure, so the
//! error reported for a failed input is the furthest point any alternative
//! reached, together with everything that would have been accepted there.

use std::collections::BTreeSet;

use chumsky::error::{Simple, SimpleReason};
use chumsky::prelude::*;
use chumsky::recursive::Recursive;
use chumsky::text;
use chumsky::BoxedParser;
use log::{debug, trace};
use miette::SourceSpan;

use crate::ast::*;
use crate::error::{ParseError, Position};

type Grammar<O> = BoxedParser<'static, char, O, Simple<char>>;

/// A fixed token, surrounding whitespace skipped.
fn token(tok: &'static str) -> impl Parser<char, &'static str, Error = Simple<char>> + Clone {
    just(tok).labelled(tok).padded()
}

/// A keyword that must not run on into an identifier (`mut` but not `mutex`).
fn kw(word: &'static str) -> impl Parser<char, (), Error = Simple<char>> + Clone {
    text::keyword(word).labelled(word).padded()
}

fn is_ident_char(c: &char) -> bool {
    c.is_ascii_alphanumeric() || *c == '_'
}

fn identifier() -> impl Parser<char, String, Error = Simple<char>> + Clone {
    filter(is_ident_char)
        .repeated()
        .at_least(1)
        .collect::<String>()
        .or(just("...").map(|dots: &str| dots.to_string()))
        .labelled("identifier")
        .padded()
}

fn lifetime() -> impl Parser<char, String, Error = Simple<char>> + Clone {
    just('\'')
        .ignore_then(filter(is_ident_char).repeated().at_least(1).collect::<String>())
        .map(|name| format!("'{}", name))
        .labelled("lifetime")
        .padded()
}

fn integer() -> impl Parser<char, u64, Error = Simple<char>> + Clone {
    filter(|c: &char| c.is_ascii_digit())
        .repeated()
        .at_least(1)
        .collect::<String>()
        .try_map(|digits, span| {
            digits
                .parse::<u64>()
                .map_err(|e| Simple::custom(span, format!("invalid array length: {}", e)))
        })
        .labelled("integer")
        .padded()
}

/// `impl A` / `dyn A` collapse to the one-bound forms; anything else keeps the bound list.
fn bounded_type(
    bounds: Vec<TypeParamBound>,
    one: fn(TraitBound) -> Type,
    many: fn(Vec<TypeParamBound>) -> Type,
) -> Type {
    match <[TypeParamBound; 1]>::try_from(bounds) {
        Ok([TypeParamBound::Trait(bound)]) => one(bound),
        Ok(single) => many(single.into()),
        Err(bounds) => many(bounds),
    }
}

struct Rules {
    implementation: Grammar<ImplDecl>,
    ty: Grammar<Type>,
}

fn rules() -> Rules {
    let mut ty = Recursive::<char, Type, Simple<char>>::declare();
    let mut type_no_bounds = Recursive::<char, Type, Simple<char>>::declare();

    let comma = token(",");

    let path_segments = identifier()
        .separated_by(token("::"))
        .at_least(1)
        .map(|segments| segments.join("::"))
        .boxed();

    let generic_arg = lifetime()
        .map(GenericArg::Lifetime)
        .or(ty.clone().map(GenericArg::Type));
    let generic_args = choice((
        token("<").then(token(">")).to(Vec::<GenericArg>::new()),
        generic_arg
            .separated_by(comma.clone())
            .allow_trailing()
            .at_least(1)
            .delimited_by(token("<"), token(">")),
    ))
    .boxed();

    let modifiers = choice((
        kw("unsafe").to("unsafe"),
        kw("extern").to("extern"),
        token("\"C\""),
    ))
    .repeated()
    .map(|modifiers| modifiers.join(" "));

    let fn_path = modifiers
        .then(path_segments.clone().then_ignore(token("(").rewind()))
        .then(
            ty.clone()
                .separated_by(comma.clone())
                .allow_trailing()
                .delimited_by(token("("), token(")")),
        )
        .then(token("->").ignore_then(ty.clone()).or_not())
        .map(|(((modifiers, name), inputs), output)| FnPath {
            modifiers,
            name,
            inputs,
            output: output.map(Box::new),
        });

    let path = path_segments
        .clone()
        .then(generic_args.or_not())
        .map(|(segments, generic_args)| Path {
            segments,
            generic_args,
        });

    let type_path = choice((fn_path.map(TypePath::Fn), path.map(TypePath::Path))).boxed();

    let trait_bound = token("?")
        .or_not()
        .then(type_path.clone())
        .map(|(optional, path)| TraitBound {
            optional: optional.is_some(),
            path,
        })
        .boxed();

    let type_param_bounds = lifetime()
        .map(TypeParamBound::Lifetime)
        .or(trait_bound.clone().map(TypeParamBound::Trait))
        .separated_by(token("+"))
        .at_least(1)
        .boxed();

    let lifetime_bounds = lifetime().separated_by(token("+")).at_least(1).boxed();

    ty.define(choice((
        kw("impl")
            .ignore_then(type_param_bounds.clone())
            .map(|bounds| bounded_type(bounds, Type::ImplTraitOneBound, Type::ImplTrait)),
        kw("dyn")
            .ignore_then(type_param_bounds.clone())
            .map(|bounds| bounded_type(bounds, Type::TraitObjectOneBound, Type::TraitObject)),
        type_no_bounds.clone(),
    )));

    // `[T; N]` and `[T]` share the element parse.
    let array_or_slice = ty
        .clone()
        .then(token(";").ignore_then(integer()).or_not())
        .delimited_by(token("["), token("]"))
        .map(|(element, size)| match size {
            Some(size) => Type::Array {
                element: Box::new(element),
                size,
            },
            None => Type::Slice(Box::new(element)),
        });

    let pointer = token("*")
        .ignore_then(kw("mut").to(true).or(kw("const").to(false)))
        .then(type_no_bounds.clone())
        .map(|(mutable, element)| Type::Pointer {
            mutable,
            element: Box::new(element),
        });

    let reference = token("&")
        .ignore_then(lifetime().or_not())
        .then(kw("mut").or_not().map(|m| m.is_some()))
        .then(type_no_bounds.clone())
        .map(|((lifetime, mutable), element)| Type::Reference {
            lifetime,
            mutable,
            element: Box::new(element),
        });

    type_no_bounds.define(choice((
        token("!").to(Type::Never),
        token("(").then(token(")")).to(Type::Tuple(Vec::new())),
        ty.clone()
            .separated_by(comma.clone())
            .allow_trailing()
            .at_least(1)
            .delimited_by(token("("), token(")"))
            .map(Type::Tuple),
        array_or_slice,
        pointer,
        reference,
        kw("impl")
            .ignore_then(trait_bound.clone())
            .map(Type::ImplTraitOneBound),
        kw("dyn")
            .ignore_then(trait_bound.clone())
            .map(Type::TraitObjectOneBound),
        type_path.clone().map(Type::Path),
    )));

    let lifetime_param = lifetime()
        .then(token(":").ignore_then(lifetime_bounds.clone()).or_not())
        .map(|(name, bounds)| {
            GenericParam::Lifetime(LifetimeParam {
                name,
                bounds: bounds.unwrap_or_default(),
            })
        });

    let type_param = identifier()
        .then(token(":").ignore_then(type_param_bounds.clone()).or_not())
        .then(token("=").ignore_then(ty.clone()).or_not())
        .map(|((name, bounds), default)| {
            GenericParam::Type(TypeParam {
                name,
                bounds: bounds.unwrap_or_default(),
                default,
            })
        });

    let generics = lifetime_param
        .or(type_param)
        .separated_by(comma.clone())
        .allow_trailing()
        .delimited_by(token("<"), token(">"))
        .boxed();

    let where_item = choice((
        lifetime()
            .then_ignore(token(":"))
            .then(lifetime_bounds)
            .map(|(name, bounds)| GenericParam::Lifetime(LifetimeParam { name, bounds })),
        identifier()
            .then_ignore(token(":"))
            .then(type_param_bounds)
            .map(|(name, bounds)| {
                GenericParam::Type(TypeParam {
                    name,
                    bounds,
                    default: None,
                })
            }),
    ));

    let where_clause = kw("where")
        .ignore_then(where_item.separated_by(comma).allow_trailing())
        .boxed();

    let trait_impl = kw("unsafe")
        .or_not()
        .then_ignore(kw("impl"))
        .then(generics.clone().or_not())
        .then(token("!").or_not())
        .then(type_path)
        .then_ignore(kw("for"))
        .then(ty.clone())
        .then(where_clause.clone().or_not())
        .map(
            |(((((is_unsafe, generics), negated), trait_ref), self_ty), where_clause)| ImplDecl {
                generics: generics.unwrap_or_default(),
                is_unsafe: is_unsafe.is_some(),
                negated: negated.is_some(),
                trait_ref: Some(trait_ref),
                self_ty,
                where_clause,
            },
        );

    let inherent_impl = kw("impl")
        .ignore_then(generics.or_not())
        .then(ty.clone())
        .then(where_clause.or_not())
        .map(|((generics, self_ty), where_clause)| ImplDecl {
            generics: generics.unwrap_or_default(),
            is_unsafe: false,
            negated: false,
            trait_ref: None,
            self_ty,
            where_clause,
        });

    Rules {
        implementation: choice((trait_impl, inherent_impl))
            .padded()
            .then_ignore(end())
            .boxed(),
        ty: ty.padded().then_ignore(end()).boxed(),
    }
}

/// Parser for implementation signatures.
///
/// Building the grammar allocates, so hold on to one of these when parsing
/// many signatures.
pub struct ImplParser {
    implementation: Grammar<ImplDecl>,
    ty: Grammar<Type>,
}

impl ImplParser {
    pub fn new() -> Self {
        let Rules { implementation, ty } = rules();
        Self { implementation, ty }
    }

    /// Parse a whole `impl` header. The entire input must be consumed.
    pub fn parse(&self, source: &str) -> Result<ImplDecl, ParseError> {
        trace!("parsing impl signature {:?}", source);
        self.implementation
            .parse(source)
            .map_err(|errors| furthest_error(source, errors))
    }

    /// Parse a single type, e.g. `&'a mut [T; 4]`.
    pub fn parse_type(&self, source: &str) -> Result<Type, ParseError> {
        self.ty
            .parse(source)
            .map_err(|errors| furthest_error(source, errors))
    }
}

impl Default for ImplParser {
    fn default() -> Self {
        Self::new()
    }
}

fn furthest_error(source: &str, errors: Vec<Simple<char>>) -> ParseError {
    let error = errors
        .into_iter()
        .max_by_key(|e| e.span().start)
        .map(|e| convert_error(source, e))
        .unwrap_or_else(|| {
            let position = Position::from_char_index(source, 0);
            ParseError {
                position,
                expected: BTreeSet::new(),
                found: None,
                span: SourceSpan::new(0.into(), 0),
            }
        });
    debug!("failed to parse {:?}: {}", source, error);
    error
}

fn convert_error(source: &str, error: Simple<char>) -> ParseError {
    let span = error.span();
    let position = Position::from_char_index(source, span.start);
    let end = Position::from_char_index(source, span.end).offset.max(position.offset);

    let mut expected: BTreeSet<String> = error
        .expected()
        .map(|expected| match expected {
            Some(c) => format!("{:?}", c),
            None => "end of input".to_string(),
        })
        .collect();
    if let Some(label) = error.label() {
        expected.insert(label.to_string());
    }
    if let SimpleReason::Custom(message) = error.reason() {
        expected.insert(message.clone());
    }

    ParseError {
        position,
        expected,
        found: error.found().map(|c| format!("{:?}", c)),
        span: SourceSpan::new(position.offset.into(), end - position.offset),
    }
}

/// Parse one signature with a freshly built grammar.
pub fn parse_impl(source: &str) -> Result<ImplDecl, ParseError> {
    ImplParser::new().parse(source)
}
