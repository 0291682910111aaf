//! Grammar descriptors — the declarative shape of every node kind.
//!
//! A descriptor is plain data: an ordered list of [`FieldSpec`]s. Generic
//! algorithms read it to validate a node's fields ([`check`]), to fill in
//! the missing half of a paired optional field ([`materialize_fallbacks`]) and
//! to drop a half left behind by a removal ([`release_orphans`]).
//! Nothing in here is written per kind except the tables themselves.

use std::fmt;

use super::error::ShapeError;
use super::kind::{NodeKind, Sym};
use super::node::{Field, Node};
use super::token::Token;

/// The ordered field specs of one node kind.
pub type Grammar = &'static [FieldSpec];

#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub shape: Shape,
}

#[derive(Clone, Copy, Debug)]
pub enum Shape {
    /// Exactly one node admitted by one of the permits.
    One(&'static [Permit]),
    /// Zero or one node. When paired, the field must be present whenever
    /// the named sibling is.
    Optional {
        permits: &'static [Permit],
        pair: Option<Pair>,
    },
    /// An ordered list whose elements may mix any of the permits.
    List {
        non_empty: bool,
        permits: &'static [Permit],
    },
}

/// The both-or-neither link between two optional fields.
#[derive(Clone, Copy)]
pub struct Pair {
    pub sibling: &'static str,
    /// Builds the missing value, given the sibling that is present. Fields
    /// without a factory (a borrowed member name, a bind's value) cannot be
    /// invented, so removing them drops the sibling instead.
    pub make: Option<fn(&Node) -> Node>,
}

impl fmt::Debug for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pair")
            .field("sibling", &self.sibling)
            .field("make", &self.make.is_some())
            .finish()
    }
}

/// What a field slot may hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permit {
    Kind(NodeKind),
    Sym(Sym),
    /// Any expression kind.
    Expression,
    /// Any function, structure or stream definition.
    Definition,
}

impl Permit {
    pub fn admits(self, node: &Node) -> bool {
        match self {
            Permit::Kind(kind) => node.kind() == kind,
            Permit::Sym(sym) => node.is_symbol(sym),
            Permit::Expression => node.kind().is_expression(),
            Permit::Definition => node.kind().is_definition(),
        }
    }
}

impl fmt::Display for Permit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permit::Kind(kind) => write!(f, "{kind}"),
            Permit::Sym(sym) => write!(f, "{sym:?}"),
            Permit::Expression => f.write_str("expression"),
            Permit::Definition => f.write_str("definition"),
        }
    }
}

// ============================================================================
// DESCRIPTOR TABLES
// ============================================================================

const fn one(name: &'static str, permits: &'static [Permit]) -> FieldSpec {
    FieldSpec { name, shape: Shape::One(permits) }
}

const fn maybe(name: &'static str, permits: &'static [Permit]) -> FieldSpec {
    FieldSpec {
        name,
        shape: Shape::Optional { permits, pair: None },
    }
}

const fn paired(name: &'static str, permits: &'static [Permit], sibling: &'static str, make: fn(&Node) -> Node) -> FieldSpec {
    FieldSpec {
        name,
        shape: Shape::Optional {
            permits,
            pair: Some(Pair {
                sibling,
                make: Some(make),
            }),
        },
    }
}

/// Paired with `sibling`, but with no value that could stand in for it.
const fn bound(name: &'static str, permits: &'static [Permit], sibling: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        shape: Shape::Optional {
            permits,
            pair: Some(Pair { sibling, make: None }),
        },
    }
}

const fn list(name: &'static str, non_empty: bool, permits: &'static [Permit]) -> FieldSpec {
    FieldSpec {
        name,
        shape: Shape::List { non_empty, permits },
    }
}

const NAME: &[Permit] = &[Permit::Sym(Sym::Name)];
const NAMES: &[Permit] = &[Permit::Kind(NodeKind::Names)];
const DOCS: &[Permit] = &[Permit::Kind(NodeKind::Docs)];
const EXPRESSION: &[Permit] = &[Permit::Expression];
const BINDS: &[Permit] = &[Permit::Kind(NodeKind::Bind)];
const EVAL_OPEN: &[Permit] = &[Permit::Sym(Sym::EvalOpen)];
const EVAL_CLOSE: &[Permit] = &[Permit::Sym(Sym::EvalClose)];
const FORMATS: &[Permit] = &[
    Permit::Sym(Sym::Italic),
    Permit::Sym(Sym::Underline),
    Permit::Sym(Sym::Light),
    Permit::Sym(Sym::Bold),
    Permit::Sym(Sym::Extra),
];

fn access(_: &Node) -> Node {
    Node::leaf(Token::from_static(Sym::Access, "."))
}

fn colon(_: &Node) -> Node {
    Node::leaf(Token::from_static(Sym::Bind, ":"))
}

fn block_open(_: &Node) -> Node {
    Node::leaf(Token::from_static(Sym::BlockOpen, "{"))
}

fn block_close(_: &Node) -> Node {
    Node::leaf(Token::from_static(Sym::BlockClose, "}"))
}

fn eval_open(_: &Node) -> Node {
    Node::leaf(Token::from_static(Sym::EvalOpen, "("))
}

fn eval_close(_: &Node) -> Node {
    Node::leaf(Token::from_static(Sym::EvalClose, ")"))
}

/// A format delimiter matching the sibling's, italic when it has none.
fn matching_format(sibling: &Node) -> Node {
    let token = match sibling.sym() {
        Some(Sym::Underline) => Token::from_static(Sym::Underline, "_"),
        Some(Sym::Light) => Token::from_static(Sym::Light, "~"),
        Some(Sym::Bold) => Token::from_static(Sym::Bold, "*"),
        Some(Sym::Extra) => Token::from_static(Sym::Extra, "^"),
        _ => Token::from_static(Sym::Italic, "/"),
    };
    Node::leaf(token)
}

static TOKEN: &[FieldSpec] = &[];

static SOURCE: &[FieldSpec] = &[
    one("names", NAMES),
    list("borrows", false, &[Permit::Kind(NodeKind::Borrow)]),
    one("body", &[Permit::Kind(NodeKind::Block)]),
];

static BORROW: &[FieldSpec] = &[
    one("borrow", &[Permit::Sym(Sym::Borrow)]),
    one("source", NAME),
    paired("dot", &[Permit::Sym(Sym::Access)], "name", access),
    bound("name", NAME, "dot"),
];

static NAMES_GRAMMAR: &[FieldSpec] = &[list("names", true, &[Permit::Sym(Sym::Name), Permit::Sym(Sym::Operator)])];

static BLOCK: &[FieldSpec] = &[
    paired("open", &[Permit::Sym(Sym::BlockOpen)], "close", block_open),
    list("statements", false, &[Permit::Expression, Permit::Kind(NodeKind::Bind)]),
    paired("close", &[Permit::Sym(Sym::BlockClose)], "open", block_close),
];

static FUNCTION_DEFINITION: &[FieldSpec] = &[
    maybe("docs", DOCS),
    one("fun", &[Permit::Sym(Sym::Function)]),
    one("names", NAMES),
    one("open", EVAL_OPEN),
    list("inputs", false, BINDS),
    one("close", EVAL_CLOSE),
    maybe("expression", EXPRESSION),
];

static STRUCTURE_DEFINITION: &[FieldSpec] = &[
    maybe("docs", DOCS),
    one("kind", &[Permit::Sym(Sym::Type)]),
    one("names", NAMES),
    paired("open", EVAL_OPEN, "close", eval_open),
    list("inputs", false, BINDS),
    paired("close", EVAL_CLOSE, "open", eval_close),
    maybe("expression", &[Permit::Kind(NodeKind::Block)]),
];

static STREAM_DEFINITION: &[FieldSpec] = &[
    maybe("docs", DOCS),
    one("stream", &[Permit::Sym(Sym::Stream)]),
    one("names", NAMES),
    one("open", EVAL_OPEN),
    list("inputs", false, BINDS),
    one("close", EVAL_CLOSE),
    maybe("expression", EXPRESSION),
];

static BIND: &[FieldSpec] = &[
    one("names", NAMES),
    paired("colon", &[Permit::Sym(Sym::Bind)], "value", colon),
    bound("value", EXPRESSION, "colon"),
];

static EVALUATE: &[FieldSpec] = &[
    one("fun", EXPRESSION),
    one("open", EVAL_OPEN),
    list("inputs", false, &[Permit::Expression, Permit::Kind(NodeKind::Input)]),
    one("close", EVAL_CLOSE),
];

static BINARY_EVALUATE: &[FieldSpec] = &[
    one("left", EXPRESSION),
    one("operator", &[Permit::Sym(Sym::Operator)]),
    one("right", EXPRESSION),
];

static INPUT: &[FieldSpec] = &[
    one("name", NAME),
    one("colon", &[Permit::Sym(Sym::Bind)]),
    one("value", EXPRESSION),
];

static REFERENCE: &[FieldSpec] = &[one("name", NAME)];

static NUMBER_LITERAL: &[FieldSpec] = &[one("number", &[Permit::Sym(Sym::Number)])];

static TEXT_LITERAL: &[FieldSpec] = &[one("text", &[Permit::Sym(Sym::Text)])];

static DOCS_GRAMMAR: &[FieldSpec] = &[list("docs", true, &[Permit::Kind(NodeKind::Doc)])];

static DOC: &[FieldSpec] = &[
    one("open", &[Permit::Sym(Sym::Doc)]),
    list("content", false, &[Permit::Kind(NodeKind::Words)]),
    maybe("close", &[Permit::Sym(Sym::Doc)]),
];

static WORDS: &[FieldSpec] = &[
    paired("open", FORMATS, "close", matching_format),
    list(
        "segments",
        true,
        &[Permit::Kind(NodeKind::Words), Permit::Sym(Sym::Words), Permit::Kind(NodeKind::Reference)],
    ),
    paired("close", FORMATS, "open", matching_format),
];

/// The grammar descriptor of a node kind.
pub fn of(kind: NodeKind) -> Grammar {
    match kind {
        NodeKind::Token => TOKEN,
        NodeKind::Source => SOURCE,
        NodeKind::Borrow => BORROW,
        NodeKind::Names => NAMES_GRAMMAR,
        NodeKind::Block => BLOCK,
        NodeKind::FunctionDefinition => FUNCTION_DEFINITION,
        NodeKind::StructureDefinition => STRUCTURE_DEFINITION,
        NodeKind::StreamDefinition => STREAM_DEFINITION,
        NodeKind::Bind => BIND,
        NodeKind::Evaluate => EVALUATE,
        NodeKind::BinaryEvaluate => BINARY_EVALUATE,
        NodeKind::Input => INPUT,
        NodeKind::Reference => REFERENCE,
        NodeKind::NumberLiteral => NUMBER_LITERAL,
        NodeKind::TextLiteral => TEXT_LITERAL,
        NodeKind::Docs => DOCS_GRAMMAR,
        NodeKind::Doc => DOC,
        NodeKind::Words => WORDS,
    }
}

// ============================================================================
// GENERIC ALGORITHMS
// ============================================================================

fn find<'a>(fields: &'a [(&'static str, Field)], name: &str) -> Option<&'a Field> {
    fields.iter().find(|(field, _)| *field == name).map(|(_, value)| value)
}

fn admit(kind: NodeKind, field: &'static str, permits: &[Permit], node: &Node) -> Result<(), ShapeError> {
    if permits.iter().any(|permit| permit.admits(node)) {
        return Ok(());
    }
    let found = match node.sym() {
        Some(sym) => format!("{sym:?}"),
        None => node.kind().to_string(),
    };
    Err(ShapeError::NotPermitted {
        kind,
        field,
        expected: permits.iter().map(Permit::to_string).collect::<Vec<_>>().join(" | "),
        found,
    })
}

/// Validate a node's fields against its kind's descriptor.
pub fn check(kind: NodeKind, fields: &[(&'static str, Field)]) -> Result<(), ShapeError> {
    let grammar = of(kind);
    if fields.len() != grammar.len() {
        return Err(ShapeError::FieldCount {
            kind,
            expected: grammar.len(),
            found: fields.len(),
        });
    }

    for (spec, (_, value)) in grammar.iter().zip(fields) {
        match (spec.shape, value) {
            (Shape::One(permits), Field::One(node)) => admit(kind, spec.name, permits, node)?,
            (Shape::Optional { permits, pair }, Field::Optional(value)) => match (value, pair) {
                (Some(node), _) => admit(kind, spec.name, permits, node)?,
                (None, Some(pair)) if find(fields, pair.sibling).is_some_and(Field::is_present) => {
                    return Err(ShapeError::Unpaired {
                        kind,
                        field: spec.name,
                        sibling: pair.sibling,
                    });
                }
                (None, _) => {}
            },
            (Shape::List { non_empty, permits }, Field::List(nodes)) => {
                if non_empty && nodes.is_empty() {
                    return Err(ShapeError::EmptyList { kind, field: spec.name });
                }
                for node in nodes {
                    admit(kind, spec.name, permits, node)?;
                }
            }
            (shape, _) => {
                let expected = match shape {
                    Shape::One(_) => "single",
                    Shape::Optional { .. } => "optional",
                    Shape::List { .. } => "list",
                };
                return Err(ShapeError::FieldArity {
                    kind,
                    field: spec.name,
                    expected,
                });
            }
        }
    }

    Ok(())
}

/// Fill in every absent paired field whose sibling is present.
pub fn materialize_fallbacks(kind: NodeKind, fields: &mut [(&'static str, Field)]) {
    for (index, spec) in of(kind).iter().enumerate() {
        let Shape::Optional {
            pair: Some(Pair {
                sibling: sibling_name,
                make: Some(make),
            }),
            ..
        } = spec.shape
        else {
            continue;
        };
        if !matches!(fields.get(index), Some((_, Field::Optional(None)))) {
            continue;
        }
        let Some(sibling) = find(fields, sibling_name).and_then(|field| field.nodes().first().cloned()) else {
            continue;
        };

        tracing::trace!(%kind, field = spec.name, sibling = sibling_name, "materialized paired field");
        fields[index].1 = Field::Optional(Some(make(&sibling)));
    }
}

/// After `removed` was emptied, clear its optional sibling when `removed`
/// has no factory to bring it back.
pub fn release_orphans(kind: NodeKind, fields: &mut [(&'static str, Field)], removed: &str) {
    let Some(spec) = of(kind).iter().find(|spec| spec.name == removed) else {
        return;
    };
    let Shape::Optional {
        pair: Some(Pair { sibling, make: None }),
        ..
    } = spec.shape
    else {
        return;
    };
    if find(fields, removed).is_some_and(Field::is_present) {
        return;
    }
    for (name, field) in fields.iter_mut() {
        if *name == sibling && matches!(field, Field::Optional(Some(_))) {
            tracing::trace!(%kind, field = sibling, removed, "released orphaned paired field");
            *field = Field::Optional(None);
        }
    }
}
