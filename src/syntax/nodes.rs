//! Node payloads, one struct per kind.
//!
//! Field order here is grammar order; `payloads!` derives the generic field
//! list and the rebuild-from-fields constructor from the same declaration.

use super::error::ShapeError;
use super::kind::{NodeKind, Sym};
use super::node::{Field, Node};
use super::token::Token;

macro_rules! payloads {
    (@ty one) => { Node };
    (@ty opt) => { Option<Node> };
    (@ty list) => { Vec<Node> };

    (@wrap one, $value:expr) => { Field::One($value) };
    (@wrap opt, $value:expr) => { Field::Optional($value) };
    (@wrap list, $value:expr) => { Field::List($value) };

    (@take one, $kind:expr, $name:expr, $next:expr) => { take_one($kind, $name, $next) };
    (@take opt, $kind:expr, $name:expr, $next:expr) => { take_optional($kind, $name, $next) };
    (@take list, $kind:expr, $name:expr, $next:expr) => { take_list($kind, $name, $next) };

    ($(
        $(#[$meta:meta])*
        $kind:ident { $($field:ident: $shape:ident),* $(,)? }
    )*) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Debug, PartialEq, Eq)]
            pub struct $kind {
                $(pub $field: payloads!(@ty $shape)),*
            }

            impl $kind {
                fn fields(&self) -> Vec<(&'static str, Field)> {
                    vec![$((stringify!($field), payloads!(@wrap $shape, self.$field.clone()))),*]
                }

                fn from_fields(fields: Vec<(&'static str, Field)>) -> Result<Self, ShapeError> {
                    let mut fields = fields.into_iter();
                    let this = Self {
                        $($field: payloads!(@take $shape, NodeKind::$kind, stringify!($field), fields.next())?),*
                    };
                    match fields.next() {
                        None => Ok(this),
                        Some(_) => Err(ShapeError::FieldCount {
                            kind: NodeKind::$kind,
                            expected: [$(stringify!($field)),*].len(),
                            found: [$(stringify!($field)),*].len() + 1 + fields.count(),
                        }),
                    }
                }
            }

            impl From<$kind> for Payload {
                fn from(payload: $kind) -> Self {
                    Payload::$kind(payload)
                }
            }
        )*

        /// The kind-specific content of a node.
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub enum Payload {
            Token(Token),
            $($kind($kind)),*
        }

        impl Payload {
            pub fn kind(&self) -> NodeKind {
                match self {
                    Payload::Token(_) => NodeKind::Token,
                    $(Payload::$kind(_) => NodeKind::$kind),*
                }
            }

            pub(crate) fn fields(&self) -> Vec<(&'static str, Field)> {
                match self {
                    Payload::Token(_) => Vec::new(),
                    $(Payload::$kind(payload) => payload.fields()),*
                }
            }

            /// Rebuild a payload of the same kind from a full field list.
            pub(crate) fn with_fields(&self, fields: Vec<(&'static str, Field)>) -> Result<Payload, ShapeError> {
                match self {
                    Payload::Token(token) if fields.is_empty() => Ok(Payload::Token(token.clone())),
                    Payload::Token(_) => Err(ShapeError::FieldCount {
                        kind: NodeKind::Token,
                        expected: 0,
                        found: fields.len(),
                    }),
                    $(Payload::$kind(_) => $kind::from_fields(fields).map(Payload::$kind)),*
                }
            }
        }
    };
}

impl From<Token> for Payload {
    fn from(token: Token) -> Self {
        Payload::Token(token)
    }
}

fn take_one(kind: NodeKind, field: &'static str, next: Option<(&'static str, Field)>) -> Result<Node, ShapeError> {
    match next {
        Some((_, Field::One(node))) => Ok(node),
        _ => Err(ShapeError::FieldArity { kind, field, expected: "single" }),
    }
}

fn take_optional(
    kind: NodeKind,
    field: &'static str,
    next: Option<(&'static str, Field)>,
) -> Result<Option<Node>, ShapeError> {
    match next {
        Some((_, Field::Optional(node))) => Ok(node),
        _ => Err(ShapeError::FieldArity { kind, field, expected: "optional" }),
    }
}

fn take_list(kind: NodeKind, field: &'static str, next: Option<(&'static str, Field)>) -> Result<Vec<Node>, ShapeError> {
    match next {
        Some((_, Field::List(nodes))) => Ok(nodes),
        _ => Err(ShapeError::FieldArity { kind, field, expected: "list" }),
    }
}

payloads! {
    /// One module of program text.
    Source { names: one, borrows: list, body: one }

    /// `↓ source` or `↓ source.name`: a dependency on another source.
    Borrow { borrow: one, source: one, dot: opt, name: opt }

    Names { names: list }

    /// A sequence of statements, optionally delimited by `{ }`.
    Block { open: opt, statements: list, close: opt }

    /// `ƒ name(inputs) expression`; abstract when the expression is absent.
    FunctionDefinition { docs: opt, fun: one, names: one, open: one, inputs: list, close: one, expression: opt }

    /// `• Name(inputs) { ... }`; the parentheses may be omitted together.
    StructureDefinition { docs: opt, kind: one, names: one, open: opt, inputs: list, close: opt, expression: opt }

    StreamDefinition { docs: opt, stream: one, names: one, open: one, inputs: list, close: one, expression: opt }

    /// A declared name, e.g. a parameter; a value makes it optional.
    Bind { names: one, colon: opt, value: opt }

    /// `fun(inputs)`
    Evaluate { fun: one, open: one, inputs: list, close: one }

    BinaryEvaluate { left: one, operator: one, right: one }

    /// A named argument, `name: value`.
    Input { name: one, colon: one, value: one }

    Reference { name: one }

    NumberLiteral { number: one }

    TextLiteral { text: one }

    Docs { docs: list }

    /// `¶ words ¶`
    Doc { open: one, content: list, close: opt }

    /// Documentation prose, optionally wrapped in a markup format.
    Words { open: opt, segments: list, close: opt }
}

impl Names {
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().filter_map(Node::text)
    }

    pub fn has(&self, name: &str) -> bool {
        self.iter().any(|candidate| candidate == name)
    }

    pub fn primary(&self) -> Option<&str> {
        self.iter().next()
    }
}

impl Source {
    pub fn borrows(&self) -> &[Node] {
        &self.borrows
    }
}

impl Borrow {
    /// Name of the borrowed source.
    pub fn source_name(&self) -> Option<&str> {
        self.source.text()
    }

    /// Name of the borrowed member, for `↓ source.name`.
    pub fn member_name(&self) -> Option<&str> {
        self.name.as_ref().and_then(Node::text)
    }
}

impl Block {
    pub fn statements(&self) -> &[Node] {
        &self.statements
    }
}

impl FunctionDefinition {
    pub fn is_abstract(&self) -> bool {
        self.expression.is_none()
    }
}

impl StructureDefinition {
    /// A structure that declares at least one abstract function.
    pub fn is_interface(&self) -> bool {
        self.abstract_functions().next().is_some()
    }

    pub fn abstract_functions(&self) -> impl Iterator<Item = &Node> + '_ {
        let statements: &[Node] = match self.expression.as_ref().map(Node::payload) {
            Some(Payload::Block(block)) => block.statements(),
            _ => &[],
        };
        statements
            .iter()
            .filter(|statement| matches!(statement.payload(), Payload::FunctionDefinition(def) if def.is_abstract()))
    }
}

impl Bind {
    /// A bind without a default value must be supplied by every caller.
    pub fn is_required(&self) -> bool {
        self.value.is_none()
    }
}

impl Input {
    pub fn input_name(&self) -> Option<&str> {
        self.name.text()
    }
}

/// Markup format of a run of words.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    Italic,
    Underline,
    Light,
    Bold,
    Extra,
}

impl Format {
    pub fn from_sym(sym: Sym) -> Option<Self> {
        match sym {
            Sym::Italic => Some(Format::Italic),
            Sym::Underline => Some(Format::Underline),
            Sym::Light => Some(Format::Light),
            Sym::Bold => Some(Format::Bold),
            Sym::Extra => Some(Format::Extra),
            _ => None,
        }
    }

    /// Font weight implied by the format, where it implies one.
    pub fn weight(self) -> Option<u16> {
        match self {
            Format::Light => Some(300),
            Format::Bold => Some(700),
            Format::Extra => Some(900),
            Format::Italic | Format::Underline => None,
        }
    }
}

impl Words {
    pub fn format(&self) -> Option<Format> {
        self.open.as_ref().and_then(Node::sym).and_then(Format::from_sym)
    }

    /// This format followed by the formats of a single nested `Words` that
    /// wraps the entire content.
    pub fn formats(&self) -> Vec<Format> {
        let Some(format) = self.format() else {
            return Vec::new();
        };
        let mut formats = vec![format];
        if let [only] = self.segments.as_slice() {
            if let Payload::Words(inner) = only.payload() {
                formats.extend(inner.formats());
            }
        }
        formats
    }

    /// Whether any nested words contain the given prose.
    pub fn contains_text(&self, text: &str) -> bool {
        self.segments.iter().any(|segment| match segment.payload() {
            Payload::Token(token) => token.sym == Sym::Words && token.as_str().contains(text),
            Payload::Words(words) => words.contains_text(text),
            _ => false,
        })
    }
}
