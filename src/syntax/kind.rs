//! Closed tag sets for tokens and nodes.

use std::fmt;

/// Symbol class of a token.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sym {
    Name,
    Number,
    Text,
    Operator,
    /// `↓`
    Borrow,
    /// `.`
    Access,
    /// `:`
    Bind,
    /// `(`
    EvalOpen,
    /// `)`
    EvalClose,
    /// `{`
    BlockOpen,
    /// `}`
    BlockClose,
    /// `ƒ`
    Function,
    /// `•`
    Type,
    /// `…`
    Stream,
    /// `¶`
    Doc,
    /// Plain prose inside documentation.
    Words,
    /// `/`
    Italic,
    /// `_`
    Underline,
    /// `~`
    Light,
    /// `*`
    Bold,
    /// `^`
    Extra,
}

impl Sym {
    /// Canonical text for symbols that have one.
    ///
    /// Returns `None` for open classes like names, numbers and prose.
    pub const fn canonical(self) -> Option<&'static str> {
        match self {
            Sym::Borrow => Some("↓"),
            Sym::Access => Some("."),
            Sym::Bind => Some(":"),
            Sym::EvalOpen => Some("("),
            Sym::EvalClose => Some(")"),
            Sym::BlockOpen => Some("{"),
            Sym::BlockClose => Some("}"),
            Sym::Function => Some("ƒ"),
            Sym::Type => Some("•"),
            Sym::Stream => Some("…"),
            Sym::Doc => Some("¶"),
            Sym::Italic => Some("/"),
            Sym::Underline => Some("_"),
            Sym::Light => Some("~"),
            Sym::Bold => Some("*"),
            Sym::Extra => Some("^"),
            Sym::Name | Sym::Number | Sym::Text | Sym::Operator | Sym::Words => None,
        }
    }

    /// Markup delimiters that open or close formatted words.
    pub const FORMATS: &'static [Sym] = &[Sym::Italic, Sym::Underline, Sym::Light, Sym::Bold, Sym::Extra];

    pub fn is_format(self) -> bool {
        Self::FORMATS.contains(&self)
    }
}

/// The kind tag of a syntax node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    Token,
    Source,
    Borrow,
    Names,
    Block,
    FunctionDefinition,
    StructureDefinition,
    StreamDefinition,
    Bind,
    Evaluate,
    BinaryEvaluate,
    Input,
    Reference,
    NumberLiteral,
    TextLiteral,
    Docs,
    Doc,
    Words,
}

impl NodeKind {
    /// Kinds that can stand wherever an expression is expected.
    pub fn is_expression(self) -> bool {
        matches!(
            self,
            NodeKind::Block
                | NodeKind::Evaluate
                | NodeKind::BinaryEvaluate
                | NodeKind::Reference
                | NodeKind::NumberLiteral
                | NodeKind::TextLiteral
                | NodeKind::FunctionDefinition
                | NodeKind::StructureDefinition
                | NodeKind::StreamDefinition
        )
    }

    /// Kinds that declare something invocable.
    pub fn is_definition(self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDefinition | NodeKind::StructureDefinition | NodeKind::StreamDefinition
        )
    }

    /// Stable name used in template paths and debug output.
    pub const fn name(self) -> &'static str {
        match self {
            NodeKind::Token => "Token",
            NodeKind::Source => "Source",
            NodeKind::Borrow => "Borrow",
            NodeKind::Names => "Names",
            NodeKind::Block => "Block",
            NodeKind::FunctionDefinition => "FunctionDefinition",
            NodeKind::StructureDefinition => "StructureDefinition",
            NodeKind::StreamDefinition => "StreamDefinition",
            NodeKind::Bind => "Bind",
            NodeKind::Evaluate => "Evaluate",
            NodeKind::BinaryEvaluate => "BinaryEvaluate",
            NodeKind::Input => "Input",
            NodeKind::Reference => "Reference",
            NodeKind::NumberLiteral => "NumberLiteral",
            NodeKind::TextLiteral => "TextLiteral",
            NodeKind::Docs => "Docs",
            NodeKind::Doc => "Doc",
            NodeKind::Words => "Words",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
