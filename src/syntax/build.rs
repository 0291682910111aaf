//! Construction helpers for well-formed nodes.
//!
//! These stand in for the parser when tooling, transformations or tests need
//! to build trees directly. Every helper goes through [`Node::new`], so the
//! grammar is enforced the same way it is for parsed trees.

use super::error::ShapeError;
use super::kind::Sym;
use super::node::Node;
use super::nodes::{
    BinaryEvaluate, Bind, Block, Borrow, Doc, Docs, Evaluate, FunctionDefinition, Input, Names,
    NumberLiteral, Reference, Source, StreamDefinition, StructureDefinition, TextLiteral, Words,
};

pub fn name(text: &str) -> Result<Node, ShapeError> {
    Node::token(Sym::Name, text)
}

pub fn names(texts: &[&str]) -> Result<Node, ShapeError> {
    let names = texts
        .iter()
        .map(|text| match text.chars().next() {
            Some(first) if first.is_alphabetic() || first == '_' => name(text),
            _ => Node::token(Sym::Operator, *text),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Node::new(Names { names })
}

pub fn reference(text: &str) -> Result<Node, ShapeError> {
    Node::new(Reference { name: name(text)? })
}

pub fn number(text: &str) -> Result<Node, ShapeError> {
    Node::new(NumberLiteral {
        number: Node::token(Sym::Number, text)?,
    })
}

pub fn text(text: &str) -> Result<Node, ShapeError> {
    Node::new(TextLiteral {
        text: Node::token(Sym::Text, text)?,
    })
}

/// `{ statements }`
pub fn block(statements: Vec<Node>) -> Result<Node, ShapeError> {
    Node::new(Block {
        open: Some(Node::symbol(Sym::BlockOpen)?),
        statements,
        close: Some(Node::symbol(Sym::BlockClose)?),
    })
}

/// Statements with no delimiters, as at the top level of a source.
pub fn bare_block(statements: Vec<Node>) -> Result<Node, ShapeError> {
    Node::new(Block {
        open: None,
        statements,
        close: None,
    })
}

/// A parameter, optional when it has a default value.
pub fn bind(text: &str, default: Option<Node>) -> Result<Node, ShapeError> {
    let colon = default.as_ref().map(|_| Node::symbol(Sym::Bind)).transpose()?;
    Node::new(Bind {
        names: names(&[text])?,
        colon,
        value: default,
    })
}

/// `ƒ name(inputs) body`, abstract when `body` is `None`.
pub fn function(text: &str, inputs: Vec<Node>, body: Option<Node>) -> Result<Node, ShapeError> {
    Node::new(FunctionDefinition {
        docs: None,
        fun: Node::symbol(Sym::Function)?,
        names: names(&[text])?,
        open: Node::symbol(Sym::EvalOpen)?,
        inputs,
        close: Node::symbol(Sym::EvalClose)?,
        expression: body,
    })
}

/// `• Name(inputs) body`; parentheses are written only when there are inputs.
pub fn structure(text: &str, inputs: Vec<Node>, body: Option<Node>) -> Result<Node, ShapeError> {
    let (open, close) = if inputs.is_empty() {
        (None, None)
    } else {
        (Some(Node::symbol(Sym::EvalOpen)?), Some(Node::symbol(Sym::EvalClose)?))
    };
    Node::new(StructureDefinition {
        docs: None,
        kind: Node::symbol(Sym::Type)?,
        names: names(&[text])?,
        open,
        inputs,
        close,
        expression: body,
    })
}

pub fn stream(text: &str, inputs: Vec<Node>, body: Option<Node>) -> Result<Node, ShapeError> {
    Node::new(StreamDefinition {
        docs: None,
        stream: Node::symbol(Sym::Stream)?,
        names: names(&[text])?,
        open: Node::symbol(Sym::EvalOpen)?,
        inputs,
        close: Node::symbol(Sym::EvalClose)?,
        expression: body,
    })
}

/// `fun(inputs)`
pub fn evaluate(fun: Node, inputs: Vec<Node>) -> Result<Node, ShapeError> {
    Node::new(Evaluate {
        fun,
        open: Node::symbol(Sym::EvalOpen)?,
        inputs,
        close: Node::symbol(Sym::EvalClose)?,
    })
}

pub fn binary(left: Node, operator: &str, right: Node) -> Result<Node, ShapeError> {
    Node::new(BinaryEvaluate {
        left,
        operator: Node::token(Sym::Operator, operator)?,
        right,
    })
}

/// A named argument, `name: value`.
pub fn input(text: &str, value: Node) -> Result<Node, ShapeError> {
    Node::new(Input {
        name: name(text)?,
        colon: Node::symbol(Sym::Bind)?,
        value,
    })
}

/// `↓ source`
pub fn borrow(source: &str) -> Result<Node, ShapeError> {
    Node::new(Borrow {
        borrow: Node::symbol(Sym::Borrow)?,
        source: name(source)?,
        dot: None,
        name: None,
    })
}

/// `↓ source.member`
pub fn borrow_member(source: &str, member: &str) -> Result<Node, ShapeError> {
    Node::new(Borrow {
        borrow: Node::symbol(Sym::Borrow)?,
        source: name(source)?,
        dot: Some(Node::symbol(Sym::Access)?),
        name: Some(name(member)?),
    })
}

/// A source module with top-level statements in a bare block.
pub fn source(text: &str, borrows: Vec<Node>, statements: Vec<Node>) -> Result<Node, ShapeError> {
    Node::new(Source {
        names: names(&[text])?,
        borrows,
        body: bare_block(statements)?,
    })
}

/// Plain, unformatted prose.
pub fn words(text: &str) -> Result<Node, ShapeError> {
    Node::new(Words {
        open: None,
        segments: vec![Node::token(Sym::Words, text)?],
        close: None,
    })
}

/// Prose wrapped in a format delimiter on both sides.
pub fn formatted(format: Sym, segments: Vec<Node>) -> Result<Node, ShapeError> {
    Node::new(Words {
        open: Some(Node::symbol(format)?),
        segments,
        close: Some(Node::symbol(format)?),
    })
}

/// Words standing in for content that has not been written yet.
pub fn placeholder_words() -> Result<Node, ShapeError> {
    words("…")
}

/// `¶ content ¶`
pub fn doc(content: Vec<Node>) -> Result<Node, ShapeError> {
    Node::new(Doc {
        open: Node::symbol(Sym::Doc)?,
        content,
        close: Some(Node::symbol(Sym::Doc)?),
    })
}

pub fn docs(docs: Vec<Node>) -> Result<Node, ShapeError> {
    Node::new(Docs { docs })
}
