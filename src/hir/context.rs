//! Context — read-only name resolution for one analysis pass.
//!
//! A context is built once from a [`Program`] and then only read, so it can be
//! shared across threads while sources are checked in parallel. Tooling that
//! re-analyzes after an edit builds a fresh context for the new program.
//!
//! Top-level definitions are indexed by every name they declare. When two definitions
//! share a name, the first one in source order wins; duplicate names are a
//! separate diagnostic, not this module's concern.

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::program::{Program, source_payload};
use super::scope::{Binding, Scope};
use crate::syntax::{Node, Payload};

/// Outcome of resolving a name to a definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveResult {
    Found(Node),
    NotFound,
}

impl ResolveResult {
    pub fn node(&self) -> Option<&Node> {
        match self {
            ResolveResult::Found(node) => Some(node),
            ResolveResult::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ResolveResult::Found(_))
    }
}

/// Name and declaration lookups over one program snapshot.
#[derive(Debug)]
pub struct Context<'p> {
    program: &'p Program,
    /// Declared name → definition node, first declaration wins.
    definitions: IndexMap<SmolStr, Node>,
}

impl<'p> Context<'p> {
    pub fn new(program: &'p Program) -> Self {
        let mut definitions = IndexMap::new();
        for source in program.sources() {
            let statements = match source_payload(source).map(|source| source.body.payload()) {
                Some(Payload::Block(block)) => block.statements(),
                _ => continue,
            };
            for node in statements.iter().filter(|node| node.kind().is_definition()) {
                for name in node.names().into_iter().flat_map(|names| names.iter()) {
                    definitions
                        .entry(SmolStr::new(name))
                        .or_insert_with(|| node.clone());
                }
            }
        }

        tracing::trace!(
            sources = program.len(),
            definitions = definitions.len(),
            "built resolution context"
        );
        Self { program, definitions }
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }

    /// The source declaring `name`.
    pub fn source(&self, name: &str) -> Option<&'p Node> {
        self.program.get(name)
    }

    /// The definition declaring `name`.
    pub fn definition(&self, name: &str) -> ResolveResult {
        match self.definitions.get(name) {
            Some(node) => ResolveResult::Found(node.clone()),
            None => ResolveResult::NotFound,
        }
    }

    /// The definition an expression denotes, when it denotes one directly:
    /// a reference to a top-level definition's name, or a definition written
    /// in place.
    pub fn definition_of(&self, expression: &Node) -> Option<Node> {
        self.definition_in(expression, &Scope::new())
    }

    /// Like [`Context::definition_of`], resolving references through the
    /// enclosing `scope` before the top level. A name bound to a value in scope
    /// denotes no known definition.
    pub fn definition_in(&self, expression: &Node, scope: &Scope) -> Option<Node> {
        match expression.payload() {
            Payload::Reference(reference) => self.resolve_in(reference.name.text()?, scope),
            _ if expression.kind().is_definition() => Some(expression.clone()),
            _ => None,
        }
    }

    /// The definition implementing a binary operator.
    pub fn operator(&self, operator: &Node) -> Option<Node> {
        self.operator_in(operator, &Scope::new())
    }

    pub fn operator_in(&self, operator: &Node, scope: &Scope) -> Option<Node> {
        self.resolve_in(operator.text()?, scope)
    }

    fn resolve_in(&self, name: &str, scope: &Scope) -> Option<Node> {
        match scope.lookup(name) {
            Some(Binding::Definition(node)) => Some(node.clone()),
            Some(Binding::Value) => None,
            None => self.definition(name).node().cloned(),
        }
    }

    /// Declared parameters of a definition.
    pub fn inputs_of<'n>(&self, definition: &'n Node) -> &'n [Node] {
        definition.declared_inputs()
    }

    /// Number of distinct names that resolve to a definition.
    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }
}
