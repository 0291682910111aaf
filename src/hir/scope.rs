//! Lexical scopes — names bound between a node and its source's top level.
//!
//! Definitions bind their parameters over their own subtree; blocks bind
//! their statements' names over the block. A scope is only meaningful for the
//! node it was captured at, so it is built by [`walk_scoped`] and handed to
//! the visitor rather than stored anywhere.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::syntax::{Node, Payload};

/// What a local name stands for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Binding {
    /// A function, structure or stream declared in an enclosing block.
    Definition(Node),
    /// A parameter or bound value; never something that can be invoked as a
    /// known definition.
    Value,
}

/// Enclosing scopes of a node, innermost last.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    frames: Vec<FxHashMap<SmolStr, Binding>>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// The innermost binding of `name`.
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

/// Names a node binds over its own children, if it opens a scope.
fn frame_of(node: &Node) -> Option<FxHashMap<SmolStr, Binding>> {
    let mut frame = FxHashMap::default();
    match node.payload() {
        Payload::FunctionDefinition(_) | Payload::StructureDefinition(_) | Payload::StreamDefinition(_) => {
            for input in node.declared_inputs() {
                bind_all(&mut frame, input, Binding::Value);
            }
        }
        Payload::Block(block) => {
            for statement in block.statements() {
                if statement.kind().is_definition() {
                    bind_all(&mut frame, statement, Binding::Definition(statement.clone()));
                } else if matches!(statement.payload(), Payload::Bind(_)) {
                    bind_all(&mut frame, statement, Binding::Value);
                }
            }
        }
        _ => return None,
    }
    Some(frame)
}

fn bind_all(frame: &mut FxHashMap<SmolStr, Binding>, node: &Node, binding: Binding) {
    for name in node.names().into_iter().flat_map(|names| names.iter()) {
        frame.entry(SmolStr::new(name)).or_insert_with(|| binding.clone());
    }
}

enum Visit {
    Enter(Node),
    Leave,
}

/// Pre-order walk that passes each node the scopes enclosing it.
pub fn walk_scoped<V>(root: &Node, visitor: &mut V)
where
    V: FnMut(&Node, &Scope),
{
    let mut scope = Scope::new();
    let mut stack = vec![Visit::Enter(root.clone())];
    while let Some(visit) = stack.pop() {
        let node = match visit {
            Visit::Enter(node) => node,
            Visit::Leave => {
                scope.frames.pop();
                continue;
            }
        };
        visitor(&node, &scope);
        if let Some(frame) = frame_of(&node) {
            scope.frames.push(frame);
            stack.push(Visit::Leave);
        }
        stack.extend(node.children().into_iter().rev().map(Visit::Enter));
    }
}
