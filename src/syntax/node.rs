//! The syntax node handle and the generic clone-with-replacement protocol.
//!
//! A [`Node`] is an immutable, reference-counted tree element. Its payload is a
//! closed sum type ([`Payload`]) with one case per [`NodeKind`]; every generic
//! algorithm here (field enumeration, replacement, validation) works through
//! the payload's ordered field list and the kind's grammar descriptor, so no
//! kind needs hand-written edit code.

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;

use super::error::{EditError, ShapeError};
use super::grammar::{self, Grammar};
use super::kind::{NodeKind, Sym};
use super::nodes::{Names, Payload};
use super::purpose::Purpose;
use super::token::Token;
use crate::base::NodeId;

/// The value held by one named field of a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Field {
    One(Node),
    Optional(Option<Node>),
    List(Vec<Node>),
}

impl Field {
    /// Whether the field holds at least one node.
    pub fn is_present(&self) -> bool {
        match self {
            Field::One(_) => true,
            Field::Optional(node) => node.is_some(),
            Field::List(nodes) => !nodes.is_empty(),
        }
    }

    /// The nodes held by this field, in order.
    pub fn nodes(&self) -> &[Node] {
        match self {
            Field::One(node) => std::slice::from_ref(node),
            Field::Optional(node) => node.as_slice(),
            Field::List(nodes) => nodes,
        }
    }
}

/// A single-field substitution for [`Node::replace`].
#[derive(Clone, Debug)]
pub enum Replace {
    /// Swap `original` (matched by identity) for `replacement`.
    ///
    /// In a list field, `replacement: None` removes the original and
    /// `original: None` appends the replacement. In an optional field,
    /// `original: None` matches an absent value.
    Child {
        original: Option<Node>,
        replacement: Option<Node>,
    },
    /// Swap the whole content of a list field.
    List(Vec<Node>),
}

impl Replace {
    /// Replace `original` with `replacement`.
    pub fn child(original: &Node, replacement: Node) -> Self {
        Replace::Child {
            original: Some(original.clone()),
            replacement: Some(replacement),
        }
    }

    /// Fill an absent optional field, or append to a list field.
    pub fn insert(replacement: Node) -> Self {
        Replace::Child {
            original: None,
            replacement: Some(replacement),
        }
    }

    /// Clear an optional field, or remove an element from a list field.
    pub fn remove(original: &Node) -> Self {
        Replace::Child {
            original: Some(original.clone()),
            replacement: None,
        }
    }
}

struct NodeData {
    id: NodeId,
    payload: Payload,
}

/// An immutable syntax tree element.
///
/// Cloning the handle is cheap and shares the node; [`Node::duplicate`] makes a
/// value-equal node with a new identity. Equality (`==`) compares values and
/// ignores identity; use [`Node::is`] for identity.
#[derive(Clone)]
pub struct Node(Arc<NodeData>);

impl Node {
    /// Construct a node, validating its fields against the kind's grammar.
    pub fn new(payload: impl Into<Payload>) -> Result<Self, ShapeError> {
        let payload = payload.into();
        grammar::check(payload.kind(), &payload.fields())?;
        Ok(Self::assemble(payload))
    }

    /// Construct a token node.
    pub fn token(sym: Sym, text: impl Into<SmolStr>) -> Result<Self, ShapeError> {
        Ok(Self::leaf(Token::new(sym, text)?))
    }

    /// Construct a token node with the symbol's canonical text.
    pub fn symbol(sym: Sym) -> Result<Self, ShapeError> {
        Ok(Self::leaf(Token::symbol(sym)?))
    }

    pub(crate) fn leaf(token: Token) -> Self {
        Self::assemble(Payload::Token(token))
    }

    fn assemble(payload: Payload) -> Self {
        Self(Arc::new(NodeData {
            id: NodeId::fresh(),
            payload,
        }))
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.0.id
    }

    #[inline]
    pub fn payload(&self) -> &Payload {
        &self.0.payload
    }

    pub fn kind(&self) -> NodeKind {
        self.payload().kind()
    }

    /// The grammar descriptor for this node's kind.
    pub fn grammar(&self) -> Grammar {
        grammar::of(self.kind())
    }

    pub fn purpose(&self) -> Purpose {
        Purpose::from(self.kind())
    }

    /// Identity comparison.
    #[inline]
    pub fn is(&self, other: &Node) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Named fields in grammar order. Child handles are shared, not copied.
    pub fn fields(&self) -> Vec<(&'static str, Field)> {
        self.payload().fields()
    }

    pub fn field(&self, name: &str) -> Option<Field> {
        self.fields()
            .into_iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// All children in field order.
    pub fn children(&self) -> Vec<Node> {
        self.fields()
            .into_iter()
            .flat_map(|(_, field)| field.nodes().to_vec())
            .collect()
    }

    /// A value-equal copy with a new identity. Children are shared.
    pub fn duplicate(&self) -> Node {
        Self::assemble(self.payload().clone())
    }

    /// A new node of the same kind with one field substituted.
    ///
    /// Every other field is carried over by reference. If the substitution
    /// leaves a paired optional field absent while its sibling is present, the
    /// grammar's factory supplies the missing half; when the removed field has
    /// no factory, its sibling is dropped with it.
    pub fn replace(&self, field: &str, edit: Replace) -> Result<Node, EditError> {
        let kind = self.kind();
        let mut fields = self.fields();
        let index = fields
            .iter()
            .position(|(name, _)| *name == field)
            .ok_or_else(|| EditError::UnknownField {
                kind,
                field: SmolStr::new(field),
            })?;

        let name = fields[index].0;
        let current = fields[index].1.clone();
        fields[index].1 = substitute(kind, name, current, edit)?;

        grammar::release_orphans(kind, &mut fields, name);
        grammar::materialize_fallbacks(kind, &mut fields);
        let payload = self.payload().with_fields(fields)?;
        grammar::check(kind, &payload.fields())?;

        tracing::trace!(%kind, field = name, from = %self.id(), "replaced field");
        Ok(Self::assemble(payload))
    }

    /// The token this node wraps, if it is a leaf.
    pub fn as_token(&self) -> Option<&Token> {
        match self.payload() {
            Payload::Token(token) => Some(token),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.as_token().map(Token::as_str)
    }

    pub fn sym(&self) -> Option<Sym> {
        self.as_token().map(|token| token.sym)
    }

    pub fn is_symbol(&self, sym: Sym) -> bool {
        self.sym() == Some(sym)
    }

    /// The `Names` child of nodes that declare names.
    pub fn names_node(&self) -> Option<&Node> {
        match self.payload() {
            Payload::Source(source) => Some(&source.names),
            Payload::FunctionDefinition(def) => Some(&def.names),
            Payload::StructureDefinition(def) => Some(&def.names),
            Payload::StreamDefinition(def) => Some(&def.names),
            Payload::Bind(bind) => Some(&bind.names),
            _ => None,
        }
    }

    /// The declared names of nodes that declare names.
    pub fn names(&self) -> Option<&Names> {
        match self.names_node()?.payload() {
            Payload::Names(names) => Some(names),
            _ => None,
        }
    }

    /// First declared name, if any.
    pub fn primary_name(&self) -> Option<&str> {
        self.names().and_then(Names::primary)
    }

    /// Declared parameters of a function, structure or stream definition.
    pub fn declared_inputs(&self) -> &[Node] {
        match self.payload() {
            Payload::FunctionDefinition(def) => &def.inputs,
            Payload::StructureDefinition(def) => &def.inputs,
            Payload::StreamDefinition(def) => &def.inputs,
            _ => &[],
        }
    }
}

fn substitute(kind: NodeKind, field: &'static str, current: Field, edit: Replace) -> Result<Field, EditError> {
    let not_found = || EditError::OriginalNotFound { kind, field };

    match (current, edit) {
        (Field::List(_), Replace::List(nodes)) => Ok(Field::List(nodes)),
        (_, Replace::List(_)) => Err(EditError::NotAList { kind, field }),

        (Field::One(node), Replace::Child { original, replacement }) => {
            if !original.is_some_and(|original| original.is(&node)) {
                return Err(not_found());
            }
            replacement
                .map(Field::One)
                .ok_or(EditError::Shape(ShapeError::Missing { kind, field }))
        }

        (Field::Optional(node), Replace::Child { original, replacement }) => {
            let matches = match (&node, &original) {
                (Some(node), Some(original)) => node.is(original),
                (None, None) => true,
                _ => false,
            };
            if matches {
                Ok(Field::Optional(replacement))
            } else {
                Err(not_found())
            }
        }

        (Field::List(mut nodes), Replace::Child { original: Some(original), replacement }) => {
            let position = nodes.iter().position(|node| node.is(&original)).ok_or_else(not_found)?;
            match replacement {
                Some(replacement) => nodes[position] = replacement,
                None => {
                    nodes.remove(position);
                }
            }
            Ok(Field::List(nodes))
        }

        (Field::List(mut nodes), Replace::Child { original: None, replacement }) => {
            nodes.extend(replacement);
            Ok(Field::List(nodes))
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.is(other) || self.payload() == other.payload()
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.payload() {
            Payload::Token(token) => write!(f, "{:?}({:?})", token.sym, token.as_str()),
            _ => {
                let mut out = f.debug_struct(self.kind().name());
                for (name, field) in self.fields() {
                    out.field(name, &field);
                }
                out.finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::build;

    #[test]
    fn test_duplicate_is_value_equal_with_new_identity() {
        let node = build::reference("speed").unwrap();
        let copy = node.duplicate();

        assert_eq!(node, copy);
        assert!(!node.is(&copy));
        assert_ne!(node.id(), copy.id());
        assert_eq!(copy.duplicate(), node);
    }

    #[test]
    fn test_duplicate_shares_children() {
        let node = build::reference("speed").unwrap();
        let copy = node.duplicate();

        let (a, b) = (node.children(), copy.children());
        assert!(a[0].is(&b[0]));
    }

    #[test]
    fn test_replace_unknown_field() {
        let node = build::reference("speed").unwrap();
        let other = build::name("other").unwrap();
        let err = node.replace("nope", Replace::insert(other)).unwrap_err();
        assert!(matches!(err, EditError::UnknownField { .. }));
    }

    #[test]
    fn test_replace_requires_identity_match() {
        let node = build::reference("speed").unwrap();
        let lookalike = build::name("speed").unwrap();
        let err = node
            .replace("name", Replace::child(&lookalike, build::name("x").unwrap()))
            .unwrap_err();
        assert!(matches!(err, EditError::OriginalNotFound { .. }));
    }

    #[test]
    fn test_replace_rejects_unpermitted_kind() {
        let node = build::reference("speed").unwrap();
        let original = node.children().remove(0);
        let number = build::number("3").unwrap();
        let err = node.replace("name", Replace::child(&original, number)).unwrap_err();
        assert!(matches!(err, EditError::Shape(ShapeError::NotPermitted { .. })));
    }

    #[test]
    fn test_removing_required_field_is_a_shape_error() {
        let node = build::reference("speed").unwrap();
        let original = node.children().remove(0);
        let err = node.replace("name", Replace::remove(&original)).unwrap_err();
        assert_eq!(
            err,
            EditError::Shape(ShapeError::Missing {
                kind: NodeKind::Reference,
                field: "name"
            })
        );
    }

    #[test]
    fn test_debug_output() {
        let node = build::reference("speed").unwrap();
        assert_eq!(format!("{node:?}"), "Reference { name: One(Name(\"speed\")) }");
    }
}
