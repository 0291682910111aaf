//! Programs — the ordered set of source modules analyzed together.

use indexmap::IndexMap;
use smol_str::SmolStr;
use thiserror::Error;

use crate::syntax::{Node, NodeKind, Payload, Source};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    #[error("expected a Source node, found {0}")]
    NotASource(NodeKind),
    #[error("source has no name")]
    Unnamed,
    #[error("more than one source is named `{0}`")]
    DuplicateName(SmolStr),
}

/// The top-level container owning an ordered set of sources.
///
/// Sources are keyed by their primary name and keep insertion order, which
/// is the order analysis and cycle detection visit them in. A program is
/// immutable; edits build a new program that shares untouched sources.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    sources: IndexMap<SmolStr, Node>,
}

impl Program {
    /// Create a new empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a program from sources, in order.
    ///
    /// Every name a source declares must be unique across the program.
    pub fn from_sources(sources: impl IntoIterator<Item = Node>) -> Result<Self, ProgramError> {
        let mut program = Self::new();
        for source in sources {
            let taken = source
                .names()
                .into_iter()
                .flat_map(|names| names.iter())
                .find(|name| program.index_of(name).is_some());
            if let Some(name) = taken {
                return Err(ProgramError::DuplicateName(SmolStr::new(name)));
            }
            program.insert(source)?;
        }
        Ok(program)
    }

    fn insert(&mut self, source: Node) -> Result<(), ProgramError> {
        if source.kind() != NodeKind::Source {
            return Err(ProgramError::NotASource(source.kind()));
        }
        let name = source.primary_name().ok_or(ProgramError::Unnamed)?;
        self.sources.insert(SmolStr::new(name), source);
        Ok(())
    }

    /// A new program with `source` added, or replacing the source of the same name.
    pub fn with_source(&self, source: Node) -> Result<Self, ProgramError> {
        let mut program = self.clone();
        program.insert(source)?;
        Ok(program)
    }

    /// A new program without the named source.
    pub fn without_source(&self, name: &str) -> Self {
        let mut program = self.clone();
        program.sources.shift_remove(name);
        program
    }

    /// Index of the source declaring `name` among any of its names.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.sources.get_index_of(name).or_else(|| {
            self.sources
                .values()
                .position(|source| source.names().is_some_and(|names| names.has(name)))
        })
    }

    /// Look up a source by any of its names.
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.index_of(name).and_then(|index| self.source_at(index))
    }

    pub fn source_at(&self, index: usize) -> Option<&Node> {
        self.sources.get_index(index).map(|(_, source)| source)
    }

    /// Whether the node is one of this program's sources (by identity).
    pub fn contains(&self, source: &Node) -> bool {
        self.sources.values().any(|candidate| candidate.is(source))
    }

    /// Iterate over all sources in order.
    pub fn sources(&self) -> impl Iterator<Item = &Node> + '_ {
        self.sources.values()
    }

    /// Get the number of sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if the program is empty.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// The payload of a source node.
pub(crate) fn source_payload(node: &Node) -> Option<&Source> {
    match node.payload() {
        Payload::Source(source) => Some(source),
        _ => None,
    }
}
