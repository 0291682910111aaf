//! Conflicts — semantic problems found by analysis.
//!
//! A conflict names the nodes involved and, per involved node, a structured
//! explanation: a template reference plus template inputs. Turning that into
//! text is the job of a [`Locales`] implementation supplied by the caller;
//! nothing in this module formats a message.

use std::fmt;

use smol_str::SmolStr;

use super::context::Context;
use crate::syntax::{Node, NodeKind};

// ============================================================================
// SEVERITY AND ROLES
// ============================================================================

/// Whether a conflict prevents the program from being run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// The program must not be considered valid to run.
    Blocking,
    /// Advisory only.
    Minor,
}

/// How a node takes part in a conflict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    /// The node the conflict is reported on.
    Primary,
    /// A related node shown alongside the primary one.
    Secondary,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Primary => "primary",
            Role::Secondary => "secondary",
        }
    }
}

// ============================================================================
// EXPLANATIONS
// ============================================================================

/// Where a locale finds the text for one site of one conflict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TemplateRef {
    /// Kind whose locale entries own the template.
    pub node: NodeKind,
    /// Conflict name.
    pub conflict: &'static str,
    pub role: Role,
}

impl TemplateRef {
    /// Dotted lookup path, e.g. `node.Borrow.conflict.BorrowCycle.primary`.
    pub fn path(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TemplateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "node.{}.conflict.{}.{}",
            self.node.name(),
            self.conflict,
            self.role.as_str()
        )
    }
}

/// A value substituted into a template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplateInput {
    Node(Node),
    Name(SmolStr),
    Count(usize),
}

/// Structured, locale-independent description of one conflict site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Explanation {
    pub template: TemplateRef,
    pub inputs: Vec<TemplateInput>,
}

/// Renders explanations into human-readable text.
///
/// Implemented outside the core by whatever owns the locale tables.
pub trait Locales {
    fn concretize(&self, explanation: &Explanation, context: &Context<'_>) -> String;
}

/// One node involved in a conflict, with its explanation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Site {
    pub role: Role,
    pub node: Node,
    pub explanation: Explanation,
}

impl Site {
    pub fn explain<L>(&self, locales: &L, context: &Context<'_>) -> String
    where
        L: Locales + ?Sized,
    {
        locales.concretize(&self.explanation, context)
    }
}

// ============================================================================
// CONFLICT CODES
// ============================================================================

/// Stable codes for each conflict kind.
pub mod codes {
    /// Sources borrow from each other in a cycle.
    pub const BORROW_CYCLE: &str = "C0001";
    /// An interface structure declares inputs.
    pub const DISALLOWED_INPUTS: &str = "C0002";
    /// An argument has no matching parameter.
    pub const UNEXPECTED_INPUT: &str = "C0003";
    /// A required parameter was not supplied.
    pub const MISSING_INPUT: &str = "C0004";
    /// A borrow names a source that is not in the program.
    pub const UNKNOWN_BORROW: &str = "C0005";
}

// ============================================================================
// CONFLICTS
// ============================================================================

/// A semantic problem in a program.
///
/// Every variant has a fixed severity; see [`Conflict::severity`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Conflict {
    /// Sources that borrow from each other in a cycle.
    BorrowCycle {
        /// Borrow in `cycle[0]` leading into the rest of the cycle.
        borrow: Node,
        /// Borrow whose target closed the cycle during the search.
        closing: Node,
        /// The sources on the cycle, in borrow order.
        cycle: Vec<Node>,
    },
    /// A structure that declares abstract functions also declares inputs.
    DisallowedInputs { structure: Node },
    /// An argument in an evaluation that the definition does not accept.
    UnexpectedInput {
        definition: Node,
        evaluate: Node,
        input: Node,
    },
    /// A required parameter the evaluation does not supply.
    MissingInput {
        definition: Node,
        evaluate: Node,
        /// The parameter's `Bind`.
        input: Node,
    },
    /// A borrow of a source the program does not contain.
    UnknownBorrow { borrow: Node },
}

impl Conflict {
    pub fn name(&self) -> &'static str {
        match self {
            Conflict::BorrowCycle { .. } => "BorrowCycle",
            Conflict::DisallowedInputs { .. } => "DisallowedInputs",
            Conflict::UnexpectedInput { .. } => "UnexpectedInput",
            Conflict::MissingInput { .. } => "MissingInput",
            Conflict::UnknownBorrow { .. } => "UnknownBorrow",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Conflict::BorrowCycle { .. } => codes::BORROW_CYCLE,
            Conflict::DisallowedInputs { .. } => codes::DISALLOWED_INPUTS,
            Conflict::UnexpectedInput { .. } => codes::UNEXPECTED_INPUT,
            Conflict::MissingInput { .. } => codes::MISSING_INPUT,
            Conflict::UnknownBorrow { .. } => codes::UNKNOWN_BORROW,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Conflict::BorrowCycle { .. }
            | Conflict::DisallowedInputs { .. }
            | Conflict::UnexpectedInput { .. }
            | Conflict::MissingInput { .. }
            | Conflict::UnknownBorrow { .. } => Severity::Blocking,
        }
    }

    pub fn is_minor(&self) -> bool {
        self.severity() == Severity::Minor
    }

    /// Kind whose locale entries describe this conflict.
    fn owner(&self) -> NodeKind {
        match self {
            Conflict::BorrowCycle { .. } | Conflict::UnknownBorrow { .. } => NodeKind::Borrow,
            Conflict::DisallowedInputs { .. } => NodeKind::StructureDefinition,
            Conflict::UnexpectedInput { .. } | Conflict::MissingInput { .. } => NodeKind::Evaluate,
        }
    }

    fn site(&self, role: Role, node: &Node, inputs: Vec<TemplateInput>) -> Site {
        Site {
            role,
            node: node.clone(),
            explanation: Explanation {
                template: TemplateRef {
                    node: self.owner(),
                    conflict: self.name(),
                    role,
                },
                inputs,
            },
        }
    }

    /// Involved nodes with their explanations, primary site first.
    pub fn sites(&self) -> Vec<Site> {
        match self {
            Conflict::BorrowCycle { borrow, closing, cycle } => {
                let first = cycle
                    .first()
                    .and_then(Node::primary_name)
                    .map(SmolStr::new)
                    .unwrap_or_default();
                let mut sites = vec![self.site(
                    Role::Primary,
                    borrow,
                    vec![
                        TemplateInput::Node(borrow.clone()),
                        TemplateInput::Name(first),
                        TemplateInput::Count(cycle.len()),
                    ],
                )];
                if !closing.is(borrow) {
                    sites.push(self.site(
                        Role::Secondary,
                        closing,
                        vec![TemplateInput::Node(closing.clone())],
                    ));
                }
                sites
            }
            Conflict::DisallowedInputs { structure } => {
                vec![self.site(Role::Primary, structure, Vec::new())]
            }
            Conflict::UnexpectedInput { definition, input, .. } => {
                let mut sites = vec![self.site(
                    Role::Primary,
                    input,
                    vec![TemplateInput::Node(definition.clone())],
                )];
                if let Some(names) = definition.names_node() {
                    sites.push(self.site(
                        Role::Secondary,
                        names,
                        vec![TemplateInput::Node(input.clone())],
                    ));
                }
                sites
            }
            Conflict::MissingInput { definition, evaluate, input } => {
                let name = input.primary_name().map(SmolStr::new).unwrap_or_default();
                vec![
                    self.site(
                        Role::Primary,
                        evaluate,
                        vec![
                            TemplateInput::Name(name),
                            TemplateInput::Node(definition.clone()),
                        ],
                    ),
                    self.site(Role::Secondary, input, vec![TemplateInput::Node(evaluate.clone())]),
                ]
            }
            Conflict::UnknownBorrow { borrow } => {
                vec![self.site(Role::Primary, borrow, vec![TemplateInput::Node(borrow.clone())])]
            }
        }
    }

    /// The node the conflict is reported on.
    pub fn primary(&self) -> &Node {
        match self {
            Conflict::BorrowCycle { borrow, .. } | Conflict::UnknownBorrow { borrow } => borrow,
            Conflict::DisallowedInputs { structure } => structure,
            Conflict::UnexpectedInput { input, .. } => input,
            Conflict::MissingInput { evaluate, .. } => evaluate,
        }
    }

    /// Whether `node` (by identity) is one of the conflict's sites.
    pub fn involves(&self, node: &Node) -> bool {
        self.sites().iter().any(|site| site.node.is(node))
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} on {}", self.code(), self.name(), self.primary().id())
    }
}

// ============================================================================
// CONFLICT COLLECTOR
// ============================================================================

/// Collects conflicts during analysis.
#[derive(Clone, Debug, Default)]
pub struct ConflictCollector {
    conflicts: Vec<Conflict>,
}

impl ConflictCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, conflict: Conflict) {
        self.conflicts.push(conflict);
    }

    pub fn extend(&mut self, conflicts: impl IntoIterator<Item = Conflict>) {
        self.conflicts.extend(conflicts);
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Conflicts that involve `node` at any site.
    pub fn conflicts_for(&self, node: &Node) -> Vec<&Conflict> {
        self.conflicts.iter().filter(|conflict| conflict.involves(node)).collect()
    }

    pub fn blocking_count(&self) -> usize {
        self.conflicts.iter().filter(|c| !c.is_minor()).count()
    }

    pub fn minor_count(&self) -> usize {
        self.conflicts.iter().filter(|c| c.is_minor()).count()
    }

    pub fn has_blocking(&self) -> bool {
        self.conflicts.iter().any(|c| !c.is_minor())
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Take all conflicts, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Conflict> {
        std::mem::take(&mut self.conflicts)
    }

    pub fn clear(&mut self) {
        self.conflicts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::Program;
    use crate::syntax::build;

    fn structure_conflict() -> (Node, Conflict) {
        let structure = build::structure("Shape", vec![build::bind("x", None).unwrap()], None).unwrap();
        let conflict = Conflict::DisallowedInputs {
            structure: structure.clone(),
        };
        (structure, conflict)
    }

    #[test]
    fn test_template_path() {
        let template = TemplateRef {
            node: NodeKind::Borrow,
            conflict: "BorrowCycle",
            role: Role::Primary,
        };
        assert_eq!(template.path(), "node.Borrow.conflict.BorrowCycle.primary");
    }

    #[test]
    fn test_disallowed_inputs_sites() {
        let (structure, conflict) = structure_conflict();
        let sites = conflict.sites();
        assert_eq!(sites.len(), 1);
        assert!(sites[0].node.is(&structure));
        assert_eq!(
            sites[0].explanation.template.path(),
            "node.StructureDefinition.conflict.DisallowedInputs.primary"
        );
        assert!(conflict.involves(&structure));
        assert_eq!(conflict.code(), codes::DISALLOWED_INPUTS);
    }

    #[test]
    fn test_self_borrow_cycle_has_one_site() {
        let borrow = build::borrow("a").unwrap();
        let source = build::source("a", vec![borrow.clone()], vec![]).unwrap();
        let conflict = Conflict::BorrowCycle {
            borrow: borrow.clone(),
            closing: borrow,
            cycle: vec![source],
        };
        let sites = conflict.sites();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].explanation.inputs[1], TemplateInput::Name(SmolStr::new("a")));
        assert_eq!(sites[0].explanation.inputs[2], TemplateInput::Count(1));
    }

    #[test]
    fn test_collector_counts() {
        let mut collector = ConflictCollector::new();
        let (_, conflict) = structure_conflict();
        collector.add(conflict.clone());
        collector.extend([conflict]);

        assert_eq!(collector.blocking_count(), 2);
        assert_eq!(collector.minor_count(), 0);
        assert!(collector.has_blocking());
        assert_eq!(collector.take().len(), 2);
        assert!(collector.is_empty());
    }

    struct Paths;

    impl Locales for Paths {
        fn concretize(&self, explanation: &Explanation, _: &Context<'_>) -> String {
            format!("{} ({} inputs)", explanation.template, explanation.inputs.len())
        }
    }

    #[test]
    fn test_explain_delegates_to_locales() {
        let (_, conflict) = structure_conflict();
        let program = Program::new();
        let context = Context::new(&program);
        let text = conflict.sites()[0].explain(&Paths, &context);
        assert_eq!(text, "node.StructureDefinition.conflict.DisallowedInputs.primary (0 inputs)");
    }
}
