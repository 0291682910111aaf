//! Structural validators.
//!
//! Each validator looks at one node plus whatever it can resolve through the
//! [`Context`] and reports every violation it finds. Kinds without a
//! validator report nothing.

use super::conflict::Conflict;
use super::context::Context;
use super::scope::Scope;
use crate::syntax::{BinaryEvaluate, Bind, Borrow, Evaluate, Node, Payload, StructureDefinition};

impl Node {
    /// Conflicts local to this node, resolving names at the top level only.
    pub fn compute_conflicts(&self, context: &Context<'_>) -> Vec<Conflict> {
        self.compute_conflicts_in(context, &Scope::new())
    }

    /// Conflicts local to this node, resolving names through `scope` first.
    pub fn compute_conflicts_in(&self, context: &Context<'_>, scope: &Scope) -> Vec<Conflict> {
        match self.payload() {
            Payload::StructureDefinition(structure) => check_structure(self, structure),
            Payload::Evaluate(evaluate) => check_evaluate(self, evaluate, context, scope),
            Payload::BinaryEvaluate(binary) => check_binary(self, binary, context, scope),
            Payload::Borrow(borrow) => check_borrow(self, borrow, context),
            _ => Vec::new(),
        }
    }
}

/// Interfaces cannot be constructed, so they cannot take inputs.
fn check_structure(node: &Node, structure: &StructureDefinition) -> Vec<Conflict> {
    if structure.is_interface() && !structure.inputs.is_empty() {
        vec![Conflict::DisallowedInputs {
            structure: node.clone(),
        }]
    } else {
        Vec::new()
    }
}

fn bind(node: &Node) -> Option<&Bind> {
    match node.payload() {
        Payload::Bind(bind) => Some(bind),
        _ => None,
    }
}

fn is_required(parameter: &Node) -> bool {
    bind(parameter).is_some_and(Bind::is_required)
}

fn check_evaluate(node: &Node, evaluate: &Evaluate, context: &Context<'_>, scope: &Scope) -> Vec<Conflict> {
    let Some(definition) = context.definition_in(&evaluate.fun, scope) else {
        return Vec::new();
    };
    let parameters = context.inputs_of(&definition);
    let mut supplied = vec![false; parameters.len()];
    let mut conflicts = Vec::new();

    for argument in &evaluate.inputs {
        let slot = match argument.payload() {
            Payload::Input(input) => input.input_name().and_then(|name| {
                parameters
                    .iter()
                    .position(|parameter| parameter.names().is_some_and(|names| names.has(name)))
                    .filter(|&index| !supplied[index])
            }),
            _ => supplied.iter().position(|done| !done),
        };

        match slot {
            Some(index) => supplied[index] = true,
            None => conflicts.push(Conflict::UnexpectedInput {
                definition: definition.clone(),
                evaluate: node.clone(),
                input: argument.clone(),
            }),
        }
    }

    for (parameter, _) in parameters.iter().zip(&supplied).filter(|(_, done)| !**done) {
        if is_required(parameter) {
            conflicts.push(Conflict::MissingInput {
                definition: definition.clone(),
                evaluate: node.clone(),
                input: parameter.clone(),
            });
        }
    }

    conflicts
}

/// The left operand is the subject; the right operand fills the first input.
fn check_binary(
    node: &Node,
    binary: &BinaryEvaluate,
    context: &Context<'_>,
    scope: &Scope,
) -> Vec<Conflict> {
    let Some(definition) = context.operator_in(&binary.operator, scope) else {
        return Vec::new();
    };
    let parameters = context.inputs_of(&definition);

    let Some((_, rest)) = parameters.split_first() else {
        return vec![Conflict::UnexpectedInput {
            definition,
            evaluate: node.clone(),
            input: binary.right.clone(),
        }];
    };

    rest.iter()
        .filter(|parameter| is_required(parameter))
        .map(|parameter| Conflict::MissingInput {
            definition: definition.clone(),
            evaluate: node.clone(),
            input: parameter.clone(),
        })
        .collect()
}

fn check_borrow(node: &Node, borrow: &Borrow, context: &Context<'_>) -> Vec<Conflict> {
    match borrow.source_name() {
        Some(name) if context.source(name).is_none() => {
            tracing::trace!(name, "borrow of unknown source");
            vec![Conflict::UnknownBorrow { borrow: node.clone() }]
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::Program;
    use crate::syntax::build;

    fn program(statements: Vec<Node>) -> Program {
        Program::from_sources([build::source("main", vec![], statements).unwrap()]).unwrap()
    }

    fn pair() -> Node {
        build::function(
            "pair",
            vec![build::bind("a", None).unwrap(), build::bind("b", None).unwrap()],
            Some(build::reference("a").unwrap()),
        )
        .unwrap()
    }

    fn call(args: &[&str]) -> Node {
        let args = args.iter().map(|n| build::number(n).unwrap()).collect();
        build::evaluate(build::reference("pair").unwrap(), args).unwrap()
    }

    #[test]
    fn test_extra_argument_is_unexpected() {
        let program = program(vec![pair()]);
        let context = Context::new(&program);
        let evaluate = call(&["1", "2", "3"]);

        let conflicts = evaluate.compute_conflicts(&context);
        assert_eq!(conflicts.len(), 1);
        let Conflict::UnexpectedInput { input, .. } = &conflicts[0] else {
            panic!("expected unexpected input");
        };
        let Payload::Evaluate(payload) = evaluate.payload() else {
            unreachable!();
        };
        assert!(input.is(&payload.inputs[2]));
    }

    #[test]
    fn test_exact_arguments_are_fine() {
        let program = program(vec![pair()]);
        let context = Context::new(&program);
        assert!(call(&["1", "2"]).compute_conflicts(&context).is_empty());
    }

    #[test]
    fn test_missing_required_input() {
        let program = program(vec![pair()]);
        let context = Context::new(&program);
        let conflicts = call(&["1"]).compute_conflicts(&context);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].name(), "MissingInput");
    }

    #[test]
    fn test_named_inputs() {
        let program = program(vec![pair()]);
        let context = Context::new(&program);
        let evaluate = build::evaluate(
            build::reference("pair").unwrap(),
            vec![
                build::input("b", build::number("2").unwrap()).unwrap(),
                build::number("1").unwrap(),
                build::input("c", build::number("3").unwrap()).unwrap(),
            ],
        )
        .unwrap();

        let conflicts = evaluate.compute_conflicts(&context);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].name(), "UnexpectedInput");
    }

    #[test]
    fn test_defaults_are_optional() {
        let scale = build::function(
            "scale",
            vec![build::bind("factor", Some(build::number("1").unwrap())).unwrap()],
            Some(build::number("0").unwrap()),
        )
        .unwrap();
        let program = program(vec![scale]);
        let context = Context::new(&program);
        let evaluate = build::evaluate(build::reference("scale").unwrap(), vec![]).unwrap();
        assert!(evaluate.compute_conflicts(&context).is_empty());
    }

    #[test]
    fn test_unresolved_callee_reports_nothing() {
        let program = program(vec![]);
        let context = Context::new(&program);
        assert!(call(&["1", "2", "3"]).compute_conflicts(&context).is_empty());
    }

    #[test]
    fn test_operator_without_inputs() {
        let negate = build::function("-", vec![], Some(build::number("0").unwrap())).unwrap();
        let program = program(vec![negate]);
        let context = Context::new(&program);

        let right = build::number("2").unwrap();
        let binary = build::binary(build::number("1").unwrap(), "-", right.clone()).unwrap();
        let conflicts = binary.compute_conflicts(&context);
        assert_eq!(conflicts.len(), 1);
        assert!(conflicts[0].primary().is(&right));
    }

    #[test]
    fn test_operator_with_extra_required_inputs() {
        let clamp = build::function(
            "~",
            vec![build::bind("low", None).unwrap(), build::bind("high", None).unwrap()],
            Some(build::number("0").unwrap()),
        )
        .unwrap();
        let program = program(vec![clamp]);
        let context = Context::new(&program);
        let binary = build::binary(build::number("1").unwrap(), "~", build::number("2").unwrap()).unwrap();

        let conflicts = binary.compute_conflicts(&context);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].name(), "MissingInput");
    }

    #[test]
    fn test_parameter_binding_is_not_a_definition() {
        let program = program(vec![pair()]);
        let context = Context::new(&program);
        let evaluate = call(&["1", "2", "3"]);
        let apply = build::function("apply", vec![build::bind("pair", None).unwrap()], Some(evaluate.clone()))
            .unwrap();

        let mut conflicts = Vec::new();
        crate::hir::walk_scoped(&apply, &mut |node, scope| {
            conflicts.extend(node.compute_conflicts_in(&context, scope))
        });
        assert!(conflicts.is_empty());
        assert_eq!(evaluate.compute_conflicts(&context).len(), 1);
    }

    #[test]
    fn test_unknown_borrow() {
        let program = program(vec![]);
        let context = Context::new(&program);
        assert_eq!(build::borrow("nowhere").unwrap().compute_conflicts(&context).len(), 1);
        assert!(build::borrow("main").unwrap().compute_conflicts(&context).is_empty());
    }

    #[test]
    fn test_plain_structure_may_take_inputs() {
        let program = program(vec![]);
        let context = Context::new(&program);
        let structure = build::structure("Point", vec![build::bind("x", None).unwrap()], None).unwrap();
        assert!(structure.compute_conflicts(&context).is_empty());
    }
}
