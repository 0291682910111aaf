//! Borrow cycle detection across whole programs.
//!
//! Checks which sources end up on each reported cycle and which borrow the
//! conflict is attached to.

use glyph::hir::{Conflict, Program, ProgramError, Role, analyze, find_borrow_cycles};
use glyph::syntax::{Node, Payload, build};
use rstest::rstest;

fn source(name: &str, borrows: &[&str]) -> Node {
    let borrows = borrows.iter().map(|b| build::borrow(b).unwrap()).collect();
    build::source(name, borrows, vec![]).unwrap()
}

fn borrows(source: &Node) -> Vec<Node> {
    let Payload::Source(payload) = source.payload() else {
        panic!("expected a source");
    };
    payload.borrows().to_vec()
}

fn cycle_names(conflict: &Conflict) -> Vec<String> {
    let Conflict::BorrowCycle { cycle, .. } = conflict else {
        panic!("expected a borrow cycle, got {conflict:?}");
    };
    cycle
        .iter()
        .filter_map(Node::primary_name)
        .map(str::to_string)
        .collect()
}

#[test]
fn test_two_cycle_attached_to_first_borrow() {
    let a = source("A", &["B"]);
    let b = source("B", &["A"]);
    let program = Program::from_sources([a.clone(), b]).unwrap();

    let conflicts = find_borrow_cycles(&program);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(cycle_names(&conflicts[0]), vec!["A", "B"]);
    assert!(conflicts[0].primary().is(&borrows(&a)[0]));
    assert!(!conflicts[0].is_minor());
}

#[test]
fn test_two_cycle_sites() {
    let a = source("A", &["B"]);
    let b = source("B", &["A"]);
    let program = Program::from_sources([a.clone(), b.clone()]).unwrap();

    let sites = find_borrow_cycles(&program)[0].sites();
    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].role, Role::Primary);
    assert!(sites[0].node.is(&borrows(&a)[0]));
    assert_eq!(sites[1].role, Role::Secondary);
    assert!(sites[1].node.is(&borrows(&b)[0]));
    assert_eq!(
        sites[0].explanation.template.path(),
        "node.Borrow.conflict.BorrowCycle.primary"
    );
}

#[test]
fn test_self_loop() {
    let a = source("A", &["A"]);
    let program = Program::from_sources([a.clone()]).unwrap();

    let conflicts = find_borrow_cycles(&program);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(cycle_names(&conflicts[0]), vec!["A"]);
    assert!(conflicts[0].primary().is(&borrows(&a)[0]));
    assert_eq!(conflicts[0].sites().len(), 1);
}

#[rstest]
#[case::empty(vec![])]
#[case::single(vec![("A", vec![])])]
#[case::chain(vec![("A", vec!["B"]), ("B", vec!["C"]), ("C", vec![])])]
#[case::diamond(vec![("A", vec!["B", "C"]), ("B", vec!["D"]), ("C", vec!["D"]), ("D", vec![])])]
#[case::unresolved(vec![("A", vec!["nowhere"]), ("B", vec!["A", "elsewhere"])])]
fn test_acyclic_programs(#[case] layout: Vec<(&str, Vec<&str>)>) {
    let sources = layout.iter().map(|(name, borrows)| source(name, borrows));
    let program = Program::from_sources(sources).unwrap();
    assert!(find_borrow_cycles(&program).is_empty());
}

#[rstest]
#[case::two(&[("A", &["B"][..]), ("B", &["A"][..])], 1)]
#[case::two_disjoint(&[("A", &["B"][..]), ("B", &["A"][..]), ("C", &["D"][..]), ("D", &["C"][..])], 2)]
#[case::shared_vertex(&[("A", &["B", "C"][..]), ("B", &["A"][..]), ("C", &["A"][..])], 2)]
#[case::self_and_pair(&[("A", &["A", "B"][..]), ("B", &["A"][..])], 2)]
fn test_one_conflict_per_closing_borrow(#[case] layout: &[(&str, &[&str])], #[case] expected: usize) {
    let sources = layout.iter().map(|(name, borrows)| source(name, borrows));
    let program = Program::from_sources(sources).unwrap();
    assert_eq!(find_borrow_cycles(&program).len(), expected);
}

#[test]
fn test_long_chain_does_not_overflow() {
    let count = 10_000;
    let sources = (0..count).map(|i| {
        let next = format!("m{}", (i + 1) % count);
        source(&format!("m{i}"), &[next.as_str()])
    });
    let program = Program::from_sources(sources).unwrap();

    let conflicts = find_borrow_cycles(&program);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(cycle_names(&conflicts[0]).len(), count);
}

#[test]
fn test_analysis_reports_cycles_and_unknown_borrows() {
    let program = Program::from_sources([source("A", &["B", "ghost"]), source("B", &["A"])]).unwrap();
    let analysis = analyze(&program);
    let names: Vec<_> = analysis.conflicts().iter().map(Conflict::name).collect();
    assert_eq!(names, vec!["UnknownBorrow", "BorrowCycle"]);
    assert!(!analysis.is_executable());
}

#[test]
fn test_duplicate_source_names_are_rejected() {
    let result = Program::from_sources([source("A", &["A"]), source("A", &[])]);
    assert_eq!(result, Err(ProgramError::DuplicateName("A".into())));

    // Replacing a source by name is explicit.
    let program = Program::from_sources([source("A", &["A"])]).unwrap();
    let replaced = program.with_source(source("A", &[])).unwrap();
    assert_eq!(replaced.len(), 1);
    assert!(find_borrow_cycles(&replaced).is_empty());
}
