//! Semantic analysis driver.
//!
//! Builds a [`Context`] for a program, runs every node's validators and the
//! borrow cycle search, and gathers the results. Sources are independent
//! immutable trees, so they are checked in parallel; results are merged back
//! in program order.

use rayon::prelude::*;

use super::conflict::{Conflict, ConflictCollector};
use super::context::Context;
use super::graph::find_borrow_cycles;
use super::program::Program;
use super::scope::walk_scoped;
use crate::syntax::Node;

/// Knobs for an analysis pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Check sources on the rayon thread pool.
    pub parallel: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// The conflicts found in one program.
#[derive(Clone, Debug, Default)]
pub struct Analysis {
    collector: ConflictCollector,
}

impl Analysis {
    /// Node conflicts in source and pre-order, followed by borrow cycles.
    pub fn conflicts(&self) -> &[Conflict] {
        self.collector.conflicts()
    }

    pub fn conflicts_for(&self, node: &Node) -> Vec<&Conflict> {
        self.collector.conflicts_for(node)
    }

    /// No blocking conflicts.
    pub fn is_executable(&self) -> bool {
        !self.collector.has_blocking()
    }

    pub fn blocking_count(&self) -> usize {
        self.collector.blocking_count()
    }

    pub fn minor_count(&self) -> usize {
        self.collector.minor_count()
    }

    pub fn into_conflicts(mut self) -> Vec<Conflict> {
        self.collector.take()
    }
}

/// Analyze a program with default options.
pub fn analyze(program: &Program) -> Analysis {
    analyze_with(program, AnalysisOptions::default())
}

pub fn analyze_with(program: &Program, options: AnalysisOptions) -> Analysis {
    let span = tracing::debug_span!("analyze", sources = program.len(), parallel = options.parallel);
    let _enter = span.enter();

    let context = Context::new(program);
    let sources: Vec<&Node> = program.sources().collect();

    let per_source: Vec<Vec<Conflict>> = if options.parallel {
        sources.par_iter().map(|source| check_source(source, &context)).collect()
    } else {
        sources.iter().map(|source| check_source(source, &context)).collect()
    };

    let mut collector = ConflictCollector::new();
    for conflicts in per_source {
        collector.extend(conflicts);
    }
    collector.extend(find_borrow_cycles(program));

    tracing::debug!(
        conflicts = collector.len(),
        blocking = collector.blocking_count(),
        "analysis finished"
    );
    Analysis { collector }
}

/// Conflicts of every node in one source tree, in pre-order. Names resolve
/// through the scopes enclosing each node before the top level.
pub fn check_source(source: &Node, context: &Context<'_>) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    walk_scoped(source, &mut |node, scope| {
        conflicts.extend(node.compute_conflicts_in(context, scope))
    });
    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::build;

    fn interface_with_inputs(name: &str) -> Node {
        let body = build::block(vec![build::function("area", vec![], None).unwrap()]).unwrap();
        build::structure(name, vec![build::bind("x", None).unwrap()], Some(body)).unwrap()
    }

    fn program() -> Program {
        let a = build::source(
            "a",
            vec![build::borrow("b").unwrap()],
            vec![interface_with_inputs("Shape")],
        )
        .unwrap();
        let b = build::source(
            "b",
            vec![build::borrow("a").unwrap(), build::borrow("nowhere").unwrap()],
            vec![],
        )
        .unwrap();
        Program::from_sources([a, b]).unwrap()
    }

    #[test]
    fn test_analysis_collects_everything() {
        let analysis = analyze(&program());
        let names: Vec<_> = analysis.conflicts().iter().map(Conflict::name).collect();
        assert_eq!(names, vec!["DisallowedInputs", "UnknownBorrow", "BorrowCycle"]);
        assert!(!analysis.is_executable());
        assert_eq!(analysis.blocking_count(), 3);
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let program = program();
        let parallel = analyze_with(&program, AnalysisOptions { parallel: true });
        let sequential = analyze_with(&program, AnalysisOptions { parallel: false });
        assert_eq!(parallel.conflicts(), sequential.conflicts());
    }

    #[test]
    fn test_clean_program_is_executable() {
        let source = build::source("main", vec![], vec![build::number("1").unwrap()]).unwrap();
        let analysis = analyze(&Program::from_sources([source]).unwrap());
        assert!(analysis.conflicts().is_empty());
        assert!(analysis.is_executable());
    }

    #[test]
    fn test_conflicts_for_node() {
        let structure = interface_with_inputs("Shape");
        let source = build::source("main", vec![], vec![structure.clone()]).unwrap();
        let analysis = analyze(&Program::from_sources([source]).unwrap());
        assert_eq!(analysis.conflicts_for(&structure).len(), 1);
    }
}
