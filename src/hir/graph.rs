//! Borrow dependency graph and cycle detection.
//!
//! Vertices are the program's sources in program order; an edge leads from a
//! source to each source it borrows from, in declared borrow order. Borrows of
//! names the program does not contain produce no edge.
//!
//! Cycle search is an iterative depth-first walk with an explicit path stack,
//! so deep borrow chains cannot overflow the call stack. Each edge into a
//! source that is still on the path closes exactly one cycle.

use rustc_hash::FxHashMap;

use super::conflict::Conflict;
use super::program::{Program, source_payload};
use crate::syntax::{Node, Payload};

/// One borrow resolved to the index of the source it names.
#[derive(Clone, Debug)]
pub struct Edge {
    pub borrow: Node,
    pub target: usize,
}

/// Adjacency view of which sources borrow from which.
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    sources: Vec<Node>,
    edges: Vec<Vec<Edge>>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    /// On the current path at this depth.
    OnStack(usize),
    Done,
}

struct Frame {
    vertex: usize,
    /// Next outgoing edge to follow.
    next: usize,
    /// Borrow that led here from the previous frame.
    via: Option<Node>,
}

impl DependencyGraph {
    pub fn build(program: &Program) -> Self {
        let mut targets: FxHashMap<&str, Option<usize>> = FxHashMap::default();
        let mut sources = Vec::with_capacity(program.len());
        let mut edges = Vec::with_capacity(program.len());

        for source in program.sources() {
            let borrows = source_payload(source).map(|s| s.borrows()).unwrap_or_default();
            let mut outgoing = Vec::with_capacity(borrows.len());
            for borrow in borrows {
                let Payload::Borrow(payload) = borrow.payload() else {
                    continue;
                };
                let Some(name) = payload.source_name() else {
                    continue;
                };
                let target = *targets.entry(name).or_insert_with(|| program.index_of(name));
                match target {
                    Some(target) => outgoing.push(Edge {
                        borrow: borrow.clone(),
                        target,
                    }),
                    None => tracing::trace!(name, from = ?source.primary_name(), "unresolved borrow"),
                }
            }
            sources.push(source.clone());
            edges.push(outgoing);
        }

        Self { sources, edges }
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn source(&self, index: usize) -> Option<&Node> {
        self.sources.get(index)
    }

    /// Outgoing edges of a source, in declared borrow order.
    pub fn edges_from(&self, index: usize) -> &[Edge] {
        self.edges.get(index).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// One `BorrowCycle` per edge that closes a cycle.
    ///
    /// Searches start from each unvisited source in program order and follow
    /// edges in borrow order, so the result is deterministic for a program.
    pub fn find_cycles(&self) -> Vec<Conflict> {
        let mut marks = vec![Mark::Unvisited; self.sources.len()];
        let mut conflicts = Vec::new();

        for start in 0..self.sources.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }
            marks[start] = Mark::OnStack(0);
            let mut path = vec![Frame {
                vertex: start,
                next: 0,
                via: None,
            }];

            while let Some(frame) = path.last() {
                let vertex = frame.vertex;
                let Some(edge) = self.edges[vertex].get(frame.next) else {
                    marks[vertex] = Mark::Done;
                    path.pop();
                    continue;
                };
                let depth = path.len() - 1;
                path[depth].next += 1;

                match marks[edge.target] {
                    Mark::Unvisited => {
                        marks[edge.target] = Mark::OnStack(path.len());
                        path.push(Frame {
                            vertex: edge.target,
                            next: 0,
                            via: Some(edge.borrow.clone()),
                        });
                    }
                    Mark::OnStack(position) => {
                        let cycle: Vec<Node> = path[position..]
                            .iter()
                            .map(|frame| self.sources[frame.vertex].clone())
                            .collect();
                        let borrow = path
                            .get(position + 1)
                            .and_then(|frame| frame.via.clone())
                            .unwrap_or_else(|| edge.borrow.clone());
                        tracing::trace!(length = cycle.len(), "borrow cycle");
                        conflicts.push(Conflict::BorrowCycle {
                            borrow,
                            closing: edge.borrow.clone(),
                            cycle,
                        });
                    }
                    Mark::Done => {}
                }
            }
        }

        conflicts
    }
}

/// Find every borrow cycle in a program.
pub fn find_borrow_cycles(program: &Program) -> Vec<Conflict> {
    DependencyGraph::build(program).find_cycles()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::build;

    fn source(name: &str, borrows: &[&str]) -> Node {
        let borrows = borrows.iter().map(|b| build::borrow(b).unwrap()).collect();
        build::source(name, borrows, vec![]).unwrap()
    }

    fn cycle_names(conflict: &Conflict) -> Vec<&str> {
        let Conflict::BorrowCycle { cycle, .. } = conflict else {
            panic!("expected a borrow cycle");
        };
        cycle.iter().filter_map(Node::primary_name).collect()
    }

    fn first_borrow(source: &Node) -> Node {
        source_payload(source).unwrap().borrows()[0].clone()
    }

    #[test]
    fn test_two_cycle() {
        let a = source("A", &["B"]);
        let b = source("B", &["A"]);
        let program = Program::from_sources([a.clone(), b.clone()]).unwrap();

        let conflicts = find_borrow_cycles(&program);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(cycle_names(&conflicts[0]), vec!["A", "B"]);

        let Conflict::BorrowCycle { borrow, closing, .. } = &conflicts[0] else {
            unreachable!();
        };
        assert!(borrow.is(&first_borrow(&a)));
        assert!(closing.is(&first_borrow(&b)));
    }

    #[test]
    fn test_self_loop() {
        let a = source("A", &["A"]);
        let program = Program::from_sources([a.clone()]).unwrap();

        let conflicts = find_borrow_cycles(&program);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(cycle_names(&conflicts[0]), vec!["A"]);
        assert!(conflicts[0].primary().is(&first_borrow(&a)));
    }

    #[test]
    fn test_acyclic() {
        let program = Program::from_sources([
            source("A", &["B", "C"]),
            source("B", &["C"]),
            source("C", &[]),
        ])
        .unwrap();
        assert!(find_borrow_cycles(&program).is_empty());
    }

    #[test]
    fn test_three_cycle_entered_midway() {
        let program = Program::from_sources([
            source("Z", &["A"]),
            source("A", &["B"]),
            source("B", &["C"]),
            source("C", &["A"]),
        ])
        .unwrap();

        let conflicts = find_borrow_cycles(&program);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(cycle_names(&conflicts[0]), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_unresolved_borrows_are_skipped() {
        let program = Program::from_sources([source("A", &["missing", "A"])]).unwrap();
        let graph = DependencyGraph::build(&program);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.find_cycles().len(), 1);
    }

    #[test]
    fn test_deterministic() {
        let program = Program::from_sources([
            source("A", &["B", "C"]),
            source("B", &["A"]),
            source("C", &["A"]),
        ])
        .unwrap();

        let first = find_borrow_cycles(&program);
        let second = find_borrow_cycles(&program);
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert_eq!(cycle_names(&first[0]), vec!["A", "B"]);
        assert_eq!(cycle_names(&first[1]), vec!["A", "C"]);
    }
}
