//! Ordering an unordered set of edges into one simple closed cycle.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// A closed ring where `lines[i]` joins `vertices[i]` to `vertices[(i + 1) % n]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle<V, L> {
    pub vertices: Vec<V>,
    pub lines: Vec<L>,
}

impl<V, L> Cycle<V, L> {
    /// Number of vertices (equal to the number of lines).
    /// Number of lines (and vertices) in the cycle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if the cycle has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Reverses the traversal direction, keeping the first vertex in place.
    pub fn reverse(&mut self) {
        if self.vertices.len() > 1 {
            self.vertices[1..].reverse();
        }
        self.lines.reverse();
    }
}

/// Reasons an edge set is not exactly one simple cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleError<V, L> {
    TooFewLines(usize),
    DuplicateLine(L),
    SelfLoop(L),
    InvalidDegree { vertex: V, degree: usize },
    RevisitedLine(L),
    NotClosed { steps: usize },
    Disconnected { visited: usize, expected: usize },
}

/// Orders `edges` (given as `(line, a, b)`) into a single closed cycle.
///
/// Every vertex touched by the edges must have degree exactly 2 within the
/// set. The walk starts at the first edge's first endpoint and traverses the
/// first edge first, so the output is deterministic for a given input order.
/// Edge sets made of several disjoint cycles are rejected.
///
/// # Errors
///
/// Returns a [`CycleError`] describing the first violation found.
pub fn order_cycle<V, L>(edges: &[(L, V, V)]) -> Result<Cycle<V, L>, CycleError<V, L>>
where
    V: Copy + Eq + Hash,
    L: Copy + Eq + Hash,
{
    let n = edges.len();
    if n < 3 {
        return Err(CycleError::TooFewLines(n));
    }

    let mut seen = HashSet::with_capacity(n);
    let mut incidence: HashMap<V, Vec<usize>> = HashMap::with_capacity(n);
    for (idx, &(line, a, b)) in edges.iter().enumerate() {
        if !seen.insert(line) {
            return Err(CycleError::DuplicateLine(line));
        }
        if a == b {
            return Err(CycleError::SelfLoop(line));
        }
        incidence.entry(a).or_default().push(idx);
        incidence.entry(b).or_default().push(idx);
    }

    for &(_, a, b) in edges {
        for vertex in [a, b] {
            let degree = incidence.get(&vertex).map_or(0, Vec::len);
            if degree != 2 {
                return Err(CycleError::InvalidDegree { vertex, degree });
            }
        }
    }

    let (_, start, _) = edges[0];
    let mut current = start;
    let mut previous: Option<usize> = None;
    let mut used = vec![false; n];
    let mut cycle = Cycle {
        vertices: Vec::with_capacity(n),
        lines: Vec::with_capacity(n),
    };

    loop {
        if cycle.lines.len() >= n {
            return Err(CycleError::NotClosed { steps: n });
        }
        let Some(incident) = incidence.get(&current) else {
            return Err(CycleError::NotClosed {
                steps: cycle.lines.len(),
            });
        };
        let next = match previous {
            None => 0,
            Some(prev) => match incident.iter().copied().find(|&idx| idx != prev) {
                Some(idx) => idx,
                None => {
                    return Err(CycleError::NotClosed {
                        steps: cycle.lines.len(),
                    })
                }
            },
        };

        let (line, a, b) = edges[next];
        if used[next] {
            return Err(CycleError::RevisitedLine(line));
        }
        used[next] = true;
        cycle.vertices.push(current);
        cycle.lines.push(line);

        current = if current == a { b } else { a };
        previous = Some(next);
        if current == start {
            break;
        }
    }

    if cycle.lines.len() != n {
        return Err(CycleError::Disconnected {
            visited: cycle.lines.len(),
            expected: n,
        });
    }
    Ok(cycle)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    type Edge = (u32, char, char);

    fn assert_closed(cycle: &Cycle<char, u32>, edges: &[Edge]) {
        let n = cycle.len();
        for i in 0..n {
            let (_, a, b) = edges
                .iter()
                .find(|e| e.0 == cycle.lines[i])
                .copied()
                .unwrap();
            let from = cycle.vertices[i];
            let to = cycle.vertices[(i + 1) % n];
            assert!((a == from && b == to) || (a == to && b == from));
        }
    }

    #[test]
    fn orders_shuffled_square() {
        let edges = [(0, 'a', 'b'), (2, 'c', 'd'), (3, 'a', 'd'), (1, 'c', 'b')];
        let cycle = order_cycle(&edges).unwrap();
        assert_eq!(cycle.vertices, vec!['a', 'b', 'c', 'd']);
        assert_eq!(cycle.lines, vec![0, 1, 2, 3]);
        assert_closed(&cycle, &edges);
    }

    #[test]
    fn triangle_is_minimal_cycle() {
        let edges = [(5, 'x', 'y'), (6, 'z', 'x'), (7, 'y', 'z')];
        let cycle = order_cycle(&edges).unwrap();
        assert_eq!(cycle.len(), 3);
        assert_closed(&cycle, &edges);
    }

    #[test]
    fn rejects_too_few_lines() {
        let edges = [(0, 'a', 'b'), (1, 'b', 'a')];
        assert_eq!(order_cycle(&edges), Err(CycleError::TooFewLines(2)));
    }

    #[test]
    fn rejects_degree_three_vertex() {
        let edges = [
            (0, 'a', 'b'),
            (1, 'b', 'c'),
            (2, 'c', 'd'),
            (3, 'd', 'a'),
            (4, 'a', 'c'),
        ];
        assert!(matches!(
            order_cycle(&edges),
            Err(CycleError::InvalidDegree { degree: 3, .. })
        ));
    }

    #[test]
    fn rejects_open_path() {
        let edges = [(0, 'a', 'b'), (1, 'b', 'c'), (2, 'c', 'd')];
        assert_eq!(
            order_cycle(&edges),
            Err(CycleError::InvalidDegree {
                vertex: 'a',
                degree: 1
            })
        );
    }

    #[test]
    fn rejects_two_disjoint_triangles() {
        let edges = [
            (0, 'a', 'b'),
            (1, 'b', 'c'),
            (2, 'c', 'a'),
            (3, 'x', 'y'),
            (4, 'y', 'z'),
            (5, 'z', 'x'),
        ];
        assert_eq!(
            order_cycle(&edges),
            Err(CycleError::Disconnected {
                visited: 3,
                expected: 6
            })
        );
    }

    #[test]
    fn rejects_repeated_line_and_self_loop() {
        let repeated = [(0, 'a', 'b'), (1, 'b', 'c'), (0, 'a', 'b')];
        assert_eq!(order_cycle(&repeated), Err(CycleError::DuplicateLine(0)));

        let looped = [(0, 'a', 'b'), (1, 'b', 'b'), (2, 'b', 'a')];
        assert_eq!(order_cycle(&looped), Err(CycleError::SelfLoop(1)));
    }

    #[test]
    fn reverse_keeps_first_vertex() {
        let edges = [(0, 'a', 'b'), (1, 'b', 'c'), (2, 'c', 'a')];
        let mut cycle = order_cycle(&edges).unwrap();
        cycle.reverse();
        assert_eq!(cycle.vertices, vec!['a', 'c', 'b']);
        assert_eq!(cycle.lines, vec![2, 1, 0]);
        assert_closed(&cycle, &edges);
    }
}
