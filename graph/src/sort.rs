//! Topological ordering of pass dependencies.

use std::collections::VecDeque;

/// Orders `node_count` nodes so every arc `(from, to)` has `from` first.
///
/// Uses Kahn's algorithm. Ready nodes are taken in index order, so the result
/// is deterministic for a given insertion order. On failure returns the
/// indices of nodes that lie on a cycle, ascending.
pub(crate) fn topological_order(
    node_count: usize,
    arcs: impl IntoIterator<Item = (usize, usize)>,
) -> Result<Vec<usize>, Vec<usize>> {
    // Forward adjacency list: successors[i] = nodes that depend on i.
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    let mut in_degrees = vec![0usize; node_count];
    for (from, to) in arcs {
        successors[from].push(to);
        in_degrees[to] += 1;
    }

    let mut remaining = in_degrees;
    let mut queue: VecDeque<usize> = remaining
        .iter()
        .enumerate()
        .filter(|&(_, &deg)| deg == 0)
        .map(|(idx, _)| idx)
        .collect();
    let mut order = Vec::with_capacity(node_count);

    while let Some(node) = queue.pop_front() {
        order.push(node);
        for &dependent in &successors[node] {
            remaining[dependent] -= 1;
            if remaining[dependent] == 0 {
                queue.push_back(dependent);
            }
        }
    }

    if order.len() == node_count {
        return Ok(order);
    }

    let blocked: Vec<bool> = remaining.iter().map(|&deg| deg > 0).collect();
    let mut components = Components::new(&successors, &blocked);
    for node in 0..node_count {
        if blocked[node] && components.index[node].is_none() {
            components.visit(node);
        }
    }

    Err((0..node_count)
        .filter(|&node| components.cyclic[node])
        .collect())
}

/// Tarjan's strongly connected components over the blocked nodes.
///
/// A node is cyclic when its component has more than one member or it has an
/// arc to itself.
struct Components<'a> {
    successors: &'a [Vec<usize>],
    blocked: &'a [bool],
    index: Vec<Option<usize>>,
    low_link: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    next_index: usize,
    cyclic: Vec<bool>,
}

impl<'a> Components<'a> {
    fn new(successors: &'a [Vec<usize>], blocked: &'a [bool]) -> Self {
        let node_count = successors.len();
        Self {
            successors,
            blocked,
            index: vec![None; node_count],
            low_link: vec![0; node_count],
            on_stack: vec![false; node_count],
            stack: Vec::new(),
            next_index: 0,
            cyclic: vec![false; node_count],
        }
    }

    fn visit(&mut self, node: usize) {
        self.index[node] = Some(self.next_index);
        self.low_link[node] = self.next_index;
        self.next_index += 1;
        self.stack.push(node);
        self.on_stack[node] = true;

        let successors = self.successors;
        for &next in &successors[node] {
            if !self.blocked[next] {
                continue;
            }
            match self.index[next] {
                None => {
                    self.visit(next);
                    self.low_link[node] = self.low_link[node].min(self.low_link[next]);
                }
                Some(next_index) if self.on_stack[next] => {
                    self.low_link[node] = self.low_link[node].min(next_index);
                }
                Some(_) => {}
            }
        }

        if Some(self.low_link[node]) != self.index[node] {
            return;
        }

        let mut component = Vec::new();
        while let Some(member) = self.stack.pop() {
            self.on_stack[member] = false;
            component.push(member);
            if member == node {
                break;
            }
        }
        if component.len() > 1 || successors[node].contains(&node) {
            for member in component {
                self.cyclic[member] = true;
            }
        }
    }
}
