use crate::error::CycleError;
use crate::pipeline::{EdgeDef, NodeDef, NodeId};
use ahash::AHashMap;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Computes a deterministic topological order with Kahn's algorithm.
///
/// Among the nodes that are ready at any point, the one earliest in the
/// original node list is taken first, so an unchanged graph always yields the
/// same order. Edges whose endpoints are not in the node list are skipped
/// here; the validator reports them as dangling.
///
/// O(V + E) apart from the ready-heap, which is logarithmic in the number of
/// simultaneously ready nodes.
pub fn topo_order(nodes: &[NodeDef], edges: &[EdgeDef]) -> Result<Vec<NodeId>, CycleError> {
    let index: AHashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.id.as_str(), i))
        .collect();

    let mut in_degree = vec![0usize; nodes.len()];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for edge in edges {
        let (Some(&source), Some(&target)) = (
            index.get(edge.source.as_str()),
            index.get(edge.target.as_str()),
        ) else {
            continue;
        };
        successors[source].push(target);
        in_degree[target] += 1;
    }

    // Min-heap over node-list indices: the deterministic tie-break.
    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|&(_, &degree)| degree == 0)
        .map(|(i, _)| Reverse(i))
        .collect();

    let mut order = Vec::with_capacity(nodes.len());
    let mut placed = vec![false; nodes.len()];

    while let Some(Reverse(current)) = ready.pop() {
        placed[current] = true;
        order.push(nodes[current].id.clone());
        for &next in &successors[current] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.push(Reverse(next));
            }
        }
    }

    if order.len() == nodes.len() {
        Ok(order)
    } else {
        let unplaced = nodes
            .iter()
            .enumerate()
            .filter(|(i, _)| !placed[*i])
            .map(|(_, node)| node.id.clone())
            .collect();
        Err(CycleError { unplaced })
    }
}
