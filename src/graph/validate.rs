use super::schedule::topo_order;
use crate::error::ValidationError;
use crate::pipeline::{EdgeDef, NodeDef};
use ahash::{AHashMap, AHashSet};

/// Checks a pipeline for structural problems.
///
/// All checks run independently and every finding is collected, so the caller
/// can surface the full list at once instead of fixing errors one at a time.
/// An empty result means the pipeline may be scheduled.
pub fn validate(nodes: &[NodeDef], edges: &[EdgeDef]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let known: AHashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();

    for edge in edges {
        for endpoint in [&edge.source, &edge.target] {
            if !known.contains(endpoint.as_str()) {
                errors.push(ValidationError::DanglingEdge {
                    edge_id: edge.id.clone(),
                    node_id: endpoint.clone(),
                });
            }
        }
    }

    // Cycle detection reuses the scheduler's pass: whatever it cannot place
    // is part of (or downstream of) a cycle.
    if let Err(cycle) = topo_order(nodes, edges) {
        errors.push(ValidationError::Cycle {
            nodes: cycle.unplaced,
        });
    }

    for node in nodes {
        if node.node_type.is_source() {
            if edges.iter().any(|edge| edge.target == node.id) {
                errors.push(ValidationError::SourceHasInput {
                    node_id: node.id.clone(),
                });
            }
            continue;
        }

        if node.node_type.is_sink() && edges.iter().any(|edge| edge.source == node.id) {
            errors.push(ValidationError::SinkHasOutput {
                node_id: node.id.clone(),
            });
        }

        // Single-input nodes: at most one effective edge per target handle.
        // Zero incoming edges is not a structural error; the run reports it
        // as a missing-input condition on the node itself.
        let mut per_handle: AHashMap<&str, usize> = AHashMap::new();
        for edge in edges.iter().filter(|edge| edge.target == node.id) {
            *per_handle.entry(edge.target_handle.as_str()).or_default() += 1;
        }
        let mut handles: Vec<&str> = per_handle
            .iter()
            .filter(|&(_, &count)| count > 1)
            .map(|(&handle, _)| handle)
            .collect();
        handles.sort_unstable();
        for handle in handles {
            errors.push(ValidationError::DuplicateInput {
                node_id: node.id.clone(),
                handle: handle.to_string(),
            });
        }
    }

    errors
}
