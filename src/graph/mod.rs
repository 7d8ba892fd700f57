//! Adjacency queries over the edge list, plus validation and ordering.
//!
//! These are pure functions of the definitions; at the expected graph sizes
//! (tens of nodes) nothing here needs caching.

pub mod schedule;
pub mod validate;

pub use schedule::topo_order;
pub use validate::validate;

use crate::pipeline::{EdgeDef, NodeId};
use ahash::AHashSet;
use itertools::Itertools;
use std::collections::VecDeque;

/// Direct upstream neighbours of a node: sources of every edge targeting it,
/// deduplicated, in edge-list order. This order is stable and feeds the cache
/// key, so it must not depend on map iteration.
pub fn upstream_of(node_id: &str, edges: &[EdgeDef]) -> Vec<NodeId> {
    edges
        .iter()
        .filter(|edge| edge.target == node_id)
        .map(|edge| edge.source.clone())
        .unique()
        .collect()
}

/// Every node transitively reachable by following edges forward from
/// `node_id`, excluding `node_id` itself. The visited set bounds the walk, so
/// cyclic input terminates; rejecting cycles outright is the validator's job.
pub fn downstream_of(node_id: &str, edges: &[EdgeDef]) -> Vec<NodeId> {
    let mut visited: AHashSet<&str> = AHashSet::new();
    visited.insert(node_id);

    let mut result = Vec::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    queue.push_back(node_id);

    while let Some(current) = queue.pop_front() {
        for edge in edges.iter().filter(|edge| edge.source == current) {
            if visited.insert(edge.target.as_str()) {
                result.push(edge.target.clone());
                queue.push_back(edge.target.as_str());
            }
        }
    }
    result
}
