//! Tests for structural validation: every check is independent and all
//! findings are collected in one pass.
mod common;
use common::*;
use pixelflow::prelude::*;

#[test]
fn valid_pipeline_produces_no_errors() {
    let (nodes, edges) = linear_pipeline();
    assert!(validate(&nodes, &edges).is_empty());
}

#[test]
fn dangling_edge_reported_for_both_endpoints() {
    let nodes = vec![node("in", NodeType::Input)];
    let edges = vec![edge("e1", "ghost", "phantom")];

    let errors = validate(&nodes, &edges);
    let dangling: Vec<_> = errors
        .iter()
        .filter(|e| matches!(e, ValidationError::DanglingEdge { .. }))
        .collect();
    assert_eq!(dangling.len(), 2);
}

#[test]
fn cycle_reported_with_its_members() {
    let nodes = vec![
        node("in", NodeType::Input),
        node("a", NodeType::RemoveBg),
        node("b", NodeType::Normalize),
    ];
    let edges = vec![
        edge("e1", "in", "a"),
        edge("e2", "a", "b"),
        edge("e3", "b", "a"),
    ];

    let errors = validate(&nodes, &edges);
    let cycle = errors
        .iter()
        .find_map(|e| match e {
            ValidationError::Cycle { nodes } => Some(nodes.clone()),
            _ => None,
        })
        .expect("expected a cycle error");
    assert!(cycle.contains(&"a".to_string()));
    assert!(cycle.contains(&"b".to_string()));
    assert!(!cycle.contains(&"in".to_string()));
}

#[test]
fn source_must_not_receive_edges() {
    let nodes = vec![node("in", NodeType::Input), node("bg", NodeType::RemoveBg)];
    let edges = vec![edge("e1", "in", "bg"), edge("e2", "bg", "in")];

    let errors = validate(&nodes, &edges);
    assert!(errors.iter().any(|e| matches!(
        e,
        ValidationError::SourceHasInput { node_id } if node_id == "in"
    )));
}

#[test]
fn sink_must_not_feed_edges() {
    let nodes = vec![
        node("in", NodeType::Input),
        node("out", NodeType::Output),
        node("bg", NodeType::RemoveBg),
    ];
    let edges = vec![edge("e1", "in", "out"), edge("e2", "out", "bg")];

    let errors = validate(&nodes, &edges);
    assert!(errors.iter().any(|e| matches!(
        e,
        ValidationError::SinkHasOutput { node_id } if node_id == "out"
    )));
}

#[test]
fn duplicate_edges_into_one_handle_are_flagged() {
    let nodes = vec![
        node("in", NodeType::Input),
        node("norm", NodeType::Normalize),
        node("bg", NodeType::RemoveBg),
    ];
    let edges = vec![
        edge("e1", "in", "bg"),
        edge("e2", "norm", "bg"),
        edge("e3", "in", "norm"),
    ];

    let errors = validate(&nodes, &edges);
    assert!(errors.iter().any(|e| matches!(
        e,
        ValidationError::DuplicateInput { node_id, handle }
            if node_id == "bg" && handle == "input"
    )));
}

#[test]
fn distinct_handles_do_not_count_as_duplicates() {
    let nodes = vec![
        node("in", NodeType::Input),
        node("norm", NodeType::Normalize),
        node("bg", NodeType::RemoveBg),
    ];
    let mut second = edge("e2", "norm", "bg");
    second.target_handle = "mask".to_string();
    let edges = vec![edge("e1", "in", "bg"), edge("e3", "in", "norm"), second];

    let errors = validate(&nodes, &edges);
    assert!(!errors
        .iter()
        .any(|e| matches!(e, ValidationError::DuplicateInput { .. })));
}

#[test]
fn missing_input_edge_is_not_a_structural_error() {
    // A processing node with no incoming edge validates fine; the run
    // reports it as a per-node missing-input failure instead.
    let nodes = vec![node("bg", NodeType::RemoveBg)];
    assert!(validate(&nodes, &[]).is_empty());
}

#[test]
fn all_findings_are_collected_together() {
    let nodes = vec![
        node("in", NodeType::Input),
        node("a", NodeType::RemoveBg),
        node("b", NodeType::Normalize),
    ];
    let edges = vec![
        edge("e1", "ghost", "a"),
        edge("e2", "a", "b"),
        edge("e3", "b", "a"),
        edge("e4", "a", "in"),
    ];

    let errors = validate(&nodes, &edges);
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::DanglingEdge { .. })));
    assert!(errors.iter().any(|e| matches!(e, ValidationError::Cycle { .. })));
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::SourceHasInput { .. })));
}
