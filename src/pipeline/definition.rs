use super::node_type::NodeType;
use super::params::Params;
use super::NodeId;
use crate::error::DefinitionError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The pipeline document version this engine reads and writes.
pub const PIPELINE_VERSION: u32 = 1;

/// Editor canvas coordinate. Carried through load/save, never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One pipeline step as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub position: Position,
    #[serde(default)]
    pub params: Params,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl NodeDef {
    /// Creates a node seeded with the kind's default parameters and label.
    pub fn new(id: impl Into<NodeId>, node_type: NodeType, position: Position) -> Self {
        Self {
            id: id.into(),
            node_type,
            position,
            params: node_type.default_params(),
            label: Some(node_type.label().to_string()),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<super::ParamValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// One connection between two node ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDef {
    pub id: String,
    pub source: NodeId,
    #[serde(default = "EdgeDef::default_source_handle")]
    pub source_handle: String,
    pub target: NodeId,
    #[serde(default = "EdgeDef::default_target_handle")]
    pub target_handle: String,
}

impl EdgeDef {
    /// Creates an edge between the default ports of two nodes.
    pub fn new(id: impl Into<String>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            source_handle: Self::default_source_handle(),
            target: target.into(),
            target_handle: Self::default_target_handle(),
        }
    }

    fn default_source_handle() -> String {
        "output".to_string()
    }

    fn default_target_handle() -> String {
        "input".to_string()
    }
}

/// The persisted/exchanged pipeline artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineDefinition {
    pub version: u32,
    pub nodes: Vec<NodeDef>,
    pub edges: Vec<EdgeDef>,
}

impl PipelineDefinition {
    pub fn new(nodes: Vec<NodeDef>, edges: Vec<EdgeDef>) -> Self {
        Self {
            version: PIPELINE_VERSION,
            nodes,
            edges,
        }
    }

    /// Parses a pipeline document, rejecting unknown versions and documents
    /// whose `nodes`/`edges` are not arrays.
    pub fn from_json_str(json: &str) -> Result<Self, DefinitionError> {
        let def: Self =
            serde_json::from_str(json).map_err(|e| DefinitionError::Json(e.to_string()))?;
        if def.version != PIPELINE_VERSION {
            return Err(DefinitionError::UnsupportedVersion {
                found: def.version,
                expected: PIPELINE_VERSION,
            });
        }
        Ok(def)
    }

    /// Loads a pipeline document from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| DefinitionError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&content)
    }

    pub fn to_json_string(&self) -> Result<String, DefinitionError> {
        serde_json::to_string_pretty(self).map_err(|e| DefinitionError::Json(e.to_string()))
    }
}
