use super::params::{ParamValue, Params};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of pipeline step kinds.
///
/// `Input` is a pure source (no input port) and `Output` a pure sink (no
/// output port); every other kind consumes exactly one frame and produces one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeType {
    Input,
    Output,
    RemoveBg,
    Normalize,
    Upscale,
    Outline,
    Depth,
    FaceParse,
}

impl NodeType {
    pub const ALL: [NodeType; 8] = [
        NodeType::Input,
        NodeType::Output,
        NodeType::RemoveBg,
        NodeType::Normalize,
        NodeType::Upscale,
        NodeType::Outline,
        NodeType::Depth,
        NodeType::FaceParse,
    ];

    /// A pure source has no input port and must not receive edges.
    pub fn is_source(self) -> bool {
        matches!(self, NodeType::Input)
    }

    /// A pure sink has no output port and must not feed edges.
    pub fn is_sink(self) -> bool {
        matches!(self, NodeType::Output)
    }

    /// The name used in the JSON wire format.
    pub fn wire_name(self) -> &'static str {
        match self {
            NodeType::Input => "input",
            NodeType::Output => "output",
            NodeType::RemoveBg => "remove-bg",
            NodeType::Normalize => "normalize",
            NodeType::Upscale => "upscale",
            NodeType::Outline => "outline",
            NodeType::Depth => "depth",
            NodeType::FaceParse => "face-parse",
        }
    }

    /// Human-readable display label.
    pub fn label(self) -> &'static str {
        match self {
            NodeType::Input => "Image Input",
            NodeType::Output => "Output",
            NodeType::RemoveBg => "Remove BG",
            NodeType::Normalize => "Normalize",
            NodeType::Upscale => "Upscale 2x",
            NodeType::Outline => "Outline",
            NodeType::Depth => "Estimate Depth",
            NodeType::FaceParse => "Face Parse",
        }
    }

    /// The default parameter set a freshly added node of this kind carries.
    pub fn default_params(self) -> Params {
        let entries: Vec<(&str, ParamValue)> = match self {
            NodeType::Input => vec![("maxSize", 2048.0.into()), ("fit", "contain".into())],
            NodeType::Output => vec![("format", "png".into()), ("quality", 0.92.into())],
            NodeType::RemoveBg => vec![("threshold", 0.5.into()), ("device", "auto".into())],
            NodeType::Normalize => vec![("size", 1024.0.into()), ("padding", 16.0.into())],
            NodeType::Upscale => vec![
                ("scale", 2.0.into()),
                ("tileSize", 512.0.into()),
                ("device", "auto".into()),
            ],
            NodeType::Outline => vec![
                ("thickness", 4.0.into()),
                ("color", "#ffffff".into()),
                ("opacity", 1.0.into()),
                ("quality", "medium".into()),
                ("position", "outside".into()),
                ("threshold", 0.0.into()),
            ],
            NodeType::Depth => vec![("device", "auto".into())],
            NodeType::FaceParse => vec![("device", "auto".into())],
        };
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}
