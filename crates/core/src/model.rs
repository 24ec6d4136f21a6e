use serde::{Deserialize, Serialize};

use crate::error::{Result, TreemapError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl Default for NodeId {
    fn default() -> Self {
        NodeId(0)
    }
}

/// A value as it appears in the input file. The public datasets store
/// numbers as strings, so both forms are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    pub fn parse(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n),
            RawValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

/// One node of the input JSON tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DataNode>,
}

impl DataNode {
    pub fn leaf(name: impl Into<String>, category: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            category: Some(category.into()),
            value: Some(RawValue::Number(value)),
            children: Vec::new(),
        }
    }

    pub fn branch(name: impl Into<String>, children: Vec<DataNode>) -> Self {
        Self {
            name: name.into(),
            category: None,
            value: None,
            children,
        }
    }

    /// Own numeric value. Internal nodes without a usable value count as
    /// zero; a leaf with a value that is not a number is rejected.
    pub fn own_value(&self) -> Result<f64> {
        match &self.value {
            None => Ok(0.0),
            Some(raw) => match raw.parse() {
                Some(v) if v.is_finite() => Ok(v.max(0.0)),
                _ if !self.children.is_empty() => Ok(0.0),
                _ => Err(TreemapError::InvalidValue {
                    name: self.name.clone(),
                    raw: match raw {
                        RawValue::Number(n) => n.to_string(),
                        RawValue::Text(s) => s.clone(),
                    },
                }),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub name: String,
    pub category: Option<String>,
    pub own_value: f64,
    /// Aggregated value, filled by `Hierarchy::sum`.
    pub value: f64,
    pub depth: u32,
    pub height: u32,
    pub children: Vec<NodeId>,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl HierarchyNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height_px(&self) -> f64 {
        self.y1 - self.y0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Hierarchy {
    pub root: NodeId,
    pub nodes: Vec<HierarchyNode>,
}
