use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// Reference to the source object a GitOps resource reconciles from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
}

/// One entry of a resource's inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    pub id: String,
    #[serde(default)]
    pub version: String,
}

/// The GitOps object whose reconciled inventory is being drawn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentObject {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub cluster_name: String,
    #[serde(default)]
    pub suspended: bool,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub inventory: Vec<ResourceRef>,
}

// ---------------------------------------------------------------------------
// TreeQuery
// ---------------------------------------------------------------------------

pub const GITOPS_SET_KIND: &str = "GitOpsSet";

/// Key under which the reconciled inventory of an object is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeQuery {
    pub name: String,
    pub namespace: String,
    pub kind: String,
    pub inventory: Vec<ResourceRef>,
    pub cluster_name: String,
}

impl TreeQuery {
    pub fn for_parent(parent: &ParentObject, kind: &str) -> Self {
        Self {
            name: parent.name.clone(),
            namespace: parent.namespace.clone(),
            kind: kind.to_string(),
            inventory: parent.inventory.clone(),
            cluster_name: parent.cluster_name.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// ReconciliationNode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationNode {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub cluster_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspended: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<Condition>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_current_node: bool,
    #[serde(default)]
    pub children: Vec<ReconciliationNode>,
}

impl ReconciliationNode {
    pub fn leaf(kind: &str, name: &str, namespace: &str) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            kind: kind.to_string(),
            ..Default::default()
        }
    }

    /// Number of nodes in this subtree, including itself.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }

    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(|c| c.depth()).max().unwrap_or(0)
    }
}

/// Assemble the graph tree `source -> parent -> live children`.
///
/// Returns `None` without a parent; there is nothing to anchor the
/// inventory to.
pub fn build_tree(
    source: &ObjectRef,
    parent: Option<&ParentObject>,
    live_children: Vec<ReconciliationNode>,
) -> Option<ReconciliationNode> {
    let parent = parent?;

    let current = ReconciliationNode {
        name: parent.name.clone(),
        namespace: parent.namespace.clone(),
        kind: parent.kind.clone(),
        cluster_name: parent.cluster_name.clone(),
        suspended: Some(parent.suspended),
        conditions: Some(parent.conditions.clone()),
        is_current_node: true,
        children: live_children,
    };

    Some(ReconciliationNode {
        name: source.name.clone(),
        namespace: source.namespace.clone(),
        kind: source.kind.clone(),
        cluster_name: parent.cluster_name.clone(),
        suspended: None,
        conditions: None,
        is_current_node: false,
        children: vec![current],
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
