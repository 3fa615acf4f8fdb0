use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use futures::future::BoxFuture;
use serde::Deserialize;
use wge_core::tree::{ReconciliationNode, TreeQuery};

use crate::{ClientError, Result};

// ─── TreeSource ───────────────────────────────────────────────────────────

/// Provider of the live, reconciled inventory of a GitOps object.
pub trait TreeSource: Send + Sync + 'static {
    fn reconciled_tree(&self, query: TreeQuery) -> BoxFuture<'static, Result<Vec<ReconciliationNode>>>;
}

// ─── StaticTreeSource ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TreeKey {
    cluster: String,
    namespace: String,
    name: String,
}

impl TreeKey {
    fn of(query: &TreeQuery) -> Self {
        TreeKey {
            cluster: query.cluster_name.clone(),
            namespace: query.namespace.clone(),
            name: query.name.clone(),
        }
    }
}

/// One entry of a static inventory file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticTree {
    #[serde(default)]
    pub cluster_name: String,
    #[serde(default)]
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub children: Vec<ReconciliationNode>,
}

/// Serves fixed inventories keyed by cluster, namespace and name.
/// An optional delay makes responses arrive late, as over a network.
#[derive(Debug, Clone, Default)]
pub struct StaticTreeSource {
    trees: HashMap<TreeKey, Vec<ReconciliationNode>>,
    delay: Option<Duration>,
}

impl StaticTreeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn insert(&mut self, tree: StaticTree) {
        let key = TreeKey {
            cluster: tree.cluster_name,
            namespace: tree.namespace,
            name: tree.name,
        };
        self.trees.insert(key, tree.children);
    }

    /// Load a YAML list of [`StaticTree`] entries.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let entries: Vec<StaticTree> = wge_core::io::read_yaml(path)?;
        let mut source = Self::new();
        for entry in entries {
            source.insert(entry);
        }
        Ok(source)
    }
}

impl TreeSource for StaticTreeSource {
    fn reconciled_tree(&self, query: TreeQuery) -> BoxFuture<'static, Result<Vec<ReconciliationNode>>> {
        let found = self.trees.get(&TreeKey::of(&query)).cloned();
        let delay = self.delay;
        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            found.ok_or(ClientError::TreeNotFound {
                kind: query.kind,
                namespace: query.namespace,
                name: query.name,
                cluster: query.cluster_name,
            })
        })
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
