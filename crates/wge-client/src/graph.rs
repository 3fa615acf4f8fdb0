use std::sync::Arc;

use serde::Serialize;
use wge_core::config::GraphConfig;
use wge_core::layout::{layout, Layout, NodeSize};
use wge_core::tree::{build_tree, ObjectRef, ParentObject, ReconciliationNode, TreeQuery, GITOPS_SET_KIND};
use wge_core::viewport::{Point, PointerEvent, ViewBox, Viewport};

use crate::request::{RequestSlot, RequestState};
use crate::source::TreeSource;

// ─── GraphView ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum GraphStatus {
    Loading,
    Failed(String),
    Ready(Layout),
}

/// Everything needed to draw the graph for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphView {
    #[serde(flatten)]
    pub status: GraphStatus,
    pub zoom_percent: f64,
    pub pan: Point,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_box: Option<ViewBox>,
}

#[derive(Debug, Clone, PartialEq)]
struct Inputs {
    source: ObjectRef,
    parent: Option<ParentObject>,
}

// ─── ReconciliationGraph ──────────────────────────────────────────────────

/// Controller behind the reconciliation graph tab of a GitOps set.
///
/// Holds the inputs the graph was asked to show, the request for the
/// parent's live inventory and the canvas viewport. Changing inputs
/// supersedes the in-flight request; the viewport is kept as is.
pub struct ReconciliationGraph<S: TreeSource> {
    source: Arc<S>,
    node_size: NodeSize,
    inputs: Option<Inputs>,
    children: RequestSlot<Vec<ReconciliationNode>>,
    viewport: Viewport,
}

impl<S: TreeSource> ReconciliationGraph<S> {
    pub fn new(source: Arc<S>, config: &GraphConfig) -> Self {
        Self {
            source,
            node_size: config.node_size,
            inputs: None,
            children: RequestSlot::new("reconciled-tree"),
            viewport: Viewport::new(config.default_zoom_percent),
        }
    }

    /// Point the graph at `source_ref` and `parent`. Returns whether a fetch
    /// was issued. Unchanged inputs keep the current request; no parent means
    /// nothing to fetch and an empty graph.
    pub fn set_inputs(&mut self, source_ref: ObjectRef, parent: Option<ParentObject>) -> bool {
        let next = Inputs {
            source: source_ref,
            parent,
        };
        if self.inputs.as_ref() == Some(&next) {
            return false;
        }

        let issued = match &next.parent {
            Some(parent) => {
                let query = TreeQuery::for_parent(parent, GITOPS_SET_KIND);
                tracing::debug!(
                    name = %query.name,
                    namespace = %query.namespace,
                    cluster = %query.cluster_name,
                    "fetching reconciled tree"
                );
                let source = Arc::clone(&self.source);
                self.children
                    .issue(async move { source.reconciled_tree(query).await });
                true
            }
            None => {
                self.children.teardown();
                false
            }
        };
        self.inputs = Some(next);
        issued
    }

    /// Wait for the inventory request, if any, to finish.
    pub async fn settled(&self) {
        self.children.settled().await;
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        self.viewport.handle(event)
    }

    pub fn set_zoom(&mut self, percent: f64) -> f64 {
        self.viewport.set_zoom(percent)
    }

    /// Stop listening for the in-flight request and forget the inputs; the
    /// graph renders empty until new inputs arrive.
    pub fn teardown(&mut self) {
        self.children.teardown();
        self.inputs = None;
    }

    pub fn render(&self) -> GraphView {
        let status = match &self.inputs {
            None => GraphStatus::Ready(Layout::empty()),
            Some(Inputs { parent: None, .. }) => GraphStatus::Ready(Layout::empty()),
            Some(Inputs {
                source,
                parent: Some(parent),
            }) => match self.children.state() {
                RequestState::Idle | RequestState::Loading => GraphStatus::Loading,
                RequestState::Failed(message) => GraphStatus::Failed(message),
                RequestState::Ready(children) => {
                    match build_tree(source, Some(parent), children) {
                        Some(root) => GraphStatus::Ready(layout(&root, &self.node_size)),
                        None => GraphStatus::Ready(Layout::empty()),
                    }
                }
            },
        };

        let view_box = match &status {
            GraphStatus::Ready(l) => l
                .bounds(&self.node_size)
                .map(|b| self.viewport.view_box(&b, &self.node_size)),
            _ => None,
        };

        GraphView {
            status,
            zoom_percent: self.viewport.zoom_percent(),
            pan: self.viewport.pan(),
            view_box,
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
