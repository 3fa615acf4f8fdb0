//! `wge-client`: the asynchronous side of the GitOps console.
//!
//! Every screen that shows remote data goes through a [`RequestSlot`]: a
//! request is issued, and if the owner is torn down or its inputs change
//! before it completes, the late result is dropped instead of applied.
//!
//! # Architecture
//!
//! ```text
//! ReconciliationGraph   ← inputs (source ref, parent object) + viewport
//!     │
//!     ▼
//! RequestSlot<T>        ← one in-flight Tokio task, generation-checked
//!     │
//!     ▼
//! TreeSource            ← reconciled inventory provider (gateway, static)
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wge_client::{ReconciliationGraph, StaticTreeSource};
//! use wge_core::config::GraphConfig;
//!
//! let mut graph = ReconciliationGraph::new(Arc::new(StaticTreeSource::new()), &GraphConfig::default());
//! graph.set_inputs(source_ref, Some(parent));
//! graph.settled().await;
//! let view = graph.render();
//! ```

pub mod error;
pub mod graph;
pub mod request;
pub mod source;

pub use error::ClientError;
pub use graph::{GraphStatus, GraphView, ReconciliationGraph};
pub use request::{RequestSlot, RequestState};
pub use source::{StaticTreeSource, TreeSource};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ClientError>;
