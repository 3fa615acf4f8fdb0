use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use wge_client::{GraphStatus, ReconciliationGraph, StaticTreeSource};
use wge_client::source::StaticTree;
use wge_core::config::ConsoleConfig;
use wge_core::io::read_yaml;
use wge_core::tree::{ObjectRef, ParentObject, ReconciliationNode};
use wge_core::viewport::parse_events;

#[derive(Subcommand)]
pub enum GraphSubcommand {
    /// Lay out the reconciliation graph of a GitOps object
    Layout {
        /// YAML file with `source`, optional `parent` and its `children`
        #[arg(long)]
        file: PathBuf,
        /// Serve inventories from this file instead of the graph file's `children`
        #[arg(long, value_name = "FILE")]
        inventory: Option<PathBuf>,
        /// Zoom percentage (clamped below at 5)
        #[arg(long)]
        zoom: Option<f64>,
        /// Pointer events to replay, e.g. "down move:5,0 up"
        #[arg(long, default_value = "")]
        events: String,
    },
}

/// Input of `graph layout`.
#[derive(Debug, Deserialize)]
struct GraphFile {
    source: ObjectRef,
    #[serde(default)]
    parent: Option<ParentObject>,
    #[serde(default)]
    children: Vec<ReconciliationNode>,
}

pub fn run(root: &Path, subcmd: GraphSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        GraphSubcommand::Layout {
            file,
            inventory,
            zoom,
            events,
        } => layout(root, &file, inventory.as_deref(), zoom, &events, json),
    }
}

fn layout(
    root: &Path,
    file: &Path,
    inventory: Option<&Path>,
    zoom: Option<f64>,
    events: &str,
    json: bool,
) -> anyhow::Result<()> {
    let config = ConsoleConfig::load(root).context("failed to load config")?;
    let GraphFile {
        source: source_ref,
        parent,
        children,
    } = read_yaml(file).with_context(|| format!("failed to read graph from {}", file.display()))?;
    let events = parse_events(events)?;

    let source = match inventory {
        Some(path) => StaticTreeSource::from_yaml_file(path)
            .with_context(|| format!("failed to read inventory from {}", path.display()))?,
        None => {
            let mut source = StaticTreeSource::new();
            if let Some(parent) = &parent {
                source.insert(StaticTree {
                    cluster_name: parent.cluster_name.clone(),
                    namespace: parent.namespace.clone(),
                    name: parent.name.clone(),
                    children,
                });
            }
            source
        }
    };

    let rt = tokio::runtime::Runtime::new()?;
    let view = rt.block_on(async move {
        let mut graph = ReconciliationGraph::new(Arc::new(source), &config.graph);
        graph.set_inputs(source_ref, parent);
        graph.settled().await;
        if let Some(percent) = zoom {
            graph.set_zoom(percent);
        }
        for event in events {
            graph.handle_pointer(event);
        }
        graph.render()
    });

    if json {
        print_json(&view)?;
        if let GraphStatus::Failed(message) = &view.status {
            anyhow::bail!("{message}");
        }
        return Ok(());
    }

    let layout = match &view.status {
        GraphStatus::Ready(layout) => layout,
        GraphStatus::Failed(message) => anyhow::bail!("{message}"),
        GraphStatus::Loading => anyhow::bail!("reconciled tree did not load"),
    };

    if layout.is_empty() {
        println!("Nothing to draw.");
    } else {
        let rows = layout
            .descendants
            .iter()
            .map(|n| {
                let marker = if n.is_current_node { "*" } else { "" };
                vec![
                    n.index.to_string(),
                    n.parent.map(|p| p.to_string()).unwrap_or_else(|| "-".into()),
                    n.kind.clone(),
                    format!("{}{marker}", n.name),
                    n.namespace.clone(),
                    n.x.to_string(),
                    n.y.to_string(),
                ]
            })
            .collect();
        print_table(&["#", "PARENT", "TYPE", "NAME", "NAMESPACE", "X", "Y"], rows);
        println!();
        for edge in &layout.links {
            println!("{} -> {}", edge.source, edge.target);
        }
    }

    println!();
    println!("zoom: {}%", view.zoom_percent);
    println!("pan: {},{}", view.pan.x, view.pan.y);
    if let Some(view_box) = &view.view_box {
        println!("viewBox: {view_box}");
    }
    Ok(())
}
