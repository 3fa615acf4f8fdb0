use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use std::path::Path;
use wge_core::config::{ConsoleConfig, WarnLevel};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration
    Show,

    /// Validate the config for common mistakes
    Validate,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = ConsoleConfig::load(root).context("failed to load config")?;

    if json {
        return print_json(&config);
    }

    let size = &config.graph.node_size;
    print_table(
        &["KEY", "VALUE"],
        vec![
            vec!["graph.node_size.width".into(), size.width.to_string()],
            vec!["graph.node_size.height".into(), size.height.to_string()],
            vec![
                "graph.node_size.vertical_separation".into(),
                size.vertical_separation.to_string(),
            ],
            vec![
                "graph.node_size.horizontal_separation".into(),
                size.horizontal_separation.to_string(),
            ],
            vec![
                "graph.default_zoom_percent".into(),
                config.graph.default_zoom_percent.to_string(),
            ],
            vec![
                "profiles.default_namespace".into(),
                config.profiles.default_namespace.clone(),
            ],
        ],
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = ConsoleConfig::load(root).context("failed to load config")?;
    let warnings = config.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }

    Ok(())
}
