use crate::output::{print_json, print_table, yes_no};
use anyhow::Context;
use clap::Subcommand;
use serde::Serialize;
use std::path::{Path, PathBuf};
use wge_core::config::ConsoleConfig;
use wge_core::io::{read_yaml, write_yaml};
use wge_core::profile::Profile;
use wge_core::profile_item::ProfileItem;
use wge_core::profiles::{ProfilesIndex, RepositoryRef, Selection};
use wge_core::ConsoleError;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ProfileSubcommand {
    /// List profiles with their selected version and namespace
    List {
        /// YAML file holding the list of profiles
        #[arg(long)]
        file: PathBuf,
        /// Only show profiles from this repository (name:namespace, repeatable)
        #[arg(long = "repo", value_name = "NAME:NAMESPACE")]
        repos: Vec<RepositoryRef>,
    },

    /// Select a version (or the highest match of a range) for a profile
    SelectVersion {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        name: String,
        /// Version or range to select
        #[arg(value_name = "VERSION")]
        requested: String,
    },

    /// Set the namespace a profile installs into
    Namespace {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        name: String,
        namespace: String,
    },

    /// Replace the values.yaml of the selected version
    Values {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        name: String,
        /// File holding the new values
        #[arg(long = "values", value_name = "YAML_FILE")]
        values: PathBuf,
    },

    /// Tick a profile for installation, or untick it with --off
    Toggle {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        off: bool,
    },

    /// Tick every profile, or untick all optional ones with --off
    SelectAll {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        off: bool,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: ProfileSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ProfileSubcommand::List { file, repos } => list(root, &file, &repos, json),
        ProfileSubcommand::SelectVersion {
            file,
            name,
            requested,
        } => select_version(&file, &name, &requested, json),
        ProfileSubcommand::Namespace {
            file,
            name,
            namespace,
        } => set_namespace(&file, &name, &namespace, json),
        ProfileSubcommand::Values { file, name, values } => set_values(&file, &name, &values, json),
        ProfileSubcommand::Toggle { file, name, off } => toggle(&file, &name, !off, json),
        ProfileSubcommand::SelectAll { file, off } => select_all(&file, !off, json),
    }
}

fn load(file: &Path) -> anyhow::Result<ProfilesIndex> {
    let profiles: Vec<Profile> = read_yaml(file)
        .with_context(|| format!("failed to read profiles from {}", file.display()))?;
    Ok(ProfilesIndex::from_profiles(profiles))
}

fn save(file: &Path, index: ProfilesIndex) -> anyhow::Result<()> {
    write_yaml(file, &index.into_profiles())
        .with_context(|| format!("failed to write profiles to {}", file.display()))
}

fn selection_label(selection: Selection) -> &'static str {
    match selection {
        Selection::All => "all",
        Selection::Some => "some",
        Selection::None => "none",
    }
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileRow<'a> {
    name: &'a str,
    version: Option<&'a str>,
    versions: Vec<&'a str>,
    namespace: &'a str,
    namespace_valid: bool,
    required: bool,
    version_locked: bool,
    selected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    repository: Option<String>,
}

fn list(root: &Path, file: &Path, repos: &[RepositoryRef], json: bool) -> anyhow::Result<()> {
    let config = ConsoleConfig::load(root).context("failed to load config")?;
    let index = load(file)?;

    let shown: Vec<&Profile> = if repos.is_empty() {
        index.iter().collect()
    } else {
        index.visible(repos).collect()
    };

    let rows: Vec<ProfileRow> = shown
        .iter()
        .map(|p| ProfileRow {
            name: &p.name,
            version: p.selected_item().map(|v| v.version.as_str()),
            versions: p.versions(),
            namespace: config.effective_namespace(&p.namespace),
            namespace_valid: wge_core::profile::is_valid_namespace(&p.namespace),
            required: p.required,
            version_locked: p.version_locked(),
            selected: p.selected,
            repository: match (&p.repo_name, &p.repo_namespace) {
                (Some(name), Some(ns)) => Some(RepositoryRef::new(name, ns).to_string()),
                _ => None,
            },
        })
        .collect();

    if json {
        let value = serde_json::json!({
            "selection": index.selection(),
            "profiles": rows,
        });
        return print_json(&value);
    }

    if rows.is_empty() {
        println!("No profiles.");
        return Ok(());
    }

    let table = rows
        .iter()
        .map(|r| {
            vec![
                if r.selected { "[x]" } else { "[ ]" }.to_string(),
                r.name.to_string(),
                r.version.unwrap_or("-").to_string(),
                r.namespace.to_string(),
                yes_no(r.required),
                r.repository.clone().unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    print_table(&["", "NAME", "VERSION", "NAMESPACE", "REQUIRED", "REPOSITORY"], table);
    println!("\nSelected: {}", selection_label(index.selection()));
    Ok(())
}

// ---------------------------------------------------------------------------
// select-version
// ---------------------------------------------------------------------------

fn select_version(file: &Path, name: &str, requested: &str, json: bool) -> anyhow::Result<()> {
    let mut index = load(file)?;
    let profile = index.require(name)?.clone();
    if profile.version_locked() {
        return Err(ConsoleError::VersionLocked(name.to_string()).into());
    }

    let mut item = ProfileItem::new(&profile);
    let mut updated = None;
    let resolution = item.select_version(&profile, requested, |p| updated = Some(p));

    if let Some(message) = &resolution.error_message {
        if json {
            print_json(&resolution)?;
        }
        anyhow::bail!("{name}: {message}");
    }

    let matched = updated
        .as_ref()
        .is_some_and(|p| p.selected_item().is_some());
    if let Some(p) = updated {
        index.update(p);
    }
    save(file, index)?;

    if json {
        print_json(&resolution)?;
    } else if matched {
        println!("{name}: selected version {}", resolution.resolved);
    } else {
        eprintln!(
            "warning: {name} has no version {}; no version is selected",
            resolution.resolved
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// namespace
// ---------------------------------------------------------------------------

fn set_namespace(file: &Path, name: &str, value: &str, json: bool) -> anyhow::Result<()> {
    let mut index = load(file)?;
    let profile = index.require(name)?.clone();

    let mut item = ProfileItem::new(&profile);
    let valid = item.change_namespace(&profile, value, |p| index.update(p));
    save(file, index)?;

    if json {
        let out = serde_json::json!({
            "name": name,
            "namespace": item.namespace(),
            "valid": valid,
        });
        print_json(&out)?;
    } else {
        println!("{name}: namespace set to '{value}'");
    }
    if !valid {
        eprintln!("warning: '{value}' is not a valid namespace");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// values
// ---------------------------------------------------------------------------

fn set_values(file: &Path, name: &str, values: &Path, json: bool) -> anyhow::Result<()> {
    let yaml = std::fs::read_to_string(values)
        .with_context(|| format!("failed to read {}", values.display()))?;
    serde_yaml::from_str::<serde_yaml::Value>(&yaml)
        .with_context(|| format!("{} is not valid YAML", values.display()))?;

    let mut index = load(file)?;
    let profile = index.require(name)?.clone();

    let mut item = ProfileItem::new(&profile);
    item.open_values();
    item.edit_values(yaml);
    item.save_values(&profile, |p| index.update(p));
    save(file, index)?;

    if json {
        let out = serde_json::json!({
            "name": name,
            "version": item.version(),
        });
        print_json(&out)?;
    } else {
        println!("{name}: values updated for version {}", item.version());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// toggle / select-all
// ---------------------------------------------------------------------------

fn toggle(file: &Path, name: &str, checked: bool, json: bool) -> anyhow::Result<()> {
    let mut index = load(file)?;
    index.toggle(name, checked)?;
    let selection = index.selection();
    save(file, index)?;

    if json {
        let out = serde_json::json!({
            "name": name,
            "selected": checked,
            "selection": selection,
        });
        print_json(&out)?;
    } else {
        let verb = if checked { "selected" } else { "deselected" };
        println!("{name}: {verb}");
    }
    Ok(())
}

fn select_all(file: &Path, checked: bool, json: bool) -> anyhow::Result<()> {
    let mut index = load(file)?;
    index.select_all(checked);
    let selection = index.selection();
    let count = index.selected().len();
    save(file, index)?;

    if json {
        let out = serde_json::json!({
            "selection": selection,
            "selected": count,
        });
        print_json(&out)?;
    } else {
        println!("{count} profile(s) selected ({})", selection_label(selection));
    }
    Ok(())
}
