#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn wge(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("wge").unwrap();
    cmd.current_dir(dir.path()).env("WGE_ROOT", dir.path());
    cmd
}

const PROFILES: &str = r#"
- name: cert-manager
  required: true
  repoName: weaveworks-charts
  repoNamespace: flux-system
  values:
    - version: "0.0.8"
      yaml: "installCRDs: true\n"
- name: podinfo
  namespace: apps
  repoName: weaveworks-charts
  repoNamespace: flux-system
  values:
    - version: "6.0.0"
      yaml: "replicaCount: 1\n"
    - version: "6.0.1"
      yaml: "replicaCount: 2\n"
      selected: true
- name: nginx
  repoName: bitnami
  repoNamespace: default
  values:
    - version: "1.0.0"
"#;

fn write_profiles(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("profiles.yaml");
    std::fs::write(&path, PROFILES).unwrap();
    path
}

fn list_json(dir: &TempDir, file: &PathBuf) -> serde_json::Value {
    let out = wge(dir)
        .args(["profile", "list", "--file"])
        .arg(file)
        .arg("--json")
        .output()
        .unwrap();
    assert!(out.status.success());
    serde_json::from_slice(&out.stdout).unwrap()
}

fn listed<'a>(list: &'a serde_json::Value, name: &str) -> &'a serde_json::Value {
    list["profiles"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == name)
        .unwrap_or_else(|| panic!("{name} not listed"))
}

fn stored(file: &PathBuf, name: &str) -> serde_yaml::Value {
    let data = std::fs::read_to_string(file).unwrap();
    let profiles: Vec<serde_yaml::Value> = serde_yaml::from_str(&data).unwrap();
    profiles
        .into_iter()
        .find(|p| p["name"].as_str() == Some(name))
        .unwrap_or_else(|| panic!("{name} not stored"))
}

// ---------------------------------------------------------------------------
// wge version resolve
// ---------------------------------------------------------------------------

#[test]
fn version_resolve_picks_highest_match() {
    let dir = TempDir::new().unwrap();
    wge(&dir)
        .args(["version", "resolve", "^1.2"])
        .args(["--candidate", "1.2.0", "--candidate", "1.3.1", "--candidate", "2.0.0"])
        .assert()
        .success()
        .stdout("1.3.1\n");
}

#[test]
fn version_resolve_unmatched_request_is_kept() {
    let dir = TempDir::new().unwrap();
    wge(&dir)
        .args(["version", "resolve", "3.0.0", "--candidate", "1.2.0"])
        .assert()
        .success()
        .stdout("3.0.0\n");
}

#[test]
fn version_resolve_invalid_fails_with_message() {
    let dir = TempDir::new().unwrap();
    wge(&dir)
        .args(["version", "resolve", "banana", "--candidate", "1.2.0", "--current", "1.2.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "The provided semver is invalid or not matching",
        ));
}

#[test]
fn version_resolve_invalid_json_keeps_current() {
    let dir = TempDir::new().unwrap();
    let out = wge(&dir)
        .args(["version", "resolve", "banana", "--current", "1.2.0", "--json"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["resolved"], "1.2.0");
    assert_eq!(v["valid"], false);
}

// ---------------------------------------------------------------------------
// wge profile list
// ---------------------------------------------------------------------------

#[test]
fn profile_list_shows_selection_and_effective_namespace() {
    let dir = TempDir::new().unwrap();
    let file = write_profiles(&dir);
    wge(&dir)
        .args(["profile", "list", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("podinfo"))
        .stdout(predicate::str::contains("6.0.1"))
        .stdout(predicate::str::contains("flux-system"))
        .stdout(predicate::str::contains("Selected: some"));
}

#[test]
fn profile_list_json_applies_load_defaults() {
    let dir = TempDir::new().unwrap();
    let file = write_profiles(&dir);
    let list = list_json(&dir, &file);

    let cert = listed(&list, "cert-manager");
    assert_eq!(cert["selected"], true);
    assert_eq!(cert["versionLocked"], true);
    assert_eq!(cert["namespace"], "flux-system");
    assert_eq!(listed(&list, "nginx")["version"], "1.0.0");
    assert_eq!(listed(&list, "nginx")["selected"], false);
    assert_eq!(list["selection"], "some");
}

#[test]
fn profile_list_filters_by_repository() {
    let dir = TempDir::new().unwrap();
    let file = write_profiles(&dir);
    let out = wge(&dir)
        .args(["profile", "list", "--file"])
        .arg(&file)
        .args(["--repo", "weaveworks-charts:flux-system", "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let list: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let names: Vec<&str> = list["profiles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["cert-manager", "podinfo"]);
}

#[test]
fn profile_list_rejects_malformed_repository() {
    let dir = TempDir::new().unwrap();
    let file = write_profiles(&dir);
    wge(&dir)
        .args(["profile", "list", "--file"])
        .arg(&file)
        .args(["--repo", "no-namespace"])
        .assert()
        .failure();
}

#[test]
fn root_is_found_from_subdirectory() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".wge")).unwrap();
    std::fs::write(
        dir.path().join(".wge/config.yaml"),
        "profiles:\n  default_namespace: platform\n",
    )
    .unwrap();
    let file = write_profiles(&dir);
    let sub = dir.path().join("clusters/dev");
    std::fs::create_dir_all(&sub).unwrap();

    Command::cargo_bin("wge")
        .unwrap()
        .current_dir(&sub)
        .env_remove("WGE_ROOT")
        .args(["profile", "list", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("platform"));
}

// ---------------------------------------------------------------------------
// wge profile select-version
// ---------------------------------------------------------------------------

#[test]
fn select_version_resolves_range_and_saves() {
    let dir = TempDir::new().unwrap();
    let file = write_profiles(&dir);
    wge(&dir)
        .args(["profile", "select-version", "--file"])
        .arg(&file)
        .args(["--name", "podinfo", "6.0.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("selected version 6.0.0"));
    assert_eq!(listed(&list_json(&dir, &file), "podinfo")["version"], "6.0.0");

    wge(&dir)
        .args(["profile", "select-version", "--file"])
        .arg(&file)
        .args(["--name", "podinfo", "~6.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("selected version 6.0.1"));
    assert_eq!(listed(&list_json(&dir, &file), "podinfo")["version"], "6.0.1");
}

#[test]
fn select_version_invalid_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let file = write_profiles(&dir);
    wge(&dir)
        .args(["profile", "select-version", "--file"])
        .arg(&file)
        .args(["--name", "podinfo", "banana"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("podinfo"))
        .stderr(predicate::str::contains("semver is invalid"));
    assert_eq!(std::fs::read_to_string(&file).unwrap(), PROFILES);
}

#[test]
fn select_version_unknown_version_warns() {
    let dir = TempDir::new().unwrap();
    let file = write_profiles(&dir);
    wge(&dir)
        .args(["profile", "select-version", "--file"])
        .arg(&file)
        .args(["--name", "podinfo", "7.0.0"])
        .assert()
        .success()
        .stderr(predicate::str::contains("has no version 7.0.0"));

    let podinfo = stored(&file, "podinfo");
    let ticked = podinfo["values"]
        .as_sequence()
        .unwrap()
        .iter()
        .filter(|v| v["selected"].as_bool() == Some(true))
        .count();
    assert_eq!(ticked, 0);
}

#[test]
fn select_version_partial_is_an_x_range() {
    let dir = TempDir::new().unwrap();
    let file = write_profiles(&dir);
    wge(&dir)
        .args(["profile", "select-version", "--file"])
        .arg(&file)
        .args(["--name", "podinfo", "6.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("selected version 6.0.1"));
}

#[test]
fn select_version_refuses_locked_profile() {
    let dir = TempDir::new().unwrap();
    let file = write_profiles(&dir);
    wge(&dir)
        .args(["profile", "select-version", "--file"])
        .arg(&file)
        .args(["--name", "cert-manager", "9.9.9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be changed"));
    assert_eq!(std::fs::read_to_string(&file).unwrap(), PROFILES);
}

#[test]
fn select_version_unknown_profile_fails() {
    let dir = TempDir::new().unwrap();
    let file = write_profiles(&dir);
    wge(&dir)
        .args(["profile", "select-version", "--file"])
        .arg(&file)
        .args(["--name", "ghost", "1.0.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("profile not found: ghost"));
}

// ---------------------------------------------------------------------------
// wge profile namespace / values
// ---------------------------------------------------------------------------

#[test]
fn namespace_invalid_is_stored_with_warning() {
    let dir = TempDir::new().unwrap();
    let file = write_profiles(&dir);
    wge(&dir)
        .args(["profile", "namespace", "--file"])
        .arg(&file)
        .args(["--name", "podinfo", "Bad_NS"])
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: 'Bad_NS' is not a valid namespace"));

    let podinfo = listed(&list_json(&dir, &file), "podinfo").clone();
    assert_eq!(podinfo["namespace"], "Bad_NS");
    assert_eq!(podinfo["namespaceValid"], false);
}

#[test]
fn namespace_valid_has_no_warning() {
    let dir = TempDir::new().unwrap();
    let file = write_profiles(&dir);
    wge(&dir)
        .args(["profile", "namespace", "--file"])
        .arg(&file)
        .args(["--name", "podinfo", "team-a"])
        .assert()
        .success()
        .stderr(predicate::str::contains("warning").not());
    assert_eq!(stored(&file, "podinfo")["namespace"].as_str(), Some("team-a"));
}

#[test]
fn values_replace_overlay_of_selected_version() {
    let dir = TempDir::new().unwrap();
    let file = write_profiles(&dir);
    let values = dir.path().join("values.yaml");
    std::fs::write(&values, "replicaCount: 3\n").unwrap();

    wge(&dir)
        .args(["profile", "values", "--file"])
        .arg(&file)
        .args(["--name", "podinfo", "--values"])
        .arg(&values)
        .assert()
        .success()
        .stdout(predicate::str::contains("values updated for version 6.0.1"));

    let podinfo = stored(&file, "podinfo");
    let entries = podinfo["values"].as_sequence().unwrap();
    assert_eq!(entries[0]["yaml"].as_str(), Some("replicaCount: 1\n"));
    assert_eq!(entries[1]["yaml"].as_str(), Some("replicaCount: 3\n"));
}

#[test]
fn values_reject_malformed_yaml() {
    let dir = TempDir::new().unwrap();
    let file = write_profiles(&dir);
    let values = dir.path().join("values.yaml");
    std::fs::write(&values, "replicaCount: [1,\n").unwrap();

    wge(&dir)
        .args(["profile", "values", "--file"])
        .arg(&file)
        .args(["--name", "podinfo", "--values"])
        .arg(&values)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not valid YAML"));
}

// ---------------------------------------------------------------------------
// wge profile toggle / select-all
// ---------------------------------------------------------------------------

#[test]
fn toggle_optional_profile() {
    let dir = TempDir::new().unwrap();
    let file = write_profiles(&dir);
    wge(&dir)
        .args(["profile", "toggle", "--file"])
        .arg(&file)
        .args(["--name", "nginx"])
        .assert()
        .success()
        .stdout("nginx: selected\n");
    assert_eq!(listed(&list_json(&dir, &file), "nginx")["selected"], true);
}

#[test]
fn toggle_off_required_profile_fails() {
    let dir = TempDir::new().unwrap();
    let file = write_profiles(&dir);
    wge(&dir)
        .args(["profile", "toggle", "--file"])
        .arg(&file)
        .args(["--name", "cert-manager", "--off"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is required"));
}

#[test]
fn select_all_keeps_required_profiles() {
    let dir = TempDir::new().unwrap();
    let file = write_profiles(&dir);
    wge(&dir)
        .args(["profile", "select-all", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 profile(s) selected (all)"));

    wge(&dir)
        .args(["profile", "select-all", "--file"])
        .arg(&file)
        .arg("--off")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 profile(s) selected (some)"));
    assert_eq!(listed(&list_json(&dir, &file), "cert-manager")["selected"], true);
}

// ---------------------------------------------------------------------------
// wge graph layout
// ---------------------------------------------------------------------------

const GRAPH: &str = r#"
source:
  kind: GitRepository
  name: fleet-infra
  namespace: flux-system
parent:
  name: team-envs
  namespace: default
  type: GitOpsSet
  clusterName: management
children:
  - name: dev
    namespace: default
    type: Kustomization
  - name: prod
    namespace: default
    type: Kustomization
"#;

fn write_graph(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("graph.yaml");
    std::fs::write(&path, content).unwrap();
    path
}

fn layout_json(dir: &TempDir, file: &PathBuf, extra: &[&str]) -> serde_json::Value {
    let out = wge(dir)
        .args(["graph", "layout", "--file"])
        .arg(file)
        .args(extra)
        .arg("--json")
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    serde_json::from_slice(&out.stdout).unwrap()
}

#[test]
fn graph_layout_places_tree_top_down() {
    let dir = TempDir::new().unwrap();
    let file = write_graph(&dir, GRAPH);
    let view = layout_json(&dir, &file, &[]);

    assert_eq!(view["status"], "ready");
    let nodes = view["detail"]["descendants"].as_array().unwrap();
    let names: Vec<&str> = nodes.iter().map(|n| n["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["fleet-infra", "team-envs", "dev", "prod"]);
    assert_eq!(nodes[0]["clusterName"], "management");
    assert_eq!(nodes[1]["isCurrentNode"], true);
    assert_eq!(nodes[0]["x"], nodes[1]["x"]);
    assert!(nodes[2]["x"].as_f64().unwrap() < nodes[3]["x"].as_f64().unwrap());
    assert_eq!(nodes[2]["y"], nodes[3]["y"]);
    assert!(nodes[1]["y"].as_f64().unwrap() > nodes[0]["y"].as_f64().unwrap());
    assert_eq!(view["detail"]["links"].as_array().unwrap().len(), 3);
    assert_eq!(view["zoomPercent"], 85.0);
}

#[test]
fn graph_layout_replays_pointer_events_and_clamps_zoom() {
    let dir = TempDir::new().unwrap();
    let file = write_graph(&dir, GRAPH);
    let view = layout_json(
        &dir,
        &file,
        &["--zoom", "2", "--events", "down move:5,0 move:0,5 move:-2,-2 leave move:9,9"],
    );
    assert_eq!(view["zoomPercent"], 5.0);
    assert_eq!(view["pan"]["x"], 3.0);
    assert_eq!(view["pan"]["y"], 3.0);
}

#[test]
fn graph_layout_without_parent_is_empty() {
    let dir = TempDir::new().unwrap();
    let file = write_graph(
        &dir,
        "source:\n  kind: GitRepository\n  name: fleet-infra\n  namespace: flux-system\n",
    );
    wge(&dir)
        .args(["graph", "layout", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to draw."));
}

#[test]
fn graph_layout_table_marks_current_node() {
    let dir = TempDir::new().unwrap();
    let file = write_graph(&dir, GRAPH);
    wge(&dir)
        .args(["graph", "layout", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("team-envs*"))
        .stdout(predicate::str::contains("1 -> 3"))
        .stdout(predicate::str::contains("zoom: 85%"));
}

#[test]
fn graph_layout_missing_inventory_fails() {
    let dir = TempDir::new().unwrap();
    let file = write_graph(&dir, GRAPH);
    let inventory = dir.path().join("inventory.yaml");
    std::fs::write(&inventory, "- name: someone-else\n  namespace: default\n").unwrap();

    wge(&dir)
        .args(["graph", "layout", "--file"])
        .arg(&file)
        .arg("--inventory")
        .arg(&inventory)
        .assert()
        .failure()
        .stderr(predicate::str::contains("default/team-envs"));
}

#[test]
fn graph_layout_rejects_bad_event() {
    let dir = TempDir::new().unwrap();
    let file = write_graph(&dir, GRAPH);
    wge(&dir)
        .args(["graph", "layout", "--file"])
        .arg(&file)
        .args(["--events", "down jump"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid pointer event 'jump'"));
}

// ---------------------------------------------------------------------------
// wge config
// ---------------------------------------------------------------------------

#[test]
fn config_show_defaults() {
    let dir = TempDir::new().unwrap();
    wge(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("profiles.default_namespace"))
        .stdout(predicate::str::contains("flux-system"));
}

#[test]
fn config_validate_clean() {
    let dir = TempDir::new().unwrap();
    wge(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));
}

#[test]
fn config_validate_reports_errors() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".wge")).unwrap();
    std::fs::write(
        dir.path().join(".wge/config.yaml"),
        "graph:\n  node_size:\n    width: 0\n",
    )
    .unwrap();
    wge(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error] graph.node_size.width"))
        .stderr(predicate::str::contains("config validation found errors"));
}
