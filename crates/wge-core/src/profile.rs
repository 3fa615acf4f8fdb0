use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// VersionedItem
// ---------------------------------------------------------------------------

/// One chart version of a profile together with its values overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedItem {
    pub version: String,
    #[serde(default)]
    pub yaml: String,
    #[serde(default)]
    pub selected: bool,
}

impl VersionedItem {
    pub fn new(version: impl Into<String>, yaml: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            yaml: yaml.into(),
            selected: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub values: Vec<VersionedItem>,
    /// Whether the profile is ticked for installation.
    #[serde(default)]
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_namespace: Option<String>,
}

impl Profile {
    pub fn new(name: impl Into<String>, values: Vec<VersionedItem>) -> Self {
        Self {
            name: name.into(),
            namespace: String::new(),
            required: false,
            values,
            selected: false,
            layer: None,
            repo_name: None,
            repo_namespace: None,
        }
    }

    pub fn selected_item(&self) -> Option<&VersionedItem> {
        self.values.iter().find(|v| v.selected)
    }

    pub fn item(&self, version: &str) -> Option<&VersionedItem> {
        self.values.iter().find(|v| v.version == version)
    }

    pub fn versions(&self) -> Vec<&str> {
        self.values.iter().map(|v| v.version.as_str()).collect()
    }

    /// A required profile with a single version offers no choice.
    pub fn version_locked(&self) -> bool {
        self.required && self.values.len() == 1
    }

    /// Normalise the selection on load: keep the first selected entry, or
    /// select the first entry when none is.
    pub fn with_default_selection(mut self) -> Self {
        match self.values.iter().position(|v| v.selected) {
            Some(keep) => {
                for (i, item) in self.values.iter_mut().enumerate() {
                    item.selected = i == keep;
                }
            }
            None => {
                if let Some(first) = self.values.first_mut() {
                    first.selected = true;
                }
            }
        }
        self
    }

    /// Select the entry whose version equals `version` and deselect the
    /// rest. When no entry matches, nothing is left selected.
    pub fn select_version(&self, version: &str) -> Profile {
        let values = self
            .values
            .iter()
            .map(|item| VersionedItem {
                selected: item.version == version,
                ..item.clone()
            })
            .collect();
        Profile {
            values,
            ..self.clone()
        }
    }

    /// Store `namespace` as given. Check it with [`is_valid_namespace`];
    /// invalid input is kept so the field can show it.
    pub fn update_namespace(&self, namespace: &str) -> Profile {
        Profile {
            namespace: namespace.to_string(),
            ..self.clone()
        }
    }

    /// Replace the values overlay of the entry matching `version`.
    pub fn update_yaml_override(&self, version: &str, yaml: &str) -> Profile {
        let values = self
            .values
            .iter()
            .map(|item| {
                if item.version == version {
                    VersionedItem {
                        yaml: yaml.to_string(),
                        ..item.clone()
                    }
                } else {
                    item.clone()
                }
            })
            .collect();
        Profile {
            values,
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Namespace validation
// ---------------------------------------------------------------------------

static NAMESPACE_RE: OnceLock<Regex> = OnceLock::new();

fn namespace_re() -> &'static Regex {
    NAMESPACE_RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?$").expect("namespace pattern compiles")
    })
}

/// Empty means "use the default namespace" and is accepted.
pub fn is_valid_namespace(namespace: &str) -> bool {
    namespace.is_empty() || namespace_re().is_match(namespace)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
