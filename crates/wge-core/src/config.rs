use crate::error::Result;
use crate::layout::NodeSize;
use crate::paths;
use crate::profile::is_valid_namespace;
use crate::viewport::{DEFAULT_ZOOM_PERCENT, MIN_ZOOM_PERCENT};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// GraphConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default)]
    pub node_size: NodeSize,
    #[serde(default = "default_zoom")]
    pub default_zoom_percent: f64,
}

fn default_zoom() -> f64 {
    DEFAULT_ZOOM_PERCENT
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            node_size: NodeSize::default(),
            default_zoom_percent: default_zoom(),
        }
    }
}

// ---------------------------------------------------------------------------
// ProfilesConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilesConfig {
    /// Namespace a profile installs into when its own is left empty.
    #[serde(default = "default_profile_namespace")]
    pub default_namespace: String,
}

fn default_profile_namespace() -> String {
    "flux-system".to_string()
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            default_namespace: default_profile_namespace(),
        }
    }
}

// ---------------------------------------------------------------------------
// ConsoleConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub profiles: ProfilesConfig,
}

impl ConsoleConfig {
    /// Load `.wge/config.yaml` under `root`; a missing file means defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let config: ConsoleConfig = serde_yaml::from_str(&data)?;
        Ok(config)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Namespace a profile actually installs into.
    pub fn effective_namespace<'a>(&'a self, namespace: &'a str) -> &'a str {
        if namespace.is_empty() {
            &self.profiles.default_namespace
        } else {
            namespace
        }
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let size = &self.graph.node_size;

        for (field, value) in [("width", size.width), ("height", size.height)] {
            if !(value.is_finite() && value > 0.0) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("graph.node_size.{field} must be positive, got {value}"),
                });
            }
        }
        for (field, value) in [
            ("vertical_separation", size.vertical_separation),
            ("horizontal_separation", size.horizontal_separation),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("graph.node_size.{field} must not be negative, got {value}"),
                });
            }
        }

        let zoom = self.graph.default_zoom_percent;
        if !zoom.is_finite() || zoom < MIN_ZOOM_PERCENT {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "graph.default_zoom_percent {zoom} is below the minimum of {MIN_ZOOM_PERCENT} and will be clamped"
                ),
            });
        }

        let ns = &self.profiles.default_namespace;
        if ns.is_empty() || !is_valid_namespace(ns) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("profiles.default_namespace '{ns}' is not a valid namespace"),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
