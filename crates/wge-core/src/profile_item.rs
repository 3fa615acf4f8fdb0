//! Per-row controller for a profile in the cluster creation form.
//!
//! `ProfileItem` keeps only what the row displays while it is being edited:
//! the version input, the namespace input, the values.yaml draft and whether
//! the values dialog is open. The profile itself is owned by the caller;
//! every change is reported as a fresh [`Profile`] through `on_update`.

use crate::profile::{is_valid_namespace, Profile};
use crate::version::{Resolution, VersionField};

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileItem {
    version: VersionField,
    namespace: String,
    namespace_valid: bool,
    yaml: String,
    values_open: bool,
}

impl ProfileItem {
    /// Initialise from the selected entry, falling back to the first one.
    pub fn new(profile: &Profile) -> Self {
        let current = profile.selected_item().or_else(|| profile.values.first());
        let (version, yaml) = match current {
            Some(item) => (item.version.clone(), item.yaml.clone()),
            None => (String::new(), String::new()),
        };
        Self {
            version: VersionField::new(version),
            namespace: profile.namespace.clone(),
            namespace_valid: is_valid_namespace(&profile.namespace),
            yaml,
            values_open: false,
        }
    }

    pub fn version(&self) -> &str {
        self.version.value()
    }

    pub fn version_error(&self) -> Option<&str> {
        self.version.error_message()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn namespace_valid(&self) -> bool {
        self.namespace_valid
    }

    pub fn yaml(&self) -> &str {
        &self.yaml
    }

    pub fn values_open(&self) -> bool {
        self.values_open
    }

    /// Resolve `requested` against the profile's versions and select the
    /// result. An invalid request only flags the field. A locked profile
    /// keeps its version and nothing is reported.
    pub fn select_version<F>(&mut self, profile: &Profile, requested: &str, on_update: F) -> Resolution
    where
        F: FnOnce(Profile),
    {
        if profile.version_locked() {
            tracing::debug!(profile = %profile.name, requested, "version is locked, ignoring request");
            return Resolution {
                resolved: self.version().to_string(),
                valid: true,
                error_message: None,
            };
        }

        let resolution = self.version.submit(&profile.versions(), requested);
        if !resolution.valid {
            return resolution;
        }

        let updated = profile.select_version(&resolution.resolved);
        if let Some(item) = updated.selected_item() {
            self.yaml = item.yaml.clone();
        }
        tracing::debug!(
            profile = %profile.name,
            version = %resolution.resolved,
            matched = updated.selected_item().is_some(),
            "profile version selected"
        );
        on_update(updated);
        resolution
    }

    /// Store the namespace and report it, valid or not. Returns validity.
    pub fn change_namespace<F>(&mut self, profile: &Profile, value: &str, on_update: F) -> bool
    where
        F: FnOnce(Profile),
    {
        self.namespace = value.to_string();
        self.namespace_valid = is_valid_namespace(value);
        on_update(profile.update_namespace(value));
        self.namespace_valid
    }

    pub fn open_values(&mut self) {
        self.values_open = true;
    }

    pub fn close_values(&mut self) {
        self.values_open = false;
    }

    pub fn edit_values(&mut self, yaml: impl Into<String>) {
        self.yaml = yaml.into();
    }

    /// Write the draft onto the entry for the displayed version and close
    /// the dialog.
    pub fn save_values<F>(&mut self, profile: &Profile, on_update: F)
    where
        F: FnOnce(Profile),
    {
        on_update(profile.update_yaml_override(self.version.value(), &self.yaml));
        self.values_open = false;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
