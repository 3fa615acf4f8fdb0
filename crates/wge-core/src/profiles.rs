use crate::error::{ConsoleError, Result};
use crate::profile::Profile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// RepositoryRef
// ---------------------------------------------------------------------------

/// A Helm repository, shown as `name:namespace` because names repeat
/// across namespaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub name: String,
    pub namespace: String,
}

impl RepositoryRef {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.namespace)
    }
}

impl FromStr for RepositoryRef {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((name, namespace)) if !name.is_empty() && !namespace.is_empty() => {
                Ok(RepositoryRef::new(name, namespace))
            }
            _ => Err(ConsoleError::InvalidRepository(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// State of the "select all" header checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    All,
    Some,
    None,
}

// ---------------------------------------------------------------------------
// ProfilesIndex
// ---------------------------------------------------------------------------

/// All profiles offered for a cluster, keyed and ordered by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilesIndex {
    profiles: BTreeMap<String, Profile>,
}

impl ProfilesIndex {
    /// Build the index as loaded from the repository: default version
    /// selection applied, required profiles ticked.
    pub fn from_profiles(profiles: impl IntoIterator<Item = Profile>) -> Self {
        let profiles = profiles
            .into_iter()
            .map(|p| {
                let mut p = p.with_default_selection();
                p.selected = p.selected || p.required;
                (p.name.clone(), p)
            })
            .collect();
        Self { profiles }
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    pub fn require(&self, name: &str) -> Result<&Profile> {
        self.get(name)
            .ok_or_else(|| ConsoleError::ProfileNotFound(name.to_string()))
    }

    /// Profiles in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    /// Replace the profile with the same name, or add it.
    pub fn update(&mut self, profile: Profile) {
        self.profiles.insert(profile.name.clone(), profile);
    }

    pub fn toggle(&mut self, name: &str, checked: bool) -> Result<()> {
        let profile = self
            .profiles
            .get_mut(name)
            .ok_or_else(|| ConsoleError::ProfileNotFound(name.to_string()))?;
        if profile.required && !checked {
            return Err(ConsoleError::ProfileRequired(name.to_string()));
        }
        profile.selected = checked;
        Ok(())
    }

    /// Tick or untick everything; required profiles stay ticked.
    pub fn select_all(&mut self, checked: bool) {
        for p in self.profiles.values_mut() {
            p.selected = checked || p.required;
        }
    }

    pub fn selection(&self) -> Selection {
        let total = self.profiles.len();
        let ticked = self.profiles.values().filter(|p| p.selected).count();
        match ticked {
            0 => Selection::None,
            n if n == total => Selection::All,
            _ => Selection::Some,
        }
    }

    /// Profiles served by one of `repositories`, in name order.
    pub fn visible<'a>(&'a self, repositories: &'a [RepositoryRef]) -> impl Iterator<Item = &'a Profile> {
        self.profiles.values().filter(move |p| {
            repositories.iter().any(|r| {
                p.repo_name.as_deref() == Some(r.name.as_str())
                    && p.repo_namespace.as_deref() == Some(r.namespace.as_str())
            })
        })
    }

    /// Ticked profiles, ready to submit.
    pub fn selected(&self) -> Vec<&Profile> {
        self.profiles.values().filter(|p| p.selected).collect()
    }

    pub fn into_profiles(self) -> Vec<Profile> {
        self.profiles.into_values().collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
