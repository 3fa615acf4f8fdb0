//! Resolution of user-entered chart versions against the versions a
//! repository actually offers.
//!
//! A request is either a concrete version (`1.2.3`, `v1.2.3`, `=1.2.3`),
//! matched exactly, or a requirement (`^1.2`, `>=1.0, <2.0`, `1.x`),
//! matched against every candidate. The highest match wins.

use semver::{Version, VersionReq};
use serde::Serialize;

/// Shown on the version input whenever the request cannot be parsed.
pub const INVALID_VERSION_MESSAGE: &str =
    "The provided semver is invalid or not matching please select one of the available versions";

// ---------------------------------------------------------------------------
// VersionRequest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum VersionRequest {
    Exact(Version),
    Range(VersionReq),
}

impl VersionRequest {
    /// Parse a request. Returns `None` for anything that is neither a
    /// version nor a requirement, including the empty string.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Some(v) = parse_version(trimmed) {
            return Some(VersionRequest::Exact(v));
        }
        // A bare partial such as `6.0` is the X-range 6.0.x, not Cargo's `^6.0`.
        if let Some(partial) = bare_partial(trimmed) {
            return VersionReq::parse(&format!("={partial}"))
                .ok()
                .map(VersionRequest::Range);
        }
        VersionReq::parse(trimmed).ok().map(VersionRequest::Range)
    }

    pub fn matches(&self, candidate: &Version) -> bool {
        match self {
            // Build metadata does not take part in precedence.
            VersionRequest::Exact(v) => {
                v.major == candidate.major
                    && v.minor == candidate.minor
                    && v.patch == candidate.patch
                    && v.pre == candidate.pre
            }
            VersionRequest::Range(req) => req.matches(candidate),
        }
    }
}

/// `1` or `6.0`, optionally prefixed like a concrete version.
fn bare_partial(input: &str) -> Option<&str> {
    let stripped = strip_prefixes(input);
    let parts: Vec<&str> = stripped.split('.').collect();
    let numeric = parts
        .iter()
        .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));
    (parts.len() < 3 && numeric).then_some(stripped)
}

fn parse_version(input: &str) -> Option<Version> {
    Version::parse(strip_prefixes(input)).ok()
}

fn strip_prefixes(input: &str) -> &str {
    let stripped = input
        .strip_prefix('=')
        .unwrap_or(input)
        .trim_start();
    stripped
        .strip_prefix('v')
        .or_else(|| stripped.strip_prefix('V'))
        .unwrap_or(stripped)
}

/// Highest candidate satisfying `request`, returned as written in the list.
/// Candidates that are not valid versions are skipped.
pub fn max_satisfying<'a, S: AsRef<str>>(
    candidates: &'a [S],
    request: &VersionRequest,
) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|c| {
            let raw = c.as_ref();
            parse_version(raw.trim()).map(|v| (v, raw))
        })
        .filter(|(v, _)| request.matches(v))
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, raw)| raw)
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub resolved: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Resolve `requested` against `candidates`.
///
/// `current` is the version on display before this request; an invalid
/// request leaves it in place. A well-formed request that nothing satisfies
/// resolves to itself.
pub fn resolve<S: AsRef<str>>(candidates: &[S], requested: &str, current: &str) -> Resolution {
    let Some(request) = VersionRequest::parse(requested) else {
        tracing::debug!(requested, "rejecting malformed version request");
        return Resolution {
            resolved: current.to_string(),
            valid: false,
            error_message: Some(INVALID_VERSION_MESSAGE.to_string()),
        };
    };

    let resolved = match max_satisfying(candidates, &request) {
        Some(found) => found.to_string(),
        None => {
            tracing::debug!(requested, "no candidate satisfies request, keeping it verbatim");
            requested.to_string()
        }
    };

    Resolution {
        resolved,
        valid: true,
        error_message: None,
    }
}

// ---------------------------------------------------------------------------
// VersionField
// ---------------------------------------------------------------------------

/// Displayed state of a version input: the value shown and the inline error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionField {
    value: String,
    error: Option<String>,
}

impl VersionField {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            error: None,
        }
    }

    /// Apply a new request and return the resolution. The shown value only
    /// changes when the request is valid.
    pub fn submit<S: AsRef<str>>(&mut self, candidates: &[S], requested: &str) -> Resolution {
        let resolution = resolve(candidates, requested, &self.value);
        self.value = resolution.resolved.clone();
        self.error = resolution.error_message.clone();
        resolution
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
