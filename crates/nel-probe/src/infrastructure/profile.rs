//! Optional profile file.
//!
//! A profile keeps a set of probe settings under a name so they do not have to
//! be repeated on the command line:
//!
//! ```toml
//! host = "10.0.0.7"
//! port = 9000
//! step_timeout_secs = 30
//! account = "tester"
//! password = "secret"
//! server_id = "4661334467366178884"
//! server_name = "staging"
//! role = "r-17"
//! ```
//!
//! Every key is optional.  Unknown keys are rejected so that a typo does not
//! silently fall back to a default.  Command-line flags and environment
//! variables override the profile; the profile overrides built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::ProbeConfig;

/// Error type for profile loading.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The file could not be read.
    #[error("I/O error reading profile at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse profile TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings read from a profile file.  `None` means "not set here".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeProfile {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub socket_timeout_secs: Option<u64>,
    pub step_timeout_secs: Option<u64>,
    pub account: Option<String>,
    pub password: Option<String>,
    pub server_id: Option<String>,
    pub server_name: Option<String>,
    pub role: Option<String>,
}

impl ProbeProfile {
    /// Built-in defaults overridden by every key this profile sets.
    pub fn into_config(self) -> ProbeConfig {
        let defaults = ProbeConfig::default();
        ProbeConfig {
            host: self.host.unwrap_or(defaults.host),
            port: self.port.unwrap_or(defaults.port),
            socket_timeout: self
                .socket_timeout_secs
                .map_or(defaults.socket_timeout, Duration::from_secs),
            step_timeout: self
                .step_timeout_secs
                .map_or(defaults.step_timeout, Duration::from_secs),
            account: self.account.unwrap_or(defaults.account),
            password: self.password.unwrap_or(defaults.password),
            server_id: self.server_id.unwrap_or(defaults.server_id),
            server_name: self.server_name.unwrap_or(defaults.server_name),
            role_id: self.role.or(defaults.role_id),
            ..defaults
        }
    }
}

/// Parses profile TOML text.
///
/// # Errors
///
/// Returns [`ProfileError::Parse`] for malformed TOML, a value of the wrong
/// type or an unknown key.
pub fn parse_profile(content: &str) -> Result<ProbeProfile, ProfileError> {
    Ok(toml::from_str(content)?)
}

/// Reads and parses the profile at `path`.
///
/// Unlike a settings file with a well-known location, a profile is only read
/// when explicitly named, so a missing file is an error.
///
/// # Errors
///
/// Returns [`ProfileError::Io`] if the file cannot be read and
/// [`ProfileError::Parse`] if its content is invalid.
pub fn load_profile(path: &Path) -> Result<ProbeProfile, ProfileError> {
    let content = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_profile(&content)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
