//! TOML parameter file parsing.
use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;

/// Parameters as they appear in a TOML file or on the command line, before
/// validation. Every field is optional so sources can be layered.
///
/// ```toml
/// profile = "sssd"
/// features = ["with-sudo", "with-mkhomedir"]
/// check_mode = false
/// force = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawParams {
    /// Requested profile.
    pub profile: Option<String>,
    /// Requested features; `None` leaves features unmanaged.
    pub features: Option<Vec<String>>,
    /// Predict the action without running it.
    pub check_mode: Option<bool>,
    /// Pass `--force` to `authselect select`.
    pub force: Option<bool>,
}

impl RawParams {
    /// Overlay `other` on top of `self`: every field set in `other` wins.
    #[must_use]
    pub fn layer(self, other: Self) -> Self {
        Self {
            profile: other.profile.or(self.profile),
            features: other.features.or(self.features),
            check_mode: other.check_mode.or(self.check_mode),
            force: other.force.or(self.force),
        }
    }
}

/// Load a parameter file.
///
/// Unlike optional config files elsewhere, a missing file is an error: the
/// caller named it explicitly.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if it is not valid TOML or has unknown keys.
pub fn load_params(path: &Path) -> Result<RawParams, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
