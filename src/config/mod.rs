//! Requested configuration: parameter sources, validation, and the
//! [`DesiredConfiguration`] handed to the reconciler.
pub mod toml_loader;

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::ConfigError;
use crate::state::parse::is_token_char;

pub use toml_loader::{RawParams, load_params};

/// Profile and optional feature set the caller wants active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredConfiguration {
    /// Profile to select. Never empty once validated.
    pub profile: String,
    /// Features to enable. `None` means features are not managed.
    pub features: Option<BTreeSet<String>>,
}

impl DesiredConfiguration {
    /// Manage the profile only.
    #[must_use]
    pub fn profile_only(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            features: None,
        }
    }

    /// Manage the profile and exactly this feature set.
    #[must_use]
    pub fn with_features<I, S>(profile: impl Into<String>, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            profile: profile.into(),
            features: Some(features.into_iter().map(Into::into).collect()),
        }
    }

    /// Features as a sorted list, `None` when unmanaged.
    #[must_use]
    pub fn feature_list(&self) -> Option<Vec<String>> {
        self.features
            .as_ref()
            .map(|set| set.iter().cloned().collect())
    }
}

/// Validated parameters for one `apply` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyParams {
    /// What should be active.
    pub desired: DesiredConfiguration,
    /// Predict only, never commit.
    pub check_mode: bool,
    /// Pass `--force` to the commit command.
    pub force: bool,
}

impl ApplyParams {
    /// Layer `cli` over the optional parameter file and validate the result.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be loaded, no profile is
    /// given, or a profile or feature name is malformed.
    pub fn resolve(file: Option<&Path>, cli: RawParams) -> Result<Self, ConfigError> {
        let base = match file {
            Some(path) => load_params(path)?,
            None => RawParams::default(),
        };
        Self::validate(base.layer(cli))
    }

    /// Validate raw parameters.
    ///
    /// Names are trimmed; duplicate features collapse into the set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingProfile`], [`ConfigError::InvalidProfile`]
    /// or [`ConfigError::InvalidFeature`].
    pub fn validate(raw: RawParams) -> Result<Self, ConfigError> {
        let profile = raw
            .profile
            .map(|p| p.trim().to_string())
            .ok_or(ConfigError::MissingProfile)?;
        check_name(&profile).map_err(|reason| ConfigError::InvalidProfile {
            name: profile.clone(),
            reason,
        })?;

        let features = raw
            .features
            .map(|list| {
                list.into_iter()
                    .map(|f| {
                        let name = f.trim().to_string();
                        match check_name(&name) {
                            Ok(()) => Ok(name),
                            Err(reason) => Err(ConfigError::InvalidFeature { name, reason }),
                        }
                    })
                    .collect::<Result<BTreeSet<_>, _>>()
            })
            .transpose()?;

        Ok(Self {
            desired: DesiredConfiguration { profile, features },
            check_mode: raw.check_mode.unwrap_or(false),
            force: raw.force.unwrap_or(false),
        })
    }
}

/// A name must survive a round trip through `authselect current --raw`
/// and must not be mistaken for an option by `authselect select`.
fn check_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("must not be empty".to_string());
    }
    if name.starts_with('-') {
        return Err("must not start with '-'".to_string());
    }
    if let Some(c) = name.chars().find(|c| !is_token_char(*c)) {
        return Err(format!(
            "contains {c:?}; only letters, digits, '_', '-' and '/' are allowed"
        ));
    }
    Ok(())
}
