//! Difference between observed and desired configuration.
use serde::Serialize;

use crate::config::DesiredConfiguration;
use crate::state::ConfigurationRecord;

/// A profile switch, `from` is `None` when nothing was selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileChange {
    /// Profile observed before the change.
    pub from: Option<String>,
    /// Requested profile.
    pub to: String,
}

/// What a commit would change.
///
/// Feature lists are sorted. When the desired configuration does not manage
/// features, both lists stay empty whatever the host has enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Drift {
    /// Profile switch, if the profile differs or nothing is selected.
    pub profile: Option<ProfileChange>,
    /// Features that would be enabled.
    pub features_added: Vec<String>,
    /// Features that would be disabled.
    pub features_removed: Vec<String>,
}

impl Drift {
    /// Compare `current` (`None` = unconfigured) against `desired`.
    ///
    /// # Examples
    ///
    /// ```
    /// use authselect_state::config::DesiredConfiguration;
    /// use authselect_state::reconcile::Drift;
    /// use authselect_state::state::parse_record;
    ///
    /// let current = parse_record("sssd with-sudo\n");
    /// let desired = DesiredConfiguration::profile_only("sssd");
    /// assert!(Drift::between(current.as_ref(), &desired).is_empty());
    /// ```
    #[must_use]
    pub fn between(current: Option<&ConfigurationRecord>, desired: &DesiredConfiguration) -> Self {
        let profile = match current {
            Some(record) if record.profile == desired.profile => None,
            _ => Some(ProfileChange {
                from: current.map(|r| r.profile.clone()),
                to: desired.profile.clone(),
            }),
        };

        let (features_added, features_removed) = match &desired.features {
            None => (Vec::new(), Vec::new()),
            Some(wanted) => match current {
                None => (wanted.iter().cloned().collect(), Vec::new()),
                Some(record) => (
                    wanted.difference(&record.features).cloned().collect(),
                    record.features.difference(wanted).cloned().collect(),
                ),
            },
        };

        Self {
            profile,
            features_added,
            features_removed,
        }
    }

    /// `true` when no action is needed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.profile.is_none() && self.features_added.is_empty() && self.features_removed.is_empty()
    }

    /// One-line human summary for log output.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(change) = &self.profile {
            parts.push(format!(
                "profile {} -> {}",
                change.from.as_deref().unwrap_or("(none)"),
                change.to
            ));
        }
        if !self.features_added.is_empty() {
            parts.push(format!("enable {}", self.features_added.join(", ")));
        }
        if !self.features_removed.is_empty() {
            parts.push(format!("disable {}", self.features_removed.join(", ")));
        }
        if parts.is_empty() {
            "no changes".to_string()
        } else {
            parts.join("; ")
        }
    }
}
