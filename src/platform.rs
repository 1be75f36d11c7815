//! Host platform detection from the OS and `/etc/os-release`.
use std::fmt;

/// Detected operating system platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Any Linux distribution.
    Linux,
    /// Anything else (macOS, BSD, Windows).
    Other,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::Other => write!(f, "{}", std::env::consts::OS),
        }
    }
}

/// Distribution ids that ship authselect.
const RHEL_FAMILY: &[&str] = &["fedora", "rhel", "centos", "rocky", "almalinux", "ol"];

/// Platform information for the current system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Operating system.
    pub os: Os,
    /// `ID` from `/etc/os-release`, if readable.
    pub distro_id: Option<String>,
    /// Space-separated `ID_LIKE` entries from `/etc/os-release`.
    pub distro_like: Vec<String>,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub fn detect() -> Self {
        let os = if cfg!(target_os = "linux") {
            Os::Linux
        } else {
            Os::Other
        };
        let (distro_id, distro_like) = if os == Os::Linux {
            std::fs::read_to_string("/etc/os-release")
                .map(|content| parse_os_release(&content))
                .unwrap_or_default()
        } else {
            (None, Vec::new())
        };
        Self {
            os,
            distro_id,
            distro_like,
        }
    }

    /// Create a platform with explicit values.
    #[must_use]
    pub fn new(os: Os, distro_id: Option<&str>, distro_like: &[&str]) -> Self {
        Self {
            os,
            distro_id: distro_id.map(String::from),
            distro_like: distro_like.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Whether this is a Linux host.
    #[must_use]
    pub fn is_linux(&self) -> bool {
        self.os == Os::Linux
    }

    /// Whether the distribution belongs to the Fedora/RHEL family.
    #[must_use]
    pub fn is_rhel_family(&self) -> bool {
        self.distro_id
            .iter()
            .chain(&self.distro_like)
            .any(|id| RHEL_FAMILY.contains(&id.as_str()))
    }

    /// Human-readable name for messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.distro_id {
            Some(id) => format!("{} ({id})", self.os),
            None => self.os.to_string(),
        }
    }
}

/// Extract `ID` and `ID_LIKE` from os-release content.
#[must_use]
pub fn parse_os_release(content: &str) -> (Option<String>, Vec<String>) {
    let mut id = None;
    let mut like = Vec::new();
    for line in content.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
        match key {
            "ID" => id = Some(value.to_string()),
            "ID_LIKE" => like = value.split_whitespace().map(String::from).collect(),
            _ => {}
        }
    }
    (id, like)
}
