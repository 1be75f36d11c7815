//! Command: print version information.

/// Version string baked in at build time, falling back to the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("AUTHSELECT_STATE_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")))
}

/// Print the version to stdout.
pub fn run() {
    println!("authselect-state {}", version());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
