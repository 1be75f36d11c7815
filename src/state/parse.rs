//! Classification of `authselect current --raw` output.
use std::collections::BTreeSet;

use super::{ConfigurationRecord, ReadOutcome};

/// Exit code authselect uses for both "configured" and "not configured".
pub const QUERY_EXIT_CODE: i32 = 2;

/// Literal stdout printed when no profile is selected (under `LC_ALL=C`).
///
/// Compared without its trailing line ending, so `\r\n` or a missing
/// newline still match.
pub const UNCONFIGURED_MESSAGE: &str = "No existing configuration detected.\n";

/// Drop one trailing `\n` or `\r\n`.
fn strip_line_ending(s: &str) -> &str {
    s.strip_suffix('\n')
        .map_or(s, |line| line.strip_suffix('\r').unwrap_or(line))
}

/// Whether `c` can appear inside a profile or feature name.
///
/// Word characters plus `-` (feature names such as `with-sudo`) and `/`
/// (custom profiles such as `custom/corp`). Everything else separates tokens.
#[must_use]
pub fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '/')
}

/// Turn an exit code and captured output into a [`ReadOutcome`].
///
/// Exit code 2 is shared by both terminal states, so the two are told apart
/// by stdout alone.
#[must_use]
pub fn classify(code: Option<i32>, stdout: &str, stderr: &str) -> ReadOutcome {
    if code != Some(QUERY_EXIT_CODE) {
        return ReadOutcome::QueryFailed {
            exit_code: code,
            stderr: stderr.to_string(),
            message: format!(
                "state query exited with {}: {}",
                code.map_or_else(|| "signal".to_string(), |c| format!("code {c}")),
                stderr.trim()
            ),
        };
    }

    if strip_line_ending(stdout) == strip_line_ending(UNCONFIGURED_MESSAGE) {
        return ReadOutcome::Unconfigured;
    }

    if !stderr.is_empty() {
        return ReadOutcome::QueryFailed {
            exit_code: code,
            stderr: stderr.to_string(),
            message: format!("state query wrote to stderr: {}", stderr.trim()),
        };
    }

    parse_record(stdout).map_or_else(
        || ReadOutcome::QueryFailed {
            exit_code: code,
            stderr: String::new(),
            message: format!("unparseable output from state query: {stdout:?}"),
        },
        ReadOutcome::Configured,
    )
}

/// Parse a single `<profile><sep><features...>` line.
///
/// Returns `None` for empty output, output spanning several lines, or a line
/// that does not start with a profile token.
#[must_use]
pub fn parse_record(stdout: &str) -> Option<ConfigurationRecord> {
    let line = strip_line_ending(stdout);
    if line.contains('\n') {
        return None;
    }

    let split = line.find(|c: char| !is_token_char(c)).unwrap_or(line.len());
    let (profile, rest) = line.split_at(split);
    if profile.is_empty() {
        return None;
    }

    let features: BTreeSet<String> = rest
        .split(|c: char| !is_token_char(c))
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect();

    Some(ConfigurationRecord {
        profile: profile.to_string(),
        features,
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn features(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn parses_profile_and_features() {
        let outcome = classify(Some(2), "sssd with-sudo with-mkhomedir\n", "");
        assert_eq!(
            outcome,
            ReadOutcome::Configured(ConfigurationRecord {
                profile: "sssd".to_string(),
                features: features(&["with-sudo", "with-mkhomedir"]),
            })
        );
    }

    #[test]
    fn unconfigured_literal_is_not_a_failure() {
        let outcome = classify(Some(2), "No existing configuration detected.\n", "");
        assert_eq!(outcome, ReadOutcome::Unconfigured);
    }

    #[test]
    fn unconfigured_literal_ignores_stderr() {
        let outcome = classify(
            Some(2),
            "No existing configuration detected.\n",
            "some warning\n",
        );
        assert_eq!(outcome, ReadOutcome::Unconfigured);
    }

    #[test]
    fn unconfigured_literal_with_crlf() {
        let outcome = classify(Some(2), "No existing configuration detected.\r\n", "");
        assert_eq!(outcome, ReadOutcome::Unconfigured);
    }

    #[test]
    fn unconfigured_literal_without_newline() {
        let outcome = classify(Some(2), "No existing configuration detected.", "");
        assert_eq!(outcome, ReadOutcome::Unconfigured);
    }

    #[test]
    fn profile_without_features_yields_empty_set() {
        let record = parse_record("minimal\n").unwrap();
        assert_eq!(record.profile, "minimal");
        assert!(record.features.is_empty(), "empty remainder is an empty set");
    }

    #[test]
    fn trailing_separator_yields_empty_set() {
        let record = parse_record("sssd \n").unwrap();
        assert_eq!(record.profile, "sssd");
        assert!(record.features.is_empty());
    }

    #[test]
    fn custom_profile_keeps_slash() {
        let record = parse_record("custom/corp with-faillock\n").unwrap();
        assert_eq!(record.profile, "custom/corp");
        assert_eq!(record.features, features(&["with-faillock"]));
    }

    #[test]
    fn runs_of_separators_are_collapsed() {
        let record = parse_record("winbind   with-sudo,\twith-mkhomedir\r\n").unwrap();
        assert_eq!(record.profile, "winbind");
        assert_eq!(record.features, features(&["with-sudo", "with-mkhomedir"]));
    }

    #[test]
    fn duplicate_features_collapse() {
        let record = parse_record("sssd with-sudo with-sudo\n").unwrap();
        assert_eq!(record.features.len(), 1);
    }

    #[test]
    fn empty_output_is_unparseable() {
        let outcome = classify(Some(2), "", "");
        assert!(
            matches!(&outcome, ReadOutcome::QueryFailed { message, stderr, .. }
                if message.contains("unparseable") && stderr.is_empty()),
            "unexpected outcome: {outcome:?}"
        );
    }

    #[test]
    fn leading_separator_is_unparseable() {
        assert!(parse_record(" sssd with-sudo\n").is_none());
    }

    #[test]
    fn multi_line_output_is_unparseable() {
        assert!(parse_record("sssd with-sudo\nextra line\n").is_none());
    }

    #[test]
    fn other_unconfigured_wording_is_not_unconfigured() {
        let outcome = classify(Some(2), "Keine Konfiguration gefunden.\nmore\n", "");
        assert!(
            matches!(outcome, ReadOutcome::QueryFailed { .. }),
            "localized text must not be mistaken for a profile: {outcome:?}"
        );
    }

    #[test]
    fn exit_code_zero_is_failure() {
        let outcome = classify(Some(0), "sssd with-sudo\n", "");
        assert!(matches!(
            outcome,
            ReadOutcome::QueryFailed {
                exit_code: Some(0),
                ..
            }
        ));
    }

    #[test]
    fn non_zero_exit_carries_stderr() {
        let outcome = classify(Some(1), "", "[error] permission denied\n");
        assert_eq!(
            outcome,
            ReadOutcome::QueryFailed {
                exit_code: Some(1),
                stderr: "[error] permission denied\n".to_string(),
                message: "state query exited with code 1: [error] permission denied".to_string(),
            }
        );
    }

    #[test]
    fn signal_termination_is_failure() {
        let outcome = classify(None, "", "");
        assert!(
            matches!(&outcome, ReadOutcome::QueryFailed { exit_code: None, message, .. }
                if message.contains("signal"))
        );
    }

    #[test]
    fn configured_output_with_stderr_is_failure() {
        let outcome = classify(Some(2), "sssd with-sudo\n", "warning: something\n");
        assert!(
            matches!(&outcome, ReadOutcome::QueryFailed { stderr, .. } if stderr.contains("warning"))
        );
    }

    #[test]
    fn token_chars() {
        assert!(is_token_char('a'));
        assert!(is_token_char('9'));
        assert!(is_token_char('_'));
        assert!(is_token_char('-'));
        assert!(is_token_char('/'));
        assert!(!is_token_char(' '));
        assert!(!is_token_char(','));
        assert!(!is_token_char('.'));
    }
}
