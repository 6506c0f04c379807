use std::fmt;

use crate::core::constants::CREDENTIAL_ENV_VARS;

/// Where the credential used for a call came from. Logged instead of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Caller,
    Default,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Caller => write!(f, "caller"),
            CredentialSource::Default => write!(f, "default"),
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Pick the caller's credential when it is non-blank, else the default.
/// Returns `None` when neither is usable.
pub fn resolve_credential<'a>(
    explicit: Option<&'a str>,
    default: Option<&'a str>,
) -> Option<(&'a str, CredentialSource)> {
    if let Some(key) = present(explicit) {
        return Some((key, CredentialSource::Caller));
    }
    present(default).map(|key| (key, CredentialSource::Default))
}

/// Read the process-wide default credential from the environment.
pub fn default_credential_from_env() -> Option<String> {
    default_credential_from(|name| std::env::var(name).ok())
}

pub(crate) fn default_credential_from<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    CREDENTIAL_ENV_VARS.iter().find_map(|name| {
        lookup(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn caller_credential_wins_over_default() {
        assert_eq!(
            resolve_credential(Some("mine"), Some("shared")),
            Some(("mine", CredentialSource::Caller))
        );
    }

    #[test]
    fn blank_caller_credential_falls_back() {
        assert_eq!(
            resolve_credential(Some("   "), Some("shared")),
            Some(("shared", CredentialSource::Default))
        );
        assert_eq!(
            resolve_credential(None, Some("shared")),
            Some(("shared", CredentialSource::Default))
        );
    }

    #[test]
    fn nothing_usable_resolves_to_none() {
        assert_eq!(resolve_credential(None, None), None);
        assert_eq!(resolve_credential(Some(""), Some("")), None);
    }

    #[test]
    fn env_lookup_prefers_gemini_and_skips_empty() {
        let env: HashMap<&str, &str> =
            HashMap::from([("GEMINI_API_KEY", ""), ("GOOGLE_API_KEY", "google-key")]);
        let lookup = |name: &str| env.get(name).map(|v| v.to_string());
        assert_eq!(default_credential_from(lookup), Some("google-key".to_string()));

        let env: HashMap<&str, &str> =
            HashMap::from([("GEMINI_API_KEY", "gemini-key"), ("GOOGLE_API_KEY", "google-key")]);
        let lookup = |name: &str| env.get(name).map(|v| v.to_string());
        assert_eq!(default_credential_from(lookup), Some("gemini-key".to_string()));

        assert_eq!(default_credential_from(|_| None), None);
    }
}
