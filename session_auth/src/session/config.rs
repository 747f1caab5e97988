use std::env;

/// SameSite policy for the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Lax,
    Strict,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lax => "Lax",
            Self::Strict => "Strict",
            Self::None => "None",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            v if v.eq_ignore_ascii_case("lax") => Some(Self::Lax),
            v if v.eq_ignore_ascii_case("strict") => Some(Self::Strict),
            v if v.eq_ignore_ascii_case("none") => Some(Self::None),
            _ => None,
        }
    }
}

/// Session and cookie configuration.
///
/// The session cookie is always HttpOnly. `idle_timeout` is expected to be
/// less than or equal to `absolute_timeout`; a configuration where idle
/// exceeds absolute makes the sliding window meaningless (the absolute
/// ceiling always fires first). This is an operational hazard, not a
/// runtime check.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Name of the session cookie
    pub cookie_name: String,
    /// Cookie Domain attribute; omitted when `None`
    pub cookie_domain: Option<String>,
    /// Whether to emit the Secure attribute (requires HTTPS in production)
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
    /// Seconds of inactivity after which the store evicts the session
    pub idle_timeout: u64,
    /// Hard ceiling on session lifetime in seconds, regardless of activity
    pub absolute_timeout: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "session_id".to_string(),
            cookie_domain: None,
            cookie_secure: false,
            cookie_same_site: SameSite::Lax,
            idle_timeout: 1800,    // 30 minutes
            absolute_timeout: 86400, // 24 hours
        }
    }
}

impl SessionConfig {
    /// Build a configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable:
    /// `SESSION_COOKIE_NAME`, `SESSION_COOKIE_DOMAIN`,
    /// `SESSION_COOKIE_SECURE`, `SESSION_COOKIE_SAMESITE`,
    /// `SESSION_IDLE_TIMEOUT`, `SESSION_ABSOLUTE_TIMEOUT`.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            cookie_name: env::var("SESSION_COOKIE_NAME").unwrap_or(defaults.cookie_name),
            cookie_domain: env::var("SESSION_COOKIE_DOMAIN").ok().filter(|d| !d.is_empty()),
            cookie_secure: env::var("SESSION_COOKIE_SECURE")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(defaults.cookie_secure),
            cookie_same_site: env::var("SESSION_COOKIE_SAMESITE")
                .ok()
                .and_then(|v| SameSite::parse(&v))
                .unwrap_or(defaults.cookie_same_site),
            idle_timeout: env::var("SESSION_IDLE_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.idle_timeout),
            absolute_timeout: env::var("SESSION_ABSOLUTE_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.absolute_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    /// Set an environment variable for the duration of the test and restore
    /// the original value afterward.
    fn with_env_var<F, R>(key: &str, value: Option<&str>, test: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();

        match value {
            Some(val) => unsafe { env::set_var(key, val) },
            None => unsafe { env::remove_var(key) },
        }

        let result = test();

        match original {
            Some(val) => unsafe { env::set_var(key, val) },
            None => unsafe { env::remove_var(key) },
        }

        result
    }

    #[test]
    fn test_same_site_parse() {
        assert_eq!(SameSite::parse("Lax"), Some(SameSite::Lax));
        assert_eq!(SameSite::parse("strict"), Some(SameSite::Strict));
        assert_eq!(SameSite::parse("NONE"), Some(SameSite::None));
        assert_eq!(SameSite::parse("bogus"), None);
    }

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.cookie_name, "session_id");
        assert_eq!(config.cookie_domain, None);
        assert!(!config.cookie_secure);
        assert_eq!(config.cookie_same_site, SameSite::Lax);
        assert_eq!(config.idle_timeout, 1800);
        assert_eq!(config.absolute_timeout, 86400);
    }

    #[test]
    #[serial]
    fn test_from_env_custom_values() {
        with_env_var("SESSION_COOKIE_NAME", Some("custom_sid"), || {
            with_env_var("SESSION_IDLE_TIMEOUT", Some("600"), || {
                with_env_var("SESSION_COOKIE_SAMESITE", Some("Strict"), || {
                    let config = SessionConfig::from_env();
                    assert_eq!(config.cookie_name, "custom_sid");
                    assert_eq!(config.idle_timeout, 600);
                    assert_eq!(config.cookie_same_site, SameSite::Strict);
                })
            })
        });
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_timeout_falls_back() {
        with_env_var("SESSION_IDLE_TIMEOUT", Some("invalid"), || {
            let config = SessionConfig::from_env();
            assert_eq!(config.idle_timeout, 1800);
        });
    }

    #[test]
    #[serial]
    fn test_from_env_empty_domain_is_none() {
        with_env_var("SESSION_COOKIE_DOMAIN", Some(""), || {
            let config = SessionConfig::from_env();
            assert_eq!(config.cookie_domain, None);
        });
    }
}
