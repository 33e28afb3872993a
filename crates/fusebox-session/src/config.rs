//! Client configuration and its resolution from the environment.

use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_NAVIGATION_URL: &str = "https://aubg.empower-xl.com/empower/fusebox.cfm";
pub const DEFAULT_AUTH_URL: &str =
    "https://aubg.empower-xl.com/ptl-includes/authentication/auth-onlogin.cfm";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                                      AppleWebKit/537.36 (KHTML, like Gecko) \
                                      Chrome/91.0.4472.124 Safari/537.36";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the backend lives and how to talk to it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// The single dispatch URL every `fuseaction` is routed through.
    pub navigation_url: Url,
    /// The login form's POST target.
    pub auth_url: Url,
    /// Value of the `Origin` header on AJAX requests.
    pub origin: String,
    /// Browser-identifying header attached to every request.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let navigation_url =
            Url::parse(DEFAULT_NAVIGATION_URL).expect("default navigation URL is valid");
        let auth_url = Url::parse(DEFAULT_AUTH_URL).expect("default auth URL is valid");
        let origin = navigation_url.origin().ascii_serialization();
        Self {
            navigation_url,
            auth_url,
            origin,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Defaults, overridden by whichever `FUSEBOX_*` variables are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("FUSEBOX_NAVIGATION_URL") {
            config = config.with_navigation_url(&value)?;
        }
        if let Some(value) = lookup("FUSEBOX_AUTH_URL") {
            config = config.with_auth_url(&value)?;
        }
        if let Some(value) = lookup("FUSEBOX_ORIGIN") {
            config = config.with_origin(value);
        }
        if let Some(value) = lookup("FUSEBOX_USER_AGENT") {
            config.user_agent = value;
        }
        if let Some(value) = lookup("FUSEBOX_TIMEOUT_MS") {
            config.timeout = parse_timeout_ms(&value)?;
        }

        Ok(config)
    }

    /// Replace the navigation URL.
    ///
    /// The AJAX origin follows the new URL unless it was set explicitly
    /// to something else.
    pub fn with_navigation_url(mut self, url: &str) -> Result<Self, ConfigError> {
        let parsed = parse_url("navigation_url", url)?;
        if self.origin == self.navigation_url.origin().ascii_serialization() {
            self.origin = parsed.origin().ascii_serialization();
        }
        self.navigation_url = parsed;
        Ok(self)
    }

    pub fn with_auth_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.auth_url = parse_url("auth_url", url)?;
        Ok(self)
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        source,
    })
}

/// Parse a millisecond timeout; zero is rejected.
pub fn parse_timeout_ms(value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ConfigError::InvalidTimeout(value.to_string())),
    }
}
