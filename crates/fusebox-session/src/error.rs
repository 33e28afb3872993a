//! Error types for the session, navigation, and parsing layers.

/// The login exchange itself went wrong.
#[derive(thiserror::Error, Debug)]
pub enum AuthenticationError {
    /// The backend answered the login POST with its login or failure page.
    #[error("Invalid credentials: the backend returned its login page")]
    Rejected,

    /// Connection failure, timeout, or non-2xx status on the login POST.
    #[error("HTTP error during authentication: {0}")]
    Transport(#[from] reqwest::Error),
}

/// A GET, POST, or AJAX request did not yield the page the caller expected.
#[derive(thiserror::Error, Debug)]
pub enum NavigationError {
    #[error("HTTP request failed for '{target}': {source}")]
    Transport {
        target: String,
        #[source]
        source: reqwest::Error,
    },

    /// The login-page fingerprint showed up where a substantive page was expected.
    #[error("Session expired while requesting '{target}'")]
    SessionExpired { target: String },

    #[error("Invalid request URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl NavigationError {
    pub fn is_session_expired(&self) -> bool {
        matches!(self, NavigationError::SessionExpired { .. })
    }
}

/// A parser capability could not make sense of a fetched document.
#[derive(thiserror::Error, Debug)]
#[error("Page parsing failed: {message}")]
pub struct ParsingError {
    pub message: String,
}

impl ParsingError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Invalid client configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid URL in {field}: '{value}' ({source})")]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid timeout '{0}': expected a positive number of milliseconds")]
    InvalidTimeout(String),

    #[error("Missing environment variable {0}")]
    MissingEnv(&'static str),

    #[error("Invalid header value for {name}")]
    InvalidHeader { name: &'static str },

    #[error("Failed to build HTTP transport: {0}")]
    Transport(#[source] reqwest::Error),
}

/// All errors surfaced by the client.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    /// The AJAX host page had no input named `token_name` carrying a value.
    #[error("Could not find a valid token named '{token_name}' on page '{fuseaction}'")]
    TokenNotFound {
        token_name: String,
        fuseaction: String,
    },

    #[error(transparent)]
    Parsing(#[from] ParsingError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// True when the backend rejected the username/password pair.
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, Error::Authentication(AuthenticationError::Rejected))
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, Error::Navigation(e) if e.is_session_expired())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_expired_is_navigation() {
        let err: Error = NavigationError::SessionExpired {
            target: "student.main".to_string(),
        }
        .into();
        assert!(err.is_session_expired());
        assert!(!err.is_invalid_credentials());
        assert!(matches!(err, Error::Navigation(_)));
        assert_eq!(
            err.to_string(),
            "Session expired while requesting 'student.main'"
        );
    }

    #[test]
    fn test_rejected_is_invalid_credentials() {
        let err: Error = AuthenticationError::Rejected.into();
        assert!(err.is_invalid_credentials());
        assert!(!err.is_session_expired());
    }

    #[test]
    fn test_token_not_found_message() {
        let err = Error::TokenNotFound {
            token_name: "token".to_string(),
            fuseaction: "WEBSRQ14".to_string(),
        };
        assert!(err.to_string().contains("'token'"));
        assert!(err.to_string().contains("WEBSRQ14"));
    }
}
