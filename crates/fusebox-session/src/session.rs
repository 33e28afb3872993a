//! Authenticated session state.
//!
//! ```text
//!   LoggedOut --authenticate (accepted)--> LoggedIn
//!   LoggedOut --authenticate (rejected)--> LoggedOut
//!   LoggedIn  --expiry fingerprint seen--> LoggedOut
//! ```

use chrono::NaiveDateTime;

use crate::config::ClientConfig;
use crate::credentials::Credentials;
use crate::document::Document;
use crate::endpoint::Endpoint;
use crate::error::{AuthenticationError, ConfigError};
use crate::fingerprint::{PASSWORD_FIELD, USERNAME_FIELD};
use crate::form::Form;
use crate::transport::Transport;

/// Hidden flag the login form always submits.
const LOGGED_IN_FIELD: (&str, &str) = ("LoggedInToEmpower", "1");
/// Client-local clock reading, `MM/DD/YYYY HH:MM:SS`.
const LOGON_INFO_FIELD: &str = "logoninfo";
const LOGON_INFO_FORMAT: &str = "%m/%d/%Y %H:%M:%S";
/// The login button is an `<input type="image">`, so the form posts click coordinates.
const SUBMIT_X_FIELD: (&str, &str) = ("LogInToEmpower.x", "57");
const SUBMIT_Y_FIELD: (&str, &str) = ("LogInToEmpower.y", "18");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn,
}

/// Owns the credentials, the cookie-bearing transport, and the login state.
pub struct SessionManager {
    config: ClientConfig,
    credentials: Credentials,
    transport: Transport,
    state: SessionState,
}

impl SessionManager {
    /// Create a logged-out session. No request is made.
    pub fn new(config: ClientConfig, credentials: Credentials) -> Result<Self, ConfigError> {
        let transport = Transport::new(&config)?;
        Ok(Self {
            config,
            credentials,
            transport,
            state: SessionState::LoggedOut,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::LoggedIn
    }

    pub(crate) fn transport(&self) -> &Transport {
        &self.transport
    }

    pub(crate) fn transport_mut(&mut self) -> &mut Transport {
        &mut self.transport
    }

    /// Post the login form and check the answer against the login fingerprint.
    ///
    /// Transport failures leave the state untouched; a rejection leaves it
    /// logged out.
    pub async fn authenticate(&mut self) -> Result<(), AuthenticationError> {
        let username = self.credentials.username().to_string();
        tracing::info!(%username, "Authenticating");

        let form = login_form(&self.credentials, chrono::Local::now().naive_local());
        let response = self
            .transport
            .post_form(&self.config.auth_url, &form)
            .await?;

        let rejected = Document::parse(response.final_url, &response.body).is_login_page();
        if rejected {
            tracing::info!(%username, "Credentials rejected by backend");
            self.state = SessionState::LoggedOut;
            return Err(AuthenticationError::Rejected);
        }

        tracing::info!(%username, "Authentication successful");
        self.state = SessionState::LoggedIn;
        Ok(())
    }

    /// Record that the backend no longer accepts this session.
    pub fn invalidate(&mut self) {
        if self.state == SessionState::LoggedIn {
            tracing::debug!("Session marked logged out");
        }
        self.state = SessionState::LoggedOut;
    }

    /// Best-effort `fuseaction=Logout`. Failures are logged and dropped.
    pub async fn logout(&self) {
        let url = Endpoint::logout().url(&self.config.navigation_url);
        match self.transport.get(&url).await {
            Ok(_) => tracing::debug!("Logged out"),
            Err(e) => tracing::debug!("Logout request failed, ignoring: {e}"),
        }
    }
}

/// The login form as the backend expects it.
pub fn login_form(credentials: &Credentials, logged_on_at: NaiveDateTime) -> Form {
    Form::new()
        .with(USERNAME_FIELD, credentials.username())
        .with(PASSWORD_FIELD, credentials.password())
        .with(LOGGED_IN_FIELD.0, LOGGED_IN_FIELD.1)
        .with(
            LOGON_INFO_FIELD,
            logged_on_at.format(LOGON_INFO_FORMAT).to_string(),
        )
        .with(SUBMIT_X_FIELD.0, SUBMIT_X_FIELD.1)
        .with(SUBMIT_Y_FIELD.0, SUBMIT_Y_FIELD.1)
}
