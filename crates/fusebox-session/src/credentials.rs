//! Login credentials.
//!
//! The password never leaves this type except to fill the login form: the
//! `Debug` output redacts it and nothing in the crate logs it.

use std::fmt;

use crate::error::ConfigError;

pub const USERNAME_ENV: &str = "FUSEBOX_USERNAME";
pub const PASSWORD_ENV: &str = "FUSEBOX_PASSWORD";

#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Read `FUSEBOX_USERNAME` and `FUSEBOX_PASSWORD`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let username =
            std::env::var(USERNAME_ENV).map_err(|_| ConfigError::MissingEnv(USERNAME_ENV))?;
        let password =
            std::env::var(PASSWORD_ENV).map_err(|_| ConfigError::MissingEnv(PASSWORD_ENV))?;
        Ok(Self::new(username, password))
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
