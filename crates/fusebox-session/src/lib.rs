// Copyright 2026 Fusebox Session Contributors
// SPDX-License-Identifier: MIT

//! Fusebox Session — an authenticated client for cookie-session, fuseaction-routed
//! legacy web applications.
//!
//! The backend has no API and no status codes worth trusting: every page is a
//! GET or POST on one dispatch URL keyed by `fuseaction`, and a lapsed session
//! silently turns into the login page. This crate keeps a session alive
//! against it by fingerprinting login pages, re-authenticating once when one
//! appears mid-sequence, and running the scrape-a-token-then-POST AJAX flow.

pub mod client;
pub mod config;
pub mod credentials;
pub mod document;
pub mod endpoint;
pub mod error;
pub mod fingerprint;
pub mod form;
pub mod orchestrator;
pub mod parser;
pub mod session;
pub mod transport;

pub use client::Client;
pub use config::ClientConfig;
pub use credentials::Credentials;
pub use document::Document;
pub use endpoint::Endpoint;
pub use error::{AuthenticationError, ConfigError, Error, NavigationError, ParsingError, Result};
pub use fingerprint::is_login_page;
pub use form::Form;
pub use orchestrator::RequestOrchestrator;
pub use parser::{FormInputs, PageParser, RawHtml};
pub use session::{SessionManager, SessionState};
