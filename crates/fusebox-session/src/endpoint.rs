//! Navigable targets within the fuseaction dispatch scheme.

use std::fmt;

use url::Url;

/// Fuseaction that ends the backend session.
pub const LOGOUT_FUSEACTION: &str = "Logout";

/// A page or action reachable through `?fuseaction=<key>` on the navigation URL.
///
/// Endpoints are plain values: applications define the ones they need and
/// compare them by their key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Endpoint {
    fuseaction: String,
}

impl Endpoint {
    pub fn new(fuseaction: impl Into<String>) -> Self {
        Self {
            fuseaction: fuseaction.into(),
        }
    }

    /// The session termination endpoint.
    pub fn logout() -> Self {
        Self::new(LOGOUT_FUSEACTION)
    }

    pub fn fuseaction(&self) -> &str {
        &self.fuseaction
    }

    /// `navigation_url` with `fuseaction=<key>` appended to its query.
    pub fn url(&self, navigation_url: &Url) -> Url {
        let mut url = navigation_url.clone();
        url.query_pairs_mut().append_pair("fuseaction", &self.fuseaction);
        url
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fuseaction)
    }
}

impl From<&str> for Endpoint {
    fn from(fuseaction: &str) -> Self {
        Self::new(fuseaction)
    }
}
