//! Request orchestration on top of a [`SessionManager`].
//!
//! Every navigation request runs against an authenticated session. When the
//! backend answers with its login page instead of the requested one, the
//! session is marked logged out, re-authenticated once, and the request is
//! sent once more. A second login page is returned to the caller as
//! [`NavigationError::SessionExpired`], so a logical call never costs more
//! than two navigation requests.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN, REFERER};
use url::Url;

use crate::document::Document;
use crate::endpoint::Endpoint;
use crate::error::{ConfigError, Error, NavigationError, Result};
use crate::form::Form;
use crate::session::SessionManager;
use crate::transport::HttpResponse;

const X_REQUESTED_WITH: &str = "x-requested-with";
const AJAX_ACCEPT: &str = "application/json, text/javascript, */*";
/// Query parameter naming the remote method on an AJAX endpoint.
const METHOD_PARAM: &str = "method";

#[derive(Debug, Clone, Copy)]
enum Navigation<'a> {
    Get,
    Post(&'a Form),
}

pub struct RequestOrchestrator {
    session: SessionManager,
}

impl RequestOrchestrator {
    pub fn new(session: SessionManager) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionManager {
        &mut self.session
    }

    pub fn into_session(self) -> SessionManager {
        self.session
    }

    /// GET a fuseaction page.
    pub async fn get(&mut self, endpoint: &Endpoint) -> Result<Document> {
        self.navigate(endpoint, Navigation::Get).await
    }

    /// POST a form to a fuseaction page.
    pub async fn post(&mut self, endpoint: &Endpoint, payload: &Form) -> Result<Document> {
        self.navigate(endpoint, Navigation::Post(payload)).await
    }

    /// Two-phase AJAX call.
    ///
    /// Fetches `initial` (with the usual expiry retry), scrapes the value of
    /// the input named `token_name`, and POSTs a copy of `payload` carrying
    /// that token to `target_url?method=<method_name>` with XHR headers.
    /// `target_url` may be absolute or relative to the navigation URL.
    ///
    /// The AJAX request itself is not retried. A login page at that point
    /// marks the session logged out and comes back as
    /// [`NavigationError::SessionExpired`], so the next call on this
    /// orchestrator authenticates again before sending anything.
    pub async fn ajax_post(
        &mut self,
        initial: &Endpoint,
        token_name: &str,
        target_url: &str,
        method_name: &str,
        payload: &Form,
    ) -> Result<Document> {
        tracing::debug!(fuseaction = %initial, token_name, "Fetching AJAX host page");
        let token = {
            let page = self.get(initial).await?;
            page.input_value(token_name).map(str::to_string)
        };
        let Some(token) = token else {
            return Err(Error::TokenNotFound {
                token_name: token_name.to_string(),
                fuseaction: initial.fuseaction().to_string(),
            });
        };
        tracing::debug!(token_name, "Found dynamic token");

        let mut form = payload.clone();
        form.insert(token_name, token);

        let url = self.ajax_url(target_url, method_name)?;
        let headers = self.ajax_headers()?;
        let target = url.to_string();
        tracing::debug!(url = %target, "Sending AJAX POST");

        let response = {
            let transport = self.session.transport_mut().override_headers(headers);
            transport.post_form(&url, &form).await
        };
        let response = response.map_err(|source| NavigationError::Transport {
            target: target.clone(),
            source,
        })?;

        Ok(self.inspect(response, target)?)
    }

    async fn ensure_authenticated(&mut self) -> Result<()> {
        if !self.session.is_authenticated() {
            self.session.authenticate().await?;
        }
        Ok(())
    }

    async fn navigate(
        &mut self,
        endpoint: &Endpoint,
        navigation: Navigation<'_>,
    ) -> Result<Document> {
        self.ensure_authenticated().await?;

        // No parsed page stays alive across the re-authentication await.
        match self.perform(endpoint, navigation).await {
            Err(e) if e.is_session_expired() => {}
            result => return Ok(result?),
        }

        tracing::warn!(
            fuseaction = %endpoint,
            "Redirected to login page, re-authenticating"
        );
        self.session.authenticate().await?;
        tracing::info!(fuseaction = %endpoint, "Retrying request");
        Ok(self.perform(endpoint, navigation).await?)
    }

    async fn perform(
        &mut self,
        endpoint: &Endpoint,
        navigation: Navigation<'_>,
    ) -> std::result::Result<Document, NavigationError> {
        let url = endpoint.url(&self.session.config().navigation_url);
        let transport = self.session.transport();
        let response = match navigation {
            Navigation::Get => transport.get(&url).await,
            Navigation::Post(form) => transport.post_form(&url, form).await,
        };
        let response = response.map_err(|source| NavigationError::Transport {
            target: endpoint.fuseaction().to_string(),
            source,
        })?;

        self.inspect(response, endpoint.fuseaction().to_string())
    }

    /// Parse a response, logging the session out if it is the login page.
    fn inspect(
        &mut self,
        response: HttpResponse,
        target: String,
    ) -> std::result::Result<Document, NavigationError> {
        let document = Document::parse(response.final_url, &response.body);
        if document.is_login_page() {
            self.session.invalidate();
            return Err(NavigationError::SessionExpired { target });
        }
        Ok(document)
    }

    fn ajax_url(
        &self,
        target_url: &str,
        method_name: &str,
    ) -> std::result::Result<Url, NavigationError> {
        let mut url = self
            .session
            .config()
            .navigation_url
            .join(target_url)
            .map_err(|source| NavigationError::InvalidUrl {
                url: target_url.to_string(),
                source,
            })?;
        url.query_pairs_mut().append_pair(METHOD_PARAM, method_name);
        Ok(url)
    }

    fn ajax_headers(&self) -> std::result::Result<HeaderMap, ConfigError> {
        let config = self.session.config();
        let mut headers = HeaderMap::new();
        headers.insert(X_REQUESTED_WITH, HeaderValue::from_static("XMLHttpRequest"));
        headers.insert(
            REFERER,
            HeaderValue::from_str(config.navigation_url.as_str())
                .map_err(|_| ConfigError::InvalidHeader { name: "referer" })?,
        );
        headers.insert(
            ORIGIN,
            HeaderValue::from_str(&config.origin)
                .map_err(|_| ConfigError::InvalidHeader { name: "origin" })?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(AJAX_ACCEPT));
        Ok(headers)
    }
}
