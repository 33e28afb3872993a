//! Cookie-bearing HTTP transport wrapping reqwest.
//!
//! One transport lives for one client: its cookie jar carries the backend
//! session between requests. Every request gets the configured user agent and
//! timeout, plus the transport's current header set, which
//! [`Transport::override_headers`] can swap out for the duration of a guard.

use std::ops::{Deref, DerefMut};

use reqwest::header::HeaderMap;
use serde::Serialize;
use url::Url;

use crate::config::ClientConfig;
use crate::error::ConfigError;

/// A completed 2xx response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Final URL after redirects.
    pub final_url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

pub struct Transport {
    client: reqwest::Client,
    headers: HeaderMap,
}

impl Transport {
    /// Build a transport with a fresh cookie jar.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(ConfigError::Transport)?;

        Ok(Self {
            client,
            headers: HeaderMap::new(),
        })
    }

    /// Headers currently attached to every request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// GET `url`. Non-2xx statuses are errors.
    pub async fn get(&self, url: &Url) -> Result<HttpResponse, reqwest::Error> {
        let request = self.client.get(url.clone()).headers(self.headers.clone());
        Self::send(request).await
    }

    /// POST `form` url-encoded to `url`. Non-2xx statuses are errors.
    pub async fn post_form<F>(&self, url: &Url, form: &F) -> Result<HttpResponse, reqwest::Error>
    where
        F: Serialize + ?Sized,
    {
        let request = self
            .client
            .post(url.clone())
            .headers(self.headers.clone())
            .form(form);
        Self::send(request).await
    }

    async fn send(request: reqwest::RequestBuilder) -> Result<HttpResponse, reqwest::Error> {
        let r = request.send().await?.error_for_status()?;
        let status = r.status().as_u16();
        let final_url = r.url().to_string();
        let body = r.text().await?;

        Ok(HttpResponse {
            final_url,
            status,
            body,
        })
    }

    /// Layer `extra` over the current headers until the returned guard drops.
    ///
    /// The previous header set is restored on every exit path, including
    /// early returns, panics, and a dropped (cancelled) future. The guard
    /// holds the only mutable borrow, so no other request can run on this
    /// transport while the override is active.
    pub fn override_headers(&mut self, extra: HeaderMap) -> HeaderOverride<'_> {
        let saved = self.headers.clone();
        for (name, value) in extra.iter() {
            self.headers.insert(name.clone(), value.clone());
        }
        HeaderOverride {
            transport: self,
            saved: Some(saved),
        }
    }
}

/// Restores a transport's headers on drop. See [`Transport::override_headers`].
pub struct HeaderOverride<'a> {
    transport: &'a mut Transport,
    saved: Option<HeaderMap>,
}

impl Deref for HeaderOverride<'_> {
    type Target = Transport;

    fn deref(&self) -> &Transport {
        self.transport
    }
}

impl DerefMut for HeaderOverride<'_> {
    fn deref_mut(&mut self) -> &mut Transport {
        self.transport
    }
}

impl Drop for HeaderOverride<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.transport.headers = saved;
        }
    }
}
