//! High-level client: orchestrated requests plus per-call parsing.

use futures::future::BoxFuture;

use crate::config::ClientConfig;
use crate::credentials::Credentials;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::form::Form;
use crate::orchestrator::RequestOrchestrator;
use crate::parser::PageParser;
use crate::session::SessionManager;

/// One authenticated backend session, held for as long as the caller keeps it.
///
/// Construction builds the cookie jar but sends nothing; the first request
/// logs in. Call [`Client::close`] when done, or use [`Client::scoped`].
/// Dropping an unclosed client still releases its transport, but cannot send
/// the logout request.
pub struct Client {
    orchestrator: RequestOrchestrator,
    closed: bool,
}

impl Client {
    pub fn new(config: ClientConfig, credentials: Credentials) -> Result<Self> {
        let session = SessionManager::new(config, credentials)?;
        Ok(Self {
            orchestrator: RequestOrchestrator::new(session),
            closed: false,
        })
    }

    /// Run `f` with a fresh client and close it afterwards, whatever `f` returned.
    ///
    /// ```no_run
    /// use futures::FutureExt;
    /// use fusebox_session::{Client, ClientConfig, Credentials, Endpoint, RawHtml};
    ///
    /// # async fn demo() -> fusebox_session::Result<()> {
    /// let credentials = Credentials::new("jdoe", "pw");
    /// let html = Client::scoped(ClientConfig::default(), credentials, |client| {
    ///     async move { client.get(&Endpoint::new("student.main"), &RawHtml).await }
    ///         .boxed()
    /// })
    /// .await?;
    /// println!("{html}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn scoped<T, F>(config: ClientConfig, credentials: Credentials, f: F) -> Result<T>
    where
        F: for<'c> FnOnce(&'c mut Client) -> BoxFuture<'c, Result<T>>,
    {
        let mut client = Client::new(config, credentials)?;
        let result = f(&mut client).await;
        client.close().await;
        result
    }

    pub fn is_authenticated(&self) -> bool {
        self.orchestrator.session().is_authenticated()
    }

    pub fn config(&self) -> &ClientConfig {
        self.orchestrator.session().config()
    }

    /// Log in now instead of on the first request.
    ///
    /// Useful to validate credentials: a rejection comes back as an error for
    /// which [`Error::is_invalid_credentials`](crate::Error::is_invalid_credentials) holds.
    pub async fn login(&mut self) -> Result<()> {
        self.orchestrator.session_mut().authenticate().await?;
        Ok(())
    }

    pub async fn get<P: PageParser>(
        &mut self,
        endpoint: &Endpoint,
        parser: &P,
    ) -> Result<P::Output> {
        let document = self.orchestrator.get(endpoint).await?;
        Ok(parser.parse(&document)?)
    }

    pub async fn post<P: PageParser>(
        &mut self,
        endpoint: &Endpoint,
        payload: &Form,
        parser: &P,
    ) -> Result<P::Output> {
        let document = self.orchestrator.post(endpoint, payload).await?;
        Ok(parser.parse(&document)?)
    }

    /// Two-phase AJAX call; see [`RequestOrchestrator::ajax_post`].
    ///
    /// `payload` is not modified: the token goes into a copy.
    pub async fn ajax_post<P: PageParser>(
        &mut self,
        initial: &Endpoint,
        token_name: &str,
        target_url: &str,
        method_name: &str,
        payload: &Form,
        parser: &P,
    ) -> Result<P::Output> {
        let document = self
            .orchestrator
            .ajax_post(initial, token_name, target_url, method_name, payload)
            .await?;
        Ok(parser.parse(&document)?)
    }

    /// Log out (best effort) and release the transport and its cookies.
    ///
    /// Never fails.
    pub async fn close(mut self) {
        self.orchestrator.session().logout().await;
        self.closed = true;
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        if !self.closed {
            tracing::debug!("Client dropped without close, backend session left to expire");
        }
    }
}
