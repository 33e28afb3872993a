//! Fetched pages.

use scraper::Html;

use crate::fingerprint;

/// A parsed response body.
///
/// Produced once per request and handed to a single parser; nothing keeps or
/// shares it afterwards.
#[derive(Debug)]
pub struct Document {
    url: String,
    html: Html,
}

impl Document {
    /// Parse a response body fetched from `url`.
    pub fn parse(url: impl Into<String>, body: &str) -> Self {
        Self {
            url: url.into(),
            html: Html::parse_document(body),
        }
    }

    /// Final URL of the response, after redirects.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Serialized HTML of the whole document.
    pub fn to_html(&self) -> String {
        self.html.html()
    }

    /// Whether this is the backend's login page or its failed-login page.
    pub fn is_login_page(&self) -> bool {
        fingerprint::is_login_page(&self.html)
    }

    /// The `value` of the first `<input name=...>`, if that input exists and
    /// its value is non-empty.
    pub fn input_value(&self, name: &str) -> Option<&str> {
        fingerprint::find_input(&self.html, name)
            .and_then(|input| input.value().attr("value"))
            .filter(|value| !value.is_empty())
    }

    /// Every named input as `(name, value)`, in document order.
    pub fn inputs(&self) -> impl Iterator<Item = (&str, &str)> {
        fingerprint::named_inputs(&self.html)
    }
}
