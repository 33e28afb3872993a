//! Login-page fingerprint.
//!
//! The backend never signals an invalid session through the status code: it
//! serves its login form (or an "Authentication Failed" page) with a 200. The
//! only reliable signal is the content, so every response is classified by
//! the two rules below.
//!
//! 1. **Login form** — an `<input>` named [`USERNAME_FIELD`] and one named
//!    [`PASSWORD_FIELD`] are both present. Covers the fresh login page and a
//!    timed-out session that was redirected to it.
//! 2. **Failure alert** — a `<p class="page-alert">` whose text contains
//!    [`AUTH_FAILED_TEXT`]. This page has no login inputs.
//!
//! Rules are evaluated in order and short-circuit on the first match.

use std::sync::OnceLock;

use scraper::{ElementRef, Html, Selector};

/// Name of the username input on the backend's login form.
pub const USERNAME_FIELD: &str = "empower_usrn";
/// Name of the password input on the backend's login form.
pub const PASSWORD_FIELD: &str = "empower_pswd";
/// Text carried by the page alert after a rejected login.
pub const AUTH_FAILED_TEXT: &str = "Authentication Failed";

fn input_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("input").expect("input selector is valid"))
}

fn page_alert_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("p.page-alert").expect("alert selector is valid"))
}

/// Classify a document as the login page (or the failed-login page).
pub fn is_login_page(html: &Html) -> bool {
    if find_input(html, USERNAME_FIELD).is_some() && find_input(html, PASSWORD_FIELD).is_some() {
        tracing::debug!("login form inputs present");
        return true;
    }

    let failed = html
        .select(page_alert_selector())
        .any(|alert| alert.text().collect::<String>().contains(AUTH_FAILED_TEXT));
    if failed {
        tracing::debug!("authentication failure alert present");
        return true;
    }

    false
}

/// First `<input>` whose `name` attribute equals `name` exactly.
pub(crate) fn find_input<'a>(html: &'a Html, name: &str) -> Option<ElementRef<'a>> {
    html.select(input_selector())
        .find(|input| input.value().attr("name") == Some(name))
}

/// All named `<input>` elements as `(name, value)`, in document order.
pub(crate) fn named_inputs(html: &Html) -> impl Iterator<Item = (&str, &str)> {
    html.select(input_selector()).filter_map(|input| {
        let element = input.value();
        let name = element.attr("name").filter(|n| !n.is_empty())?;
        Some((name, element.attr("value").unwrap_or("")))
    })
}
