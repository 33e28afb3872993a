//! Helpers for the `fusebox` command-line probe.

use fusebox_session::{Document, Form, FormInputs, PageParser, ParsingError, RawHtml};

/// Parse a `key=value` payload field.
///
/// Splits on the first `=` and trims both sides, so values may contain `=`.
pub fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Collect parsed fields into a form. Later duplicates win.
pub fn build_form(fields: Vec<(String, String)>) -> Form {
    fields.into_iter().collect()
}

/// What the probe prints for a fetched page.
#[derive(Debug, Clone, Copy)]
pub enum PageOutput {
    /// The page's HTML.
    Html,
    /// The page's named inputs as pretty JSON.
    Inputs,
}

impl PageParser for PageOutput {
    type Output = String;

    fn parse(&self, document: &Document) -> Result<String, ParsingError> {
        match self {
            PageOutput::Html => RawHtml.parse(document),
            PageOutput::Inputs => {
                let inputs = FormInputs.parse(document)?;
                serde_json::to_string_pretty(&inputs).map_err(|e| ParsingError::new(e.to_string()))
            }
        }
    }
}
