//! Parser capabilities: turn a fetched [`Document`] into typed data.
//!
//! The client never looks inside a parser. Applications implement
//! [`PageParser`] for each page they care about and pass it per call.

use std::collections::BTreeMap;

use crate::document::Document;
use crate::error::ParsingError;

pub trait PageParser {
    type Output;

    fn parse(&self, document: &Document) -> Result<Self::Output, ParsingError>;
}

/// The page's HTML, unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawHtml;

impl PageParser for RawHtml {
    type Output = String;

    fn parse(&self, document: &Document) -> Result<String, ParsingError> {
        Ok(document.to_html())
    }
}

/// Every named `<input>` and its value. Later duplicates win.
///
/// Handy for finding which hidden field carries a page's token.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormInputs;

impl PageParser for FormInputs {
    type Output = BTreeMap<String, String>;

    fn parse(&self, document: &Document) -> Result<Self::Output, ParsingError> {
        let inputs: BTreeMap<String, String> = document
            .inputs()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        if inputs.is_empty() {
            return Err(ParsingError::new("page has no named input fields"));
        }
        Ok(inputs)
    }
}
