//! Solutions extractor
//!
//! Each solutions page lists the day's words inside a single content region,
//! one per line, prefixed with an index marker. Two marker styles are in use:
//!
//! - `12. paraula`
//! - `1️⃣2️⃣ paraula` (keycap digit emoji)
//!
//! A word may be followed by an accepted variant written as `paraula o variant`;
//! only the primary word is kept.

use crate::ExtractError;
use regex::Regex;
use scraper::{Html, Selector};

/// Token pattern applied to the rendered text of the content region
///
/// The second marker alternative covers keycap digits: a digit followed by
/// VARIATION SELECTOR-16 (U+FE0F) and COMBINING ENCLOSING KEYCAP (U+20E3).
pub const TOKEN_PATTERN: &str =
    r"(?:\d+\.|[0-9\x{FE0F}\x{20E3}]+)\s+(?P<word>\S+)(?: o \S+)?";

/// Finds the content region of a page and pulls the listed words out of it
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    content_selector: Selector,
    pattern: Regex,
}

impl ContentExtractor {
    /// Creates an extractor for the region matched by `content_selector`
    ///
    /// # Example
    ///
    /// ```
    /// use paraulogic_crawler::crawler::ContentExtractor;
    ///
    /// let extractor = ContentExtractor::new("div.entry-content").unwrap();
    /// let html = r#"<div class="entry-content"><p>1. casa</p><p>2. cosa o coses</p></div>"#;
    /// assert_eq!(extractor.extract(html), Some(vec!["casa".to_string(), "cosa".to_string()]));
    /// ```
    pub fn new(content_selector: &str) -> Result<Self, ExtractError> {
        let content_selector = Selector::parse(content_selector)
            .map_err(|e| ExtractError::InvalidSelector(format!("{}: {:?}", content_selector, e)))?;
        let pattern = Regex::new(TOKEN_PATTERN)?;

        Ok(Self {
            content_selector,
            pattern,
        })
    }

    /// Extracts the primary words, in document order
    ///
    /// # Returns
    ///
    /// * `Some(words)` - The content region was found; `words` may be empty
    /// * `None` - The page has no content region
    pub fn extract(&self, html: &str) -> Option<Vec<String>> {
        let text = self.content_text(html)?;
        Some(self.extract_from_text(&text))
    }

    /// Renders the first content region as text, one text node per line
    pub fn content_text(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let region = document.select(&self.content_selector).next()?;
        Some(region.text().collect::<Vec<_>>().join("\n"))
    }

    /// Applies the token pattern to already rendered text
    pub fn extract_from_text(&self, text: &str) -> Vec<String> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| caps.name("word"))
            .map(|word| word.as_str().to_string())
            .collect()
    }
}
