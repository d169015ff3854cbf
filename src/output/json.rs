//! JSON word list output
//!
//! The file holds a single object whose `words` member is a list of
//! one-element lists:
//!
//! ```json
//! {"words": [["abric"], ["casa"]]}
//! ```
//!
//! The nesting is kept for consumers that read the file as a list of rows.

use crate::output::AggregateResult;
use crate::CrawlError;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
struct WordsDocument<'a> {
    words: Vec<[&'a str; 1]>,
}

impl<'a> WordsDocument<'a> {
    /// Rows are sorted so repeated runs write identical files
    fn from_result(result: &'a AggregateResult) -> Self {
        let mut words: Vec<&str> = result.words.iter().map(String::as_str).collect();
        words.sort_unstable();

        Self {
            words: words.into_iter().map(|w| [w]).collect(),
        }
    }
}

/// Serializes the word set to its JSON document
pub fn to_json(result: &AggregateResult) -> Result<String, CrawlError> {
    Ok(serde_json::to_string(&WordsDocument::from_result(result))?)
}

/// Writes the word set to `path`, replacing any existing file
///
/// # Arguments
///
/// * `result` - The aggregated crawl result
/// * `path` - Destination file
///
/// # Returns
///
/// * `Ok(())` - File written
/// * `Err(CrawlError)` - The file could not be created or written
pub fn write_words(result: &AggregateResult, path: &Path) -> Result<(), CrawlError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer(&mut writer, &WordsDocument::from_result(result))?;
    writer.flush()?;

    tracing::info!("Wrote {} words to {}", result.words.len(), path.display());
    Ok(())
}
