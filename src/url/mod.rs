//! URL handling module
//!
//! Archive pages are addressed by date: each crawl task's URL is produced by
//! rendering the task's date into a fixed template.

mod template;

pub use template::{UrlTemplate, DATE_PLACEHOLDER};
