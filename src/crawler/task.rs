use crate::dates::DateRange;
use crate::url::UrlTemplate;
use crate::UrlError;
use chrono::NaiveDate;
use url::Url;

/// One unit of work: fetch and extract the page published for `date`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    /// Day the solutions page belongs to
    pub date: NaiveDate,

    /// Page address derived from the date
    pub url: Url,
}

impl CrawlTask {
    pub fn new(date: NaiveDate, template: &UrlTemplate) -> Result<Self, UrlError> {
        Ok(Self {
            date,
            url: template.render(date)?,
        })
    }
}

/// Expands a date range into one task per day, in date order
pub fn build_tasks(range: DateRange, template: &UrlTemplate) -> Result<Vec<CrawlTask>, UrlError> {
    range.map(|date| CrawlTask::new(date, template)).collect()
}
