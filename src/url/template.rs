use crate::UrlError;
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use url::Url;

/// Placeholder substituted with the formatted date
pub const DATE_PLACEHOLDER: &str = "{date}";

/// A date-keyed URL template such as
/// `https://paraulogicavui.com/{date}-solucions-del-paraulogic-davui/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    template: String,
    date_format: String,
}

impl UrlTemplate {
    /// Creates a template, checking the placeholder, the date format and that a
    /// rendered URL parses as http(s)
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use paraulogic_crawler::url::UrlTemplate;
    ///
    /// let template = UrlTemplate::new("https://example.com/{date}/", "%d-%m-%Y").unwrap();
    /// let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
    /// assert_eq!(template.render(date).unwrap().as_str(), "https://example.com/07-03-2024/");
    /// ```
    pub fn new(template: &str, date_format: &str) -> Result<Self, UrlError> {
        if !template.contains(DATE_PLACEHOLDER) {
            return Err(UrlError::MissingPlaceholder(template.to_string()));
        }

        if StrftimeItems::new(date_format).any(|item| matches!(item, Item::Error)) {
            return Err(UrlError::Parse(format!(
                "invalid date format '{}'",
                date_format
            )));
        }

        let template = Self {
            template: template.to_string(),
            date_format: date_format.to_string(),
        };

        // Probe with a fixed date so malformed templates fail up front
        let probe = NaiveDate::from_ymd_opt(2000, 1, 1)
            .ok_or_else(|| UrlError::Parse("invalid probe date".to_string()))?;
        template.render(probe)?;

        Ok(template)
    }

    /// Renders the URL for `date`
    pub fn render(&self, date: NaiveDate) -> Result<Url, UrlError> {
        let formatted = date
            .format_with_items(StrftimeItems::new(&self.date_format))
            .to_string();
        let raw = self.template.replace(DATE_PLACEHOLDER, &formatted);

        let url = Url::parse(&raw).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(UrlError::InvalidScheme(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_DATE_FORMAT, DEFAULT_URL_TEMPLATE};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_render_default_template() {
        let template = UrlTemplate::new(DEFAULT_URL_TEMPLATE, DEFAULT_DATE_FORMAT).unwrap();
        let url = template.render(date(2023, 11, 5)).unwrap();
        assert_eq!(
            url.as_str(),
            "https://paraulogicavui.com/05-11-2023-solucions-del-paraulogic-davui/"
        );
    }

    #[test]
    fn test_render_iso_format() {
        let template = UrlTemplate::new("http://127.0.0.1:8080/{date}", "%Y-%m-%d").unwrap();
        let url = template.render(date(2024, 2, 29)).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/2024-02-29");
    }

    #[test]
    fn test_missing_placeholder() {
        let result = UrlTemplate::new("https://example.com/page", "%d-%m-%Y");
        assert!(matches!(result, Err(UrlError::MissingPlaceholder(_))));
    }

    #[test]
    fn test_invalid_scheme() {
        let result = UrlTemplate::new("mailto:{date}@example.com", "%d-%m-%Y");
        assert!(matches!(result, Err(UrlError::InvalidScheme(_))));
    }

    #[test]
    fn test_unparseable_template() {
        let result = UrlTemplate::new("not a url {date}", "%d-%m-%Y");
        assert!(matches!(result, Err(UrlError::Parse(_))));
    }

    #[test]
    fn test_invalid_date_format() {
        let result = UrlTemplate::new("https://example.com/{date}", "%Q");
        assert!(matches!(result, Err(UrlError::Parse(_))));
    }
}
