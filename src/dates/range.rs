use crate::config::validate_date_range;
use crate::ConfigError;
use chrono::NaiveDate;

/// Lazy sequence of consecutive days between two bounds
///
/// Both endpoints are included unless [`DateRange::include_end`] is turned off.
/// The iterator is consumed as it advances; clone it before iterating to walk
/// the same range twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
    include_end: bool,
    next: Option<NaiveDate>,
}

impl DateRange {
    /// Creates an inclusive range
    ///
    /// # Returns
    ///
    /// * `Ok(DateRange)` - `start <= end`
    /// * `Err(ConfigError::InvalidDateRange)` - `start` is after `end`
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use paraulogic_crawler::DateRange;
    ///
    /// let start = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    /// let days: Vec<_> = DateRange::new(start, end).unwrap().collect();
    /// assert_eq!(days.len(), 3);
    /// ```
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ConfigError> {
        validate_date_range(start, end)?;
        Ok(Self {
            start,
            end,
            include_end: true,
            next: Some(start),
        })
    }

    /// Whether the final date is yielded
    pub fn include_end(mut self, include_end: bool) -> Self {
        self.include_end = include_end;
        self
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the full range, independent of iteration progress
    pub fn num_days(&self) -> usize {
        let days = (self.end - self.start).num_days() as usize + 1;
        if self.include_end {
            days
        } else {
            days - 1
        }
    }

    fn contains(&self, date: NaiveDate) -> bool {
        if self.include_end {
            date <= self.end
        } else {
            date < self.end
        }
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|date| self.contains(*date))?;
        self.next = current.succ_opt();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next {
            Some(next) if self.contains(next) => {
                let last = if self.include_end {
                    self.end
                } else {
                    self.end.pred_opt().unwrap_or(self.end)
                };
                (last - next).num_days() as usize + 1
            }
            _ => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DateRange {}
