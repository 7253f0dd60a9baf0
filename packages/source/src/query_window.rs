//! Date-window filters for upstream feed queries.
//!
//! A [`QueryWindow`] produces a SoQL-style predicate such as
//! `date>="2024-01-07" AND date<"2024-01-15"`. Windows are computed from a
//! caller-supplied "now" so they are deterministic under test.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Which records a site's query should request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryWindow {
    /// The `days` calendar days before today: `[today - days, today)`.
    Lookback {
        /// Date column to filter on.
        field: String,
        /// Number of days to look back. Must be at least 1.
        days: u32,
    },
    /// A fixed historical date range that ignores the current time.
    Fixed {
        /// Date column to filter on.
        field: String,
        /// First date of the range (inclusive).
        start: NaiveDate,
        /// Last date of the range (exclusive unless `inclusive_end`).
        end: NaiveDate,
        /// Emit `<=` instead of `<` for the upper bound.
        #[serde(default)]
        inclusive_end: bool,
    },
}

impl QueryWindow {
    /// Returns the date column the window filters on.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Lookback { field, .. } | Self::Fixed { field, .. } => field,
        }
    }

    /// Returns `true` for windows that do not move with the current time.
    #[must_use]
    pub const fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed { .. })
    }

    /// Returns the `(start, end)` calendar dates of the window at `now`.
    ///
    /// Dates are UTC calendar dates of `now`.
    #[must_use]
    pub fn bounds(&self, now: DateTime<Utc>) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Lookback { days, .. } => {
                let end = now.date_naive();
                let start = end
                    .checked_sub_days(Days::new(u64::from(*days)))
                    .unwrap_or(NaiveDate::MIN);
                (start, end)
            }
            Self::Fixed { start, end, .. } => (*start, *end),
        }
    }

    /// Builds the filter predicate for `now`.
    #[must_use]
    pub fn filter(&self, now: DateTime<Utc>) -> String {
        let (start, end) = self.bounds(now);
        let upper = match self {
            Self::Fixed {
                inclusive_end: true,
                ..
            } => "<=",
            _ => "<",
        };
        let field = self.field();
        format!(
            "{field}>=\"{}\" AND {field}{upper}\"{}\"",
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        )
    }

    /// Checks that the window is non-empty.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if a lookback is zero days or a
    /// fixed range does not start before it ends.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Lookback { days: 0, field } => {
                Err(format!("lookback window on '{field}' must cover at least one day"))
            }
            Self::Fixed {
                field, start, end, ..
            } if start >= end => Err(format!(
                "fixed window on '{field}' starts ({start}) on or after it ends ({end})"
            )),
            Self::Lookback { .. } | Self::Fixed { .. } => Ok(()),
        }
    }
}
