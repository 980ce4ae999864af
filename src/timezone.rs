//! Resolving the configured timezone and formatting instants for display.

use std::fmt::Debug;

use time::{OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem, macros::format_description};
use time_tz::{Offset, TimeZone, Tz};

use crate::Error;

/// e.g. "Oct 5, 2025"
const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none], [year]");

/// e.g. "03:07 PM"
const DISPLAY_TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[hour repr:12]:[minute] [period]");

/// A canonical IANA timezone, e.g. "Pacific/Auckland", resolved once at start up.
#[derive(Clone, Copy)]
pub struct LocalTimezone {
    name: &'static str,
    tz: &'static Tz,
}

impl LocalTimezone {
    /// Look up a timezone by its canonical name.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if `canonical_timezone` is not a known timezone.
    pub fn from_name(canonical_timezone: &str) -> Result<Self, Error> {
        time_tz::timezones::get_by_name(canonical_timezone)
            .map(|tz| Self {
                name: tz.name(),
                tz,
            })
            .ok_or_else(|| Error::InvalidTimezoneError(canonical_timezone.to_owned()))
    }

    /// The canonical name of the timezone.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The UTC offset the timezone had at `instant`.
    pub fn offset_at(&self, instant: OffsetDateTime) -> UtcOffset {
        self.tz.get_offset_utc(&instant).to_utc()
    }

    /// Convert `instant` to local time.
    pub fn to_local(&self, instant: OffsetDateTime) -> OffsetDateTime {
        instant.to_offset(self.offset_at(instant))
    }

    /// Format the local calendar date of `instant` for display.
    pub fn display_date(&self, instant: OffsetDateTime) -> String {
        format_local(self.to_local(instant), DISPLAY_DATE_FORMAT)
    }

    /// Format the local wall clock time of `instant` for display.
    pub fn display_time(&self, instant: OffsetDateTime) -> String {
        format_local(self.to_local(instant), DISPLAY_TIME_FORMAT)
    }
}

impl Debug for LocalTimezone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("LocalTimezone").field(&self.name).finish()
    }
}

impl PartialEq for LocalTimezone {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

fn format_local(local: OffsetDateTime, format: &[BorrowedFormatItem<'_>]) -> String {
    // Formatting only fails for components an OffsetDateTime always has.
    local.format(format).unwrap_or_else(|error| {
        tracing::error!("could not format {local}: {error}");
        local.to_string()
    })
}
