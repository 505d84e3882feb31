//! Clock port for obtaining the current business date.

use chrono::NaiveDate;

/// Provides the calendar date a run is executed on.
///
/// Task creation dates and "future row" filtering are day-granular, so
/// the port hands out dates rather than instants. Tests pin it to a fixed
/// day.
pub trait Clock: Send + Sync {
    /// Returns today's date in the operator's local calendar.
    fn today(&self) -> NaiveDate;
}
