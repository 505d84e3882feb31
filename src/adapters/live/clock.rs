//! Live clock using the local system calendar.

use chrono::{Local, NaiveDate};

use crate::ports::clock::Clock;

/// Live clock that returns the operator's current local date.
pub struct LiveClock;

impl Clock for LiveClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
