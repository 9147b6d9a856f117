use chrono::NaiveDate;

use crate::limits::MAX_OCCUPANCY_SCAN_DAYS;
use crate::model::DateRange;

use super::ResolverError;

/// Source of "today" at day granularity.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub(crate) fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<DateRange, ResolverError> {
    DateRange::checked(start, end).ok_or_else(|| {
        ResolverError::InvalidArgument(format!("end date {end} is before start date {start}"))
    })
}

/// A stay must start strictly after today.
pub(crate) fn validate_stay(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<DateRange, ResolverError> {
    if start <= today {
        return Err(ResolverError::InvalidArgument(format!(
            "start date {start} must be after today ({today})"
        )));
    }
    validate_range(start, end)
}

pub(crate) fn validate_scan(start: NaiveDate, end: NaiveDate) -> Result<DateRange, ResolverError> {
    let range = validate_range(start, end)?;
    if range.num_days() > MAX_OCCUPANCY_SCAN_DAYS {
        return Err(ResolverError::InvalidArgument(format!(
            "scan window of {} days exceeds {MAX_OCCUPANCY_SCAN_DAYS}",
            range.num_days()
        )));
    }
    Ok(range)
}
