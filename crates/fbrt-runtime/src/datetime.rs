//! Shared calendar helpers for date/time literals.

pub(crate) const NANOS_PER_SEC: i64 = 1_000_000_000;
pub(crate) const NANOS_PER_DAY: i64 = 86_400 * NANOS_PER_SEC;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DateTimeCalcError {
    InvalidDate,
    Overflow,
}

/// Years accepted by the calendar helpers; far beyond what nanosecond
/// storage can represent.
const YEAR_LIMIT: i64 = 1_000_000;

fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i64, month: i64) -> Option<i64> {
    Some(match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => return None,
    })
}

pub(crate) fn days_from_civil(year: i64, month: i64, day: i64) -> Result<i64, DateTimeCalcError> {
    let last = days_in_month(year, month).ok_or(DateTimeCalcError::InvalidDate)?;
    if !(1..=last).contains(&day) {
        return Err(DateTimeCalcError::InvalidDate);
    }
    if !(-YEAR_LIMIT..=YEAR_LIMIT).contains(&year) {
        return Err(DateTimeCalcError::Overflow);
    }
    let y = year - i64::from(month <= 2);
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let m = month + if month > 2 { -3 } else { 9 };
    let doy = (153 * m + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    Ok(era * 146_097 + doe - 719_468)
}

pub(crate) fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = mp + if mp < 10 { 3 } else { -9 };
    (y + i64::from(m <= 2), m, d)
}

pub(crate) fn date_to_nanos(year: i64, month: i64, day: i64) -> Result<i64, DateTimeCalcError> {
    days_from_civil(year, month, day)?
        .checked_mul(NANOS_PER_DAY)
        .ok_or(DateTimeCalcError::Overflow)
}

/// Nanoseconds since epoch of a civil date plus `tod` nanoseconds of day.
/// The sum is checked as a whole, so instants whose midnight lies before the
/// representable range still resolve.
pub(crate) fn date_time_to_nanos(
    year: i64,
    month: i64,
    day: i64,
    tod: i64,
) -> Result<i64, DateTimeCalcError> {
    let days = days_from_civil(year, month, day)?;
    let nanos = i128::from(days) * i128::from(NANOS_PER_DAY) + i128::from(tod);
    i64::try_from(nanos).map_err(|_| DateTimeCalcError::Overflow)
}

/// Splits nanoseconds since midnight into hours, minutes, seconds and the
/// sub-second remainder.
pub(crate) fn split_time_of_day(nanos: i64) -> (i64, i64, i64, i64) {
    let secs = nanos.div_euclid(NANOS_PER_SEC);
    let frac = nanos.rem_euclid(NANOS_PER_SEC);
    (secs / 3_600, (secs / 60) % 60, secs % 60, frac)
}

/// Splits nanoseconds since epoch into a civil date and nanoseconds of day.
pub(crate) fn split_date_time(nanos: i64) -> ((i64, i64, i64), i64) {
    let days = nanos.div_euclid(NANOS_PER_DAY);
    (civil_from_days(days), nanos.rem_euclid(NANOS_PER_DAY))
}
