/// Errors for date/time conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeError {
    /// Value exceeds the representable range.
    OutOfRange,
}

/// Duration with nanosecond precision (TIME and LTIME).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration {
    nanos: i64,
}

impl Duration {
    pub const ZERO: Self = Self { nanos: 0 };

    #[must_use]
    pub const fn from_nanos(nanos: i64) -> Self {
        Self { nanos }
    }

    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self {
            nanos: millis * 1_000_000,
        }
    }

    #[must_use]
    pub const fn from_secs(secs: i64) -> Self {
        Self {
            nanos: secs * 1_000_000_000,
        }
    }

    #[must_use]
    pub fn as_nanos(self) -> i64 {
        self.nanos
    }
}

/// DATE value stored as nanoseconds since 1970-01-01 at midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DateValue {
    nanos: i64,
}

impl DateValue {
    #[must_use]
    pub fn new(nanos: i64) -> Self {
        Self { nanos }
    }

    #[must_use]
    pub fn nanos(self) -> i64 {
        self.nanos
    }
}

/// TIME_OF_DAY value stored as nanoseconds since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeOfDayValue {
    nanos: i64,
}

impl TimeOfDayValue {
    #[must_use]
    pub fn new(nanos: i64) -> Self {
        Self { nanos }
    }

    #[must_use]
    pub fn nanos(self) -> i64 {
        self.nanos
    }
}

/// DATE_AND_TIME value stored as nanoseconds since 1970-01-01.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DateTimeValue {
    nanos: i64,
}

impl DateTimeValue {
    #[must_use]
    pub fn new(nanos: i64) -> Self {
        Self { nanos }
    }

    #[must_use]
    pub fn nanos(self) -> i64 {
        self.nanos
    }

    /// Adds a duration, failing when the result leaves the i64 range.
    pub fn checked_add(self, duration: Duration) -> Result<Self, DateTimeError> {
        self.nanos
            .checked_add(duration.as_nanos())
            .map(Self::new)
            .ok_or(DateTimeError::OutOfRange)
    }
}

/// Long DATE stored as nanoseconds since epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LDateValue {
    nanos: i64,
}

impl LDateValue {
    #[must_use]
    pub fn new(nanos: i64) -> Self {
        Self { nanos }
    }

    #[must_use]
    pub fn nanos(self) -> i64 {
        self.nanos
    }
}

/// Long TIME_OF_DAY stored as nanoseconds since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LTimeOfDayValue {
    nanos: i64,
}

impl LTimeOfDayValue {
    #[must_use]
    pub fn new(nanos: i64) -> Self {
        Self { nanos }
    }

    #[must_use]
    pub fn nanos(self) -> i64 {
        self.nanos
    }
}

/// Long DATE_AND_TIME stored as nanoseconds since epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LDateTimeValue {
    nanos: i64,
}

impl LDateTimeValue {
    #[must_use]
    pub fn new(nanos: i64) -> Self {
        Self { nanos }
    }

    #[must_use]
    pub fn nanos(self) -> i64 {
        self.nanos
    }
}

