//! Utilities to deal with date-time types.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Provides the current device time.
///
/// Telemetry reads the clock through this trait so that tests can pin the date.
pub trait DateProvider: Send + Sync {
    /// Returns the current date.
    fn now(&self) -> DateTime<Utc>;
}

/// A [`DateProvider`] backed by the system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemDateProvider;

impl DateProvider for SystemDateProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A [`DateProvider`] returning a fixed date that only moves when advanced explicitly.
#[derive(Debug)]
pub struct RelativeDateProvider {
    date: Mutex<DateTime<Utc>>,
}

impl RelativeDateProvider {
    /// Creates a provider starting at the given date.
    pub fn new(date: DateTime<Utc>) -> Self {
        Self {
            date: Mutex::new(date),
        }
    }

    /// Creates a provider pinned to the start of the UNIX epoch.
    pub fn epoch() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Moves the current date forward by `delta`.
    pub fn advance(&self, delta: TimeDelta) {
        let mut date = self.date.lock();
        *date = date.checked_add_signed(delta).unwrap_or(*date);
    }
}

impl DateProvider for RelativeDateProvider {
    fn now(&self) -> DateTime<Utc> {
        *self.date.lock()
    }
}

/// A unix timestamp in milliseconds elapsed since 1970-01-01 00:00 UTC.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct UnixMillis(i64);

impl UnixMillis {
    /// Creates a timestamp from the given number of milliseconds.
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Creates a timestamp from a date.
    pub fn from_datetime(date: DateTime<Utc>) -> Self {
        Self(date.timestamp_millis())
    }

    /// Creates a timestamp from a device date corrected by the offset to server time.
    ///
    /// If applying the offset overflows the representable date range, the uncorrected date is
    /// used.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::{DateTime, TimeDelta, Utc};
    /// use telemetry_common::UnixMillis;
    ///
    /// let ts = UnixMillis::with_offset(DateTime::<Utc>::UNIX_EPOCH, TimeDelta::seconds(2));
    /// assert_eq!(ts.as_millis(), 2000);
    /// ```
    pub fn with_offset(date: DateTime<Utc>, offset: TimeDelta) -> Self {
        Self::from_datetime(date.checked_add_signed(offset).unwrap_or(date))
    }

    /// Returns the number of milliseconds since the UNIX epoch start.
    pub fn as_millis(self) -> i64 {
        self.0
    }
}

impl fmt::Debug for UnixMillis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnixMillis({})", self.as_millis())
    }
}

impl fmt::Display for UnixMillis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_millis().fmt(f)
    }
}

impl Serialize for UnixMillis {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.as_millis())
    }
}

impl<'de> Deserialize<'de> for UnixMillis {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let millis = i64::deserialize(deserializer)?;
        Ok(Self::from_millis(millis))
    }
}
