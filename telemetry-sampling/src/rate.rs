use std::fmt;
use std::num::ParseFloatError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a [`SampleRate`] cannot be created.
#[derive(Debug, Error, PartialEq)]
pub enum ParseSampleRateError {
    /// The value is not a number.
    #[error("sample rate is not a finite number")]
    NotFinite,
    /// The value lies outside of `[0, 100]`.
    #[error("sample rate {0} is out of range, must be between 0 and 100")]
    OutOfRange(f64),
    /// The string could not be parsed as a floating point number.
    #[error("invalid sample rate")]
    InvalidFloat(#[from] ParseFloatError),
}

/// Percentage of inputs kept by a sampler.
///
/// A value between `0.0` and `100.0`, where `0.0` means no input is kept and `100.0` means all
/// inputs are kept.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct SampleRate(f64);

impl SampleRate {
    /// Keeps no input.
    pub const NONE: Self = Self(0.0);

    /// Keeps every input.
    pub const ALL: Self = Self(100.0);

    /// Creates a sample rate from a percentage.
    ///
    /// Returns an error if the value is not finite or outside of `[0, 100]`.
    pub fn new(percentage: f64) -> Result<Self, ParseSampleRateError> {
        if !percentage.is_finite() {
            return Err(ParseSampleRateError::NotFinite);
        }

        if !(0.0..=100.0).contains(&percentage) {
            return Err(ParseSampleRateError::OutOfRange(percentage));
        }

        Ok(Self(percentage))
    }

    /// Creates a sample rate in a constant context.
    ///
    /// # Panics
    ///
    /// Panics if the value is not within `[0, 100]`. In a `const` item this fails the build.
    #[allow(clippy::manual_range_contains)] // `contains` is not const
    pub const fn from_const(percentage: f64) -> Self {
        assert!(
            percentage >= 0.0 && percentage <= 100.0,
            "sample rate out of range"
        );
        Self(percentage)
    }

    /// Returns the rate as a percentage in `[0, 100]`.
    pub fn percentage(self) -> f64 {
        self.0
    }

    /// Returns the rate as a proportion in `[0, 1]`.
    pub fn proportion(self) -> f64 {
        self.0 / 100.0
    }
}

impl TryFrom<f64> for SampleRate {
    type Error = ParseSampleRateError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SampleRate> for f64 {
    fn from(rate: SampleRate) -> Self {
        rate.percentage()
    }
}

impl FromStr for SampleRate {
    type Err = ParseSampleRateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim().parse()?)
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_const() {
        const QUARTER: SampleRate = SampleRate::from_const(25.0);
        assert_eq!(QUARTER, SampleRate::new(25.0).unwrap());
        assert_eq!(QUARTER.proportion(), 0.25);
    }

    #[test]
    #[should_panic(expected = "sample rate out of range")]
    fn test_from_const_out_of_range() {
        let _ = SampleRate::from_const(f64::NAN);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert_eq!(SampleRate::new(0.0), Ok(SampleRate::NONE));
        assert_eq!(SampleRate::new(100.0), Ok(SampleRate::ALL));
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            SampleRate::new(100.5),
            Err(ParseSampleRateError::OutOfRange(100.5))
        );
        assert_eq!(
            SampleRate::new(-1.0),
            Err(ParseSampleRateError::OutOfRange(-1.0))
        );
    }

    #[test]
    fn test_not_finite() {
        assert_eq!(
            SampleRate::new(f64::NAN),
            Err(ParseSampleRateError::NotFinite)
        );
        assert_eq!(
            SampleRate::new(f64::INFINITY),
            Err(ParseSampleRateError::NotFinite)
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!(" 12.5 ".parse::<SampleRate>().unwrap().percentage(), 12.5);
        assert!(matches!(
            "twenty".parse::<SampleRate>(),
            Err(ParseSampleRateError::InvalidFloat(_))
        ));
    }

    #[test]
    fn test_proportion() {
        assert_eq!(SampleRate::new(20.0).unwrap().proportion(), 0.2);
    }

    #[test]
    fn test_deserialize_validates() {
        let rate: SampleRate = serde_json::from_str("50").unwrap();
        assert_eq!(rate.percentage(), 50.0);

        let error = serde_json::from_str::<SampleRate>("150").unwrap_err();
        assert!(error.to_string().contains("out of range"), "{error}");
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&SampleRate::new(20.0).unwrap()).unwrap();
        assert_eq!(json, "20.0");
    }
}
