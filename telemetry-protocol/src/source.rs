use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An error returned when parsing an unknown [`Source`].
#[derive(Clone, Copy, Debug, Default, Error)]
#[error("unknown telemetry source")]
pub struct ParseSourceError;

/// The platform that emitted the telemetry.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    /// Android SDK.
    Android,
    /// iOS SDK.
    #[default]
    Ios,
    /// Browser SDK.
    Browser,
    /// Flutter plugin.
    Flutter,
    /// React Native plugin.
    ReactNative,
    /// Unity plugin.
    Unity,
}

impl Source {
    /// Returns the string representation of this source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Android => "android",
            Source::Ios => "ios",
            Source::Browser => "browser",
            Source::Flutter => "flutter",
            Source::ReactNative => "react-native",
            Source::Unity => "unity",
        }
    }

    /// Parses a platform tag, falling back to [`Source::Ios`] for unknown tags.
    pub fn from_tag_lossy(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }
}

impl FromStr for Source {
    type Err = ParseSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "android" => Source::Android,
            "ios" => Source::Ios,
            "browser" => Source::Browser,
            "flutter" => Source::Flutter,
            "react-native" => Source::ReactNative,
            "unity" => Source::Unity,
            _ => return Err(ParseSourceError),
        })
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_word_tag() {
        assert_eq!(
            serde_json::to_string(&Source::ReactNative).unwrap(),
            r#""react-native""#
        );
        assert_eq!(
            "react-native".parse::<Source>().unwrap(),
            Source::ReactNative
        );
    }

    #[test]
    fn test_unknown_falls_back_to_ios() {
        assert!("tvos".parse::<Source>().is_err());
        assert_eq!(Source::from_tag_lossy("tvos"), Source::Ios);
        assert_eq!(Source::from_tag_lossy("flutter"), Source::Flutter);
    }
}
