use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RecorderError;

/// Elapsed match-clock time, stored as whole seconds.
///
/// Renders as zero-padded `MM:SS`; minutes keep incrementing past 60
/// rather than wrapping into hours. The match-clock string supplied by
/// the caller is the canonical in-match ordering key for recorded
/// events, so the round trip through `Display`/`FromStr` must be exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchTime(u32);

impl MatchTime {
    pub fn from_seconds(seconds: u32) -> Self {
        MatchTime(seconds)
    }

    pub fn as_seconds(self) -> u32 {
        self.0
    }

    pub fn minutes(self) -> u32 {
        self.0 / 60
    }

    pub fn seconds(self) -> u32 {
        self.0 % 60
    }
}

impl fmt::Display for MatchTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes(), self.seconds())
    }
}

impl FromStr for MatchTime {
    type Err = RecorderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RecorderError::Validation(format!("invalid match time: {:?}", s));

        let (minutes, seconds) = s.split_once(':').ok_or_else(invalid)?;
        let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
        let seconds: u32 = seconds.parse().map_err(|_| invalid())?;
        if seconds >= 60 {
            return Err(invalid());
        }

        Ok(MatchTime(minutes * 60 + seconds))
    }
}

impl Serialize for MatchTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MatchTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(|e: RecorderError| D::Error::custom(e.to_string()))
    }
}
