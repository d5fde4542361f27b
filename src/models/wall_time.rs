use std::fmt;

use serde::{Deserialize, Serialize};

/// A local wall-clock time of day in `HH:MM` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WallTime(u16);

impl WallTime {
    pub const MINUTES_PER_DAY: u32 = 24 * 60;

    /// Parses exactly `HH:MM`, two ASCII digits on each side of the colon.
    pub fn parse(s: &str) -> Result<Self, String> {
        let (hour, minute) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("invalid time format: {s}"))?;
        let hour = two_digits(hour).ok_or_else(|| format!("invalid hour in: {s}"))?;
        let minute = two_digits(minute).ok_or_else(|| format!("invalid minute in: {s}"))?;
        if hour > 23 || minute > 59 {
            return Err(format!("time out of range: {s}"));
        }
        Ok(Self((hour * 60 + minute) as u16))
    }

    /// Builds a time from minutes since midnight; `None` past 23:59.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes < Self::MINUTES_PER_DAY).then_some(Self(minutes as u16))
    }

    pub fn minutes(self) -> u32 {
        u32::from(self.0)
    }

    pub fn hour(self) -> u32 {
        self.minutes() / 60
    }

    pub fn minute(self) -> u32 {
        self.minutes() % 60
    }

    /// `14:05` -> `2:05 PM`
    pub fn to_12h_string(self) -> String {
        let suffix = if self.hour() >= 12 { "PM" } else { "AM" };
        let hour12 = match self.hour() % 12 {
            0 => 12,
            h => h,
        };
        format!("{hour12}:{:02} {suffix}", self.minute())
    }
}

fn two_digits(part: &str) -> Option<u32> {
    match part.as_bytes() {
        [tens, ones] if tens.is_ascii_digit() && ones.is_ascii_digit() => {
            Some(u32::from(tens - b'0') * 10 + u32::from(ones - b'0'))
        }
        _ => None,
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl TryFrom<String> for WallTime {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WallTime> for String {
    fn from(value: WallTime) -> Self {
        value.to_string()
    }
}
