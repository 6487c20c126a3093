//! Kline interval definitions.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kline sampling interval, using Binance identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Interval {
    /// 1-second klines.
    #[serde(rename = "1s")]
    Second1,
    /// 1-minute klines.
    #[serde(rename = "1m")]
    Minute1,
    /// 3-minute klines.
    #[serde(rename = "3m")]
    Minute3,
    /// 5-minute klines.
    #[serde(rename = "5m")]
    Minute5,
    /// 15-minute klines.
    #[default]
    #[serde(rename = "15m")]
    Minute15,
    /// 30-minute klines.
    #[serde(rename = "30m")]
    Minute30,
    /// 1-hour klines.
    #[serde(rename = "1h")]
    Hour1,
    /// 2-hour klines.
    #[serde(rename = "2h")]
    Hour2,
    /// 4-hour klines.
    #[serde(rename = "4h")]
    Hour4,
    /// 6-hour klines.
    #[serde(rename = "6h")]
    Hour6,
    /// 8-hour klines.
    #[serde(rename = "8h")]
    Hour8,
    /// 12-hour klines.
    #[serde(rename = "12h")]
    Hour12,
    /// Daily klines.
    #[serde(rename = "1d")]
    Day1,
    /// 3-day klines.
    #[serde(rename = "3d")]
    Day3,
    /// Weekly klines.
    #[serde(rename = "1w")]
    Week1,
    /// Monthly klines (calendar months, no fixed length).
    #[serde(rename = "1M")]
    Month1,
}

impl Interval {
    /// Returns the interval length in seconds, or None for calendar months.
    #[must_use]
    pub const fn seconds(&self) -> Option<i64> {
        match self {
            Self::Second1 => Some(1),
            Self::Minute1 => Some(60),
            Self::Minute3 => Some(180),
            Self::Minute5 => Some(300),
            Self::Minute15 => Some(900),
            Self::Minute30 => Some(1800),
            Self::Hour1 => Some(3600),
            Self::Hour2 => Some(7200),
            Self::Hour4 => Some(14_400),
            Self::Hour6 => Some(21_600),
            Self::Hour8 => Some(28_800),
            Self::Hour12 => Some(43_200),
            Self::Day1 => Some(86_400),
            Self::Day3 => Some(259_200),
            Self::Week1 => Some(604_800),
            Self::Month1 => None,
        }
    }

    /// Returns the interval length in milliseconds, or None for calendar months.
    #[must_use]
    pub const fn milliseconds(&self) -> Option<i64> {
        match self.seconds() {
            Some(s) => Some(s * 1000),
            None => None,
        }
    }

    /// Returns the interval length as a [`TimeDelta`], or None for calendar months.
    #[must_use]
    pub fn duration(&self) -> Option<TimeDelta> {
        self.seconds().and_then(TimeDelta::try_seconds)
    }

    /// Returns the Binance identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Second1 => "1s",
            Self::Minute1 => "1m",
            Self::Minute3 => "3m",
            Self::Minute5 => "5m",
            Self::Minute15 => "15m",
            Self::Minute30 => "30m",
            Self::Hour1 => "1h",
            Self::Hour2 => "2h",
            Self::Hour4 => "4h",
            Self::Hour6 => "6h",
            Self::Hour8 => "8h",
            Self::Hour12 => "12h",
            Self::Day1 => "1d",
            Self::Day3 => "3d",
            Self::Week1 => "1w",
            Self::Month1 => "1M",
        }
    }

    /// Returns all intervals.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Second1,
            Self::Minute1,
            Self::Minute3,
            Self::Minute5,
            Self::Minute15,
            Self::Minute30,
            Self::Hour1,
            Self::Hour2,
            Self::Hour4,
            Self::Hour6,
            Self::Hour8,
            Self::Hour12,
            Self::Day1,
            Self::Day3,
            Self::Week1,
            Self::Month1,
        ]
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Interval {
    type Err = IntervalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "1M" (month) and "1m" (minute) differ only in case
        if s == "1M" {
            return Ok(Self::Month1);
        }
        match s.to_lowercase().as_str() {
            "1s" | "s1" => Ok(Self::Second1),
            "1m" | "m1" => Ok(Self::Minute1),
            "3m" | "m3" => Ok(Self::Minute3),
            "5m" | "m5" => Ok(Self::Minute5),
            "15m" | "m15" => Ok(Self::Minute15),
            "30m" | "m30" => Ok(Self::Minute30),
            "1h" | "h1" => Ok(Self::Hour1),
            "2h" | "h2" => Ok(Self::Hour2),
            "4h" | "h4" => Ok(Self::Hour4),
            "6h" | "h6" => Ok(Self::Hour6),
            "8h" | "h8" => Ok(Self::Hour8),
            "12h" | "h12" => Ok(Self::Hour12),
            "1d" | "d1" | "daily" => Ok(Self::Day1),
            "3d" | "d3" => Ok(Self::Day3),
            "1w" | "w1" | "weekly" => Ok(Self::Week1),
            "monthly" => Ok(Self::Month1),
            _ => Err(IntervalParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid interval string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalParseError(String);

impl std::fmt::Display for IntervalParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid interval '{}', expected one of: \
             1s, 1m, 3m, 5m, 15m, 30m, 1h, 2h, 4h, 6h, 8h, 12h, 1d, 3d, 1w, 1M",
            self.0
        )
    }
}

impl std::error::Error for IntervalParseError {}
