//! Bar resolution requested from history sources.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resolution of the bars returned by a history source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Resolution {
    /// 1 minute bars
    #[serde(rename = "1m")]
    Minute,
    /// 1 hour bars
    #[serde(rename = "1h")]
    Hour,
    /// Daily bars
    #[serde(rename = "1d")]
    #[default]
    Daily,
}

impl Resolution {
    /// Check if this is an intraday resolution.
    pub fn is_intraday(&self) -> bool {
        !matches!(self, Resolution::Daily)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Resolution::Minute => "1m",
            Resolution::Hour => "1h",
            Resolution::Daily => "1d",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1m" | "1min" | "minute" => Ok(Resolution::Minute),
            "1h" | "1hour" | "hour" => Ok(Resolution::Hour),
            "1d" | "day" | "daily" => Ok(Resolution::Daily),
            _ => Err(format!("Invalid resolution: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_parse_and_display() {
        assert_eq!(Resolution::from_str("daily").unwrap(), Resolution::Daily);
        assert_eq!(Resolution::from_str("1H").unwrap(), Resolution::Hour);
        assert!(Resolution::from_str("weekly").is_err());
        assert_eq!(Resolution::Minute.to_string(), "1m");
        assert!(!Resolution::Daily.is_intraday());
        assert!(Resolution::Hour.is_intraday());
    }
}
