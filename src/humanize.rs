//! Human-readable byte sizes for configuration values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid size format: {0}")]
    InvalidFormat(String),

    #[error("invalid number: {0}")]
    InvalidNumber(#[from] std::num::ParseIntError),

    #[error("invalid unit: {0}")]
    InvalidUnit(String),
}

const UNITS: &[(&str, u64)] = &[
    ("B", 1),
    ("KB", 1 << 10),
    ("MB", 1 << 20),
    ("GB", 1 << 30),
    ("TB", 1 << 40),
];

/// Byte count that deserializes from either an integer or a string such as
/// `"5MB"` or `"30mb"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ByteSize(pub u64);

impl ByteSize {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl FromStr for ByteSize {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_uppercase();
        if s.is_empty() {
            return Err(ParseError::InvalidFormat(s));
        }

        let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (digits, unit) = s.split_at(split);
        if digits.is_empty() {
            return Err(ParseError::InvalidFormat(s.clone()));
        }
        let value: u64 = digits.parse()?;

        let multiplier = match unit.trim() {
            "" | "B" => 1,
            "K" | "KB" | "KIB" => 1 << 10,
            "M" | "MB" | "MIB" => 1 << 20,
            "G" | "GB" | "GIB" => 1 << 30,
            "T" | "TB" | "TIB" => 1 << 40,
            other => return Err(ParseError::InvalidUnit(other.to_string())),
        };

        Ok(ByteSize(value * multiplier))
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &(unit, divisor) in UNITS.iter().rev() {
            if self.0 >= divisor {
                let whole = self.0 / divisor;
                let tenths = (self.0 % divisor) * 10 / divisor;
                return if tenths == 0 {
                    write!(f, "{whole}{unit}")
                } else {
                    write!(f, "{whole}.{tenths}{unit}")
                };
            }
        }
        write!(f, "{}B", self.0)
    }
}

impl<'de> Deserialize<'de> for ByteSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(ByteSize(n)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_and_suffixed() {
        assert_eq!("1024".parse::<ByteSize>().unwrap().as_u64(), 1024);
        assert_eq!("1KB".parse::<ByteSize>().unwrap().as_u64(), 1024);
        assert_eq!("30mb".parse::<ByteSize>().unwrap().as_u64(), 30 << 20);
        assert_eq!("2GiB".parse::<ByteSize>().unwrap().as_u64(), 2 << 30);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<ByteSize>().is_err());
        assert!("MB".parse::<ByteSize>().is_err());
        assert!("5XB".parse::<ByteSize>().is_err());
    }

    #[test]
    fn display_rounds_to_one_decimal() {
        assert_eq!(ByteSize(512).to_string(), "512B");
        assert_eq!(ByteSize(1024).to_string(), "1KB");
        assert_eq!(ByteSize(1536).to_string(), "1.5KB");
        assert_eq!(ByteSize(5 << 20).to_string(), "5MB");
    }

    #[test]
    fn deserialize_from_number_or_string() {
        #[derive(Deserialize)]
        struct Wrapper {
            size: ByteSize,
        }

        let from_number: Wrapper = serde_json::from_str(r#"{"size": 2048}"#).unwrap();
        assert_eq!(from_number.size.as_u64(), 2048);

        let from_text: Wrapper = serde_json::from_str(r#"{"size": "2KB"}"#).unwrap();
        assert_eq!(from_text.size.as_u64(), 2048);
    }
}
