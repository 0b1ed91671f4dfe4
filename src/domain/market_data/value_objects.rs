use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

/// A number from the quote feed, or the marker text (`"N/A"`, `"Error"`) the
/// backend sends when one ticker could not be priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quote {
    Number(f64),
    Text(String),
}

impl Quote {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Quote::Number(value) => Some(*value),
            Quote::Text(_) => None,
        }
    }
}

impl Default for Quote {
    fn default() -> Self {
        Quote::Number(0.0)
    }
}

impl From<f64> for Quote {
    fn from(value: f64) -> Self {
        Quote::Number(value)
    }
}

impl From<&str> for Quote {
    fn from(value: &str) -> Self {
        Quote::Text(value.to_string())
    }
}

/// Value Object - current level of one index and its percent change from
/// the previous close.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub value: Quote,
    pub change: Quote,
}

/// Zeroed snapshot shown for every index until the first successful fetch.
pub const DEFAULT_SNAPSHOT: IndexSnapshot =
    IndexSnapshot { value: Quote::Number(0.0), change: Quote::Number(0.0) };

impl IndexSnapshot {
    pub fn new(value: impl Into<Quote>, change: impl Into<Quote>) -> Self {
        Self { value: value.into(), change: change.into() }
    }

    /// Zero counts as up; a non-numeric change never does.
    pub fn is_non_negative(&self) -> bool {
        self.change.as_number().is_some_and(|change| change >= 0.0)
    }
}

/// The three tracked indices, in display order. The strum name is the key
/// used in the `current` object of the API payload.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumString, AsRefStr, StrumDisplay,
)]
pub enum IndexName {
    #[strum(serialize = "SP500")]
    Sp500,
    #[strum(serialize = "NASDAQ")]
    Nasdaq,
    #[strum(serialize = "DOW")]
    Dow,
}

impl IndexName {
    pub fn key(&self) -> &'static str {
        match self {
            IndexName::Sp500 => "SP500",
            IndexName::Nasdaq => "NASDAQ",
            IndexName::Dow => "DOW",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            IndexName::Sp500 => "S&P 500",
            IndexName::Nasdaq => "NASDAQ",
            IndexName::Dow => "Dow Jones",
        }
    }
}

/// One x-axis entry of the historical series. The backend sends formatted
/// strings (`"2024-05-03 09:30:00"`), but bare numbers are accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeLabel {
    Text(String),
    Number(f64),
}

impl From<&str> for TimeLabel {
    fn from(value: &str) -> Self {
        TimeLabel::Text(value.to_string())
    }
}

impl From<f64> for TimeLabel {
    fn from(value: f64) -> Self {
        TimeLabel::Number(value)
    }
}

impl fmt::Display for TimeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeLabel::Text(text) => f.write_str(text),
            TimeLabel::Number(value) => write!(f, "{}", value),
        }
    }
}
