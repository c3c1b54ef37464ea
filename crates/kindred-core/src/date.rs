//! Loosely structured genealogical dates
//!
//! Genealogical sources rarely give a full calendar date. A [`GenDate`] keeps
//! whatever precision the record carries: a year, a month, a full day, an
//! approximation, an open bound or a range. The compact text form is also
//! the serialized form:
//!
//! | Text | Meaning |
//! |---|---|
//! | `1850` | year only |
//! | `1850-03` / `MAR 1850` | year and month |
//! | `1850-03-12` / `12 MAR 1850` | full date |
//! | `ABT 1850` | about |
//! | `BEF 1850`, `AFT 1850` | open bounds |
//! | `BET 1850 AND 1860` | range |

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// A genealogical date of varying precision
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenDate {
    /// A full calendar date
    Exact(NaiveDate),
    /// Year and month only
    YearMonth { year: i32, month: u32 },
    /// Year only
    Year(i32),
    /// Approximate date
    About(Box<GenDate>),
    /// Some time before the inner date
    Before(Box<GenDate>),
    /// Some time after the inner date
    After(Box<GenDate>),
    /// Some time within an inclusive range
    Between(Box<GenDate>, Box<GenDate>),
}

impl GenDate {
    pub fn year_only(year: i32) -> Self {
        Self::Year(year)
    }

    pub fn about(date: GenDate) -> Self {
        Self::About(Box::new(date))
    }

    pub fn between(from: GenDate, to: GenDate) -> Self {
        Self::Between(Box::new(from), Box::new(to))
    }

    /// Earliest year the date refers to
    pub fn year(&self) -> i32 {
        match self {
            Self::Exact(d) => d.year(),
            Self::YearMonth { year, .. } | Self::Year(year) => *year,
            Self::About(inner) | Self::Before(inner) | Self::After(inner) => inner.year(),
            Self::Between(from, _) => from.year(),
        }
    }

    /// Whether the date is stated with less than full certainty
    pub fn is_approximate(&self) -> bool {
        !matches!(self, Self::Exact(_) | Self::YearMonth { .. } | Self::Year(_))
    }

    fn parse_simple(s: &str) -> Result<Self, Error> {
        let invalid = || Error::Validation(format!("Invalid date: '{}'", s));

        if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self::Exact(d));
        }

        let parts: Vec<&str> = s.split_whitespace().collect();
        match parts.as_slice() {
            // 12 MAR 1850
            [day, month, year] => {
                let day: u32 = day.parse().map_err(|_| invalid())?;
                let month = month_number(month).ok_or_else(invalid)?;
                let year: i32 = year.parse().map_err(|_| invalid())?;
                NaiveDate::from_ymd_opt(year, month, day)
                    .map(Self::Exact)
                    .ok_or_else(invalid)
            }
            // MAR 1850
            [month, year] => {
                let month = month_number(month).ok_or_else(invalid)?;
                let year: i32 = year.parse().map_err(|_| invalid())?;
                Ok(Self::YearMonth { year, month })
            }
            [single] => {
                if let Some((year, month)) = single.split_once('-') {
                    let year: i32 = year.parse().map_err(|_| invalid())?;
                    let month: u32 = month.parse().map_err(|_| invalid())?;
                    if !(1..=12).contains(&month) {
                        return Err(invalid());
                    }
                    Ok(Self::YearMonth { year, month })
                } else if single.chars().all(|c| c.is_ascii_digit()) {
                    single.parse().map(Self::Year).map_err(|_| invalid())
                } else {
                    Err(invalid())
                }
            }
            _ => Err(invalid()),
        }
    }
}

fn month_number(name: &str) -> Option<u32> {
    let upper = name.to_ascii_uppercase();
    MONTHS
        .iter()
        .position(|m| upper.starts_with(m))
        .map(|i| i as u32 + 1)
}

fn strip_keyword<'a>(s: &'a str, keywords: &[&str]) -> Option<&'a str> {
    let (head, rest) = s.split_once(char::is_whitespace)?;
    keywords
        .iter()
        .any(|k| head.eq_ignore_ascii_case(k))
        .then(|| rest.trim())
}

impl FromStr for GenDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::Validation("Date cannot be empty".to_string()));
        }

        if let Some(rest) = strip_keyword(s, &["BET", "BETWEEN", "FROM"]) {
            let upper = rest.to_ascii_uppercase();
            let split = upper.find(" AND ").or_else(|| upper.find(" TO "));
            let Some(at) = split else {
                return Err(Error::Validation(format!("Invalid date range: '{}'", s)));
            };
            let sep_len = if upper[at..].starts_with(" AND ") { 5 } else { 4 };
            let from = Self::parse_simple(rest[..at].trim())?;
            let to = Self::parse_simple(rest[at + sep_len..].trim())?;
            return Ok(Self::between(from, to));
        }
        if let Some(rest) = strip_keyword(s, &["ABT", "ABOUT", "CA", "CIRCA", "EST"]) {
            return Ok(Self::about(Self::parse_simple(rest)?));
        }
        if let Some(rest) = strip_keyword(s, &["BEF", "BEFORE"]) {
            return Ok(Self::Before(Box::new(Self::parse_simple(rest)?)));
        }
        if let Some(rest) = strip_keyword(s, &["AFT", "AFTER"]) {
            return Ok(Self::After(Box::new(Self::parse_simple(rest)?)));
        }

        Self::parse_simple(s)
    }
}

impl fmt::Display for GenDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::YearMonth { year, month } => write!(f, "{:04}-{:02}", year, month),
            Self::Year(year) => write!(f, "{}", year),
            Self::About(inner) => write!(f, "ABT {}", inner),
            Self::Before(inner) => write!(f, "BEF {}", inner),
            Self::After(inner) => write!(f, "AFT {}", inner),
            Self::Between(from, to) => write!(f, "BET {} AND {}", from, to),
        }
    }
}

impl Serialize for GenDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GenDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
