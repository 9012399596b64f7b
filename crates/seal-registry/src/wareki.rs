//! Japanese imperial era (和暦) dates.
//!
//! Dates of birth arrive as era-qualified strings such as `昭和40年3月15日`; registration and
//! issue dates are Gregorian and are rendered back into era form for certificates.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Imperial eras accepted on registration forms, oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Era {
    Meiji,
    Taisho,
    Showa,
    Heisei,
    Reiwa,
}

impl Era {
    pub const ALL: [Era; 5] = [Era::Meiji, Era::Taisho, Era::Showa, Era::Heisei, Era::Reiwa];

    pub const fn label(self) -> &'static str {
        match self {
            Era::Meiji => "明治",
            Era::Taisho => "大正",
            Era::Showa => "昭和",
            Era::Heisei => "平成",
            Era::Reiwa => "令和",
        }
    }

    /// Gregorian date on which the era began.
    pub fn starts_on(self) -> NaiveDate {
        let (year, month, day) = match self {
            Era::Meiji => (1868, 10, 23),
            Era::Taisho => (1912, 7, 30),
            Era::Showa => (1926, 12, 25),
            Era::Heisei => (1989, 1, 8),
            Era::Reiwa => (2019, 5, 1),
        };
        NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
    }

    /// Era in force on `date`, or `None` before Meiji.
    pub fn containing(date: NaiveDate) -> Option<Era> {
        Era::ALL
            .iter()
            .rev()
            .copied()
            .find(|era| date >= era.starts_on())
    }

    fn from_label(label: &str) -> Option<Era> {
        Era::ALL.iter().copied().find(|era| era.label() == label)
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An era-qualified calendar date as written on intake forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EraDate {
    pub era: Era,
    pub year: u32,
    pub month: u32,
    pub day: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not an era-qualified date such as 昭和40年3月15日")]
pub struct EraDateParseError(pub String);

static ERA_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(明治|大正|昭和|平成|令和)([0-9]+|元)年([0-9]{1,2})月([0-9]{1,2})日$")
        .expect("era date pattern compiles")
});

impl FromStr for EraDate {
    type Err = EraDateParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || EraDateParseError(raw.to_string());
        let captures = ERA_DATE.captures(raw).ok_or_else(invalid)?;

        let era = Era::from_label(&captures[1]).ok_or_else(invalid)?;
        let year = match &captures[2] {
            "元" => 1,
            digits => digits.parse().map_err(|_| invalid())?,
        };
        let month = captures[3].parse().map_err(|_| invalid())?;
        let day = captures[4].parse().map_err(|_| invalid())?;

        Ok(EraDate {
            era,
            year,
            month,
            day,
        })
    }
}

impl fmt::Display for EraDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.era)?;
        if self.year == 1 {
            f.write_str("元")?;
        } else {
            write!(f, "{}", self.year)?;
        }
        write!(f, "年{}月{}日", self.month, self.day)
    }
}

impl EraDate {
    /// Convert a Gregorian date; `None` before the Meiji era.
    pub fn from_gregorian(date: NaiveDate) -> Option<EraDate> {
        let era = Era::containing(date)?;
        let year = (date.year() - era.starts_on().year() + 1) as u32;
        Some(EraDate {
            era,
            year,
            month: date.month(),
            day: date.day(),
        })
    }
}

/// Render a Gregorian date as `令和8年2月24日`, writing the first era year as `元年`.
pub fn format_wareki(date: NaiveDate) -> Option<String> {
    EraDate::from_gregorian(date).map(|era_date| era_date.to_string())
}
