//! Business-day calendars and adjustable dates.
//!
//! An [`AdjustableDate`] pairs a raw calendar date with a
//! [`BusinessDayAdjustment`]; the effective date is only known once the
//! adjustment has been applied.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest number of days searched for a business day before giving up.
pub const MAX_SEARCH_DAYS: u64 = 366;

/// Errors arising from date adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("no business day within {window} days of {date}")]
    NoBusinessDay { date: NaiveDate, window: u64 },
    #[error("date adjustment of {date} leaves the supported calendar range")]
    OutOfRange { date: NaiveDate },
    #[error("unknown business day convention '{0}'")]
    UnknownConvention(String),
}

/// Rule for moving a date that falls on a non-business day.
///
/// - `NoAdjust`: leave the date unchanged
/// - `Following`: first business day on or after the date
/// - `ModifiedFollowing`: following, unless that changes month, then preceding
/// - `Preceding`: last business day on or before the date
/// - `ModifiedPreceding`: preceding, unless that changes month, then following
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BusinessDayConvention {
    NoAdjust,
    Following,
    ModifiedFollowing,
    Preceding,
    ModifiedPreceding,
}

impl FromStr for BusinessDayConvention {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "none" | "no-adjust" => Ok(Self::NoAdjust),
            "following" => Ok(Self::Following),
            "modified-following" => Ok(Self::ModifiedFollowing),
            "preceding" => Ok(Self::Preceding),
            "modified-preceding" => Ok(Self::ModifiedPreceding),
            _ => Err(DateError::UnknownConvention(s.to_string())),
        }
    }
}

impl fmt::Display for BusinessDayConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoAdjust => "NoAdjust",
            Self::Following => "Following",
            Self::ModifiedFollowing => "ModifiedFollowing",
            Self::Preceding => "Preceding",
            Self::ModifiedPreceding => "ModifiedPreceding",
        };
        f.write_str(name)
    }
}

/// Which days of the week are never business days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeekendConvention {
    None,
    SaturdaySunday,
    FridaySaturday,
}

impl WeekendConvention {
    fn is_weekend(self, weekday: Weekday) -> bool {
        match self {
            Self::None => false,
            Self::SaturdaySunday => matches!(weekday, Weekday::Sat | Weekday::Sun),
            Self::FridaySaturday => matches!(weekday, Weekday::Fri | Weekday::Sat),
        }
    }
}

/// A weekend rule plus explicit holiday dates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HolidayCalendar {
    weekend: WeekendConvention,
    holidays: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    /// Every day is a business day.
    pub fn no_holidays() -> Self {
        Self {
            weekend: WeekendConvention::None,
            holidays: BTreeSet::new(),
        }
    }

    /// Saturdays and Sundays are holidays, nothing else.
    pub fn weekends() -> Self {
        Self {
            weekend: WeekendConvention::SaturdaySunday,
            holidays: BTreeSet::new(),
        }
    }

    pub fn with_holidays<I>(weekend: WeekendConvention, holidays: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        Self {
            weekend,
            holidays: holidays.into_iter().collect(),
        }
    }

    pub fn weekend(&self) -> WeekendConvention {
        self.weekend
    }

    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !self.weekend.is_weekend(date.weekday()) && !self.holidays.contains(&date)
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        !self.is_business_day(date)
    }

    /// First business day on or after `date`.
    pub fn next_or_same(&self, date: NaiveDate) -> Result<NaiveDate, DateError> {
        for offset in 0..=MAX_SEARCH_DAYS {
            let candidate = date
                .checked_add_days(Days::new(offset))
                .ok_or(DateError::OutOfRange { date })?;
            if self.is_business_day(candidate) {
                return Ok(candidate);
            }
        }
        Err(DateError::NoBusinessDay {
            date,
            window: MAX_SEARCH_DAYS,
        })
    }

    /// Last business day on or before `date`.
    pub fn previous_or_same(&self, date: NaiveDate) -> Result<NaiveDate, DateError> {
        for offset in 0..=MAX_SEARCH_DAYS {
            let candidate = date
                .checked_sub_days(Days::new(offset))
                .ok_or(DateError::OutOfRange { date })?;
            if self.is_business_day(candidate) {
                return Ok(candidate);
            }
        }
        Err(DateError::NoBusinessDay {
            date,
            window: MAX_SEARCH_DAYS,
        })
    }
}

impl Default for HolidayCalendar {
    fn default() -> Self {
        Self::weekends()
    }
}

/// A business-day convention applied under a holiday calendar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusinessDayAdjustment {
    pub convention: BusinessDayConvention,
    pub calendar: HolidayCalendar,
}

impl BusinessDayAdjustment {
    pub fn new(convention: BusinessDayConvention, calendar: HolidayCalendar) -> Self {
        Self {
            convention,
            calendar,
        }
    }

    /// Leaves every date unchanged.
    pub fn none() -> Self {
        Self::new(BusinessDayConvention::NoAdjust, HolidayCalendar::no_holidays())
    }

    pub fn adjust(&self, date: NaiveDate) -> Result<NaiveDate, DateError> {
        let calendar = &self.calendar;
        match self.convention {
            BusinessDayConvention::NoAdjust => Ok(date),
            BusinessDayConvention::Following => calendar.next_or_same(date),
            BusinessDayConvention::Preceding => calendar.previous_or_same(date),
            BusinessDayConvention::ModifiedFollowing => {
                let following = calendar.next_or_same(date)?;
                if following.month() != date.month() {
                    calendar.previous_or_same(date)
                } else {
                    Ok(following)
                }
            }
            BusinessDayConvention::ModifiedPreceding => {
                let preceding = calendar.previous_or_same(date)?;
                if preceding.month() != date.month() {
                    calendar.next_or_same(date)
                } else {
                    Ok(preceding)
                }
            }
        }
    }
}

impl Default for BusinessDayAdjustment {
    fn default() -> Self {
        Self::none()
    }
}

/// A raw date plus the rule that produces its effective date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdjustableDate {
    unadjusted: NaiveDate,
    adjustment: BusinessDayAdjustment,
}

impl AdjustableDate {
    /// A date that is never adjusted.
    pub fn of(date: NaiveDate) -> Self {
        Self::new(date, BusinessDayAdjustment::none())
    }

    pub fn new(unadjusted: NaiveDate, adjustment: BusinessDayAdjustment) -> Self {
        Self {
            unadjusted,
            adjustment,
        }
    }

    pub fn unadjusted(&self) -> NaiveDate {
        self.unadjusted
    }

    pub fn adjustment(&self) -> &BusinessDayAdjustment {
        &self.adjustment
    }

    pub fn adjusted(&self) -> Result<NaiveDate, DateError> {
        self.adjustment.adjust(self.unadjusted)
    }
}

impl fmt::Display for AdjustableDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.adjustment.convention {
            BusinessDayConvention::NoAdjust => write!(f, "{}", self.unadjusted),
            convention => write!(f, "{} adjusted {}", self.unadjusted, convention),
        }
    }
}
