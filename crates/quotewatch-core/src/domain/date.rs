use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

use crate::ValidationError;

const CALENDAR_DAY: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Calendar day in `YYYY-MM-DD` form, as used for trading days and fiscal
/// period ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(Date);

impl CalendarDate {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDate {
            value: input.to_owned(),
        };

        let trimmed = input.trim();
        let date = Date::parse(trimmed, CALENDAR_DAY).map_err(|_| invalid())?;

        // `[year]` tolerates a sign; the key must be four digits and read back unchanged.
        let canonical = date.format(CALENDAR_DAY).map_err(|_| invalid())?;
        if date.year() < 0 || canonical != trimmed {
            return Err(invalid());
        }
        Ok(Self(date))
    }

    pub const fn from_date(date: Date) -> Self {
        Self(date)
    }

    pub const fn into_inner(self) -> Date {
        self.0
    }
}

impl Display for CalendarDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let formatted = self.0.format(CALENDAR_DAY).map_err(|_| std::fmt::Error)?;
        f.write_str(&formatted)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}
