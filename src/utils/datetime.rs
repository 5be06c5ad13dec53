/// Birthday date arithmetic (transport-agnostic)
///
/// Every function here is a pure transform over explicit inputs; the current
/// instant is always injected by the caller, never read from a global clock.
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::utils::error::{Result, SkillError};

/// A stored birth date, as collected from slot resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthDate {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl BirthDate {
    /// Build a calendar-validated birth date.
    ///
    /// Feb 29 is only accepted when the birth year is a leap year; in
    /// non-leap target years it is observed on Feb 28.
    pub fn new(day: u32, month: u32, year: i32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(SkillError::invalid_date(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }
        if NaiveDate::from_ymd_opt(year, month, day).is_none() {
            return Err(SkillError::invalid_date(format!(
                "{:04}-{:02}-{:02} is not a valid calendar date",
                year, month, day
            )));
        }
        Ok(Self { day, month, year })
    }
}

/// Age and countdown derived from a birth date, never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthdayResult {
    pub age: i32,
    pub days_until_birthday: i64,
}

/// Check if a given year is a leap year
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// The (month, day) on which a birth date is observed in a given year.
/// Feb 29 birthdays fall back to Feb 28 outside leap years.
fn observed_month_day(birth: &BirthDate, year: i32) -> (u32, u32) {
    if birth.month == 2 && birth.day == 29 && !is_leap_year(year) {
        (2, 28)
    } else {
        (birth.month, birth.day)
    }
}

fn occurrence_in(birth: &BirthDate, year: i32) -> Result<NaiveDate> {
    let (month, day) = observed_month_day(birth, year);
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        SkillError::invalid_date(format!(
            "no occurrence of {:02}-{:02} in {}",
            month, day, year
        ))
    })
}

/// Compute the user's current age and the whole days left until the next
/// birthday, both relative to the calendar day observed in `tz` at `now`.
///
/// `days_until_birthday == 0` means today is the birthday.
pub fn birthday_stats(birth: &BirthDate, tz: Tz, now: DateTime<Utc>) -> Result<BirthdayResult> {
    let today = now.with_timezone(&tz).date_naive();

    let (month, day) = observed_month_day(birth, today.year());
    let mut age = today.year() - birth.year;
    if (today.month(), today.day()) < (month, day) {
        age -= 1;
    }
    if age < 0 {
        return Err(SkillError::invalid_date(format!(
            "birth date {:04}-{:02}-{:02} is in the future",
            birth.year, birth.month, birth.day
        )));
    }

    let candidate = occurrence_in(birth, today.year())?;
    let next = if candidate < today {
        occurrence_in(birth, today.year() + 1)?
    } else {
        candidate
    };

    Ok(BirthdayResult {
        age,
        days_until_birthday: (next - today).num_days(),
    })
}

/// Today's local calendar (day, month) for the given timezone, used to query
/// the birthday dataset
pub fn local_month_day(tz: Tz, now: DateTime<Utc>) -> (u32, u32) {
    let today = now.with_timezone(&tz).date_naive();
    (today.day(), today.month())
}
