//! Release-time input.
//!
//! Accepts what a `datetime-local` picker produces (`YYYY-MM-DDTHH:MM`,
//! optional `:SS`, optional trailing `Z`) and interprets it as UTC. A bare
//! integer is taken as a Unix timestamp.

use crate::error::ValidationError;

const SECONDS_PER_DAY: i64 = 86_400;

/// Days before the first of each month in a common year.
const DAYS_BEFORE_MONTH: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// Parse a release moment into Unix seconds.
pub fn parse_release_time(input: &str) -> Result<i64, ValidationError> {
    let s = input.trim();
    if let Ok(ts) = s.parse::<i64>() {
        return Ok(ts);
    }
    CalendarTime::parse(s)
        .and_then(|t| t.unix_seconds())
        .ok_or_else(|| ValidationError::InvalidReleaseTime(input.to_string()))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CalendarTime {
    year: i64,
    month: usize,
    day: i64,
    hour: i64,
    minute: i64,
    second: i64,
}

impl CalendarTime {
    fn parse(s: &str) -> Option<Self> {
        let (date, clock) = s.split_once('T').or_else(|| s.split_once(' '))?;

        let mut date = date.splitn(3, '-');
        let year = date.next()?.parse().ok()?;
        let month = date.next()?.parse().ok()?;
        let day = date.next()?.parse().ok()?;

        let mut clock = clock.strip_suffix('Z').unwrap_or(clock).splitn(3, ':');
        let hour = clock.next()?.parse().ok()?;
        let minute = clock.next()?.parse().ok()?;
        let second = match clock.next() {
            Some(sec) => sec.parse().ok()?,
            None => 0,
        };

        let t = CalendarTime {
            year,
            month,
            day,
            hour,
            minute,
            second,
        };
        t.is_valid().then_some(t)
    }

    fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
            && (1..=self.days_in_month()).contains(&self.day)
            && (0..24).contains(&self.hour)
            && (0..60).contains(&self.minute)
            && (0..60).contains(&self.second)
    }

    fn is_leap_year(&self) -> bool {
        (self.year % 4 == 0 && self.year % 100 != 0) || self.year % 400 == 0
    }

    fn days_in_month(&self) -> i64 {
        match self.month {
            2 if self.is_leap_year() => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    fn unix_seconds(&self) -> Option<i64> {
        let leap_shift = i64::from(self.month > 2 && self.is_leap_year());
        let days = days_before_year(self.year)?
            .checked_add(DAYS_BEFORE_MONTH[self.month - 1] + leap_shift + self.day - 1)?;
        days.checked_mul(SECONDS_PER_DAY)?
            .checked_add(self.hour * 3_600 + self.minute * 60 + self.second)
    }
}

/// Days from 1970-01-01 to January 1st of `year`; negative before 1970.
fn days_before_year(year: i64) -> Option<i64> {
    let leap_days = |y: i64| y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400);
    365i64
        .checked_mul(year.checked_sub(1970)?)?
        .checked_add(leap_days(year - 1) - leap_days(1969))
}
