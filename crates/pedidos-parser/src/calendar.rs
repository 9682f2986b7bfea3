//! National holidays and business-day arithmetic used for procedural deadlines.

use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, Days, NaiveDate, Weekday};
use tracing::debug;

use crate::error::DeadlineError;

pub trait HolidayProvider {
    fn holidays_for_year(&self, year: i32) -> BTreeSet<NaiveDate>;
}

/// Brazilian national public holidays.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrazilianNationalHolidays;

/// Gregorian Easter Sunday (anonymous algorithm).
#[must_use]
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
}

impl HolidayProvider for BrazilianNationalHolidays {
    fn holidays_for_year(&self, year: i32) -> BTreeSet<NaiveDate> {
        let mut fixed = vec![
            (1, 1),
            (4, 21),
            (5, 1),
            (9, 7),
            (10, 12),
            (11, 2),
            (11, 15),
            (12, 25),
        ];
        if year >= 2024 {
            fixed.push((11, 20));
        }

        let mut days = fixed
            .into_iter()
            .filter_map(|(month, day)| NaiveDate::from_ymd_opt(year, month, day))
            .collect::<BTreeSet<_>>();

        let good_friday =
            easter_sunday(year).and_then(|easter| easter.checked_sub_days(Days::new(2)));
        days.extend(good_friday);

        days
    }
}

/// Read-through holiday cache keyed by year. Entries are never invalidated.
#[derive(Debug, Default)]
pub struct HolidayCache<P> {
    provider: P,
    years: HashMap<i32, BTreeSet<NaiveDate>>,
}

impl<P: HolidayProvider> HolidayCache<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            years: HashMap::new(),
        }
    }

    pub fn holidays(&mut self, year: i32) -> &BTreeSet<NaiveDate> {
        self.years.entry(year).or_insert_with(|| {
            debug!(year, "loading holiday calendar");
            self.provider.holidays_for_year(year)
        })
    }

    pub fn is_holiday(&mut self, date: NaiveDate) -> bool {
        self.holidays(date.year()).contains(&date)
    }

    pub fn is_business_day(&mut self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.is_holiday(date)
    }

    #[must_use]
    pub fn cached_years(&self) -> usize {
        self.years.len()
    }
}

/// Moves `days` business days away from `from`; negative values go backwards.
pub fn add_business_days<P: HolidayProvider>(
    cache: &mut HolidayCache<P>,
    from: NaiveDate,
    days: i64,
) -> Result<NaiveDate, DeadlineError> {
    let mut current = from;
    let mut counted = 0_u64;
    let target = days.unsigned_abs();

    while counted < target {
        current = if days > 0 {
            current.checked_add_days(Days::new(1))
        } else {
            current.checked_sub_days(Days::new(1))
        }
        .ok_or(DeadlineError::OutOfRange)?;

        if cache.is_business_day(current) {
            counted += 1;
        }
    }

    Ok(current)
}
