//! Month grid layout and per-day bucketing for the release calendar.
use chrono::{Datelike, Months, NaiveDate};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::Submission;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("invalid month {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },
}

/// Records that can be placed on the calendar.
pub trait Dated {
    fn release_date(&self) -> Option<&str>;
}

impl Dated for Submission {
    fn release_date(&self) -> Option<&str> {
        self.release_date.as_deref()
    }
}

/// A Sunday-first, seven-column grid for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    first: NaiveDate,
    days: Vec<NaiveDate>,
}

impl MonthGrid {
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(CalendarError::InvalidMonth { year, month })?;
        let days = first
            .iter_days()
            .take_while(|day| day.month() == month)
            .collect();
        Ok(Self { first, days })
    }

    pub fn containing(date: NaiveDate) -> Self {
        let first = date.with_day(1).unwrap_or(date);
        let days = first
            .iter_days()
            .take_while(|day| day.month() == first.month())
            .collect();
        Self { first, days }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Every real day of the month, in order.
    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    /// Empty leading cells before day 1 (0 = month starts on Sunday).
    pub fn padding(&self) -> usize {
        self.first.weekday().num_days_from_sunday() as usize
    }

    /// Rows needed to draw padding plus all days.
    pub fn weeks(&self) -> usize {
        (self.padding() + self.days.len()).div_ceil(7)
    }

    /// The following month, or `None` past the last representable date.
    pub fn next(&self) -> Option<Self> {
        self.first
            .checked_add_months(Months::new(1))
            .map(Self::containing)
    }

    pub fn previous(&self) -> Option<Self> {
        self.first
            .checked_sub_months(Months::new(1))
            .map(Self::containing)
    }

    pub fn day_keys(&self) -> impl Iterator<Item = String> + '_ {
        self.days.iter().map(iso_day)
    }
}

/// `YYYY-MM-DD` key used to match release dates.
pub fn iso_day(day: &NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Bucket records by release day. Every day in `days` gets an entry; a record
/// lands in a bucket only when its release date string equals the day key
/// exactly. Records outside `days` are left out.
pub fn group_by_day<R>(records: &[R], days: &[NaiveDate]) -> BTreeMap<String, Vec<R>>
where
    R: Dated + Clone,
{
    let mut buckets: BTreeMap<String, Vec<R>> =
        days.iter().map(|day| (iso_day(day), Vec::new())).collect();
    for record in records {
        if let Some(bucket) = record
            .release_date()
            .and_then(|date| buckets.get_mut(date))
        {
            bucket.push(record.clone());
        }
    }
    buckets
}

/// Split a bucket into the entries to draw and the count hidden behind
/// "+N more". The bucket itself is not modified.
pub fn preview<R>(bucket: &[R], limit: usize) -> (&[R], usize) {
    let shown = bucket.len().min(limit);
    (&bucket[..shown], bucket.len() - shown)
}
