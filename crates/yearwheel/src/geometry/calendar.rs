use crate::geometry::normalize_degrees;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use strum::{Display, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    EnumString,
    Display,
    DeserializeFromStr,
    SerializeDisplay,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MonthLocale {
    #[default]
    Sv,
    En,
}

const MONTHS_SV: [&str; 12] = [
    "Januari",
    "Februari",
    "Mars",
    "April",
    "Maj",
    "Juni",
    "Juli",
    "Augusti",
    "September",
    "Oktober",
    "November",
    "December",
];

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

impl MonthLocale {
    pub fn month_names(&self) -> [&'static str; 12] {
        match self {
            Self::Sv => MONTHS_SV,
            Self::En => MONTHS_EN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeekSegment {
    pub week: u32,
    pub start_angle_deg: f64,
    pub end_angle_deg: f64,
}

/// Maps the days of one calendar year onto the circle. Angles are in degrees, with the
/// first of January at `init_angle_deg`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearCalendar {
    year: i32,
    start: NaiveDate,
    end: NaiveDate,
    init_angle_deg: f64,
}

impl YearCalendar {
    pub fn new(year: i32, init_angle_deg: f64) -> Self {
        let year = year.clamp(1, 9999);
        let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or_default();
        let end = NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap_or(start + Duration::days(365));
        Self {
            year,
            start,
            end,
            init_angle_deg,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn init_angle_deg(&self) -> f64 {
        self.init_angle_deg
    }

    pub fn first_day(&self) -> NaiveDate {
        self.start
    }

    pub fn last_day(&self) -> NaiveDate {
        self.end - Duration::days(1)
    }

    pub fn days_in_year(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Zero-based, may fall outside `0..days_in_year` for dates in other years.
    pub fn day_of_year(&self, date: NaiveDate) -> i64 {
        (date - self.start).num_days()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    pub fn clamp(&self, date: NaiveDate) -> NaiveDate {
        date.clamp(self.start, self.last_day())
    }

    pub fn date_to_angle(&self, date: NaiveDate) -> f64 {
        self.init_angle_deg
            + 360.0 * self.day_of_year(date) as f64 / self.days_in_year() as f64
    }

    /// Angle at which the day `date` ends.
    pub fn date_end_angle(&self, date: NaiveDate) -> f64 {
        self.date_to_angle(date + Duration::days(1))
    }

    pub fn degrees_to_days(&self, degrees: f64) -> i64 {
        (degrees / 360.0 * self.days_in_year() as f64).round() as i64
    }

    fn angle_to_offset(&self, angle_deg: f64) -> i64 {
        self.degrees_to_days(normalize_degrees(angle_deg - self.init_angle_deg))
    }

    /// The day starting nearest to `angle_deg`.
    pub fn angle_to_date(&self, angle_deg: f64) -> NaiveDate {
        let offset = self.angle_to_offset(angle_deg);
        self.clamp(self.start + Duration::days(offset))
    }

    /// The day ending nearest to `angle_deg`.
    pub fn angle_to_end_date(&self, angle_deg: f64) -> NaiveDate {
        let offset = match self.angle_to_offset(angle_deg) {
            0 => self.days_in_year(),
            offset => offset,
        };
        self.clamp(self.start + Duration::days(offset - 1))
    }

    pub fn iso_week_count(&self) -> u32 {
        NaiveDate::from_ymd_opt(self.year, 12, 28)
            .map(|d| d.iso_week().week())
            .unwrap_or(52)
    }

    /// ISO weeks of the year clipped to it. The first and last segments are stretched to
    /// the year boundaries so the band closes around the circle.
    pub fn week_segments(&self) -> Vec<WeekSegment> {
        let count = self.iso_week_count();
        (1..=count)
            .filter_map(|week| {
                let monday = NaiveDate::from_isoywd_opt(self.year, week, Weekday::Mon)?;
                let start = if week == 1 {
                    self.start
                } else {
                    monday.max(self.start)
                };
                let end = if week == count {
                    self.end
                } else {
                    (monday + Duration::days(7)).min(self.end)
                };
                Some(WeekSegment {
                    week,
                    start_angle_deg: self.date_to_angle(start),
                    end_angle_deg: self.date_to_angle(end),
                })
            })
            .collect()
    }
}
