use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{DentalError, DentalResult},
    interval::TimeRange,
};

pub const DEFAULT_GRANULARITY_MINUTES: i64 = 30;

/// One contiguous opening window of a clinic day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub opens: NaiveTime,
    pub closes: NaiveTime,
}

impl Shift {
    pub fn new(opens: NaiveTime, closes: NaiveTime) -> DentalResult<Self> {
        if closes <= opens {
            return Err(DentalError::Validation(format!(
                "Shift closing time {} must be after opening time {}",
                closes.format("%H:%M"),
                opens.format("%H:%M")
            )));
        }
        Ok(Self { opens, closes })
    }

    pub fn on(&self, date: NaiveDate) -> TimeRange {
        TimeRange::new(date.and_time(self.opens), date.and_time(self.closes))
    }
}

/// Opening hours of a single weekday.
///
/// Shifts are kept ordered and never overlap, so a day with a lunch break is
/// two shifts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    shifts: Vec<Shift>,
    granularity_minutes: i64,
}

impl DaySchedule {
    pub fn new(mut shifts: Vec<Shift>, granularity_minutes: i64) -> DentalResult<Self> {
        if granularity_minutes <= 0 {
            return Err(DentalError::Validation(
                "Slot granularity must be a positive number of minutes".to_string(),
            ));
        }
        if shifts.is_empty() {
            return Err(DentalError::Validation(
                "An open day needs at least one shift".to_string(),
            ));
        }

        shifts.sort_by_key(|shift| shift.opens);
        for pair in shifts.windows(2) {
            if pair[1].opens < pair[0].closes {
                return Err(DentalError::Validation(format!(
                    "Shifts {}-{} and {}-{} overlap",
                    pair[0].opens.format("%H:%M"),
                    pair[0].closes.format("%H:%M"),
                    pair[1].opens.format("%H:%M"),
                    pair[1].closes.format("%H:%M"),
                )));
            }
        }

        Ok(Self {
            shifts,
            granularity_minutes,
        })
    }

    /// A day with a single opening window.
    pub fn single(opens: NaiveTime, closes: NaiveTime, granularity_minutes: i64) -> DentalResult<Self> {
        Self::new(vec![Shift::new(opens, closes)?], granularity_minutes)
    }

    pub fn shifts(&self) -> &[Shift] {
        &self.shifts
    }

    pub fn granularity_minutes(&self) -> i64 {
        self.granularity_minutes
    }

    pub fn opens(&self) -> NaiveTime {
        self.shifts[0].opens
    }

    pub fn closes(&self) -> NaiveTime {
        self.shifts[self.shifts.len() - 1].closes
    }

    pub fn windows_on(&self, date: NaiveDate) -> Vec<TimeRange> {
        self.shifts.iter().map(|shift| shift.on(date)).collect()
    }
}

/// The clinic's weekly opening hours, indexed Monday first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    days: [Option<DaySchedule>; 7],
}

impl WeeklySchedule {
    pub fn closed() -> Self {
        Self {
            days: Default::default(),
        }
    }

    pub fn with_day(mut self, weekday: Weekday, day: Option<DaySchedule>) -> Self {
        self.days[weekday.num_days_from_monday() as usize] = day;
        self
    }

    pub fn day(&self, weekday: Weekday) -> Option<&DaySchedule> {
        self.days[weekday.num_days_from_monday() as usize].as_ref()
    }
}

impl Default for WeeklySchedule {
    /// Weekdays 08:00-12:00 and 14:00-18:00 in 30 minute slots, weekends closed.
    fn default() -> Self {
        let time = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap_or(NaiveTime::MIN);
        let weekday = DaySchedule {
            shifts: vec![
                Shift {
                    opens: time(8),
                    closes: time(12),
                },
                Shift {
                    opens: time(14),
                    closes: time(18),
                },
            ],
            granularity_minutes: DEFAULT_GRANULARITY_MINUTES,
        };

        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ]
        .into_iter()
        .fold(Self::closed(), |week, day| week.with_day(day, Some(weekday.clone())))
    }
}

/// Parses a `HH:MM` wall clock time.
pub fn parse_clock(value: &str) -> DentalResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| DentalError::Validation(format!("Invalid time of day: {}", value)))
}
