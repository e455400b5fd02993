//! # Availability Engine
//!
//! Computes which slot starts are still free for a dentist on a given day and
//! decides whether a specific requested interval can be booked.
//!
//! ## Rules
//!
//! - A day's bookable windows are its shifts from the clinic configuration.
//!   A closed weekday has no windows and yields no slots.
//! - Candidate starts step through each shift at the configured granularity
//!   and must finish by the shift's closing time.
//! - Intervals are half-open, so an appointment ending at 10:00 leaves a
//!   10:00 start free.
//! - Canceled appointments never block time.
//!
//! Nothing here is cached. Every call reads the current appointments from the
//! store, so concurrent writers are always observed.

use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    errors::{DentalError, DentalResult},
    interval::{self, TimeRange},
    models::{appointment::Appointment, clinic::DaySchedule},
    store::{AppointmentStore, ClinicConfiguration},
};

/// Free slot starts of one dentist on one day.
///
/// The sequence is produced lazily by [`FreeSlots::iter`]. Each call to
/// `iter` starts again from the first slot, so the same value can be walked
/// any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeSlots {
    windows: Vec<TimeRange>,
    step: Duration,
    length: Duration,
    busy: Vec<TimeRange>,
}

impl FreeSlots {
    /// The empty sequence of a day the clinic does not open.
    pub fn closed() -> Self {
        Self {
            windows: Vec::new(),
            step: Duration::minutes(1),
            length: Duration::minutes(1),
            busy: Vec::new(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn iter(&self) -> FreeSlotIter<'_> {
        FreeSlotIter {
            slots: self,
            window: 0,
            cursor: None,
        }
    }

    pub fn to_vec(&self) -> Vec<NaiveDateTime> {
        self.iter().collect()
    }
}

impl<'a> IntoIterator for &'a FreeSlots {
    type Item = NaiveDateTime;
    type IntoIter = FreeSlotIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct FreeSlotIter<'a> {
    slots: &'a FreeSlots,
    window: usize,
    cursor: Option<NaiveDateTime>,
}

impl Iterator for FreeSlotIter<'_> {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let window = self.slots.windows.get(self.window)?;
            let start = self.cursor.unwrap_or(window.start);
            let end = match start.checked_add_signed(self.slots.length) {
                Some(end) if end <= window.end => end,
                _ => {
                    self.window += 1;
                    self.cursor = None;
                    continue;
                }
            };
            let candidate = TimeRange::new(start, end);

            match start.checked_add_signed(self.slots.step) {
                Some(next) => self.cursor = Some(next),
                None => {
                    self.window += 1;
                    self.cursor = None;
                }
            }
            if !self.slots.busy.iter().any(|busy| busy.overlaps(&candidate)) {
                return Some(start);
            }
        }
    }
}

fn ensure_positive(duration_minutes: i64) -> DentalResult<()> {
    if duration_minutes <= 0 {
        return Err(DentalError::InvalidDuration(format!(
            "Duration must be a positive number of minutes, got {}",
            duration_minutes
        )));
    }
    Ok(())
}

fn ensure_aligned(day: &DaySchedule, duration_minutes: i64) -> DentalResult<()> {
    let granularity = day.granularity_minutes();
    if duration_minutes % granularity != 0 {
        return Err(DentalError::InvalidDuration(format!(
            "Duration of {} minutes is not a multiple of the {} minute slot size",
            duration_minutes, granularity
        )));
    }
    Ok(())
}

fn blocking(appointments: &[Appointment]) -> impl Iterator<Item = &Appointment> {
    appointments.iter().filter(|a| a.status.blocks_time())
}

/// Free slots for `duration_minutes` on `date`, given the day's opening hours
/// and the appointments already on the dentist's calendar.
pub fn free_slots(
    date: NaiveDate,
    day: Option<&DaySchedule>,
    duration_minutes: i64,
    appointments: &[Appointment],
) -> DentalResult<FreeSlots> {
    ensure_positive(duration_minutes)?;

    let Some(day) = day else {
        return Ok(FreeSlots::closed());
    };
    ensure_aligned(day, duration_minutes)?;

    let mut busy: Vec<TimeRange> = blocking(appointments).map(Appointment::range).collect();
    busy.sort();

    Ok(FreeSlots {
        windows: day.windows_on(date),
        step: interval::minutes(day.granularity_minutes())?,
        length: interval::minutes(duration_minutes)?,
        busy,
    })
}

/// Checks that `[start, start + duration_minutes)` fits in one shift and does
/// not overlap any non-canceled appointment. Returns the checked interval.
pub fn check_booking(
    day: Option<&DaySchedule>,
    start: NaiveDateTime,
    duration_minutes: i64,
    appointments: &[Appointment],
) -> DentalResult<TimeRange> {
    ensure_positive(duration_minutes)?;

    let requested = TimeRange::starting_at(start, duration_minutes)?;
    let within_hours = day
        .map(|day| {
            day.windows_on(start.date())
                .iter()
                .any(|window| window.contains(&requested))
        })
        .unwrap_or(false);

    if !within_hours {
        return Err(DentalError::OutOfHours(format!(
            "{} to {} is outside the clinic's opening hours",
            requested.start.format("%Y-%m-%d %H:%M"),
            requested.end.format("%H:%M")
        )));
    }

    if let Some(existing) = blocking(appointments).find(|a| a.range().overlaps(&requested)) {
        return Err(DentalError::Conflict(format!(
            "The requested time overlaps an appointment from {} to {}",
            existing.start_time.format("%H:%M"),
            existing.end_time.format("%H:%M")
        )));
    }

    Ok(requested)
}

/// Availability queries backed by the appointment store and clinic configuration.
#[derive(Clone)]
pub struct AvailabilityEngine {
    appointments: Arc<dyn AppointmentStore>,
    clinic: Arc<dyn ClinicConfiguration>,
}

impl AvailabilityEngine {
    pub fn new(appointments: Arc<dyn AppointmentStore>, clinic: Arc<dyn ClinicConfiguration>) -> Self {
        Self {
            appointments,
            clinic,
        }
    }

    pub async fn compute_free_slots(
        &self,
        dentist_id: Uuid,
        date: NaiveDate,
        duration_minutes: i64,
    ) -> DentalResult<FreeSlots> {
        ensure_positive(duration_minutes)?;

        let Some(day) = self.clinic.schedule_for(date.weekday()).await? else {
            debug!("Clinic closed on {} ({})", date, date.weekday());
            return Ok(FreeSlots::closed());
        };
        ensure_aligned(&day, duration_minutes)?;

        let appointments = self.appointments.list(dentist_id, date).await?;
        debug!(
            "Computing free slots for dentist {} on {} against {} appointments",
            dentist_id,
            date,
            appointments.len()
        );

        free_slots(date, Some(&day), duration_minutes, &appointments)
    }

    pub async fn validate_booking(
        &self,
        dentist_id: Uuid,
        start: NaiveDateTime,
        duration_minutes: i64,
    ) -> DentalResult<TimeRange> {
        ensure_positive(duration_minutes)?;
        TimeRange::starting_at(start, duration_minutes)?;

        let day = self.clinic.schedule_for(start.weekday()).await?;
        let appointments = self.appointments.list(dentist_id, start.date()).await?;

        let result = check_booking(day.as_ref(), start, duration_minutes, &appointments);
        if let Err(DentalError::Conflict(reason)) = &result {
            warn!("Booking conflict for dentist {} at {}: {}", dentist_id, start, reason);
        }
        result
    }
}
