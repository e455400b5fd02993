use crate::models::DbAppointment;
use chrono::{Days, NaiveDate, NaiveDateTime, Utc};
use dentalsync_core::models::appointment::{AppointmentStatus, NewAppointment};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// SQLSTATE raised when the `no_double_booking` exclusion constraint rejects a row.
const EXCLUSION_VIOLATION: &str = "23P01";

const COLUMNS: &str =
    "id, dentist_id, patient_id, service_id, start_time, end_time, status, notes, created_at, updated_at";

pub async fn list_for_dentist_on(
    pool: &Pool<Postgres>,
    dentist_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<DbAppointment>> {
    let day_start = date.and_time(chrono::NaiveTime::MIN);
    let day_end = day_start + Days::new(1);

    let appointments = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM appointments
        WHERE dentist_id = $1 AND start_time >= $2 AND start_time < $3
        ORDER BY start_time ASC
        "#
    ))
    .bind(dentist_id)
    .bind(day_start)
    .bind(day_end)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

/// Inserts an appointment unless it overlaps a non-canceled one of the same dentist.
///
/// Returns `Ok(None)` when the slot is taken. The check and the insert share a
/// transaction holding an advisory lock on the dentist, and the exclusion
/// constraint catches anything that slips past it.
pub async fn insert_appointment(
    pool: &Pool<Postgres>,
    appointment: &NewAppointment,
) -> Result<Option<DbAppointment>> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Inserting appointment: id={}, dentist_id={}, start={}, end={}",
        id,
        appointment.dentist_id,
        appointment.start_time,
        appointment.end_time
    );

    let mut tx = pool.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1::text))")
        .bind(appointment.dentist_id)
        .execute(&mut *tx)
        .await?;

    if has_overlap(&mut tx, appointment.dentist_id, appointment.start_time, appointment.end_time).await? {
        tracing::debug!("Dentist {} already booked in requested range", appointment.dentist_id);
        tx.rollback().await?;
        return Ok(None);
    }

    let inserted = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        INSERT INTO appointments (id, dentist_id, patient_id, service_id, start_time, end_time, status, notes, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(appointment.dentist_id)
    .bind(appointment.patient_id)
    .bind(appointment.service_id)
    .bind(appointment.start_time)
    .bind(appointment.end_time)
    .bind(appointment.status.as_str())
    .bind(appointment.notes.as_deref())
    .bind(now)
    .fetch_one(&mut *tx)
    .await;

    match inserted {
        Ok(row) => {
            tx.commit().await?;
            Ok(Some(row))
        }
        Err(sqlx::Error::Database(err)) if err.code().as_deref() == Some(EXCLUSION_VIOLATION) => {
            tracing::debug!("Exclusion constraint rejected appointment {}", id);
            tx.rollback().await?;
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

async fn has_overlap(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    dentist_id: Uuid,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM appointments
            WHERE dentist_id = $1
              AND status <> 'canceled'
              AND start_time < $3
              AND end_time > $2
        );
        "#,
    )
    .bind(dentist_id)
    .bind(start_time)
    .bind(end_time)
    .fetch_one(&mut **tx)
    .await?;

    Ok(exists)
}

pub async fn get_appointment_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM appointments
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

/// Moves an appointment to `status` if its current status allows it.
///
/// Returns `None` when no row matched, either because the appointment does
/// not exist or because its status changed to one the move is not legal from.
pub async fn update_appointment_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: AppointmentStatus,
) -> Result<Option<DbAppointment>> {
    let allowed_from: Vec<&str> = AppointmentStatus::predecessors_of(status)
        .iter()
        .map(AppointmentStatus::as_str)
        .collect();

    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET status = $2, updated_at = $3
        WHERE id = $1 AND status = ANY($4)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status.as_str())
    .bind(Utc::now())
    .bind(allowed_from)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

pub async fn list_for_patient(
    pool: &Pool<Postgres>,
    patient_id: Uuid,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM appointments
        WHERE patient_id = $1
        ORDER BY start_time DESC
        "#
    ))
    .bind(patient_id)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}
