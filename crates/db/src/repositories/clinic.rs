use crate::models::{DbClinicSettings, DbClinicShift};
use chrono::Weekday;
use eyre::Result;
use sqlx::{Pool, Postgres};

pub async fn get_settings(pool: &Pool<Postgres>) -> Result<Option<DbClinicSettings>> {
    let settings = sqlx::query_as::<_, DbClinicSettings>(
        r#"
        SELECT id, clinic_name, phone, address, slot_minutes, updated_at
        FROM clinic_settings
        WHERE id = 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(settings)
}

/// Shifts for one weekday, earliest first. An empty result means the clinic is closed.
pub async fn get_shifts_for_weekday(
    pool: &Pool<Postgres>,
    weekday: Weekday,
) -> Result<Vec<DbClinicShift>> {
    tracing::debug!("Getting clinic shifts for {}", weekday);

    let shifts = sqlx::query_as::<_, DbClinicShift>(
        r#"
        SELECT id, weekday, opens, closes
        FROM clinic_shifts
        WHERE weekday = $1
        ORDER BY opens ASC
        "#,
    )
    .bind(weekday.num_days_from_monday() as i16)
    .fetch_all(pool)
    .await?;

    Ok(shifts)
}
