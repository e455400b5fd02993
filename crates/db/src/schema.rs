use chrono::{NaiveTime, Utc, Weekday};
use dentalsync_core::models::clinic::{DEFAULT_GRANULARITY_MINUTES, WeeklySchedule};
use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;
use uuid::Uuid;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Needed for the uuid equality operator inside the appointments exclusion constraint
    sqlx::query("CREATE EXTENSION IF NOT EXISTS btree_gist;")
        .execute(pool)
        .await?;

    // Create patients table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS patients (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(100) NOT NULL,
            email VARCHAR(100) NOT NULL UNIQUE,
            phone VARCHAR(20) NULL,
            active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create dentists table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS dentists (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(100) NOT NULL,
            registration VARCHAR(20) NOT NULL UNIQUE,
            specialty VARCHAR(100) NULL,
            active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create services table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(100) NOT NULL,
            description TEXT NULL,
            duration_minutes INTEGER NOT NULL DEFAULT 30,
            price_cents BIGINT NOT NULL,
            active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT positive_duration CHECK (duration_minutes > 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointments table. Times are clinic wall clock, hence no time zone.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            dentist_id UUID NOT NULL REFERENCES dentists(id),
            patient_id UUID NOT NULL REFERENCES patients(id),
            service_id UUID NOT NULL REFERENCES services(id),
            start_time TIMESTAMP NOT NULL,
            end_time TIMESTAMP NOT NULL,
            status VARCHAR(20) NOT NULL DEFAULT 'pending',
            notes TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_time_range CHECK (end_time > start_time),
            CONSTRAINT valid_status CHECK (status IN ('pending', 'confirmed', 'completed', 'canceled')),
            CONSTRAINT no_double_booking EXCLUDE USING gist (
                dentist_id WITH =,
                tsrange(start_time, end_time) WITH &&
            ) WHERE (status <> 'canceled')
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create clinic_settings table, a single row
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS clinic_settings (
            id SMALLINT PRIMARY KEY DEFAULT 1,
            clinic_name VARCHAR(200) NOT NULL DEFAULT 'DentalSync',
            phone VARCHAR(20) NULL,
            address VARCHAR(300) NULL,
            slot_minutes INTEGER NOT NULL DEFAULT 30,
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT single_row CHECK (id = 1),
            CONSTRAINT positive_slot CHECK (slot_minutes > 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create clinic_shifts table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS clinic_shifts (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            weekday SMALLINT NOT NULL,
            opens TIME NOT NULL,
            closes TIME NOT NULL,
            CONSTRAINT valid_weekday CHECK (weekday BETWEEN 0 AND 6),
            CONSTRAINT valid_shift CHECK (closes > opens)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_appointments_dentist_start ON appointments(dentist_id, start_time);",
        "CREATE INDEX IF NOT EXISTS idx_appointments_patient_id ON appointments(patient_id);",
        "CREATE INDEX IF NOT EXISTS idx_appointments_status ON appointments(status);",
        "CREATE INDEX IF NOT EXISTS idx_clinic_shifts_weekday ON clinic_shifts(weekday);",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}

/// Inserts default opening hours and a starter catalog into empty tables.
pub async fn seed_reference_data(pool: &Pool<Postgres>) -> Result<()> {
    let has_settings =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM clinic_settings);")
            .fetch_one(pool)
            .await?;

    if !has_settings {
        info!("Creating default clinic settings and opening hours...");
        sqlx::query(
            r#"
            INSERT INTO clinic_settings (id, clinic_name, slot_minutes, updated_at)
            VALUES (1, 'DentalSync', $1, $2)
            "#,
        )
        .bind(DEFAULT_GRANULARITY_MINUTES as i32)
        .bind(Utc::now())
        .execute(pool)
        .await?;

        let week = WeeklySchedule::default();
        for weekday in WEEK {
            let Some(day) = week.day(weekday) else {
                continue;
            };
            for shift in day.shifts() {
                insert_shift(pool, weekday, shift.opens, shift.closes).await?;
            }
        }
    }

    let has_services = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM services);")
        .fetch_one(pool)
        .await?;

    if !has_services {
        info!("Creating sample services...");
        let services = [
            ("Cleaning", "Full dental cleaning", 30, 10_000_i64),
            ("Consultation", "Assessment visit", 30, 8_000),
            ("Whitening", "Tooth whitening", 60, 50_000),
            ("Restoration", "Tooth restoration", 60, 15_000),
            ("Extraction", "Simple tooth extraction", 30, 20_000),
        ];
        for (name, description, duration, price_cents) in services {
            sqlx::query(
                r#"
                INSERT INTO services (id, name, description, duration_minutes, price_cents, active, created_at)
                VALUES ($1, $2, $3, $4, $5, TRUE, $6)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(description)
            .bind(duration)
            .bind(price_cents)
            .bind(Utc::now())
            .execute(pool)
            .await?;
        }
    }

    let has_dentists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM dentists);")
        .fetch_one(pool)
        .await?;

    if !has_dentists {
        info!("Creating sample dentist...");
        sqlx::query(
            r#"
            INSERT INTO dentists (id, name, registration, specialty, active, created_at)
            VALUES ($1, 'Dr. Carlos Silva', '12345-SP', 'General dentistry', TRUE, $2)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(Utc::now())
        .execute(pool)
        .await?;
    }

    Ok(())
}

async fn insert_shift(
    pool: &Pool<Postgres>,
    weekday: Weekday,
    opens: NaiveTime,
    closes: NaiveTime,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO clinic_shifts (id, weekday, opens, closes)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(weekday.num_days_from_monday() as i16)
    .bind(opens)
    .bind(closes)
    .execute(pool)
    .await?;

    Ok(())
}
