use std::collections::HashSet;

use anyhow::Context;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{
    AwardedBadge, BadgeDefinition, BadgeKind, BreedProfile, DogRecord, TrainingSession,
};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let dogs = vec![
        (
            Uuid::parse_str("3d7f5d6f-24f7-4e8e-8b4b-3e7e44b4a7b2")?,
            "Mongsil",
            "jiwoo.park@example.com",
            "Maltese",
        ),
        (
            Uuid::parse_str("0c22f1f1-9184-4fd4-9b21-28c68a6a89dc")?,
            "Bori",
            "haneul.kim@example.com",
            "Welsh Corgi",
        ),
    ];

    for (id, name, owner_email, breed) in dogs {
        sqlx::query(
            r#"
            INSERT INTO paw_trainer.dogs (id, name, owner_email, breed)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (owner_email) DO UPDATE
            SET name = EXCLUDED.name, breed = EXCLUDED.breed
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(owner_email)
        .bind(breed)
        .execute(pool)
        .await?;
    }

    let badges = vec![
        (
            1,
            "첫 훈련 파트너",
            Some(BadgeKind::FirstSession),
            "Logged a first training session",
        ),
        (
            2,
            "한번 더",
            Some(BadgeKind::FirstPerfectSuccess),
            "Nailed the very first session with 100% success",
        ),
        (
            3,
            "꾸준함의 상징",
            Some(BadgeKind::SevenDayStreak),
            "Trained seven days in a row",
        ),
    ];

    for (id, name, kind, description) in badges {
        sqlx::query(
            r#"
            INSERT INTO paw_trainer.badges (id, name, kind, description)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name, kind = EXCLUDED.kind, description = EXCLUDED.description
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(kind.map(BadgeKind::tag))
        .bind(description)
        .execute(pool)
        .await?;
    }

    let sessions = vec![
        (
            "seed-001",
            "jiwoo.park@example.com",
            "sit",
            Some(100.0),
            Some(15),
            "First session, nailed every command",
            NaiveDate::from_ymd_opt(2026, 8, 20).context("invalid date")?,
        ),
        (
            "seed-002",
            "jiwoo.park@example.com",
            "recall",
            Some(70.0),
            Some(20),
            "Distracted by the neighbor's cat",
            NaiveDate::from_ymd_opt(2026, 8, 21).context("invalid date")?,
        ),
        (
            "seed-003",
            "haneul.kim@example.com",
            "leash",
            Some(60.0),
            Some(30),
            "Pulled less on the second lap",
            NaiveDate::from_ymd_opt(2026, 8, 19).context("invalid date")?,
        ),
    ];

    for (source_key, owner_email, training_type, success_rate, duration, notes, session_date) in
        sessions
    {
        let dog_id: Uuid =
            sqlx::query("SELECT id FROM paw_trainer.dogs WHERE owner_email = $1")
                .bind(owner_email)
                .fetch_one(pool)
                .await?
                .get("id");

        sqlx::query(
            r#"
            INSERT INTO paw_trainer.training_sessions
            (id, dog_id, session_date, success_rate, training_type, duration_minutes, notes, source_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(dog_id)
        .bind(session_date)
        .bind(success_rate)
        .bind(training_type)
        .bind(duration)
        .bind(notes)
        .bind(source_key)
        .execute(pool)
        .await?;
    }

    let breeds: Vec<(&str, &str, &str, [i32; 6])> = vec![
        ("말티즈", "Maltese", "small", [3, 5, 3, 3, 3, 1]),
        ("웰시 코기", "Welsh Corgi", "medium", [4, 4, 4, 4, 4, 4]),
        ("보더 콜리", "Border Collie", "medium", [5, 4, 3, 3, 5, 3]),
        ("골든 리트리버", "Golden Retriever", "large", [4, 5, 5, 2, 5, 4]),
        ("시바견", "Shiba Inu", "small", [4, 2, 2, 2, 2, 4]),
    ];

    for (name_ko, name_en, size_type, levels) in breeds {
        sqlx::query(
            r#"
            INSERT INTO paw_trainer.breeds
            (id, name_ko, name_en, size_type, energy_level, affection_level,
             friendliness_with_strangers, barking_level, trainability, shedding_level)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (name_en) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name_ko)
        .bind(name_en)
        .bind(size_type)
        .bind(levels[0])
        .bind(levels[1])
        .bind(levels[2])
        .bind(levels[3])
        .bind(levels[4])
        .bind(levels[5])
        .execute(pool)
        .await?;
    }

    Ok(())
}

pub async fn fetch_dog(pool: &PgPool, key: &str) -> anyhow::Result<DogRecord> {
    let row = sqlx::query(
        "SELECT id, name, owner_email, breed FROM paw_trainer.dogs \
         WHERE owner_email = $1 OR name = $1",
    )
    .bind(key)
    .fetch_optional(pool)
    .await?
    .with_context(|| format!("no dog found for '{key}'"))?;

    Ok(DogRecord {
        id: row.get("id"),
        name: row.get("name"),
        owner_email: row.get("owner_email"),
        breed: row.get("breed"),
    })
}

pub async fn fetch_sessions(pool: &PgPool, dog_id: Uuid) -> anyhow::Result<Vec<TrainingSession>> {
    let rows = sqlx::query(
        "SELECT dog_id, session_date, success_rate, training_type, \
         duration_minutes, notes, recorded_at \
         FROM paw_trainer.training_sessions WHERE dog_id = $1",
    )
    .bind(dog_id)
    .fetch_all(pool)
    .await?;

    let mut sessions = Vec::new();
    for row in rows {
        sessions.push(TrainingSession {
            dog_id: row.get("dog_id"),
            session_date: row.get("session_date"),
            success_rate: row.get("success_rate"),
            training_type: row.get("training_type"),
            duration_minutes: row.get("duration_minutes"),
            notes: row.get("notes"),
            recorded_at: row.get("recorded_at"),
        });
    }

    Ok(sessions)
}

pub async fn fetch_badge_catalog(pool: &PgPool) -> anyhow::Result<Vec<BadgeDefinition>> {
    let rows = sqlx::query("SELECT id, name, kind, description FROM paw_trainer.badges ORDER BY id")
        .fetch_all(pool)
        .await?;

    let mut catalog = Vec::new();
    for row in rows {
        let tag: Option<String> = row.get("kind");
        catalog.push(BadgeDefinition {
            id: row.get("id"),
            name: row.get("name"),
            kind: tag.as_deref().and_then(BadgeKind::from_tag),
            description: row.get("description"),
        });
    }

    Ok(catalog)
}

pub async fn fetch_held_badge_ids(pool: &PgPool, dog_id: Uuid) -> anyhow::Result<HashSet<i32>> {
    let rows = sqlx::query("SELECT badge_id FROM paw_trainer.dog_badges WHERE dog_id = $1")
        .bind(dog_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(|row| row.get("badge_id")).collect())
}

pub async fn fetch_awarded_badges(
    pool: &PgPool,
    dog_id: Uuid,
) -> anyhow::Result<Vec<AwardedBadge>> {
    let rows = sqlx::query(
        "SELECT dog_id, badge_id, achieved_at \
         FROM paw_trainer.dog_badges \
         WHERE dog_id = $1 ORDER BY achieved_at",
    )
    .bind(dog_id)
    .fetch_all(pool)
    .await?;

    let mut awarded = Vec::new();
    for row in rows {
        awarded.push(AwardedBadge {
            dog_id: row.get("dog_id"),
            badge_id: row.get("badge_id"),
            achieved_at: row.get("achieved_at"),
        });
    }

    Ok(awarded)
}

/// Records one award. Returns false when the (dog, badge) pair already
/// exists; the unique constraint is the at-most-once guarantee, so a lost
/// race is a skip, not an error.
pub async fn insert_awarded_badge(
    pool: &PgPool,
    dog_id: Uuid,
    badge_id: i32,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO paw_trainer.dog_badges (dog_id, badge_id)
        VALUES ($1, $2)
        ON CONFLICT (dog_id, badge_id) DO NOTHING
        "#,
    )
    .bind(dog_id)
    .bind(badge_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn fetch_breeds(pool: &PgPool) -> anyhow::Result<Vec<BreedProfile>> {
    let rows = sqlx::query(
        "SELECT id, name_ko, name_en, size_type, energy_level, affection_level, \
         friendliness_with_strangers, barking_level, trainability, shedding_level \
         FROM paw_trainer.breeds",
    )
    .fetch_all(pool)
    .await?;

    let mut breeds = Vec::new();
    for row in rows {
        breeds.push(BreedProfile {
            id: row.get("id"),
            name_ko: row.get("name_ko"),
            name_en: row.get("name_en"),
            size_type: row.get("size_type"),
            energy_level: row.get("energy_level"),
            affection_level: row.get("affection_level"),
            friendliness_with_strangers: row.get("friendliness_with_strangers"),
            barking_level: row.get("barking_level"),
            trainability: row.get("trainability"),
            shedding_level: row.get("shedding_level"),
        });
    }

    Ok(breeds)
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        dog_name: String,
        owner_email: String,
        breed: String,
        training_type: String,
        success_rate: Option<f64>,
        duration_minutes: Option<i32>,
        notes: String,
        session_date: Option<NaiveDate>,
        source_key: Option<String>,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut inserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let dog_id: Uuid = sqlx::query(
            r#"
            INSERT INTO paw_trainer.dogs (id, name, owner_email, breed)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (owner_email) DO UPDATE
            SET name = EXCLUDED.name, breed = EXCLUDED.breed
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&row.dog_name)
        .bind(&row.owner_email)
        .bind(&row.breed)
        .fetch_one(pool)
        .await?
        .get("id");

        let source_key = row
            .source_key
            .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

        let result = sqlx::query(
            r#"
            INSERT INTO paw_trainer.training_sessions
            (id, dog_id, session_date, success_rate, training_type, duration_minutes, notes, source_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(dog_id)
        .bind(row.session_date)
        .bind(row.success_rate)
        .bind(&row.training_type)
        .bind(row.duration_minutes)
        .bind(&row.notes)
        .bind(source_key)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    Ok(inserted)
}
