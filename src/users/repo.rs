use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::streak::StreakState;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: Option<String>,
    pub lang: String,
    pub streak: i32,
    pub last_streak: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

#[derive(FromRow)]
struct StreakRow {
    streak: i32,
    last_streak: Option<OffsetDateTime>,
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, full_name, lang, streak, last_streak, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, full_name, lang, streak, last_streak, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password. Streak columns start at their
    /// schema defaults (0, NULL).
    pub async fn create(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        full_name: Option<&str>,
        lang: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, full_name, lang)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, full_name, lang, streak, last_streak, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(full_name)
        .bind(lang)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn set_lang(db: &PgPool, id: Uuid, lang: &str) -> anyhow::Result<Option<String>> {
        let row: Option<(String,)> =
            sqlx::query_as(r#"UPDATE users SET lang = $2 WHERE id = $1 RETURNING lang"#)
                .bind(id)
                .bind(lang)
                .fetch_optional(db)
                .await?;
        Ok(row.map(|(lang,)| lang))
    }

    /// Load the streak columns under a row lock. Callers must hold the
    /// transaction open until the matching `save_streak` commits so that
    /// concurrent check-ins for the same user serialize.
    pub async fn streak_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> anyhow::Result<Option<StreakState>> {
        let row = sqlx::query_as::<_, StreakRow>(
            r#"
            SELECT streak, last_streak
            FROM users
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(row.map(|r| StreakState {
            streak: r.streak,
            last_streak: r.last_streak,
        }))
    }

    /// Persist both streak columns in one statement so they can never drift
    /// apart on a partial failure.
    pub async fn save_streak(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        state: &StreakState,
    ) -> anyhow::Result<()> {
        sqlx::query(r#"UPDATE users SET streak = $2, last_streak = $3 WHERE id = $1"#)
            .bind(id)
            .bind(state.streak)
            .bind(state.last_streak)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
