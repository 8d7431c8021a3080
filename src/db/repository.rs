use sqlx::SqlitePool;

use super::models::TrackedUser;
use crate::error::AppError;
use crate::rank::Rank;

const COLUMNS: &str = "discord_id, puuid, game_name, tag_line, tier, division, league_points";

/// Persistence of tracked users, one row per Discord member.
#[derive(Clone, Debug)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, discord_id: i64) -> Result<Option<TrackedUser>, AppError> {
        let user = sqlx::query_as::<_, TrackedUser>(&format!(
            "SELECT {COLUMNS} FROM tracked_users WHERE discord_id = ?"
        ))
        .bind(discord_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn get_by_puuid(&self, puuid: &str) -> Result<Option<TrackedUser>, AppError> {
        let user = sqlx::query_as::<_, TrackedUser>(&format!(
            "SELECT {COLUMNS} FROM tracked_users WHERE puuid = ?"
        ))
        .bind(puuid)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Insert or replace the row of `user.discord_id`.
    ///
    /// A Riot account already linked to another member is rejected rather than
    /// silently moved.
    pub async fn upsert(&self, user: &TrackedUser) -> Result<(), AppError> {
        if let Some(owner) = self.get_by_puuid(&user.puuid).await?
            && owner.discord_id != user.discord_id
        {
            return Err(AppError::PlayerAlreadyRegistered {
                riot_id: owner.riot_id(),
            });
        }

        self.write(user).await
    }

    async fn write(&self, user: &TrackedUser) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO tracked_users
                (discord_id, puuid, game_name, tag_line, tier, division, league_points)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(discord_id) DO UPDATE SET
                puuid = excluded.puuid,
                game_name = excluded.game_name,
                tag_line = excluded.tag_line,
                tier = excluded.tier,
                division = excluded.division,
                league_points = excluded.league_points
            "#,
        )
        .bind(user.discord_id)
        .bind(&user.puuid)
        .bind(&user.game_name)
        .bind(&user.tag_line)
        .bind(&user.tier)
        .bind(&user.division)
        .bind(user.league_points)
        .execute(&self.pool)
        .await
        .map_err(|e| puuid_conflict(e, user))?;
        Ok(())
    }

    pub async fn delete(&self, discord_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tracked_users WHERE discord_id = ?")
            .bind(discord_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Every tracked user in registration order.
    pub async fn list_all(&self) -> Result<Vec<TrackedUser>, AppError> {
        let users = sqlx::query_as::<_, TrackedUser>(&format!(
            "SELECT {COLUMNS} FROM tracked_users ORDER BY registered_at ASC, discord_id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    /// Users with a stored tier and division.
    pub async fn list_ranked(&self) -> Result<Vec<TrackedUser>, AppError> {
        let users = sqlx::query_as::<_, TrackedUser>(&format!(
            r#"
            SELECT {COLUMNS} FROM tracked_users
            WHERE tier IS NOT NULL AND division IS NOT NULL
            ORDER BY registered_at ASC, discord_id ASC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    /// Overwrite the stored rank, or clear it when `rank` is `None`.
    pub async fn update_rank(&self, discord_id: i64, rank: Option<&Rank>) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE tracked_users SET tier = ?, division = ?, league_points = ? WHERE discord_id = ?",
        )
        .bind(rank.map(|r| &r.tier))
        .bind(rank.map(|r| &r.division))
        .bind(rank.map(|r| r.points))
        .bind(discord_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_all_ranks(&self, rank: &Rank) -> Result<u64, AppError> {
        let result =
            sqlx::query("UPDATE tracked_users SET tier = ?, division = ?, league_points = ?")
                .bind(&rank.tier)
                .bind(&rank.division)
                .bind(rank.points)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }
}

/// A concurrent registration of the same account loses on the `puuid` constraint.
fn puuid_conflict(err: sqlx::Error, user: &TrackedUser) -> AppError {
    match &err {
        sqlx::Error::Database(db)
            if db.is_unique_violation() && db.message().contains("puuid") =>
        {
            AppError::PlayerAlreadyRegistered {
                riot_id: user.riot_id(),
            }
        }
        _ => err.into(),
    }
}
