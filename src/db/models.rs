use poise::serenity_prelude::UserId;
use sqlx::FromRow;

use crate::rank::Rank;

/// A Discord member linked to a Riot account, with the last rank seen for it.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TrackedUser {
    pub discord_id: i64,
    pub puuid: String,
    pub game_name: String,
    pub tag_line: String,
    pub tier: Option<String>,
    pub division: Option<String>,
    pub league_points: Option<i32>,
}

impl TrackedUser {
    pub fn new(discord_id: UserId, puuid: &str, game_name: &str, tag_line: &str) -> Self {
        Self {
            discord_id: discord_id.get() as i64,
            puuid: puuid.to_string(),
            game_name: game_name.to_string(),
            tag_line: tag_line.to_string(),
            tier: None,
            division: None,
            league_points: None,
        }
    }

    pub fn with_rank(mut self, rank: Option<&Rank>) -> Self {
        self.tier = rank.map(|r| r.tier.clone());
        self.division = rank.map(|r| r.division.clone());
        self.league_points = rank.map(|r| r.points);
        self
    }

    pub fn user_id(&self) -> UserId {
        UserId::new(self.discord_id as u64)
    }

    pub fn riot_id(&self) -> String {
        format!("{}#{}", self.game_name, self.tag_line.to_uppercase())
    }

    /// Stored rank, present only when both tier and division are known.
    pub fn rank(&self) -> Option<Rank> {
        match (&self.tier, &self.division) {
            (Some(tier), Some(division)) => Some(Rank {
                tier: tier.clone(),
                division: division.clone(),
                points: self.league_points.unwrap_or(0),
            }),
            _ => None,
        }
    }
}
