use async_trait::async_trait;
use poise::serenity_prelude::UserId;
use tracing::debug;

use crate::db::TrackedUser;
use crate::error::AppError;
use crate::rank::Rank;

pub const LEADERBOARD_SIZE: usize = 20;

/// Resolves a Discord account to a printable name.
#[async_trait]
pub trait DisplayNameResolver: Send + Sync {
    async fn display_name(&self, user: UserId) -> Result<String, AppError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// 1-based.
    pub position: usize,
    pub display_name: String,
    pub riot_id: String,
    pub puuid: String,
    pub rank: Rank,
}

pub fn unknown_user_label(user: UserId) -> String {
    format!("Unknown user ({user})")
}

/// Sort the ranked users best first and keep the top [`LEADERBOARD_SIZE`].
///
/// Users without a stored tier and division are left out. Equal values are
/// ordered by puuid. A name that cannot be resolved gets a placeholder label.
pub async fn build(
    users: Vec<TrackedUser>,
    resolver: &dyn DisplayNameResolver,
) -> Vec<LeaderboardEntry> {
    let mut ranked: Vec<(i64, TrackedUser, Rank)> = users
        .into_iter()
        .filter_map(|user| {
            let rank = user.rank()?;
            Some((rank.value(), user, rank))
        })
        .collect();

    ranked.sort_by(|(a, ua, _), (b, ub, _)| b.cmp(a).then_with(|| ua.puuid.cmp(&ub.puuid)));
    ranked.truncate(LEADERBOARD_SIZE);

    let mut entries = Vec::with_capacity(ranked.len());
    for (i, (_, user, rank)) in ranked.into_iter().enumerate() {
        let display_name = match resolver.display_name(user.user_id()).await {
            Ok(name) => name,
            Err(e) => {
                debug!(error = %e, discord_id = user.discord_id, "🏆 Display name unresolved");
                unknown_user_label(user.user_id())
            }
        };

        entries.push(LeaderboardEntry {
            position: i + 1,
            display_name,
            riot_id: user.riot_id(),
            puuid: user.puuid,
            rank,
        });
    }

    entries
}
