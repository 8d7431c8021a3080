use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::error::AppError;
use crate::rank::Rank;
use crate::riot::{LeagueEntryDto, Platform, RiotClient};

/// Attempts per lookup, the first one included.
pub const MAX_ATTEMPTS: u32 = 3;
/// Wait used when a rate limited response carries no `Retry-After`.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
#[error("rank lookup failed: {0}")]
pub struct LookupError(#[source] pub AppError);

/// Outcome of a solo queue lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankStanding {
    Ranked(Rank),
    /// The player has no solo queue placement.
    Unranked,
    /// Every attempt was rate limited. Handled like [`RankStanding::Unranked`].
    RetriesExhausted,
}

impl RankStanding {
    pub fn rank(&self) -> Option<&Rank> {
        match self {
            RankStanding::Ranked(rank) => Some(rank),
            RankStanding::Unranked | RankStanding::RetriesExhausted => None,
        }
    }
}

/// Raw access to League-v4 entries.
#[async_trait]
pub trait LeagueSource: Send + Sync {
    async fn league_entries(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<Vec<LeagueEntryDto>, AppError>;
}

#[async_trait]
impl LeagueSource for RiotClient {
    async fn league_entries(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<Vec<LeagueEntryDto>, AppError> {
        self.get_league_entries_by_puuid(platform, puuid).await
    }
}

/// Current solo queue standing of a player.
#[async_trait]
pub trait RankLookup: Send + Sync {
    async fn fetch_rank(&self, puuid: &str) -> Result<RankStanding, LookupError>;
}

/// [`RankLookup`] over a [`LeagueSource`] with bounded retries on rate limiting.
#[derive(Debug, Clone)]
pub struct RankLookupClient<S> {
    source: S,
    platform: Platform,
}

impl<S: LeagueSource> RankLookupClient<S> {
    pub fn new(source: S, platform: Platform) -> Self {
        Self { source, platform }
    }
}

#[async_trait]
impl<S: LeagueSource> RankLookup for RankLookupClient<S> {
    #[instrument(skip(self), fields(platform = %self.platform))]
    async fn fetch_rank(&self, puuid: &str) -> Result<RankStanding, LookupError> {
        for attempt in 1..=MAX_ATTEMPTS {
            match self.source.league_entries(self.platform, puuid).await {
                Ok(entries) => {
                    let standing = entries
                        .iter()
                        .find(|e| e.is_solo_queue())
                        .map(|e| RankStanding::Ranked(Rank::from(e)))
                        .unwrap_or(RankStanding::Unranked);
                    debug!(?standing, attempt, "🔎 Rank fetched");
                    return Ok(standing);
                }
                Err(AppError::RateLimited { retry_after }) => {
                    let wait = retry_after.unwrap_or(DEFAULT_RETRY_AFTER);
                    warn!(
                        attempt,
                        max_attempts = MAX_ATTEMPTS,
                        wait_secs = wait.as_secs(),
                        "🔎 ⏳ Rate limited"
                    );
                    if attempt < MAX_ATTEMPTS {
                        tokio::time::sleep(wait).await;
                    }
                }
                Err(e) if e.is_not_found() => return Ok(RankStanding::Unranked),
                Err(e) => return Err(LookupError(e)),
            }
        }

        warn!(
            attempts = MAX_ATTEMPTS,
            "🔎 ❌ Rate limit retries exhausted, treating the player as unrankable"
        );
        Ok(RankStanding::RetriesExhausted)
    }
}
