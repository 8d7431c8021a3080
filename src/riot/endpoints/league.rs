use crate::error::AppError;
use crate::riot::client::RiotClient;
use crate::riot::region::Platform;
use crate::riot::types::LeagueEntryDto;

impl RiotClient {
    /// Get league entries (ranked info) for a player by PUUID
    /// Uses platform routing (jp1, euw1, kr, etc.)
    pub async fn get_league_entries_by_puuid(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<Vec<LeagueEntryDto>, AppError> {
        let url = format!(
            "{}/lol/league/v4/entries/by-puuid/{}",
            self.platform_url(platform),
            puuid
        );

        self.get(&url).await
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn entries_are_fetched_by_puuid() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/lol/league/v4/entries/by-puuid/puuid-1");
                then.status(200).json_body(json!([
                    {
                        "leagueId": "l1",
                        "queueType": "RANKED_FLEX_SR",
                        "tier": "PLATINUM",
                        "rank": "III",
                        "leaguePoints": 12,
                        "wins": 3,
                        "losses": 4
                    },
                    {
                        "leagueId": "l2",
                        "queueType": "RANKED_SOLO_5x5",
                        "tier": "GOLD",
                        "rank": "II",
                        "leaguePoints": 40,
                        "wins": 10,
                        "losses": 8
                    }
                ]));
            })
            .await;

        let client = RiotClient::new("k".into(), NonZeroU32::new(100).unwrap())
            .with_base_url(server.base_url());
        let entries = client
            .get_league_entries_by_puuid(Platform::JP1, "puuid-1")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(entries.len(), 2);
        let solo = entries.iter().find(|e| e.is_solo_queue()).unwrap();
        assert_eq!((solo.tier.as_str(), solo.rank.as_str(), solo.league_points), ("GOLD", "II", 40));
    }

    #[tokio::test]
    async fn unranked_player_has_no_entries() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200).json_body(json!([]));
            })
            .await;

        let client = RiotClient::new("k".into(), NonZeroU32::new(100).unwrap())
            .with_base_url(server.base_url());
        let entries = client
            .get_league_entries_by_puuid(Platform::KR, "puuid-2")
            .await
            .unwrap();

        assert!(entries.is_empty());
    }
}
