use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude::UserId;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{Span, debug, error, info, instrument, warn};

use super::lookup::{LookupError, RankLookup, RankStanding};
use super::roles::{MembershipProvider, RoleCatalog, apply_delta, reconcile};
use crate::db::{Repository, TrackedUser};
use crate::error::AppError;
use crate::leaderboard::{self, DisplayNameResolver, LeaderboardEntry};
use crate::rank::{Rank, is_promotion};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionEvent {
    pub user: UserId,
    pub riot_id: String,
    pub previous: Rank,
    pub current: Rank,
}

/// Outbound announcements. Delivery failures never undo a stored rank.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn promotion(&self, event: &PromotionEvent) -> Result<(), AppError>;

    async fn leaderboard(&self, heading: &str, entries: &[LeaderboardEntry])
    -> Result<(), AppError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTrigger {
    Startup,
    Scheduled,
    Manual,
}

impl SyncTrigger {
    pub fn heading(self) -> &'static str {
        match self {
            SyncTrigger::Startup => "Startup ranking update",
            SyncTrigger::Scheduled => "Daily ranking update",
            SyncTrigger::Manual => "Manual ranking update",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassFailure {
    pub discord_id: i64,
    pub reason: String,
}

/// Per-user results of one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub processed: usize,
    /// Members that left the guild.
    pub skipped: usize,
    pub failures: Vec<PassFailure>,
    /// Users whose rank was saved but whose tier roles could not be updated.
    pub role_failures: Vec<PassFailure>,
    pub promotions: usize,
    /// Processed users whose lookup stayed rate limited.
    pub unrankable: usize,
}

#[derive(Debug, Error)]
enum UserSyncError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("rank could not be saved: {0}")]
    Persistence(AppError),
}

enum UserOutcome {
    Updated {
        promoted: bool,
        unrankable: bool,
        role_error: Option<AppError>,
    },
    Skipped,
}

/// Runs reconciliation passes. Only one pass runs at a time, whatever triggered it.
pub struct RankSyncEngine {
    store: Repository,
    lookup: Arc<dyn RankLookup>,
    members: Arc<dyn MembershipProvider>,
    names: Arc<dyn DisplayNameResolver>,
    sink: Arc<dyn NotificationSink>,
    running: Mutex<()>,
}

impl RankSyncEngine {
    pub fn new(
        store: Repository,
        lookup: Arc<dyn RankLookup>,
        members: Arc<dyn MembershipProvider>,
        names: Arc<dyn DisplayNameResolver>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            store,
            lookup,
            members,
            names,
            sink,
            running: Mutex::new(()),
        }
    }

    /// Full pass over every tracked user followed by a leaderboard post.
    ///
    /// Fails only when a pass is already running or when the user list or the
    /// guild roles cannot be read at all.
    #[instrument(skip(self), fields(user_count))]
    pub async fn sync_all(&self, trigger: SyncTrigger) -> Result<PassReport, AppError> {
        let Ok(_running) = self.running.try_lock() else {
            warn!("🔄 ⚠️ A pass is already running, ignoring trigger");
            return Err(AppError::SyncInProgress);
        };

        let users = self.store.list_all().await?;
        Span::current().record("user_count", users.len());

        if users.is_empty() {
            debug!("🔄 No users registered, skipping pass");
            return Ok(PassReport::default());
        }

        let catalog = RoleCatalog::from_guild_roles(&self.members.guild_roles().await?);
        if catalog.is_empty() {
            warn!("🎭 ⚠️ No tier role found in the guild, roles will not change");
        }

        info!(
            count = users.len(),
            tier_roles = catalog.len(),
            trigger = ?trigger,
            "🔄 Starting rank sync pass"
        );
        let report = self.run_pass(&users, &catalog).await;
        info!(
            processed = report.processed,
            skipped = report.skipped,
            failed = report.failures.len(),
            role_failures = report.role_failures.len(),
            promotions = report.promotions,
            unrankable = report.unrankable,
            "🔄 ✅ Rank sync pass finished"
        );

        if let Err(e) = self.publish_leaderboard(trigger.heading()).await {
            error!(error = %e, "🏆 ❌ Failed to publish leaderboard");
        }

        Ok(report)
    }

    /// Reconcile `users` in order. Per-user errors are recorded, never raised.
    pub async fn run_pass(&self, users: &[TrackedUser], catalog: &RoleCatalog) -> PassReport {
        let mut report = PassReport::default();

        for user in users {
            match self.sync_user(user, catalog).await {
                Ok(UserOutcome::Updated {
                    promoted,
                    unrankable,
                    role_error,
                }) => {
                    report.processed += 1;
                    report.promotions += usize::from(promoted);
                    report.unrankable += usize::from(unrankable);
                    if let Some(e) = role_error {
                        report.role_failures.push(PassFailure {
                            discord_id: user.discord_id,
                            reason: e.to_string(),
                        });
                    }
                }
                Ok(UserOutcome::Skipped) => report.skipped += 1,
                Err(e) => {
                    warn!(
                        error = %e,
                        discord_id = user.discord_id,
                        riot_id = %user.riot_id(),
                        "🔄 ⚠️ Failed to sync user"
                    );
                    report.failures.push(PassFailure {
                        discord_id: user.discord_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }

    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, AppError> {
        let users = self.store.list_ranked().await?;
        Ok(leaderboard::build(users, self.names.as_ref()).await)
    }

    pub async fn publish_leaderboard(&self, heading: &str) -> Result<(), AppError> {
        let entries = self.leaderboard().await?;
        self.sink.leaderboard(heading, &entries).await
    }

    /// Remove every tier role from `user`, used when they unregister.
    pub async fn strip_tier_roles(&self, user: UserId) -> Result<(), AppError> {
        let catalog = RoleCatalog::from_guild_roles(&self.members.guild_roles().await?);
        let current = self.members.member_roles(user).await?;
        let delta = reconcile(None, &current, &catalog);
        apply_delta(self.members.as_ref(), user, &delta).await
    }

    /// Drop the registration of `user` and take their tier roles away.
    ///
    /// Roles are stripped even without a stored row so leftovers can be cleared.
    pub async fn unregister(&self, user: UserId) -> Result<Option<TrackedUser>, AppError> {
        match self.strip_tier_roles(user).await {
            Ok(()) | Err(AppError::MembershipUnavailable) => {}
            Err(e) => warn!(error = %e, user_id = %user, "🎭 ⚠️ Could not remove tier roles"),
        }

        let discord_id = user.get() as i64;
        let stored = self.store.get(discord_id).await?;
        if stored.is_some() {
            self.store.delete(discord_id).await?;
        }
        Ok(stored)
    }

    /// Bring the tier roles of `user` in line with `new_rank`.
    async fn sync_roles(
        &self,
        user: UserId,
        new_rank: Option<&Rank>,
        catalog: &RoleCatalog,
    ) -> Result<(), AppError> {
        let current_roles = self.members.member_roles(user).await?;

        let new_tier = new_rank.and_then(Rank::tier);
        if new_rank.is_some() && new_tier.is_none() {
            debug!(?new_rank, "🎭 Tier has no matching role, stripping tier roles");
        }

        let delta = reconcile(new_tier, &current_roles, catalog);
        apply_delta(self.members.as_ref(), user, &delta).await
    }

    #[instrument(
        skip(self, user, catalog),
        fields(discord_id = user.discord_id, riot_id = %user.riot_id())
    )]
    async fn sync_user(
        &self,
        user: &TrackedUser,
        catalog: &RoleCatalog,
    ) -> Result<UserOutcome, UserSyncError> {
        let standing = self.lookup.fetch_rank(&user.puuid).await?;
        let new_rank = standing.rank();

        let role_error = match self.sync_roles(user.user_id(), new_rank, catalog).await {
            Ok(()) => None,
            Err(AppError::MembershipUnavailable) => {
                debug!("🔄 Member left the guild, skipping");
                return Ok(UserOutcome::Skipped);
            }
            Err(e) => {
                warn!(error = %e, "🎭 ⚠️ Tier roles not updated, saving the rank anyway");
                Some(e)
            }
        };

        let promotion = match (user.rank(), new_rank) {
            (Some(previous), Some(current)) if is_promotion(&previous, current) => {
                Some(PromotionEvent {
                    user: user.user_id(),
                    riot_id: user.riot_id(),
                    previous,
                    current: current.clone(),
                })
            }
            _ => None,
        };

        self.store
            .update_rank(user.discord_id, new_rank)
            .await
            .map_err(UserSyncError::Persistence)?;

        if let Some(event) = &promotion {
            info!(
                previous = %event.previous,
                current = %event.current,
                "🎉 Promotion detected"
            );
            if let Err(e) = self.sink.promotion(event).await {
                error!(error = %e, "🎉 ❌ Failed to announce promotion");
            }
        }

        Ok(UserOutcome::Updated {
            promoted: promotion.is_some(),
            unrankable: standing == RankStanding::RetriesExhausted,
            role_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex as StdMutex;

    use poise::serenity_prelude::RoleId;

    use super::*;
    use crate::db::memory_repository;
    use crate::rank::{Division, Tier};
    use crate::sync::roles::tier_role_name;

    struct ScriptedLookup {
        standings: HashMap<String, Result<RankStanding, u16>>,
    }

    #[async_trait]
    impl RankLookup for ScriptedLookup {
        async fn fetch_rank(&self, puuid: &str) -> Result<RankStanding, LookupError> {
            match self.standings.get(puuid) {
                Some(Ok(standing)) => Ok(standing.clone()),
                Some(Err(status)) => Err(LookupError(AppError::RiotApi {
                    status: *status,
                    message: "boom".into(),
                })),
                None => Ok(RankStanding::Unranked),
            }
        }
    }

    /// Guild with one role per tier (id 100 + tier weight). Absent members have left.
    struct FakeGuild {
        members: StdMutex<HashMap<UserId, HashSet<RoleId>>>,
        /// Role edits are refused, as when the bot lacks Manage Roles.
        read_only: bool,
    }

    impl FakeGuild {
        fn new(members: impl IntoIterator<Item = (u64, Vec<RoleId>)>) -> Self {
            Self {
                members: StdMutex::new(
                    members
                        .into_iter()
                        .map(|(id, roles)| (UserId::new(id), roles.into_iter().collect()))
                        .collect(),
                ),
                read_only: false,
            }
        }

        fn without_manage_roles(mut self) -> Self {
            self.read_only = true;
            self
        }

        fn check_writable(&self) -> Result<(), AppError> {
            if self.read_only {
                return Err(AppError::Config("Missing Permissions".into()));
            }
            Ok(())
        }

        fn roles_of(&self, id: u64) -> HashSet<RoleId> {
            self.members.lock().unwrap()[&UserId::new(id)].clone()
        }
    }

    fn tier_role(tier: Tier) -> RoleId {
        RoleId::new(100 + tier.weight() as u64)
    }

    #[async_trait]
    impl MembershipProvider for FakeGuild {
        async fn guild_roles(&self) -> Result<Vec<(RoleId, String)>, AppError> {
            Ok(Tier::ALL
                .into_iter()
                .map(|t| (tier_role(t), tier_role_name(t)))
                .collect())
        }

        async fn member_roles(&self, user: UserId) -> Result<HashSet<RoleId>, AppError> {
            self.members
                .lock()
                .unwrap()
                .get(&user)
                .cloned()
                .ok_or(AppError::MembershipUnavailable)
        }

        async fn remove_role(&self, user: UserId, role: RoleId) -> Result<(), AppError> {
            self.check_writable()?;
            let mut members = self.members.lock().unwrap();
            let roles = members.get_mut(&user).ok_or(AppError::MembershipUnavailable)?;
            roles.remove(&role);
            Ok(())
        }

        async fn add_role(&self, user: UserId, role: RoleId) -> Result<(), AppError> {
            self.check_writable()?;
            let mut members = self.members.lock().unwrap();
            let roles = members.get_mut(&user).ok_or(AppError::MembershipUnavailable)?;
            roles.insert(role);
            Ok(())
        }
    }

    struct Names;

    #[async_trait]
    impl DisplayNameResolver for Names {
        async fn display_name(&self, user: UserId) -> Result<String, AppError> {
            Ok(format!("<@{user}>"))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        promotions: StdMutex<Vec<PromotionEvent>>,
        boards: StdMutex<Vec<(String, usize)>>,
        fail: bool,
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn promotion(&self, event: &PromotionEvent) -> Result<(), AppError> {
            if self.fail {
                return Err(AppError::Config("channel gone".into()));
            }
            self.promotions.lock().unwrap().push(event.clone());
            Ok(())
        }

        async fn leaderboard(
            &self,
            heading: &str,
            entries: &[LeaderboardEntry],
        ) -> Result<(), AppError> {
            self.boards
                .lock()
                .unwrap()
                .push((heading.to_string(), entries.len()));
            Ok(())
        }
    }

    struct Harness {
        engine: RankSyncEngine,
        store: Repository,
        guild: Arc<FakeGuild>,
        sink: Arc<RecordingSink>,
    }

    async fn harness(
        standings: Vec<(&str, Result<RankStanding, u16>)>,
        guild: FakeGuild,
        sink: RecordingSink,
    ) -> Harness {
        let store = memory_repository().await;
        let guild = Arc::new(guild);
        let sink = Arc::new(sink);
        let lookup = ScriptedLookup {
            standings: standings
                .into_iter()
                .map(|(p, s)| (p.to_string(), s))
                .collect(),
        };
        let engine = RankSyncEngine::new(
            store.clone(),
            Arc::new(lookup),
            guild.clone(),
            Arc::new(Names),
            sink.clone(),
        );
        Harness {
            engine,
            store,
            guild,
            sink,
        }
    }

    async fn register(store: &Repository, id: u64, puuid: &str, rank: Option<Rank>) {
        let user = TrackedUser::new(UserId::new(id), puuid, "Player", "jp1").with_rank(rank.as_ref());
        store.upsert(&user).await.unwrap();
    }

    fn ranked(tier: Tier, division: Division, points: i32) -> Result<RankStanding, u16> {
        Ok(RankStanding::Ranked(Rank::new(tier, division, points)))
    }

    #[tokio::test]
    async fn one_failed_lookup_does_not_abort_the_pass() {
        let h = harness(
            vec![
                ("p1", ranked(Tier::Gold, Division::I, 10)),
                ("p2", Err(500)),
                ("p3", ranked(Tier::Iron, Division::II, 50)),
            ],
            FakeGuild::new([(1, vec![]), (2, vec![]), (3, vec![])]),
            RecordingSink::default(),
        )
        .await;
        for (id, puuid) in [(1, "p1"), (2, "p2"), (3, "p3")] {
            register(&h.store, id, puuid, None).await;
        }

        let report = h.engine.sync_all(SyncTrigger::Manual).await.unwrap();

        assert_eq!(report.processed, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].discord_id, 2);
        assert!(h.store.get(1).await.unwrap().unwrap().rank().is_some());
        assert!(h.store.get(2).await.unwrap().unwrap().rank().is_none());
        assert!(h.store.get(3).await.unwrap().unwrap().rank().is_some());
        assert_eq!(h.guild.roles_of(3), HashSet::from([tier_role(Tier::Iron)]));
    }

    #[tokio::test]
    async fn promotion_swaps_roles_and_is_announced() {
        let h = harness(
            vec![("p1", ranked(Tier::Gold, Division::IV, 0))],
            FakeGuild::new([(1, vec![tier_role(Tier::Silver), RoleId::new(9)])]),
            RecordingSink::default(),
        )
        .await;
        register(&h.store, 1, "p1", Some(Rank::new(Tier::Silver, Division::I, 99))).await;

        let report = h.engine.sync_all(SyncTrigger::Scheduled).await.unwrap();

        assert_eq!(report.promotions, 1);
        assert_eq!(
            h.guild.roles_of(1),
            HashSet::from([tier_role(Tier::Gold), RoleId::new(9)])
        );
        let promotions = h.sink.promotions.lock().unwrap();
        assert_eq!(promotions.len(), 1);
        assert_eq!(promotions[0].previous.tier, "SILVER");
        assert_eq!(promotions[0].current.tier, "GOLD");
        assert_eq!(
            h.store.get(1).await.unwrap().unwrap().rank(),
            Some(Rank::new(Tier::Gold, Division::IV, 0))
        );
    }

    #[tokio::test]
    async fn points_gain_is_not_a_promotion() {
        let h = harness(
            vec![("p1", ranked(Tier::Gold, Division::II, 90))],
            FakeGuild::new([(1, vec![tier_role(Tier::Gold)])]),
            RecordingSink::default(),
        )
        .await;
        register(&h.store, 1, "p1", Some(Rank::new(Tier::Gold, Division::II, 10))).await;

        let report = h.engine.sync_all(SyncTrigger::Scheduled).await.unwrap();

        assert_eq!(report.promotions, 0);
        assert!(h.sink.promotions.lock().unwrap().is_empty());
        assert_eq!(h.store.get(1).await.unwrap().unwrap().league_points, Some(90));
    }

    #[tokio::test]
    async fn first_ranking_is_not_a_promotion() {
        let h = harness(
            vec![("p1", ranked(Tier::Diamond, Division::IV, 0))],
            FakeGuild::new([(1, vec![])]),
            RecordingSink::default(),
        )
        .await;
        register(&h.store, 1, "p1", None).await;

        let report = h.engine.sync_all(SyncTrigger::Scheduled).await.unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(report.promotions, 0);
    }

    #[tokio::test]
    async fn unranked_result_clears_rank_and_roles() {
        let h = harness(
            vec![("p1", Ok(RankStanding::Unranked))],
            FakeGuild::new([(1, vec![tier_role(Tier::Platinum)])]),
            RecordingSink::default(),
        )
        .await;
        register(&h.store, 1, "p1", Some(Rank::new(Tier::Platinum, Division::III, 5))).await;

        h.engine.sync_all(SyncTrigger::Scheduled).await.unwrap();

        let stored = h.store.get(1).await.unwrap().unwrap();
        assert_eq!((stored.tier, stored.division, stored.league_points), (None, None, None));
        assert!(h.guild.roles_of(1).is_empty());
    }

    #[tokio::test]
    async fn exhausted_lookup_counts_as_unrankable() {
        let h = harness(
            vec![("p1", Ok(RankStanding::RetriesExhausted))],
            FakeGuild::new([(1, vec![])]),
            RecordingSink::default(),
        )
        .await;
        register(&h.store, 1, "p1", Some(Rank::new(Tier::Gold, Division::I, 5))).await;

        let report = h.engine.sync_all(SyncTrigger::Scheduled).await.unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(report.unrankable, 1);
        assert!(report.failures.is_empty());
        assert!(h.store.get(1).await.unwrap().unwrap().rank().is_none());
    }

    #[tokio::test]
    async fn member_who_left_is_skipped_and_untouched() {
        let h = harness(
            vec![("p1", ranked(Tier::Master, Division::I, 100))],
            FakeGuild::new([]),
            RecordingSink::default(),
        )
        .await;
        let stored = Rank::new(Tier::Gold, Division::I, 5);
        register(&h.store, 1, "p1", Some(stored.clone())).await;

        let report = h.engine.sync_all(SyncTrigger::Scheduled).await.unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.processed, 0);
        assert!(report.failures.is_empty());
        assert_eq!(h.store.get(1).await.unwrap().unwrap().rank(), Some(stored));
    }

    #[tokio::test]
    async fn failed_announcement_keeps_the_new_rank() {
        let h = harness(
            vec![("p1", ranked(Tier::Gold, Division::IV, 0))],
            FakeGuild::new([(1, vec![])]),
            RecordingSink {
                fail: true,
                ..Default::default()
            },
        )
        .await;
        register(&h.store, 1, "p1", Some(Rank::new(Tier::Silver, Division::I, 0))).await;

        let report = h.engine.sync_all(SyncTrigger::Scheduled).await.unwrap();

        assert_eq!(report.promotions, 1);
        assert_eq!(
            h.store.get(1).await.unwrap().unwrap().tier.as_deref(),
            Some("GOLD")
        );
    }

    #[tokio::test]
    async fn pass_publishes_the_leaderboard() {
        let h = harness(
            vec![
                ("p1", ranked(Tier::Gold, Division::IV, 0)),
                ("p2", Ok(RankStanding::Unranked)),
            ],
            FakeGuild::new([(1, vec![]), (2, vec![])]),
            RecordingSink::default(),
        )
        .await;
        register(&h.store, 1, "p1", None).await;
        register(&h.store, 2, "p2", None).await;

        h.engine.sync_all(SyncTrigger::Startup).await.unwrap();

        assert_eq!(
            *h.sink.boards.lock().unwrap(),
            vec![(SyncTrigger::Startup.heading().to_string(), 1)]
        );
    }

    #[tokio::test]
    async fn overlapping_triggers_are_rejected() {
        let h = harness(vec![], FakeGuild::new([]), RecordingSink::default()).await;
        register(&h.store, 1, "p1", None).await;

        let _running = h.engine.running.try_lock().unwrap();
        let res = h.engine.sync_all(SyncTrigger::Manual).await;

        assert!(matches!(res, Err(AppError::SyncInProgress)));
    }

    #[tokio::test]
    async fn strip_tier_roles_keeps_other_roles() {
        let h = harness(
            vec![],
            FakeGuild::new([(1, vec![tier_role(Tier::Gold), RoleId::new(9)])]),
            RecordingSink::default(),
        )
        .await;

        h.engine.strip_tier_roles(UserId::new(1)).await.unwrap();

        assert_eq!(h.guild.roles_of(1), HashSet::from([RoleId::new(9)]));
    }

    #[tokio::test]
    async fn refused_role_update_still_saves_rank_and_announces() {
        let h = harness(
            vec![("p1", ranked(Tier::Gold, Division::IV, 0))],
            FakeGuild::new([(1, vec![tier_role(Tier::Silver)])]).without_manage_roles(),
            RecordingSink::default(),
        )
        .await;
        register(&h.store, 1, "p1", Some(Rank::new(Tier::Silver, Division::I, 50))).await;

        let report = h.engine.sync_all(SyncTrigger::Scheduled).await.unwrap();

        assert_eq!(report.processed, 1);
        assert!(report.failures.is_empty());
        assert_eq!(report.role_failures.len(), 1);
        assert_eq!(report.role_failures[0].discord_id, 1);
        assert_eq!(report.promotions, 1);
        assert_eq!(h.sink.promotions.lock().unwrap().len(), 1);
        assert_eq!(
            h.store.get(1).await.unwrap().unwrap().rank(),
            Some(Rank::new(Tier::Gold, Division::IV, 0))
        );
        assert_eq!(h.guild.roles_of(1), HashSet::from([tier_role(Tier::Silver)]));
    }

    #[tokio::test]
    async fn unregister_deletes_the_row_and_strips_roles() {
        let h = harness(
            vec![],
            FakeGuild::new([(1, vec![tier_role(Tier::Gold), RoleId::new(9)])]),
            RecordingSink::default(),
        )
        .await;
        register(&h.store, 1, "p1", Some(Rank::new(Tier::Gold, Division::I, 5))).await;

        let removed = h.engine.unregister(UserId::new(1)).await.unwrap();

        assert_eq!(removed.map(|u| u.puuid), Some("p1".to_string()));
        assert!(h.store.get(1).await.unwrap().is_none());
        assert_eq!(h.guild.roles_of(1), HashSet::from([RoleId::new(9)]));
    }

    #[tokio::test]
    async fn unregister_without_a_row_still_clears_leftover_roles() {
        let h = harness(
            vec![],
            FakeGuild::new([(1, vec![tier_role(Tier::Bronze)])]),
            RecordingSink::default(),
        )
        .await;

        let removed = h.engine.unregister(UserId::new(1)).await.unwrap();

        assert!(removed.is_none());
        assert!(h.guild.roles_of(1).is_empty());
    }

    #[tokio::test]
    async fn unregister_after_leaving_the_guild_deletes_the_row() {
        let h = harness(vec![], FakeGuild::new([]), RecordingSink::default()).await;
        register(&h.store, 1, "p1", None).await;

        let removed = h.engine.unregister(UserId::new(1)).await.unwrap();

        assert!(removed.is_some());
        assert!(h.store.get(1).await.unwrap().is_none());
    }
}
