use std::sync::Arc;

use chrono::{DateTime, Days, FixedOffset, NaiveTime, TimeDelta, TimeZone, Utc};
use tracing::{error, info, warn};

use super::engine::{RankSyncEngine, SyncTrigger};
use crate::error::AppError;

/// Once a day at a wall-clock time in a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    pub at: NaiveTime,
    pub offset: FixedOffset,
}

impl DailySchedule {
    pub fn new(at: NaiveTime, offset: FixedOffset) -> Self {
        Self { at, offset }
    }

    /// First occurrence strictly after `now`.
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local_today = now.with_timezone(&self.offset).date_naive();
        let today = self
            .offset
            .from_local_datetime(&local_today.and_time(self.at))
            .single();

        match today {
            Some(candidate) if candidate > now => candidate.with_timezone(&Utc),
            Some(candidate) => (candidate + Days::new(1)).with_timezone(&Utc),
            // A fixed offset maps every local time to exactly one instant.
            None => now + TimeDelta::days(1),
        }
    }
}

/// Run a pass at every occurrence of `schedule`, forever.
pub async fn run_daily(engine: Arc<RankSyncEngine>, schedule: DailySchedule) {
    info!(at = %schedule.at, offset = %schedule.offset, "⏰ Daily rank sync scheduled");

    loop {
        let now = Utc::now();
        let next = schedule.next_after(now);
        let wait = (next - now).to_std().unwrap_or_default();
        info!(next = %next, "⏰ Next rank sync");

        tokio::time::sleep(wait).await;

        match engine.sync_all(SyncTrigger::Scheduled).await {
            Ok(_) => {}
            Err(AppError::SyncInProgress) => {
                warn!("⏰ ⚠️ Previous pass still running, skipping this occurrence");
            }
            Err(e) => error!(error = %e, "⏰ ❌ Scheduled rank sync failed"),
        }
    }
}
