//! Periodic reconciliation of stored ranks, tier roles and announcements.

mod engine;
mod lookup;
mod roles;
mod schedule;

pub use engine::{
    NotificationSink, PassFailure, PassReport, PromotionEvent, RankSyncEngine, SyncTrigger,
};
pub use lookup::{RankLookup, RankLookupClient, RankStanding};
pub use roles::MembershipProvider;
pub use schedule::{DailySchedule, run_daily};
