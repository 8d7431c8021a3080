use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude::{ChannelId, CreateMessage, Http};
use tracing::debug;

use super::embeds;
use crate::error::AppError;
use crate::leaderboard::LeaderboardEntry;
use crate::sync::{NotificationSink, PromotionEvent};

/// Posts announcements to the configured notification channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    http: Arc<Http>,
    channel_id: ChannelId,
}

impl ChannelNotifier {
    pub fn new(http: Arc<Http>, channel_id: ChannelId) -> Self {
        Self { http, channel_id }
    }
}

#[async_trait]
impl NotificationSink for ChannelNotifier {
    async fn promotion(&self, event: &PromotionEvent) -> Result<(), AppError> {
        let message = CreateMessage::new().content(embeds::promotion_message(event));
        self.channel_id.send_message(&*self.http, message).await?;
        debug!(channel_id = %self.channel_id, "📣 Promotion announced");
        Ok(())
    }

    async fn leaderboard(
        &self,
        heading: &str,
        entries: &[LeaderboardEntry],
    ) -> Result<(), AppError> {
        let message = CreateMessage::new()
            .content(format!("**【{heading}】**"))
            .embed(embeds::leaderboard_embed(entries));
        self.channel_id.send_message(&*self.http, message).await?;
        debug!(channel_id = %self.channel_id, count = entries.len(), "📣 Leaderboard posted");
        Ok(())
    }
}
