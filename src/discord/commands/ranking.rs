use tracing::instrument;

use crate::discord::bot::Context;
use crate::discord::embeds;
use crate::error::AppError;

/// Show the Solo/Duo leaderboard
#[poise::command(slash_command, guild_only)]
#[instrument(skip(ctx), fields(user_id = %ctx.author().id))]
pub async fn ranking(ctx: Context<'_>) -> Result<(), AppError> {
    ctx.defer().await?;

    let entries = ctx.data().engine.leaderboard().await?;

    ctx.send(poise::CreateReply::default().embed(embeds::leaderboard_embed(&entries)))
        .await?;

    Ok(())
}
