use tracing::{info, instrument};

use crate::discord::bot::Context;
use crate::discord::embeds;
use crate::error::AppError;

/// Leave the Solo/Duo ranking
#[poise::command(slash_command, guild_only)]
#[instrument(skip(ctx), fields(user_id = %ctx.author().id))]
pub async fn unregister(ctx: Context<'_>) -> Result<(), AppError> {
    ctx.defer().await?;

    let user = ctx
        .data()
        .engine
        .unregister(ctx.author().id)
        .await?
        .ok_or(AppError::NotRegistered)?;

    ctx.send(poise::CreateReply::default().embed(embeds::unregistered_embed(&user)))
        .await?;

    info!(riot_id = %user.riot_id(), "Member unregistered");

    Ok(())
}
