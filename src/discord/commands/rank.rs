use poise::serenity_prelude as serenity;
use tracing::instrument;

use crate::discord::bot::Context;
use crate::discord::embeds;
use crate::error::AppError;

/// Look up the current Solo/Duo rank of a registered member
#[poise::command(slash_command, guild_only)]
#[instrument(skip(ctx, member), fields(user_id = %ctx.author().id))]
pub async fn rank(
    ctx: Context<'_>,
    #[description = "Member to look up (defaults to you)"] member: Option<serenity::User>,
) -> Result<(), AppError> {
    ctx.defer().await?;

    let target = member.as_ref().unwrap_or_else(|| ctx.author()).id;

    let user = ctx
        .data()
        .db
        .get(target.get() as i64)
        .await?
        .ok_or(AppError::NotRegistered)?;

    let standing = ctx
        .data()
        .lookup
        .fetch_rank(&user.puuid)
        .await
        .map_err(|e| e.0)?;

    ctx.send(poise::CreateReply::default().embed(embeds::standing_embed(&user, &standing)))
        .await?;

    Ok(())
}
