use poise::serenity_prelude::{self as serenity, UserId};
use tracing::{info, instrument};

use crate::db::TrackedUser;
use crate::discord::bot::{Context, Data};
use crate::discord::embeds;
use crate::error::AppError;

/// Link your Riot ID to the Solo/Duo ranking
#[poise::command(slash_command, guild_only)]
#[instrument(
    skip(ctx),
    fields(
        user_id = %ctx.author().id,
        riot_id = %format!("{}#{}", game_name, tag_line)
    )
)]
pub async fn register(
    ctx: Context<'_>,
    #[description = "Game name (before the #)"] game_name: String,
    #[description = "Tag line (after the #)"] tag_line: String,
) -> Result<(), AppError> {
    ctx.defer().await?;

    let user = link_account(ctx.data(), ctx.author().id, &game_name, &tag_line).await?;

    ctx.send(poise::CreateReply::default().embed(embeds::registered_embed(&user)))
        .await?;

    info!(puuid = %user.puuid, "Member registered");

    Ok(())
}

/// Link a Riot ID on behalf of another member
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "ADMINISTRATOR",
    default_member_permissions = "ADMINISTRATOR"
)]
#[instrument(
    skip(ctx, member),
    fields(
        user_id = %ctx.author().id,
        target_id = %member.id,
        riot_id = %format!("{}#{}", game_name, tag_line)
    )
)]
pub async fn register_by_other(
    ctx: Context<'_>,
    #[description = "Member to register"] member: serenity::User,
    #[description = "Game name (before the #)"] game_name: String,
    #[description = "Tag line (after the #)"] tag_line: String,
) -> Result<(), AppError> {
    ctx.defer_ephemeral().await?;

    let user = link_account(ctx.data(), member.id, &game_name, &tag_line).await?;

    ctx.send(
        poise::CreateReply::default()
            .embed(embeds::registered_embed(&user))
            .ephemeral(true),
    )
    .await?;

    info!(puuid = %user.puuid, "Member registered by an administrator");

    Ok(())
}

/// Resolve the Riot ID, read the current rank and store the registration.
async fn link_account(
    data: &Data,
    member: UserId,
    game_name: &str,
    tag_line: &str,
) -> Result<TrackedUser, AppError> {
    let tag_line = normalize_tag_line(tag_line);
    let game_name = game_name.trim();

    let account = data
        .riot
        .get_account_by_riot_id(data.platform.region(), game_name, &tag_line)
        .await?;

    let actual_game_name = account.game_name.as_deref().unwrap_or(game_name);
    let actual_tag_line = account.tag_line.as_deref().unwrap_or(&tag_line);

    let standing = data
        .lookup
        .fetch_rank(&account.puuid)
        .await
        .map_err(|e| e.0)?;

    let user = TrackedUser::new(member, &account.puuid, actual_game_name, actual_tag_line)
        .with_rank(standing.rank());
    data.db.upsert(&user).await?;

    Ok(user)
}

/// Accept `#JP1`, ` jp1 ` and `JP1` alike.
fn normalize_tag_line(tag_line: &str) -> String {
    tag_line.trim().trim_start_matches('#').to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_line_is_normalized() {
        assert_eq!(normalize_tag_line("#jp1"), "JP1");
        assert_eq!(normalize_tag_line(" euw "), "EUW");
        assert_eq!(normalize_tag_line("NA1"), "NA1");
    }
}
