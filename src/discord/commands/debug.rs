use poise::serenity_prelude as serenity;
use tracing::{info, instrument, warn};

use crate::discord::bot::Context;
use crate::error::AppError;
use crate::rank::{Division, Rank, Tier};
use crate::sync::{PassFailure, PassReport, SyncTrigger};

/// Failures listed per section, keeping the reply under the message limit.
const MAX_LISTED_FAILURES: usize = 10;

/// Run a rank synchronization pass now
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "ADMINISTRATOR",
    default_member_permissions = "ADMINISTRATOR"
)]
#[instrument(skip(ctx), fields(user_id = %ctx.author().id))]
pub async fn debug_sync(ctx: Context<'_>) -> Result<(), AppError> {
    // Interaction tokens expire after 15 minutes, reply before the pass starts.
    ctx.send(
        poise::CreateReply::default()
            .content("Rank synchronization started, the report follows when it finishes.")
            .ephemeral(true),
    )
    .await?;

    let report = ctx.data().engine.sync_all(SyncTrigger::Manual).await?;
    let summary = report_summary(&report);

    if let Err(e) = ctx
        .send(
            poise::CreateReply::default()
                .content(summary.as_str())
                .ephemeral(true),
        )
        .await
    {
        warn!(error = %e, report = %summary, "Could not deliver the pass report");
    }

    Ok(())
}

/// Set every stored rank to IRON IV / 0LP
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "ADMINISTRATOR",
    default_member_permissions = "ADMINISTRATOR"
)]
#[instrument(skip(ctx), fields(user_id = %ctx.author().id))]
pub async fn debug_rank_all_iron(ctx: Context<'_>) -> Result<(), AppError> {
    ctx.defer_ephemeral().await?;

    let rank = Rank::new(Tier::Iron, Division::IV, 0);
    let updated = ctx.data().db.set_all_ranks(&rank).await?;

    info!(updated, "Stored ranks reset to iron");

    ctx.send(
        poise::CreateReply::default()
            .content(format!("Set {updated} stored rank(s) to **{rank}**."))
            .ephemeral(true),
    )
    .await?;

    Ok(())
}

/// Overwrite the stored rank of a member
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "ADMINISTRATOR",
    default_member_permissions = "ADMINISTRATOR"
)]
#[instrument(skip(ctx, member), fields(user_id = %ctx.author().id, target_id = %member.id))]
pub async fn debug_modify_rank(
    ctx: Context<'_>,
    #[description = "Registered member"] member: serenity::User,
    #[description = "Tier"] tier: Tier,
    #[description = "Division"] division: Division,
    #[description = "League points"]
    #[min = 0]
    league_points: i32,
) -> Result<(), AppError> {
    ctx.defer_ephemeral().await?;

    let rank = Rank::new(tier, division, league_points);
    let updated = ctx
        .data()
        .db
        .update_rank(member.id.get() as i64, Some(&rank))
        .await?;

    if !updated {
        return Err(AppError::NotRegistered);
    }

    info!(%rank, "Stored rank overwritten");

    ctx.send(
        poise::CreateReply::default()
            .content(format!("Stored rank of {} set to **{rank}**.", member.name))
            .ephemeral(true),
    )
    .await?;

    Ok(())
}

fn report_summary(report: &PassReport) -> String {
    let mut summary = format!(
        "Synchronized {} member(s): {} promotion(s), {} left the server, {} unrankable.",
        report.processed, report.promotions, report.skipped, report.unrankable
    );

    push_failures(&mut summary, "failure(s)", &report.failures);
    push_failures(&mut summary, "role update failure(s)", &report.role_failures);

    summary
}

fn push_failures(summary: &mut String, label: &str, failures: &[PassFailure]) {
    if failures.is_empty() {
        return;
    }

    summary.push_str(&format!("\n{} {label}:", failures.len()));
    for failure in failures.iter().take(MAX_LISTED_FAILURES) {
        summary.push_str(&format!("\n- <@{}>: {}", failure.discord_id, failure.reason));
    }
    if failures.len() > MAX_LISTED_FAILURES {
        summary.push_str(&format!(
            "\n- and {} more, see the logs",
            failures.len() - MAX_LISTED_FAILURES
        ));
    }
}
