use std::sync::Arc;

use poise::serenity_prelude::{self as serenity, ChannelId, GuildId};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::db::Repository;
use crate::error::AppError;
use crate::riot::{Platform, RiotClient};
use crate::sync::{
    DailySchedule, RankLookup, RankLookupClient, RankSyncEngine, SyncTrigger, run_daily,
};

use super::commands;
use super::guild::GuildMembers;
use super::notifier::ChannelNotifier;

/// Shared data accessible in all commands
pub struct Data {
    pub db: Repository,
    pub riot: RiotClient,
    pub platform: Platform,
    pub lookup: Arc<dyn RankLookup>,
    pub engine: Arc<RankSyncEngine>,
}

impl std::fmt::Debug for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Data")
            .field("db", &self.db)
            .field("riot", &self.riot)
            .field("platform", &self.platform)
            .field("engine", &"<RankSyncEngine>")
            .finish()
    }
}

pub type Context<'a> = poise::Context<'a, Data, AppError>;

pub fn create_framework(
    config: Config,
    db: Repository,
    riot: RiotClient,
) -> poise::Framework<Data, AppError> {
    poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::register(),
                commands::register_by_other(),
                commands::unregister(),
                commands::ranking(),
                commands::rank(),
                commands::debug_sync(),
                commands::debug_rank_all_iron(),
                commands::debug_modify_rank(),
            ],
            on_error: |error| {
                Box::pin(async move {
                    handle_error(error).await;
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                let guild_id = GuildId::new(config.guild_id);
                poise::builtins::register_in_guild(ctx, &framework.options().commands, guild_id)
                    .await?;

                let guild = Arc::new(GuildMembers::new(ctx.http.clone(), guild_id));
                let notifier = Arc::new(ChannelNotifier::new(
                    ctx.http.clone(),
                    ChannelId::new(config.notification_channel_id),
                ));
                let lookup: Arc<dyn RankLookup> =
                    Arc::new(RankLookupClient::new(riot.clone(), config.platform));
                let engine = Arc::new(RankSyncEngine::new(
                    db.clone(),
                    lookup.clone(),
                    guild.clone(),
                    guild,
                    notifier,
                ));

                let schedule = DailySchedule::new(config.sync_time, config.sync_offset);
                tokio::spawn(run_daily(engine.clone(), schedule));
                tokio::spawn(startup_update(engine.clone(), config.sync_on_startup));

                info!(
                    bot_name = %ready.user.name,
                    guild_id = %guild_id,
                    platform = %config.platform,
                    "🎮 Bot is ready"
                );

                Ok(Data {
                    db,
                    riot,
                    platform: config.platform,
                    lookup,
                    engine,
                })
            })
        })
        .build()
}

/// Post the standings once the gateway is up, optionally after a full pass.
async fn startup_update(engine: Arc<RankSyncEngine>, full_pass: bool) {
    let result = if full_pass {
        engine.sync_all(SyncTrigger::Startup).await.map(|_| ())
    } else {
        engine
            .publish_leaderboard(SyncTrigger::Startup.heading())
            .await
    };

    if let Err(e) = result {
        error!(error = %e, "🎮 ❌ Startup ranking update failed");
    }
}

async fn handle_error(error: poise::FrameworkError<'_, Data, AppError>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            let command_name = ctx.command().name.as_str();
            match &error {
                AppError::PlayerNotFound { .. }
                | AppError::PlayerAlreadyRegistered { .. }
                | AppError::NotRegistered
                | AppError::SyncInProgress => {
                    warn!(
                        error = %error,
                        command = command_name,
                        user_id = %ctx.author().id,
                        "🎮 ⚠️ Command rejected"
                    );
                }
                _ => {
                    error!(
                        error = ?error,
                        command = command_name,
                        user_id = %ctx.author().id,
                        "🎮 ❌ Command execution failed"
                    );
                }
            }
            let _ = ctx.say(format!("Error: {}", error)).await;
        }
        poise::FrameworkError::ArgumentParse { error, ctx, .. } => {
            warn!(
                error = %error,
                command = ctx.command().name.as_str(),
                "🎮 ⚠️ Invalid command argument"
            );
            let _ = ctx.say(format!("Invalid argument: {}", error)).await;
        }
        poise::FrameworkError::MissingBotPermissions {
            missing_permissions,
            ctx,
            ..
        } => {
            warn!(
                permissions = %missing_permissions,
                command = ctx.command().name.as_str(),
                "🎮 ⚠️ Bot missing permissions"
            );
            let _ = ctx
                .say(format!("Missing permissions: {}", missing_permissions))
                .await;
        }
        poise::FrameworkError::MissingUserPermissions {
            missing_permissions,
            ctx,
            ..
        } => {
            if let Some(perms) = missing_permissions {
                warn!(
                    permissions = %perms,
                    user_id = %ctx.author().id,
                    command = ctx.command().name.as_str(),
                    "🎮 ⚠️ User missing permissions"
                );
                let _ = ctx
                    .say(format!("You need these permissions: {}", perms))
                    .await;
            }
        }
        other => {
            error!(error = ?other, "🎮 ❌ Unhandled framework error");
        }
    }
}

/// Builds the gateway client around the framework.
pub async fn build_client(
    token: &str,
    framework: poise::Framework<Data, AppError>,
) -> Result<serenity::Client, AppError> {
    let intents = serenity::GatewayIntents::non_privileged();
    let client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;
    Ok(client)
}
