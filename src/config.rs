use std::env;
use std::num::NonZeroU32;
use std::str::FromStr;

use chrono::{FixedOffset, NaiveTime};

use crate::error::AppError;
use crate::riot::Platform;

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub riot_api_key: String,
    pub guild_id: u64,
    pub notification_channel_id: u64,
    pub database_url: String,
    pub platform: Platform,
    pub riot_rate_limit_per_second: NonZeroU32,
    pub sync_time: NaiveTime,
    pub sync_offset: FixedOffset,
    pub sync_on_startup: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        const DEFAULT_RIOT_RATE_LIMIT_PER_SECOND: u32 = 20;
        const DEFAULT_PLATFORM: &str = "JP1";
        const DEFAULT_SYNC_TIME: &str = "12:00";
        const DEFAULT_SYNC_UTC_OFFSET_HOURS: i32 = 9;

        let discord_token = required("DISCORD_TOKEN")?;
        let riot_api_key = required("RIOT_API_KEY")?;
        let guild_id = parse_id("GUILD_ID", &required("GUILD_ID")?)?;
        let notification_channel_id = parse_id(
            "NOTIFICATION_CHANNEL_ID",
            &required("NOTIFICATION_CHANNEL_ID")?,
        )?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:tierwatch.db".into());

        let platform = Platform::from_str(
            &env::var("RIOT_PLATFORM").unwrap_or_else(|_| DEFAULT_PLATFORM.into()),
        )?;

        let riot_rate_limit_per_second = env::var("RIOT_RATE_LIMIT_PER_SECOND")
            .ok()
            .and_then(|v| v.parse().ok())
            .and_then(NonZeroU32::new)
            .unwrap_or_else(|| {
                NonZeroU32::new(DEFAULT_RIOT_RATE_LIMIT_PER_SECOND).unwrap_or(NonZeroU32::MIN)
            });

        let sync_time = parse_sync_time(
            &env::var("SYNC_TIME").unwrap_or_else(|_| DEFAULT_SYNC_TIME.into()),
        )?;

        let offset_hours = match env::var("SYNC_UTC_OFFSET_HOURS") {
            Ok(v) => v
                .parse::<i32>()
                .map_err(|_| AppError::Config(format!("SYNC_UTC_OFFSET_HOURS is invalid: {v}")))?,
            Err(_) => DEFAULT_SYNC_UTC_OFFSET_HOURS,
        };
        let sync_offset = parse_offset(offset_hours)?;

        let sync_on_startup = env::var("SYNC_ON_STARTUP")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            discord_token,
            riot_api_key,
            guild_id,
            notification_channel_id,
            database_url,
            platform,
            riot_rate_limit_per_second,
            sync_time,
            sync_offset,
            sync_on_startup,
        })
    }
}

fn required(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Config(format!("{name} must be set")))
}

fn parse_id(name: &str, value: &str) -> Result<u64, AppError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .ok_or_else(|| AppError::Config(format!("{name} must be a non-zero snowflake id")))
}

fn parse_sync_time(value: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| AppError::Config(format!("SYNC_TIME must be HH:MM, got {value}")))
}

fn parse_offset(hours: i32) -> Result<FixedOffset, AppError> {
    FixedOffset::east_opt(hours * 3600)
        .ok_or_else(|| AppError::Config(format!("SYNC_UTC_OFFSET_HOURS out of range: {hours}")))
}
