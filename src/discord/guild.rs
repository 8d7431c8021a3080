//! Serenity backed implementations of the membership and naming seams.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude::{GuildId, Http, Mentionable, RoleId, UserId};
use serenity::http::HttpError;

use crate::error::AppError;
use crate::leaderboard::DisplayNameResolver;
use crate::sync::MembershipProvider;

/// Discord JSON error codes meaning the member or user is gone.
const UNKNOWN_MEMBER: isize = 10007;
const UNKNOWN_USER: isize = 10013;

const AUDIT_REASON: &str = "Solo/Duo rank synchronization";

#[derive(Debug, Clone)]
pub struct GuildMembers {
    http: Arc<Http>,
    guild_id: GuildId,
}

impl GuildMembers {
    pub fn new(http: Arc<Http>, guild_id: GuildId) -> Self {
        Self { http, guild_id }
    }
}

fn member_error(err: serenity::Error) -> AppError {
    match &err {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(res))
            if matches!(res.error.code, UNKNOWN_MEMBER | UNKNOWN_USER) =>
        {
            AppError::MembershipUnavailable
        }
        _ => err.into(),
    }
}

#[async_trait]
impl MembershipProvider for GuildMembers {
    async fn guild_roles(&self) -> Result<Vec<(RoleId, String)>, AppError> {
        let roles = self.http.get_guild_roles(self.guild_id).await?;
        Ok(roles.into_iter().map(|r| (r.id, r.name)).collect())
    }

    async fn member_roles(&self, user: UserId) -> Result<HashSet<RoleId>, AppError> {
        let member = self
            .http
            .get_member(self.guild_id, user)
            .await
            .map_err(member_error)?;
        Ok(member.roles.into_iter().collect())
    }

    async fn remove_role(&self, user: UserId, role: RoleId) -> Result<(), AppError> {
        self.http
            .remove_member_role(self.guild_id, user, role, Some(AUDIT_REASON))
            .await
            .map_err(member_error)
    }

    async fn add_role(&self, user: UserId, role: RoleId) -> Result<(), AppError> {
        self.http
            .add_member_role(self.guild_id, user, role, Some(AUDIT_REASON))
            .await
            .map_err(member_error)
    }
}

#[async_trait]
impl DisplayNameResolver for GuildMembers {
    async fn display_name(&self, user: UserId) -> Result<String, AppError> {
        let user = self.http.get_user(user).await.map_err(member_error)?;
        Ok(user.mention().to_string())
    }
}
