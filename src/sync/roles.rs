use std::collections::{BTreeSet, HashMap, HashSet};

use async_trait::async_trait;
use poise::serenity_prelude::{RoleId, UserId};
use tracing::debug;

use crate::error::AppError;
use crate::rank::Tier;

/// Name of the guild role mirroring `tier`, e.g. `LoL Gold(Solo/Duo)`.
pub fn tier_role_name(tier: Tier) -> String {
    format!("LoL {}(Solo/Duo)", tier.title())
}

/// Group membership of the synchronized guild.
///
/// Every member operation fails with [`AppError::MembershipUnavailable`] once
/// the member has left.
#[async_trait]
pub trait MembershipProvider: Send + Sync {
    /// All roles defined in the guild, as (id, name).
    async fn guild_roles(&self) -> Result<Vec<(RoleId, String)>, AppError>;

    async fn member_roles(&self, user: UserId) -> Result<HashSet<RoleId>, AppError>;

    async fn remove_role(&self, user: UserId, role: RoleId) -> Result<(), AppError>;

    async fn add_role(&self, user: UserId, role: RoleId) -> Result<(), AppError>;
}

/// The tier-linked roles that exist in the guild, at most one per tier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleCatalog {
    roles: HashMap<Tier, RoleId>,
}

impl RoleCatalog {
    pub fn new(roles: impl IntoIterator<Item = (Tier, RoleId)>) -> Self {
        Self {
            roles: roles.into_iter().collect(),
        }
    }

    /// Match guild roles by name. Tiers without a role are left out.
    pub fn from_guild_roles(guild_roles: &[(RoleId, String)]) -> Self {
        Self::new(Tier::ALL.into_iter().filter_map(|tier| {
            let name = tier_role_name(tier);
            let found = guild_roles.iter().find(|(_, n)| *n == name).map(|(id, _)| *id);
            if found.is_none() {
                debug!(role = %name, "🎭 Tier role not defined in the guild");
            }
            found.map(|id| (tier, id))
        }))
    }

    pub fn role_for(&self, tier: Tier) -> Option<RoleId> {
        self.roles.get(&tier).copied()
    }

    pub fn contains(&self, role: RoleId) -> bool {
        self.roles.values().any(|r| *r == role)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

/// Tier roles to take away from and give to one member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipDelta {
    pub to_remove: BTreeSet<RoleId>,
    pub to_add: BTreeSet<RoleId>,
}

impl MembershipDelta {
    pub fn is_empty(&self) -> bool {
        self.to_remove.is_empty() && self.to_add.is_empty()
    }
}

/// Smallest change leaving the member with exactly the role of `new_tier`.
///
/// Every held tier role other than the target is removed, so drift (several
/// tier roles, a stale one) heals on the next pass. With no tier, or a tier
/// without a role in the catalog, all tier roles are removed and none added.
pub fn reconcile(
    new_tier: Option<Tier>,
    current: &HashSet<RoleId>,
    catalog: &RoleCatalog,
) -> MembershipDelta {
    let target = new_tier.and_then(|tier| catalog.role_for(tier));

    let to_remove = current
        .iter()
        .copied()
        .filter(|role| catalog.contains(*role) && Some(*role) != target)
        .collect();

    let to_add = target
        .filter(|role| !current.contains(role))
        .into_iter()
        .collect();

    MembershipDelta { to_remove, to_add }
}

/// Apply `delta`, removals first.
pub async fn apply_delta(
    members: &dyn MembershipProvider,
    user: UserId,
    delta: &MembershipDelta,
) -> Result<(), AppError> {
    if delta.is_empty() {
        return Ok(());
    }
    debug!(
        user_id = %user,
        remove = delta.to_remove.len(),
        add = delta.to_add.len(),
        "🎭 Updating tier roles"
    );
    for role in &delta.to_remove {
        members.remove_role(user, *role).await?;
    }
    for role in &delta.to_add {
        members.add_role(user, *role).await?;
    }
    Ok(())
}
