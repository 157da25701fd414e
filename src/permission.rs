//! Maps a caller to a discrete permission level.

use serenity::all::{Cache, Message, UserId};
use std::{collections::HashSet, sync::Arc};

/// Permission tiers, highest match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PermissionLevel {
    /// Any guild member
    Everyone = 0,
    /// Reserved for server moderators; nothing assigns this tier yet
    #[allow(dead_code)]
    Moderator = 1,
    /// The guild owner, or a member with the administrator permission
    GuildAdmin = 2,
    /// Process-wide administrator allow-list
    BotAdmin = 3,
}

/// A permission level was requested for a caller that is not a guild
/// member, e.g. a direct-message sender.  Dispatch filters those out before
/// resolving, so hitting this means a caller slipped past that filter.
#[derive(Debug, thiserror::Error)]
#[error("caller is not a guild member")]
pub struct InvalidCaller;

/// Resolve the permission level of the author of `msg`.
///
/// Owner and role facts come from the guild cache; a guild that has not
/// been cached yet resolves them as absent rather than failing, so the
/// allow-list still applies.
pub fn level_of(
    cache: &Arc<Cache>,
    msg: &Message,
    admins: &HashSet<UserId>,
) -> Result<PermissionLevel, InvalidCaller> {
    let Some(member) = msg.member.as_deref() else {
        return Err(InvalidCaller);
    };

    let admin_listed = admins.contains(&msg.author.id);
    let (owns_guild, has_admin_role) = match msg.guild(cache) {
        Some(guild) => (
            guild.owner_id == msg.author.id,
            member
                .roles
                .iter()
                .filter_map(|role_id| guild.roles.get(role_id))
                .any(|role| role.permissions.administrator()),
        ),
        None => (false, false),
    };

    Ok(classify(admin_listed, owns_guild, has_admin_role))
}

fn classify(admin_listed: bool, owns_guild: bool, has_admin_role: bool) -> PermissionLevel {
    if admin_listed {
        PermissionLevel::BotAdmin
    } else if owns_guild || has_admin_role {
        PermissionLevel::GuildAdmin
    } else {
        PermissionLevel::Everyone
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_wins_over_everything() {
        assert_eq!(classify(true, false, false), PermissionLevel::BotAdmin);
        assert_eq!(classify(true, true, true), PermissionLevel::BotAdmin);
    }

    #[test]
    fn owner_and_administrator_capability_both_resolve_to_guild_admin() {
        assert_eq!(classify(false, true, false), PermissionLevel::GuildAdmin);
        assert_eq!(classify(false, false, true), PermissionLevel::GuildAdmin);
        assert_eq!(classify(false, true, true), PermissionLevel::GuildAdmin);
    }

    #[test]
    fn plain_members_resolve_to_everyone() {
        assert_eq!(classify(false, false, false), PermissionLevel::Everyone);
    }

    #[test]
    fn levels_order_by_privilege() {
        assert!(PermissionLevel::Everyone < PermissionLevel::Moderator);
        assert!(PermissionLevel::Moderator < PermissionLevel::GuildAdmin);
        assert!(PermissionLevel::GuildAdmin < PermissionLevel::BotAdmin);
    }
}
