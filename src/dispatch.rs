//! Converts one inbound message into at most one command invocation.

use crate::{
    context::Context,
    log_event, log_internal,
    logging::{AsyncPrintColor, Glue, PrintColor},
    permission::{self, PermissionLevel},
};
use anyhow::Result;
use serenity::all::Message;

const GENERIC_ERROR: &str = "❌ An error occurred.";

/// Why a command was refused before its handler ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Denial {
    Permission,
    Disabled,
    StartingUp,
}

impl Denial {
    fn notice(self) -> &'static str {
        match self {
            Denial::Permission => "🔒 You do not have permission to use this command.",
            Denial::Disabled => "🔒 This command has been disabled.",
            Denial::StartingUp => "🕐 I am still starting up, please try again in a few seconds.",
        }
    }
}

/// Split `content` into a lower-cased command key and verbatim argument
/// tokens.  `None` when the prefix does not match or nothing follows it.
fn parse_invocation<'a>(content: &'a str, prefix: &str) -> Option<(String, Vec<&'a str>)> {
    let rest = content.strip_prefix(prefix)?;
    let mut tokens = rest.split_whitespace();
    let key = tokens.next()?.to_lowercase();
    Some((key, tokens.collect()))
}

/// Gate checks, short-circuiting in order: permission, disabled, startup
/// cooldown.  Process administrators bypass the latter two.
fn gate(
    required: PermissionLevel,
    level: PermissionLevel,
    disabled: bool,
    is_admin: bool,
    still_starting: bool,
) -> Option<Denial> {
    if required > level {
        return Some(Denial::Permission);
    }
    if disabled && !is_admin {
        return Some(Denial::Disabled);
    }
    if still_starting && !is_admin {
        return Some(Denial::StartingUp);
    }
    None
}

pub async fn dispatch(ctx: &Context<'_>, msg: &Message) -> Result<()> {
    // Automated senders and anything outside a guild text channel are
    // ignored outright.
    if msg.author.bot {
        return Ok(());
    }
    let Some(guild_id) = msg.guild_id else {
        return Ok(());
    };

    let (default_prefix, admins, cooldown) = {
        let cfg = ctx.cfg.read().await;
        (
            cfg.general.default_prefix.clone(),
            cfg.general.admins.clone(),
            cfg.general.startup_cooldown(),
        )
    };

    let guild_cfg = match ctx.store.fetch_or_create(guild_id, &default_prefix).await {
        Ok(guild_cfg) => guild_cfg,
        Err(err) => {
            log_internal!("Guild configuration unavailable: {:#}", err);
            msg.channel_id.say(ctx.cache_http, GENERIC_ERROR).await?;
            return Ok(());
        }
    };

    let Some((key, args)) = parse_invocation(&msg.content, &guild_cfg.prefix) else {
        return Ok(());
    };

    // Clone the descriptor out so a concurrent reload cannot swap it
    // mid-run; the read lock is released before the handler executes.
    let (command, disabled) = {
        let registry = ctx.registry.read().await;
        let Some(entry) = registry.get(&key) else {
            return Ok(());
        };
        (entry.command.clone(), entry.disabled)
    };

    let level = match permission::level_of(ctx.cache, msg, &admins) {
        Ok(level) => level,
        // Guild messages carry member data; anything without it was
        // filtered above.
        Err(_) => return Ok(()),
    };
    let is_admin = admins.contains(&msg.author.id);
    let still_starting = ctx.started_at.elapsed() < cooldown;

    if let Some(denial) = gate(command.level(), level, disabled, is_admin, still_starting) {
        msg.channel_id
            .say(ctx.cache_http, denial.notice())
            .await?;
        return Ok(());
    }

    log_event!(
        "{}{}{}{}{} ran {}",
        msg.guild_id.color(ctx.http).await,
        Glue {}.color(),
        msg.channel_id.color(ctx.http).await,
        Glue {}.color(),
        msg.author.color(),
        command.name(),
    );

    if let Err(err) = command.run(ctx, msg, &args).await {
        log_internal!("Command {} failed: {:#}", command.name(), err);
        msg.channel_id.say(ctx.cache_http, GENERIC_ERROR).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_without_the_prefix_are_ignored() {
        assert!(parse_invocation("ping", "/").is_none());
        assert!(parse_invocation("!ping", "/").is_none());
    }

    #[test]
    fn a_bare_prefix_is_ignored() {
        assert!(parse_invocation("/", "/").is_none());
        assert!(parse_invocation("/   ", "/").is_none());
    }

    #[test]
    fn the_command_key_is_lower_cased() {
        let (key, args) = parse_invocation("/PiNg", "/").unwrap();
        assert_eq!(key, "ping");
        assert!(args.is_empty());
    }

    #[test]
    fn arguments_are_passed_verbatim() {
        let (key, args) = parse_invocation("/reload Ping SHUTDOWN", "/").unwrap();
        assert_eq!(key, "reload");
        assert_eq!(args, vec!["Ping", "SHUTDOWN"]);
    }

    #[test]
    fn repeated_whitespace_between_arguments_collapses() {
        let (_, args) = parse_invocation("/reload   ping\t shutdown", "/").unwrap();
        assert_eq!(args, vec!["ping", "shutdown"]);
    }

    #[test]
    fn multi_character_prefixes_work() {
        let (key, _) = parse_invocation("!!ping", "!!").unwrap();
        assert_eq!(key, "ping");
    }

    #[test]
    fn insufficient_level_is_denied() {
        let denial = gate(
            PermissionLevel::BotAdmin,
            PermissionLevel::GuildAdmin,
            false,
            false,
            false,
        );
        assert_eq!(denial, Some(Denial::Permission));
    }

    #[test]
    fn permission_denial_wins_over_the_other_gates() {
        let denial = gate(
            PermissionLevel::BotAdmin,
            PermissionLevel::Everyone,
            true,
            false,
            true,
        );
        assert_eq!(denial, Some(Denial::Permission));
    }

    #[test]
    fn disabled_commands_are_denied_except_for_admins() {
        let denial = gate(
            PermissionLevel::Everyone,
            PermissionLevel::GuildAdmin,
            true,
            false,
            false,
        );
        assert_eq!(denial, Some(Denial::Disabled));

        let denial = gate(
            PermissionLevel::Everyone,
            PermissionLevel::BotAdmin,
            true,
            true,
            false,
        );
        assert_eq!(denial, None);
    }

    #[test]
    fn startup_cooldown_turns_away_non_admins() {
        let denial = gate(
            PermissionLevel::Everyone,
            PermissionLevel::Everyone,
            false,
            false,
            true,
        );
        assert_eq!(denial, Some(Denial::StartingUp));

        let denial = gate(
            PermissionLevel::Everyone,
            PermissionLevel::BotAdmin,
            false,
            true,
            true,
        );
        assert_eq!(denial, None);
    }

    #[test]
    fn an_unrestricted_command_passes_every_gate() {
        let denial = gate(
            PermissionLevel::Everyone,
            PermissionLevel::Everyone,
            false,
            false,
            false,
        );
        assert_eq!(denial, None);
    }
}
