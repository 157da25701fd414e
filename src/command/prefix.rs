use crate::{command::Command, context::Context, permission::PermissionLevel};
use anyhow::Result;
use serenity::all::Message;

const MAX_PREFIX_CHARS: usize = 5;

pub struct Prefix;

#[serenity::async_trait]
impl Command for Prefix {
    fn name(&self) -> &'static str {
        "prefix"
    }

    fn level(&self) -> PermissionLevel {
        PermissionLevel::GuildAdmin
    }

    fn description(&self) -> &'static str {
        "Show or change this server's command prefix"
    }

    async fn run(&self, ctx: &Context<'_>, msg: &Message, args: &[&str]) -> Result<()> {
        let Some(guild_id) = msg.guild_id else {
            return Ok(());
        };

        let Some(new_prefix) = args.first() else {
            let current = match ctx.store.fetch(guild_id).await? {
                Some(guild) => guild.prefix,
                None => ctx.cfg.read().await.general.default_prefix.clone(),
            };
            msg.channel_id
                .say(ctx.cache_http, format!("Current prefix: `{}`", current))
                .await?;
            return Ok(());
        };

        if new_prefix.chars().count() > MAX_PREFIX_CHARS {
            msg.channel_id
                .say(
                    ctx.cache_http,
                    format!("❌ Prefixes are limited to {} characters.", MAX_PREFIX_CHARS),
                )
                .await?;
            return Ok(());
        }

        ctx.store.set_prefix(guild_id, new_prefix).await?;
        msg.channel_id
            .say(
                ctx.cache_http,
                format!("✅ Prefix changed to `{}`", new_prefix),
            )
            .await?;
        Ok(())
    }
}
