use crate::{
    command::Command,
    context::Context,
    menu::{self, ConfirmOptions},
    permission::PermissionLevel,
};
use anyhow::Result;
use serenity::all::Message;

pub struct Reload;

#[serenity::async_trait]
impl Command for Reload {
    fn name(&self) -> &'static str {
        "reload"
    }

    fn level(&self) -> PermissionLevel {
        PermissionLevel::BotAdmin
    }

    fn description(&self) -> &'static str {
        "Reload one or more commands"
    }

    async fn run(&self, ctx: &Context<'_>, msg: &Message, args: &[&str]) -> Result<()> {
        if args.is_empty() {
            msg.channel_id
                .say(ctx.cache_http, "❌ You must include a command to reload!")
                .await?;
            return Ok(());
        }

        let targets: Vec<String> = {
            let registry = ctx.registry.read().await;
            if args[0].eq_ignore_ascii_case("all") {
                registry.names().into_iter().map(str::to_owned).collect()
            } else {
                let mut targets = Vec::new();
                for arg in args {
                    if let Some(name) = registry.resolve_name(arg) {
                        let name = name.to_owned();
                        if !targets.contains(&name) {
                            targets.push(name);
                        }
                    }
                }
                targets
            }
        };

        if targets.is_empty() {
            msg.channel_id
                .say(ctx.cache_http, "❌ No commands found")
                .await?;
            return Ok(());
        }

        let listing = targets
            .iter()
            .map(|name| format!("> `{}`", name))
            .collect::<Vec<_>>()
            .join("\n");
        let noun = if targets.len() == 1 {
            "command"
        } else {
            "commands"
        };

        let proceed = menu::confirm(
            ctx,
            msg,
            format!(
                "⚠️ Are you sure you would like to reload the following {}:\n{}",
                noun, listing
            ),
            ConfirmOptions {
                confirm_edit: Some("🔧 Working...".into()),
                deny_edit: Some("🔨 Cancelled.".into()),
                ..Default::default()
            },
        )
        .await?;
        if !proceed {
            return Ok(());
        }

        {
            let cfg = ctx.cfg.read().await;
            let mut registry = ctx.registry.write().await;
            for name in &targets {
                registry.reload(name, &cfg)?;
            }
        }

        msg.channel_id
            .say(ctx.cache_http, format!("✅ Reloaded:\n{}", listing))
            .await?;
        Ok(())
    }
}
