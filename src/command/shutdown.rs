use crate::{
    command::Command,
    context::Context,
    log_internal,
    logging::PrintColor,
    menu::{self, ConfirmOptions},
    permission::PermissionLevel,
};
use anyhow::Result;
use serenity::all::Message;

pub struct Shutdown;

#[serenity::async_trait]
impl Command for Shutdown {
    fn name(&self) -> &'static str {
        "shutdown"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["stop"]
    }

    fn level(&self) -> PermissionLevel {
        PermissionLevel::BotAdmin
    }

    fn description(&self) -> &'static str {
        "Shut the bot down"
    }

    async fn run(&self, ctx: &Context<'_>, msg: &Message, _args: &[&str]) -> Result<()> {
        let proceed = menu::confirm(
            ctx,
            msg,
            "⚠️ Are you sure you would like to stop the bot?",
            ConfirmOptions {
                confirm_edit: Some("🛑 Shutting down...".into()),
                deny_edit: Some("Shutdown cancelled.".into()),
                ..Default::default()
            },
        )
        .await?;
        if !proceed {
            return Ok(());
        }

        log_internal!("Shutdown initiated by {}", msg.author.color());
        std::process::exit(0)
    }
}
