use crate::{
    command::Command,
    context::Context,
    menu::{self, Content, PageOptions},
};
use anyhow::Result;
use serenity::all::{Colour, CreateEmbed, CreateEmbedFooter, Message};

const EMBED_COLOUR: Colour = Colour(0x286ece);
const COMMANDS_PER_PAGE: usize = 8;

pub struct Commands;

#[serenity::async_trait]
impl Command for Commands {
    fn name(&self) -> &'static str {
        "commands"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["listcommands", "commandlist"]
    }

    fn description(&self) -> &'static str {
        "List every available command"
    }

    async fn run(&self, ctx: &Context<'_>, msg: &Message, _args: &[&str]) -> Result<()> {
        let Some(guild_id) = msg.guild_id else {
            return Ok(());
        };
        let prefix = match ctx.store.fetch(guild_id).await? {
            Some(guild) => guild.prefix,
            None => ctx.cfg.read().await.general.default_prefix.clone(),
        };

        let lines: Vec<String> = {
            let registry = ctx.registry.read().await;
            registry
                .entries()
                .iter()
                .map(|entry| {
                    let command = &entry.command;
                    let mut line = format!("`{}{}`", prefix, command.name());
                    if !command.aliases().is_empty() {
                        line.push_str(&format!(" ({})", command.aliases().join(", ")));
                    }
                    line.push_str(&format!(" - {}", command.description()));
                    if entry.disabled {
                        line.push_str(" [disabled]");
                    }
                    line
                })
                .collect()
        };

        let total = lines.chunks(COMMANDS_PER_PAGE).count();
        let pages: Vec<Content> = lines
            .chunks(COMMANDS_PER_PAGE)
            .enumerate()
            .map(|(i, chunk)| {
                Content::Embed(
                    CreateEmbed::new()
                        .title("Here is a list of my commands:")
                        .description(chunk.join("\n"))
                        .colour(EMBED_COLOUR)
                        .footer(CreateEmbedFooter::new(format!("Page {}/{}", i + 1, total))),
                )
            })
            .collect();

        menu::pages(ctx, msg, pages, PageOptions::default()).await?;
        Ok(())
    }
}
