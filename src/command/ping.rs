use crate::{command::Command, context::Context};
use anyhow::Result;
use serenity::all::{EditMessage, Message};
use tokio::time::Instant;

pub struct Ping;

#[serenity::async_trait]
impl Command for Ping {
    fn name(&self) -> &'static str {
        "ping"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["hello"]
    }

    fn description(&self) -> &'static str {
        "Measure message round-trip latency"
    }

    async fn run(&self, ctx: &Context<'_>, msg: &Message, _args: &[&str]) -> Result<()> {
        let before = Instant::now();
        let mut reply = msg.channel_id.say(ctx.cache_http, "Pong!").await?;
        let latency = before.elapsed();

        reply
            .edit(
                ctx.cache_http,
                EditMessage::new()
                    .content(format!("🏓 Bot latency: {}ms", latency.as_millis())),
            )
            .await?;
        Ok(())
    }
}
