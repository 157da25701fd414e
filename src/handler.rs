use crate::{
    config::Config,
    context::Context,
    dispatch, log_event, log_internal,
    logging::{AsyncPrintColor, PrintColor},
    registry::CommandRegistry,
    store::GuildStore,
};
use serenity::all::{Message, Reaction, ReactionType, Ready};
use tokio::{sync::RwLock, time::Instant};

/// Discord event handler
pub struct Handler {
    cfg: RwLock<Config>,
    registry: RwLock<CommandRegistry>,
    store: GuildStore,
    started_at: Instant,
}

impl<'a> Handler {
    pub fn new(cfg: Config, store: GuildStore) -> Self {
        let registry = CommandRegistry::new(&cfg);
        Self {
            cfg: RwLock::new(cfg),
            registry: RwLock::new(registry),
            store,
            started_at: Instant::now(),
        }
    }

    fn ctx(&'a self, discord_ctx: &'a serenity::all::Context) -> Context<'a> {
        Context {
            cfg: &self.cfg,
            registry: &self.registry,
            store: &self.store,
            started_at: self.started_at,
            cache: &discord_ctx.cache,
            http: &discord_ctx.http,
            cache_http: discord_ctx,
        }
    }
}

#[serenity::async_trait]
impl serenity::all::EventHandler for Handler {
    async fn ready(&self, discord_ctx: serenity::all::Context, ready: Ready) {
        log_event!(
            "Connected to {} server(s) as {}",
            ready.guilds.len(),
            discord_ctx.cache.current_user().color(),
        );
    }

    async fn message(&self, discord_ctx: serenity::all::Context, msg: Message) {
        let ctx = self.ctx(&discord_ctx);
        if let Err(err) = dispatch::dispatch(&ctx, &msg).await {
            log_internal!("Error handling message: {:#}", err);
        }
    }

    async fn reaction_add(&self, discord_ctx: serenity::all::Context, reaction: Reaction) {
        let emoji = match &reaction.emoji {
            ReactionType::Custom { name, .. } => {
                name.clone().unwrap_or_else(|| "<unknown-emoji>".to_owned())
            }
            ReactionType::Unicode(name) => name.clone(),
            _ => "<unknown-emoji>".to_owned(),
        };

        log_event!(
            "{} reacted with \"{}\"",
            reaction.user_id.color(&discord_ctx.http).await,
            emoji,
        );
    }
}
