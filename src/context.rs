use crate::{config::Config, registry::CommandRegistry, store::GuildStore};
use std::sync::Arc;
use tokio::{sync::RwLock, time::Instant};

/// Collection of data that is shared across events
pub struct Context<'a> {
    // Guildbot's own context types
    pub cfg: &'a RwLock<Config>,
    pub registry: &'a RwLock<CommandRegistry>,
    pub store: &'a GuildStore,
    /// When the process came up, for the startup cooldown gate
    pub started_at: Instant,
    // Discord/Serenity context types
    pub cache: &'a Arc<serenity::all::Cache>,
    pub http: &'a Arc<serenity::all::Http>,
    pub cache_http: &'a CacheHttp,
}

/// Many Serenity functions take a `impl CacheHttp` in order to first check the cache if the item
/// is available and fall back to an http request otherwise.  The most readily available type that
/// impl's this is named very differently in a way that could be confusing, and so we alias it.
pub type CacheHttp = serenity::all::Context;
