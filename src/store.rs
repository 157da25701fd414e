//! Per-guild configuration documents.

use crate::config;
use anyhow::{Context as _, Result};
use mongodb::{bson::doc, Client, Collection};
use serenity::all::GuildId;

const GUILDS_COLLECTION: &str = "guilds";

/// One guild's persisted configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GuildConfig {
    /// Guild snowflake, stored as a string
    pub id: String,
    pub prefix: String,
}

impl GuildConfig {
    fn new(guild: GuildId, prefix: &str) -> Self {
        Self {
            id: guild.to_string(),
            prefix: prefix.to_owned(),
        }
    }
}

/// Handle to the document store.  Lookups go to the database every time;
/// there is no in-memory copy to invalidate.
pub struct GuildStore {
    guilds: Collection<GuildConfig>,
}

impl GuildStore {
    pub async fn connect(cfg: &config::Database) -> Result<Self> {
        let client = Client::with_uri_str(&cfg.url)
            .await
            .with_context(|| format!("Could not connect to document store at `{}`", cfg.url))?;
        let guilds = client.database(&cfg.name).collection(GUILDS_COLLECTION);
        Ok(Self { guilds })
    }

    pub async fn fetch(&self, guild: GuildId) -> Result<Option<GuildConfig>> {
        self.guilds
            .find_one(doc! { "id": guild.to_string() }, None)
            .await
            .map_err(Into::into)
    }

    /// Read-through fetch, inserting a default document on first contact
    /// with a guild.
    pub async fn fetch_or_create(
        &self,
        guild: GuildId,
        default_prefix: &str,
    ) -> Result<GuildConfig> {
        if let Some(found) = self.fetch(guild).await? {
            return Ok(found);
        }
        let fresh = GuildConfig::new(guild, default_prefix);
        self.guilds.insert_one(&fresh, None).await?;
        Ok(fresh)
    }

    pub async fn set_prefix(&self, guild: GuildId, prefix: &str) -> Result<()> {
        self.guilds
            .update_one(
                doc! { "id": guild.to_string() },
                doc! { "$set": { "prefix": prefix } },
                None,
            )
            .await?;
        Ok(())
    }
}
