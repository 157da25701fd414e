use crate::{context::Context, permission::PermissionLevel};
use anyhow::Result;
use serenity::all::Message;
use std::sync::Arc;

mod commands;
mod ping;
mod prefix;
mod reload;
mod shutdown;

/// A chat command.
#[serenity::async_trait]
pub trait Command: Send + Sync {
    /// Canonical name, unique case-insensitively
    fn name(&self) -> &'static str;
    /// Alternate names resolving to this command
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }
    /// Minimum permission level required to run this command
    fn level(&self) -> PermissionLevel {
        PermissionLevel::Everyone
    }
    /// One-line description for the command listing
    fn description(&self) -> &'static str;
    /// Run the command.  Arguments arrive verbatim, split on whitespace.
    async fn run(&self, ctx: &Context<'_>, msg: &Message, args: &[&str]) -> Result<()>;
}

/// Every built-in command.  The registry is seeded from here, and reload
/// swaps descriptors for freshly built ones from the same list.
pub fn builtins() -> Vec<Arc<dyn Command>> {
    vec![
        Arc::new(ping::Ping),
        Arc::new(commands::Commands),
        Arc::new(prefix::Prefix),
        Arc::new(reload::Reload),
        Arc::new(shutdown::Shutdown),
    ]
}
