//! Holds loaded command descriptors keyed by name and alias.

use crate::{
    command::{self, Command},
    config::Config,
};
use anyhow::{anyhow, Result};
use std::{collections::HashMap, sync::Arc};

/// A registered command plus its registry-managed flags.
pub struct CommandEntry {
    pub command: Arc<dyn Command>,
    pub disabled: bool,
}

/// Name lookup is case-insensitive; aliases resolve to the same entry as
/// the canonical name.
pub struct CommandRegistry {
    commands: HashMap<String, CommandEntry>,
    aliases: HashMap<String, String>,
}

impl CommandRegistry {
    pub fn new(cfg: &Config) -> Self {
        let mut registry = Self {
            commands: HashMap::new(),
            aliases: HashMap::new(),
        };
        for command in command::builtins() {
            registry.insert(command, cfg);
        }
        registry
    }

    fn insert(&mut self, command: Arc<dyn Command>, cfg: &Config) {
        let name = command.name().to_lowercase();
        let disabled = cfg
            .general
            .disabled_commands
            .iter()
            .any(|disabled| disabled.eq_ignore_ascii_case(&name));
        for alias in command.aliases() {
            self.aliases.insert(alias.to_lowercase(), name.clone());
        }
        self.commands.insert(name, CommandEntry { command, disabled });
    }

    /// Look up a command by exact name or alias.
    pub fn get(&self, key: &str) -> Option<&CommandEntry> {
        let key = key.to_lowercase();
        if let Some(entry) = self.commands.get(&key) {
            return Some(entry);
        }
        self.aliases
            .get(&key)
            .and_then(|name| self.commands.get(name))
    }

    /// Canonical name behind a name or alias.
    pub fn resolve_name(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        if let Some((name, _)) = self.commands.get_key_value(&key) {
            return Some(name);
        }
        self.aliases.get(&key).map(String::as_str)
    }

    /// All canonical names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// All entries, sorted by canonical name.
    pub fn entries(&self) -> Vec<&CommandEntry> {
        let mut entries: Vec<(&String, &CommandEntry)> = self.commands.iter().collect();
        entries.sort_unstable_by_key(|(name, _)| *name);
        entries.into_iter().map(|(_, entry)| entry).collect()
    }

    /// Swap one descriptor for a freshly built one.  The entry is replaced
    /// in a single map insert, so a dispatch that already cloned the old
    /// `Arc` keeps running it unchanged while later lookups see the new
    /// one.
    pub fn reload(&mut self, name: &str, cfg: &Config) -> Result<()> {
        let fresh = command::builtins()
            .into_iter()
            .find(|command| command.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| anyhow!("no command named `{}`", name))?;

        let key = name.to_lowercase();
        // The alias set may have changed; drop the stale ones first.
        self.aliases.retain(|_, target| *target != key);
        self.commands.remove(&key);
        self.insert(fresh, cfg);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Database, General};
    use std::collections::HashSet;

    fn test_config(disabled: &[&str]) -> Config {
        Config {
            general: General {
                discord_token: String::new(),
                admins: HashSet::new(),
                default_prefix: "/".to_owned(),
                startup_cooldown_seconds: 0,
                disabled_commands: disabled.iter().map(|name| (*name).to_owned()).collect(),
            },
            database: Database {
                url: String::new(),
                name: String::new(),
            },
        }
    }

    #[test]
    fn builtins_are_registered() {
        let registry = CommandRegistry::new(&test_config(&[]));
        for name in ["ping", "commands", "prefix", "reload", "shutdown"] {
            assert!(registry.get(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = CommandRegistry::new(&test_config(&[]));
        assert!(registry.get("PING").is_some());
        assert!(registry.get("Shutdown").is_some());
    }

    #[test]
    fn aliases_resolve_to_the_same_command() {
        let registry = CommandRegistry::new(&test_config(&[]));
        assert_eq!(registry.resolve_name("hello"), Some("ping"));
        assert_eq!(registry.resolve_name("stop"), Some("shutdown"));
        assert_eq!(registry.resolve_name("listcommands"), Some("commands"));
        let by_alias = registry.get("hello").unwrap();
        assert_eq!(by_alias.command.name(), "ping");
    }

    #[test]
    fn unknown_keys_miss() {
        let registry = CommandRegistry::new(&test_config(&[]));
        assert!(registry.get("frobnicate").is_none());
        assert!(registry.resolve_name("frobnicate").is_none());
    }

    #[test]
    fn disabled_flags_come_from_config() {
        let registry = CommandRegistry::new(&test_config(&["PING"]));
        assert!(registry.get("ping").unwrap().disabled);
        assert!(!registry.get("commands").unwrap().disabled);
    }

    #[test]
    fn reload_swaps_the_descriptor() {
        let cfg = test_config(&[]);
        let mut registry = CommandRegistry::new(&cfg);
        let before = registry.get("ping").unwrap().command.clone();

        registry.reload("ping", &cfg).unwrap();

        let after = registry.get("ping").unwrap().command.clone();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.name(), "ping");
        // Aliases survive the swap.
        assert_eq!(registry.resolve_name("hello"), Some("ping"));
    }

    #[test]
    fn reload_rederives_the_disabled_flag() {
        let mut registry = CommandRegistry::new(&test_config(&[]));
        assert!(!registry.get("ping").unwrap().disabled);

        registry.reload("ping", &test_config(&["ping"])).unwrap();
        assert!(registry.get("ping").unwrap().disabled);
    }

    #[test]
    fn reload_of_an_unknown_name_errors() {
        let cfg = test_config(&[]);
        let mut registry = CommandRegistry::new(&cfg);
        assert!(registry.reload("frobnicate", &cfg).is_err());
    }
}
