use anyhow::{anyhow, Result};
use serenity::all::UserId;
use std::{collections::HashSet, path::PathBuf, time::Duration};
use tokio::io::AsyncReadExt;

const CONFIG_PATH_REL_HOME: &str = ".config/guildbot/config.toml";

/// Bot configuration
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Config {
    pub general: General,
    pub database: Database,
}

#[derive(serde::Serialize, serde::Deserialize)]
pub struct General {
    pub discord_token: String,
    /// Process-wide administrator allow-list
    pub admins: HashSet<UserId>,
    /// Prefix a guild starts out with before anyone changes it
    #[serde(default = "default_prefix")]
    pub default_prefix: String,
    /// Window after startup during which non-administrators are turned away
    #[serde(default = "default_startup_cooldown")]
    pub startup_cooldown_seconds: u64,
    /// Commands only administrators may run, by name
    #[serde(default)]
    pub disabled_commands: Vec<String>,
}

#[derive(serde::Serialize, serde::Deserialize)]
pub struct Database {
    pub url: String,
    pub name: String,
}

fn default_prefix() -> String {
    "/".to_owned()
}

fn default_startup_cooldown() -> u64 {
    5
}

impl Config {
    fn config_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|p| p.join(CONFIG_PATH_REL_HOME))
            .ok_or(anyhow!("Could not find home directory"))
    }

    pub async fn load() -> Result<Self> {
        let path = Self::config_path()?;

        let mut file = tokio::fs::File::open(&path).await.map_err(|e| {
            anyhow!(
                "Could not open configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;

        let mut contents = String::new();
        file.read_to_string(&mut contents).await.map_err(|e| {
            anyhow!(
                "Could not read configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;

        Self::parse(&contents).map_err(|e| {
            anyhow!(
                "Could not parse configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })
    }

    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(Into::into)
    }
}

impl General {
    pub fn startup_cooldown(&self) -> Duration {
        Duration::from_secs(self.startup_cooldown_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [general]
        discord_token = "token"
        admins = ["255834596766253057"]

        [database]
        url = "mongodb://localhost/guildbot"
        name = "guildbot"
    "#;

    #[test]
    fn minimal_config_gets_defaults() {
        let cfg = Config::parse(MINIMAL).unwrap();
        assert_eq!(cfg.general.default_prefix, "/");
        assert_eq!(cfg.general.startup_cooldown(), Duration::from_secs(5));
        assert!(cfg.general.disabled_commands.is_empty());
        assert!(cfg
            .general
            .admins
            .contains(&UserId::new(255834596766253057)));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let cfg = Config::parse(
            r#"
            [general]
            discord_token = "token"
            admins = []
            default_prefix = "!"
            startup_cooldown_seconds = 0
            disabled_commands = ["ping"]

            [database]
            url = "mongodb://localhost/guildbot"
            name = "guildbot"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.general.default_prefix, "!");
        assert_eq!(cfg.general.startup_cooldown(), Duration::ZERO);
        assert_eq!(cfg.general.disabled_commands, vec!["ping".to_owned()]);
    }

    #[test]
    fn missing_database_section_is_an_error() {
        let result = Config::parse(
            r#"
            [general]
            discord_token = "token"
            admins = []
            "#,
        );
        assert!(result.is_err());
    }
}
