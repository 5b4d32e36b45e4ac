use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{
    BRIEFING_GREETING, DEFAULT_CANNED_REPLY, DEFAULT_CONVERSATION_NAME, DEFAULT_REPLY_DELAY_MS,
    STARTUP_GREETING,
};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Session seeding and naming
    #[serde(default)]
    pub session: SessionSettings,

    /// Bundled response provider settings
    #[serde(default)]
    pub provider: ProviderSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session: SessionSettings::default(),
            provider: ProviderSettings::default(),
        }
    }
}

/// Greetings and display names used when seeding conversations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Greeting seeded into the startup conversation
    pub seed_greeting: String,
    /// Greeting seeded into newly created (or reset) conversations
    pub briefing_greeting: String,
    /// Display-name prefix; conversations after the first get " {id}" appended
    pub conversation_name: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            seed_greeting: STARTUP_GREETING.to_string(),
            briefing_greeting: BRIEFING_GREETING.to_string(),
            conversation_name: DEFAULT_CONVERSATION_NAME.to_string(),
        }
    }
}

/// Settings for the bundled canned provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Simulated generation latency in milliseconds
    pub delay_ms: u64,
    /// Fixed acknowledgment text
    pub canned_reply: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_REPLY_DELAY_MS,
            canned_reply: DEFAULT_CANNED_REPLY.to_string(),
        }
    }
}

/// Load configuration from multiple sources
pub fn load_config() -> Result<Config> {
    // Get config directories
    let config_dir = get_config_dir()?;
    let global_config = config_dir.join("config.toml");
    let local_config = PathBuf::from(".parley/config.toml");

    // Build figment configuration
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    // Add global config if it exists
    if global_config.exists() {
        figment = figment.merge(Toml::file(&global_config));
    }

    // Add local config if it exists
    if local_config.exists() {
        figment = figment.merge(Toml::file(&local_config));
    }

    // Add environment variables (PARLEY_ prefix)
    figment = figment.merge(Env::prefixed("PARLEY_"));

    // Extract and return config
    figment.extract().context("Failed to load configuration")
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "parley") {
        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    } else {
        // Fallback to home directory
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        let config_dir = PathBuf::from(home).join(".config").join("parley");
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = if let Some(p) = path {
        p
    } else {
        get_config_dir()?.join("config.toml")
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = Config::default();

        assert_eq!(config.provider.delay_ms, 1000);
        assert_eq!(
            config.provider.canned_reply,
            "Processing your request, Agent. Stand by for data analysis."
        );
        assert_eq!(config.session.conversation_name, "New Chat");
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let figment = Figment::from(Serialized::defaults(Config::default())).merge(Toml::string(
            r#"
            [provider]
            delay_ms = 50

            [session]
            conversation_name = "Briefing"
        "#,
        ));

        let config: Config = figment.extract().unwrap();
        assert_eq!(config.provider.delay_ms, 50);
        assert_eq!(config.session.conversation_name, "Briefing");
        // Untouched fields keep their defaults
        assert_eq!(
            config.provider.canned_reply,
            crate::constants::DEFAULT_CANNED_REPLY
        );
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.provider.delay_ms = 25;
        save_config(&config, Some(path.clone())).unwrap();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(&path));
        let reloaded: Config = figment.extract().unwrap();
        assert_eq!(reloaded.provider.delay_ms, 25);
    }
}
