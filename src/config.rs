use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

pub const TOKEN_KEY: &str = "BOT_TOKEN";
pub const FALLBACK_TEXT_KEY: &str = "BOT_FALLBACK_TEXT";
pub const GREETING_KEY: &str = "BOT_GREETING";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "{TOKEN_KEY} was not found in the environment. \
         Create a .env file and add the line: {TOKEN_KEY}=<your token>"
    )]
    MissingToken,
}

#[derive(Clone)]
pub struct Config {
    pub bot_token: String,
    /// Reply sent when a message cannot be copied back.
    pub fallback_text: String,
    /// Word placed before the bold sender name in the `/start` reply.
    pub greeting: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"[REDACTED]")
            .field("fallback_text", &self.fallback_text)
            .field("greeting", &self.greeting)
            .finish()
    }
}

fn default_fallback_text() -> String {
    "Nice try!".to_string()
}

fn default_greeting() -> String {
    "Hello".to_string()
}

/// Dotfile read at startup, relative to the working directory.
pub const DOTENV_FILE: &str = ".env";

/// Merge `KEY=VALUE` lines from `path` into the process environment.
///
/// Keys already present in the environment are left alone. Lines that fail
/// to parse are logged and skipped; the rest of the file still applies.
/// Returns the number of keys merged, or `None` if the file could not be
/// opened.
pub fn load_dotenv(path: &Path) -> Option<usize> {
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) if e.not_found() => return None,
        Err(e) => {
            warn!("Ignoring unreadable {}: {}", path.display(), e);
            return None;
        }
    };

    let mut merged = 0;
    for entry in entries {
        match entry {
            Ok((key, value)) => {
                if std::env::var_os(&key).is_none() {
                    std::env::set_var(&key, value);
                    merged += 1;
                }
            }
            Err(e) => warn!("Skipping line in {}: {}", path.display(), e),
        }
    }

    debug!("Merged {} keys from {}", merged, path.display());
    Some(merged)
}

impl Config {
    /// Merge the dotfile at `dotenv_path`, then read the configuration from
    /// the environment. Nothing touches the network here.
    pub fn load(dotenv_path: &Path) -> Result<Self, ConfigError> {
        load_dotenv(dotenv_path);
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    ///
    /// Empty or whitespace-only values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bot_token = read(TOKEN_KEY).ok_or(ConfigError::MissingToken)?;

        Ok(Self {
            bot_token,
            fallback_text: read(FALLBACK_TEXT_KEY).unwrap_or_else(default_fallback_text),
            greeting: read(GREETING_KEY).unwrap_or_else(default_greeting),
        })
    }
}
