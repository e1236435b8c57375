use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_TEMPLATES_DIR: &str = "views";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/**
 * Runtime settings, taken from the environment (and `.env` via dotenv)
 */
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /**
     * Without a database URL the server falls back to the in-memory store
     */
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub listen_addr: String,
    pub templates_dir: PathBuf,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            None => DEFAULT_MAX_CONNECTIONS,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(Error::Config {
                        key: "DATABASE_MAX_CONNECTIONS",
                        message: format!("expected a positive integer, got {:?}", raw),
                    })
                }
            },
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            max_connections,
            listen_addr: lookup("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
            templates_dir: lookup("TEMPLATES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATES_DIR)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings(&[]).unwrap();
        assert_eq!(settings.database_url, None);
        assert_eq!(settings.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(settings.listen_addr, DEFAULT_LISTEN_ADDR);
        assert_eq!(settings.templates_dir, PathBuf::from("views"));
    }

    #[test]
    fn test_overrides() {
        let settings = settings(&[
            ("DATABASE_URL", "postgres://localhost/polls"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("LISTEN_ADDR", "0.0.0.0:9000"),
            ("TEMPLATES_DIR", "/srv/polls/views"),
        ])
        .unwrap();
        assert_eq!(settings.database_url.as_deref(), Some("postgres://localhost/polls"));
        assert_eq!(settings.max_connections, 12);
        assert_eq!(settings.listen_addr, "0.0.0.0:9000");
        assert_eq!(settings.templates_dir, PathBuf::from("/srv/polls/views"));
    }

    #[test]
    fn test_empty_database_url_is_unset() {
        assert_eq!(settings(&[("DATABASE_URL", "")]).unwrap().database_url, None);
    }

    #[test]
    fn test_bad_max_connections() {
        assert!(settings(&[("DATABASE_MAX_CONNECTIONS", "lots")]).is_err());
        assert!(settings(&[("DATABASE_MAX_CONNECTIONS", "0")]).is_err());
    }
}
