//! Runtime configuration.
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. `config.toml` in the working directory (optional)
//! 3. Environment variables prefixed with `RECEIPTS_`, nested with `__`
//!    (e.g. `RECEIPTS_STORAGE__DATABASE_URL`)
//! 4. `DATABASE_URL`, kept for compatibility with plain deployments

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "config.toml";
const ENV_PREFIX: &str = "RECEIPTS_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    /// Socket address the HTTP server binds to.
    pub listen_addr: String,
    /// Fallback log filter when `RUST_LOG` is unset.
    pub loglevel: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// sqlx SQLite URL; the file is created if missing.
    pub database_url: String,
    /// JSON file holding the one-time organization profile.
    pub org_profile_path: PathBuf,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:receipts.db".to_string(),
            org_profile_path: PathBuf::from("org_profile.json"),
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE_NAME))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(
                Env::raw()
                    .only(&["database_url"])
                    .map(|_| "storage.database_url".into()),
            )
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_without_sources() {
        Jail::expect_with(|_jail| {
            let cfg = Config::load()?;
            assert_eq!(cfg.basic, BasicConfig::default());
            assert_eq!(cfg.storage.org_profile_path, PathBuf::from("org_profile.json"));
            Ok(())
        });
    }

    #[test]
    fn toml_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE_NAME,
                r#"
                [basic]
                listen_addr = "127.0.0.1:9000"

                [storage]
                database_url = "sqlite:from-toml.db"
                "#,
            )?;
            jail.set_env("RECEIPTS_BASIC__LOGLEVEL", "debug");
            jail.set_env("DATABASE_URL", "sqlite:from-env.db");

            let cfg = Config::load()?;
            assert_eq!(cfg.basic.listen_addr, "127.0.0.1:9000");
            assert_eq!(cfg.basic.loglevel, "debug");
            assert_eq!(cfg.storage.database_url, "sqlite:from-env.db");
            assert_eq!(cfg.storage.org_profile_path, PathBuf::from("org_profile.json"));
            Ok(())
        });
    }

    #[test]
    fn malformed_toml_fails_to_load() {
        Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE_NAME, "[basic\nlisten_addr = ")?;
            let err = Config::load().unwrap_err();
            assert!(!err.to_string().is_empty());
            Ok(())
        });
    }
}
