//! Runtime configuration sourced from the environment.
//!
//! Every section is a plain struct with defaults, merged with environment
//! variables through `figment`. `Config::load` is called once per binary and
//! the result is passed down by reference.
//!
//! - `DB_*`  -> [`DbConfig`] (`DB_HOST`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`,
//!   `DB_PORT`, `DB_SSL_CA`, `DB_CONNECT_TIMEOUT_SECS`)
//! - `API_*` -> [`ApiConfig`] (`API_URL`, `API_TIMEOUT_SECS`,
//!   `API_ACCEPT_INVALID_CERTS`)
//! - `LOGLEVEL` -> fallback tracing filter when `RUST_LOG` is unset

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use sqlx::mysql::{MySqlConnectOptions, MySqlSslMode};
use std::{path::PathBuf, time::Duration};

pub const DEFAULT_DB_HOST: &str = "rdbs-step4-australia-east.mysql.database.azure.com";
pub const DEFAULT_DB_USER: &str = "tech0sql1";
pub const DEFAULT_DB_NAME: &str = "sayapos";
pub const DEFAULT_DB_PORT: u16 = 3306;
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DbConfig,
    pub api: ApiConfig,
    pub loglevel: String,
}

// `Env` parses values, so `123456` arrives as a number and `007` as 7.
// String settings are read back from the raw variables instead.
fn merge_verbatim(figment: Figment, env: Env, keys: &[&str]) -> Figment {
    env.only(keys)
        .iter()
        .fold(figment, |figment, (key, value)| {
            figment.merge(Serialized::default(key.as_str(), value))
        })
}

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        let loglevel = merge_verbatim(
            Figment::from(Serialized::default("loglevel", "info")),
            Env::raw(),
            &["loglevel"],
        )
        .extract_inner("loglevel")?;
        Ok(Self {
            database: DbConfig::figment().extract()?,
            api: ApiConfig::figment().extract()?,
            loglevel,
        })
    }
}

/// MySQL connection parameters.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DbConfig {
    pub host: String,
    pub user: String,
    pub password: Option<String>,
    pub name: String,
    pub port: u16,
    /// PEM bundle used to verify the server certificate. Platform roots when unset.
    pub ssl_ca: Option<PathBuf>,
    pub connect_timeout_secs: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DB_HOST.to_string(),
            user: DEFAULT_DB_USER.to_string(),
            password: None,
            name: DEFAULT_DB_NAME.to_string(),
            port: DEFAULT_DB_PORT,
            ssl_ca: None,
            connect_timeout_secs: 30,
        }
    }
}

// Hand-written so the password never ends up in a log line.
impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("name", &self.name)
            .field("port", &self.port)
            .field("ssl_ca", &self.ssl_ca)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl DbConfig {
    const STRING_KEYS: &[&str] = &["host", "user", "password", "name"];

    pub fn figment() -> Figment {
        let figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::prefixed("DB_").ignore(Self::STRING_KEYS));
        merge_verbatim(figment, Env::prefixed("DB_"), Self::STRING_KEYS)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// TLS is always on: the certificate chain is verified, the hostname is not.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let mut opts = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.name)
            .ssl_mode(MySqlSslMode::VerifyCa);
        if let Some(password) = self.password.as_deref() {
            opts = opts.password(password);
        }
        if let Some(ca) = self.ssl_ca.as_ref() {
            opts = opts.ssl_ca(ca);
        }
        opts
    }
}

/// Target of the API smoke test.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    pub url: Option<String>,
    pub timeout_secs: u64,
    pub accept_invalid_certs: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: 10,
            accept_invalid_certs: false,
        }
    }
}

/// Where the resolved base URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseUrlSource {
    Env,
    Default,
}

impl ApiConfig {
    pub fn figment() -> Figment {
        let figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::prefixed("API_").ignore(&["url"]));
        merge_verbatim(figment, Env::prefixed("API_"), &["url"])
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `API_URL` wins when set to something non-blank; otherwise the local dev server.
    pub fn base_url(&self) -> (String, BaseUrlSource) {
        match self.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => (url.trim_end_matches('/').to_string(), BaseUrlSource::Env),
            None => (DEFAULT_API_URL.to_string(), BaseUrlSource::Default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn db_defaults_apply_without_env() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let cfg: DbConfig = DbConfig::figment().extract()?;
            assert_eq!(cfg.host, DEFAULT_DB_HOST);
            assert_eq!(cfg.user, DEFAULT_DB_USER);
            assert_eq!(cfg.name, DEFAULT_DB_NAME);
            assert_eq!(cfg.port, 3306);
            assert!(cfg.password.is_none());
            assert!(cfg.ssl_ca.is_none());
            Ok(())
        });
    }

    #[test]
    fn db_env_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("DB_HOST", "db.internal");
            jail.set_env("DB_USER", "inspector");
            jail.set_env("DB_PASSWORD", "s3cret");
            jail.set_env("DB_NAME", "pos_test");
            jail.set_env("DB_PORT", "3307");
            jail.set_env("DB_SSL_CA", "/etc/ssl/ca.pem");
            let cfg: DbConfig = DbConfig::figment().extract()?;
            assert_eq!(cfg.host, "db.internal");
            assert_eq!(cfg.user, "inspector");
            assert_eq!(cfg.password.as_deref(), Some("s3cret"));
            assert_eq!(cfg.name, "pos_test");
            assert_eq!(cfg.port, 3307);
            assert_eq!(cfg.ssl_ca, Some(PathBuf::from("/etc/ssl/ca.pem")));
            Ok(())
        });
    }

    #[test]
    fn numeric_and_boolean_looking_strings_stay_verbatim() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("DB_PASSWORD", "123456");
            jail.set_env("DB_NAME", "2024");
            jail.set_env("DB_USER", "true");
            jail.set_env("DB_HOST", "007");
            let cfg: DbConfig = DbConfig::figment().extract()?;
            assert_eq!(cfg.password.as_deref(), Some("123456"));
            assert_eq!(cfg.name, "2024");
            assert_eq!(cfg.user, "true");
            assert_eq!(cfg.host, "007");
            assert_eq!(cfg.port, DEFAULT_DB_PORT);
            Ok(())
        });
    }

    #[test]
    fn password_with_structured_syntax_is_not_parsed() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("DB_PASSWORD", "[a,b]");
            let cfg: DbConfig = DbConfig::figment().extract()?;
            assert_eq!(cfg.password.as_deref(), Some("[a,b]"));
            Ok(())
        });
    }

    #[test]
    fn numeric_settings_still_parse_from_env() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("DB_PORT", "3307");
            jail.set_env("DB_CONNECT_TIMEOUT_SECS", "5");
            jail.set_env("API_TIMEOUT_SECS", "3");
            jail.set_env("API_ACCEPT_INVALID_CERTS", "true");
            let db: DbConfig = DbConfig::figment().extract()?;
            let api: ApiConfig = ApiConfig::figment().extract()?;
            assert_eq!(db.port, 3307);
            assert_eq!(db.connect_timeout(), Duration::from_secs(5));
            assert_eq!(api.timeout(), Duration::from_secs(3));
            assert!(api.accept_invalid_certs);
            Ok(())
        });
    }

    #[test]
    fn db_debug_redacts_password() {
        let cfg = DbConfig {
            password: Some("hunter2".to_string()),
            ..DbConfig::default()
        };
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn api_url_defaults_to_localhost() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let cfg: ApiConfig = ApiConfig::figment().extract()?;
            assert_eq!(
                cfg.base_url(),
                (DEFAULT_API_URL.to_string(), BaseUrlSource::Default)
            );
            assert_eq!(cfg.timeout(), Duration::from_secs(10));
            assert!(!cfg.accept_invalid_certs);
            Ok(())
        });
    }

    #[test]
    fn api_url_env_wins_and_drops_trailing_slash() {
        Jail::expect_with(|jail| {
            jail.set_env("API_URL", "https://pos.example.com/");
            let cfg: ApiConfig = ApiConfig::figment().extract()?;
            assert_eq!(
                cfg.base_url(),
                ("https://pos.example.com".to_string(), BaseUrlSource::Env)
            );
            Ok(())
        });
    }

    #[test]
    fn blank_api_url_falls_back_to_default() {
        let cfg = ApiConfig {
            url: Some("   ".to_string()),
            ..ApiConfig::default()
        };
        assert_eq!(cfg.base_url().1, BaseUrlSource::Default);
    }

    #[test]
    fn loglevel_reads_env() {
        Jail::expect_with(|jail| {
            jail.set_env("LOGLEVEL", "debug");
            let cfg = Config::load()?;
            assert_eq!(cfg.loglevel, "debug");
            Ok(())
        });
    }
}
