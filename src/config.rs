//! Process configuration resolved once at startup.

use std::{net::SocketAddr, time::Duration};

use anyhow::{Context as _, Result};

const DEFAULT_DATABASE_URL: &str = "sqlite://answer.db?mode=rwc";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:80";
const DEFAULT_ICON_FETCH_TIMEOUT_MS: u64 = 1000;

/// Settings read from the environment (after `.env` has been merged in).
#[derive(Clone, Debug)]
pub struct Config {
    /// `SQLite` connection string.
    pub database_url: String,
    /// Address the HTTP server binds to.
    pub listen_addr: SocketAddr,
    /// Raw `ANSWER_STATIC_PATH` value; empty when unset.
    pub static_path: String,
    /// Public base URL of the site, used as the manifest start URL.
    pub site_url: Option<String>,
    /// Upper bound for fetching a branding icon.
    pub icon_fetch_timeout: Duration,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric or address variable cannot be parsed.
    pub fn try_init() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric or address variable cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned());

        let listen_addr = lookup("ANSWER_LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_owned());
        let listen_addr = listen_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("ANSWER_LISTEN_ADDR '{listen_addr}' is not a socket address"))?;

        let icon_fetch_timeout_ms = match lookup("ANSWER_ICON_FETCH_TIMEOUT_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("ANSWER_ICON_FETCH_TIMEOUT_MS '{raw}' is not a number of milliseconds"))?,
            None => DEFAULT_ICON_FETCH_TIMEOUT_MS,
        };

        Ok(Self {
            database_url,
            listen_addr,
            static_path: lookup("ANSWER_STATIC_PATH").unwrap_or_default(),
            site_url: lookup("ANSWER_SITE_URL").filter(|url| !url.is_empty()),
            icon_fetch_timeout: Duration::from_millis(icon_fetch_timeout_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use googletest::prelude::*;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_that!(config.database_url, eq(DEFAULT_DATABASE_URL));
        assert_eq!(config.listen_addr.port(), 80);
        assert_that!(config.static_path, eq(""));
        assert_that!(config.site_url, none());
        assert_eq!(config.icon_fetch_timeout, Duration::from_secs(1));
    }

    #[test]
    fn reads_static_path_and_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("ANSWER_STATIC_PATH", "/srv/answer-ui"),
            ("ANSWER_LISTEN_ADDR", "127.0.0.1:9080"),
            ("ANSWER_SITE_URL", "https://answer.example.com"),
            ("ANSWER_ICON_FETCH_TIMEOUT_MS", "250"),
        ]))
        .unwrap();

        assert_that!(config.static_path, eq("/srv/answer-ui"));
        assert_that!(config.listen_addr.to_string(), eq("127.0.0.1:9080"));
        assert_that!(config.site_url, some(eq("https://answer.example.com")));
        assert_eq!(config.icon_fetch_timeout, Duration::from_millis(250));
    }

    #[test]
    fn empty_site_url_is_treated_as_unset() {
        let config = Config::from_lookup(lookup_from(&[("ANSWER_SITE_URL", "")])).unwrap();
        assert_that!(config.site_url, none());
    }

    #[test]
    fn rejects_bad_listen_addr() {
        let result = Config::from_lookup(lookup_from(&[("ANSWER_LISTEN_ADDR", "not-an-addr")]));
        assert!(result.is_err());
    }

    #[test]
    fn rejects_bad_timeout() {
        let result = Config::from_lookup(lookup_from(&[("ANSWER_ICON_FETCH_TIMEOUT_MS", "soon")]));
        assert!(result.is_err());
    }
}
