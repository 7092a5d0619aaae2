use std::env;

use chrono::Duration;
use log::*;
use wallet_payment_engine::MatchOptions;
use wpg_common::parse_boolean_flag;

const DEFAULT_WPG_HOST: &str = "127.0.0.1";
const DEFAULT_WPG_PORT: u16 = 8360;
const DEFAULT_MATCH_WINDOW: Duration = Duration::hours(6);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// The trailing window within which an amount-only match is accepted (stage 3 of the cascade).
    pub match_window: Duration,
    /// When false, the amount+window stage may match a record that another submission has already consumed.
    /// Leave this on unless you are replicating legacy behaviour.
    pub exclusive_amount_match: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_WPG_HOST.to_string(),
            port: DEFAULT_WPG_PORT,
            database_url: String::default(),
            match_window: DEFAULT_MATCH_WINDOW,
            exclusive_amount_match: true,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("WPG_HOST").ok().unwrap_or_else(|| DEFAULT_WPG_HOST.into());
        let port = env::var("WPG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for WPG_PORT. {e} Using the default, {DEFAULT_WPG_PORT}, instead."
                    );
                    DEFAULT_WPG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_WPG_PORT);
        let database_url = env::var("WPG_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ WPG_DATABASE_URL is not set. Please set it to the URL for the WPG database.");
            String::default()
        });
        let match_window = configure_match_window();
        let exclusive_amount_match = parse_boolean_flag(env::var("WPG_EXCLUSIVE_AMOUNT_MATCH").ok(), true);
        if !exclusive_amount_match {
            warn!(
                "🚨️ WPG_EXCLUSIVE_AMOUNT_MATCH is disabled. Two same-amount submissions in the same window can \
                 settle against a single incoming record."
            );
        }
        Self { host, port, database_url, match_window, exclusive_amount_match }
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions { amount_window: self.match_window, exclusive_amount_match: self.exclusive_amount_match }
    }
}

fn configure_match_window() -> Duration {
    env::var("WPG_MATCH_WINDOW_HOURS")
        .map_err(|_| {
            info!(
                "🪛️ WPG_MATCH_WINDOW_HOURS is not set. Using the default value of {} hrs.",
                DEFAULT_MATCH_WINDOW.num_hours()
            )
        })
        .and_then(|s| {
            s.parse::<i64>()
                .map(Duration::hours)
                .map_err(|e| warn!("🪛️ Invalid configuration value for WPG_MATCH_WINDOW_HOURS. {e}"))
        })
        .ok()
        .unwrap_or(DEFAULT_MATCH_WINDOW)
}
