use std::net::SocketAddr;

use anyhow::Context;

use crate::text::DESCRIPTION_MAX_LEN;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub bot_token: String,
    pub kp_api_key: String,
    pub kp_base_url: String,
    pub kp_rps: u32,
    pub search_base_url: String,
    pub search_user_agent: String,
    pub database_url: String,
    pub http_timeout_secs: u64,
    pub description_max_len: usize,
}

impl Config {
    /// Credentials are mandatory; everything else has a default.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let bot_token = required("BOT_TOKEN")?;
        let kp_api_key = required("KP_API_KEY")?;

        let kp_base_url = std::env::var("KP_BASE_URL")
            .unwrap_or_else(|_| "https://api.kinopoisk.dev/v1.4".to_string());
        let kp_rps: u32 = std::env::var("KP_RPS").ok().and_then(|s| s.parse().ok()).unwrap_or(4);

        let search_base_url = std::env::var("SEARCH_BASE_URL")
            .unwrap_or_else(|_| "https://www.google.com".to_string());
        let search_user_agent =
            std::env::var("SEARCH_USER_AGENT").unwrap_or_else(|_| "cinema_bot".to_string());

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://films.db?mode=rwc".to_string());

        let http_timeout_secs: u64 =
            std::env::var("HTTP_TIMEOUT_SECS").ok().and_then(|s| s.parse().ok()).unwrap_or(30);

        let description_max_len: usize = std::env::var("DESCRIPTION_MAX_LEN")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DESCRIPTION_MAX_LEN);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            bot_token,
            kp_api_key,
            kp_base_url,
            kp_rps,
            search_base_url,
            search_user_agent,
            database_url,
            http_timeout_secs,
            description_max_len,
        })
    }
}

fn required(name: &str) -> anyhow::Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("{name} must be set"))
}
