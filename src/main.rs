use std::{sync::Arc, time::Duration};

use cinebot::{
    AppState, config::Config, db, kinopoisk::KinopoiskClient, pipeline::Resolver,
    search::SearchClient, store::FilmStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,cinebot=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;
    let timeout = Duration::from_secs(config.http_timeout_secs);

    let api_http = reqwest::Client::builder().user_agent("cinebot/0.1").timeout(timeout).build()?;
    let search_http = wreq::Client::builder().timeout(timeout).build()?;

    let db = db::connect_and_migrate(&config.database_url).await?;
    let store = FilmStore::new(db);

    let search = SearchClient::new(
        search_http,
        config.search_base_url.clone(),
        config.search_user_agent.clone(),
    );
    let kinopoisk = KinopoiskClient::new(
        api_http,
        config.kp_api_key.clone(),
        config.kp_base_url.clone(),
        config.kp_rps,
        config.description_max_len,
    );

    let state = Arc::new(AppState {
        bot_token: config.bot_token.clone(),
        resolver: Resolver::new(search, kinopoisk, store.clone()),
    });

    let app = cinebot::router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    store.close().await?;
    tracing::info!("database closed");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
