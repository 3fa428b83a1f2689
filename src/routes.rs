use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header::AUTHORIZATION},
};
use tracing::info;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{IncomingMessage, RenderRequest},
    render,
};

pub async fn health() -> &'static str {
    "ok"
}

pub async fn message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(msg): Json<IncomingMessage>,
) -> AppResult<Json<RenderRequest>> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    if token != Some(state.bot_token.as_str()) {
        return Err(AppError::unauthorized());
    }

    let user = msg.user.trim();
    if user.is_empty() {
        return Err(AppError::bad_request("user is required"));
    }

    let text = msg.text.as_deref().map(str::trim);
    let reply = match text.and_then(command) {
        Some("start") => render::greeting(),
        Some("help") => render::help(),
        Some("history") => render::history(&state.resolver.store().history(user).await?),
        Some("stats") => render::stats(&state.resolver.store().history(user).await?),
        _ => lookup(&state, user, text).await?,
    };

    Ok(Json(reply))
}

async fn lookup(state: &AppState, user: &str, text: Option<&str>) -> AppResult<RenderRequest> {
    match state.resolver.resolve(user, text).await {
        Ok(film) => {
            info!(user = %user, film_id = film.film_id, count = film.count, "film resolved");
            Ok(render::film_card(&film))
        },
        Err(err) if err.is_not_found() => {
            info!(user = %user, reason = %err, "film not found");
            Ok(render::not_found())
        },
        Err(err) => Err(err.into()),
    }
}

/// `/stats@cinebot` -> `stats`.
fn command(text: &str) -> Option<&str> {
    let word = text.strip_prefix('/')?.split_whitespace().next()?;
    Some(word.split('@').next().unwrap_or(word))
}

#[cfg(test)]
mod tests {
    use super::command;

    #[test]
    fn commands_are_parsed() {
        assert_eq!(command("/start"), Some("start"));
        assert_eq!(command("/stats@cinebot"), Some("stats"));
        assert_eq!(command("/history now"), Some("history"));
        assert_eq!(command("Inception"), None);
        assert_eq!(command("/"), None);
    }
}
