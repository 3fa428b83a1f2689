use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Why a lookup did not produce a film.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("query is empty")]
    QueryEmpty,

    #[error("no search result for {query:?}")]
    SearchNotFound { query: String },

    #[error("no metadata for film {film_id}")]
    MetadataNotFound { film_id: i64 },

    #[error("field `{field}` is not numeric: {value}")]
    Coercion { field: &'static str, value: String },

    #[error("storage error: {0}")]
    Storage(#[from] sea_orm::DbErr),
}

impl LookupError {
    /// The user only ever sees "not found" for these; the cause goes to the log.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LookupError::QueryEmpty
                | LookupError::SearchNotFound { .. }
                | LookupError::MetadataNotFound { .. }
        )
    }
}

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    inner: anyhow::Error,
}

impl AppError {
    pub fn unauthorized() -> Self {
        Self { status: StatusCode::UNAUTHORIZED, inner: anyhow::anyhow!("invalid bot token") }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self { status: StatusCode::BAD_REQUEST, inner: anyhow::anyhow!(message) }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, inner: err }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::from(anyhow::Error::new(err))
    }
}

impl From<LookupError> for AppError {
    fn from(err: LookupError) -> Self {
        Self::from(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(error = %self.inner, "request failed");
        }
        (self.status, Json(json!({ "error": self.inner.to_string() }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
