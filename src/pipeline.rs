use tracing::debug;

use crate::{
    error::LookupError, kinopoisk::KinopoiskClient, models::Film, search::SearchClient,
    store::FilmStore,
};

/// Turns a free-text title into a film record for one user.
pub struct Resolver {
    search: SearchClient,
    kinopoisk: KinopoiskClient,
    store: FilmStore,
}

impl Resolver {
    pub fn new(search: SearchClient, kinopoisk: KinopoiskClient, store: FilmStore) -> Self {
        Self { search, kinopoisk, store }
    }

    pub fn store(&self) -> &FilmStore {
        &self.store
    }

    /// Search, then answer from the user's cache when possible, otherwise fetch and store.
    ///
    /// A cached film is never re-fetched; only its `count` and `date` move.
    pub async fn resolve(&self, user: &str, query: Option<&str>) -> Result<Film, LookupError> {
        let query = query.map(str::trim).filter(|q| !q.is_empty()).ok_or(LookupError::QueryEmpty)?;

        let hit = self
            .search
            .resolve_link(query)
            .await
            .ok_or_else(|| LookupError::SearchNotFound { query: query.to_string() })?;

        if let Some(film) = self.store.record_hit(user, hit.film_id).await? {
            debug!(user = %user, film_id = hit.film_id, count = film.count, "cache hit");
            return Ok(film);
        }

        debug!(
            user = %user,
            film_id = hit.film_id,
            link = %hit.link,
            "cache miss, fetching metadata"
        );
        let film = self.kinopoisk.fetch_metadata(&hit).await?;
        let film = self.store.insert(user, film).await?;

        debug!(user = %user, film_id = film.film_id, "stored new film");
        Ok(film)
    }
}
