use std::{num::NonZeroU32, sync::Arc};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use jiff::Timestamp;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::LookupError,
    models::{Film, SearchHit},
    text::{coerce_float, coerce_int, truncate_description},
};

const API_KEY_HEADER: &str = "X-API-KEY";

/// Client for the kinopoisk.dev movie API.
pub struct KinopoiskClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    description_max_len: usize,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl KinopoiskClient {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        base_url: String,
        rps: u32,
        description_max_len: usize,
    ) -> Self {
        let limiter = Arc::new(RateLimiter::direct(Quota::per_second(
            NonZeroU32::new(rps.max(1)).unwrap_or(NonZeroU32::MIN),
        )));
        Self { client, api_key, base_url, description_max_len, limiter }
    }

    /// Fetches a film by id and maps it for `hit`. Any transport or status failure is
    /// reported as [`LookupError::MetadataNotFound`].
    pub async fn fetch_metadata(&self, hit: &SearchHit) -> Result<Film, LookupError> {
        let film_id = hit.film_id;
        let payload = match self.fetch_movie(film_id).await {
            Ok(payload) => payload,
            Err(err) => {
                warn!(film_id = film_id, error = %err, "metadata request failed");
                return Err(LookupError::MetadataNotFound { film_id });
            },
        };

        debug!(film_id = film_id, name = ?payload.name, "fetched metadata");
        map_movie(payload, hit, Timestamp::now(), self.description_max_len)
    }

    async fn fetch_movie(&self, film_id: i64) -> reqwest::Result<MovieResponse> {
        self.limiter.until_ready().await;

        let url = format!("{}/movie/{}", self.base_url.trim_end_matches('/'), film_id);
        self.client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

pub(crate) fn map_movie(
    movie: MovieResponse,
    hit: &SearchHit,
    now: Timestamp,
    description_max_len: usize,
) -> Result<Film, LookupError> {
    let rating = movie.rating.as_ref();

    Ok(Film {
        film_id: hit.film_id,
        name: movie.name,
        kind: movie.kind,
        rating_kp: coerce_float("rating.kp", rating.and_then(|r| r.kp.as_ref()))?,
        rating_imdb: coerce_float("rating.imdb", rating.and_then(|r| r.imdb.as_ref()))?,
        year: narrow("year", coerce_int("year", movie.year.as_ref())?)?,
        countries: join_names(movie.countries),
        genres: join_names(movie.genres),
        length: narrow("movieLength", coerce_int("movieLength", movie.movie_length.as_ref())?)?,
        description: truncate_description(movie.description.as_deref(), description_max_len),
        link_to_watch: Some(hit.watch_link.clone()),
        poster: movie.poster.and_then(|p| p.url),
        trailer: movie
            .videos
            .and_then(|v| v.trailers)
            .and_then(|t| t.into_iter().next())
            .and_then(|t| t.url),
        date: now,
        count: 1,
    })
}

fn join_names(items: Option<Vec<Named>>) -> Option<String> {
    let names: Vec<String> = items?.into_iter().filter_map(|n| n.name).collect();
    (!names.is_empty()).then(|| names.join(", "))
}

fn narrow(field: &'static str, value: Option<i64>) -> Result<Option<i32>, LookupError> {
    value
        .map(|v| {
            i32::try_from(v).map_err(|_| LookupError::Coercion { field, value: v.to_string() })
        })
        .transpose()
}

#[derive(Debug, Deserialize)]
pub(crate) struct MovieResponse {
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    rating: Option<Rating>,
    year: Option<Value>,
    countries: Option<Vec<Named>>,
    genres: Option<Vec<Named>>,
    #[serde(rename = "movieLength")]
    movie_length: Option<Value>,
    description: Option<String>,
    poster: Option<Poster>,
    videos: Option<Videos>,
}

#[derive(Debug, Deserialize)]
struct Rating {
    kp: Option<Value>,
    imdb: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Poster {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Videos {
    trailers: Option<Vec<Video>>,
}

#[derive(Debug, Deserialize)]
struct Video {
    url: Option<String>,
}
