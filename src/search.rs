use scraper::{Html, Selector};
use tracing::{debug, warn};
use wreq::header::USER_AGENT;

use crate::models::SearchHit;

const QUERY_PREFIX: &str = "kinopoisk";
const REDIRECT_PREFIX: &str = "/url?q=";
const FILM_HOST: &str = "https://www.kinopoisk.ru/";
const WATCH_HOST: &str = "https://www.kinopoisk.gg/";
const ID_PREFIXES: [&str; 2] = ["film/", "series/"];

/// Finds the catalog page of a film through a web search engine.
pub struct SearchClient {
    client: wreq::Client,
    base_url: String,
    user_agent: String,
}

impl SearchClient {
    pub fn new(client: wreq::Client, base_url: String, user_agent: String) -> Self {
        Self { client, base_url, user_agent }
    }

    /// Returns `None` whenever the search does not lead to a recognizable film page,
    /// transport failures included.
    pub async fn resolve_link(&self, query: &str) -> Option<SearchHit> {
        let q = format!("{QUERY_PREFIX} {query}");
        let url = format!(
            "{}/search?q={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&q)
        );

        debug!(query = %query, "searching");
        let html = match self.fetch(&url).await {
            Ok(html) => html,
            Err(err) => {
                warn!(query = %query, error = %err, "search request failed");
                return None;
            },
        };

        let Some(link) = parse_first_link(&html) else {
            debug!(query = %query, "no result block in search page");
            return None;
        };
        let Some(film_id) = extract_film_id(&link) else {
            debug!(query = %query, link = %link, "first result is not a film page");
            return None;
        };

        let watch_link = watch_link(&link);
        debug!(query = %query, film_id = film_id, link = %link, "resolved film");
        Some(SearchHit { film_id, link, watch_link })
    }

    async fn fetch(&self, url: &str) -> Result<String, wreq::Error> {
        self.client
            .get(url)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

/// Target of the first organic result on a search page, unwrapped from the engine's
/// redirect link.
pub fn parse_first_link(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let block_selector = Selector::parse("div.egMi0.kCrYT").unwrap();
    let link_selector = Selector::parse("a[href]").unwrap();

    let block = doc.select(&block_selector).next()?;
    let href = block.select(&link_selector).next()?.value().attr("href")?;

    let target = match href.strip_prefix(REDIRECT_PREFIX) {
        Some(wrapped) => {
            let encoded = wrapped.split('&').next().unwrap_or_default();
            urlencoding::decode(encoded).ok()?.into_owned()
        },
        None => href.to_string(),
    };

    (!target.is_empty()).then_some(target)
}

/// `https://www.kinopoisk.ru/film/<id>/...` or `.../series/<id>/...`.
pub fn extract_film_id(link: &str) -> Option<i64> {
    let path = link.strip_prefix(FILM_HOST)?;
    let rest = ID_PREFIXES.iter().find_map(|prefix| path.strip_prefix(prefix))?;
    rest.split('/').next()?.parse().ok()
}

pub fn watch_link(link: &str) -> String {
    match link.strip_prefix(FILM_HOST) {
        Some(path) => format!("{WATCH_HOST}{path}"),
        None => link.to_string(),
    }
}
