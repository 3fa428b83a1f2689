use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::entities::user_film;

/// A film as one user has looked it up.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Film {
    pub film_id: i64,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub rating_kp: Option<f64>,
    pub rating_imdb: Option<f64>,
    pub year: Option<i32>,
    pub countries: Option<String>,
    pub genres: Option<String>,
    pub length: Option<i32>,
    pub description: Option<String>,
    pub link_to_watch: Option<String>,
    pub poster: Option<String>,
    pub trailer: Option<String>,
    pub date: Timestamp,
    pub count: i32,
}

impl Film {
    pub(crate) fn into_row(self, user_id: &str) -> user_film::ActiveModel {
        use sea_orm::Set;

        user_film::ActiveModel {
            user_id: Set(user_id.to_string()),
            film_id: Set(self.film_id),
            name: Set(self.name),
            kind: Set(self.kind),
            rating_kp: Set(self.rating_kp),
            rating_imdb: Set(self.rating_imdb),
            year: Set(self.year),
            countries: Set(self.countries),
            genres: Set(self.genres),
            length: Set(self.length),
            description: Set(self.description),
            link_to_watch: Set(self.link_to_watch),
            poster: Set(self.poster),
            trailer: Set(self.trailer),
            date: Set(self.date.as_microsecond()),
            count: Set(self.count),
        }
    }
}

impl TryFrom<user_film::Model> for Film {
    type Error = sea_orm::DbErr;

    fn try_from(row: user_film::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            film_id: row.film_id,
            name: row.name,
            kind: row.kind,
            rating_kp: row.rating_kp,
            rating_imdb: row.rating_imdb,
            year: row.year,
            countries: row.countries,
            genres: row.genres,
            length: row.length,
            description: row.description,
            link_to_watch: row.link_to_watch,
            poster: row.poster,
            trailer: row.trailer,
            date: timestamp_from_micros(row.date)?,
            count: row.count,
        })
    }
}

/// Where the search engine pointed us for a query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHit {
    pub film_id: i64,
    pub link: String,
    pub watch_link: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub film_id: i64,
    pub name: Option<String>,
    pub date: Timestamp,
    pub count: i32,
}

/// What the chat transport should send back to the user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub body_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<LinkButton>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkButton {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    pub user: String,
    pub text: Option<String>,
}

pub(crate) fn timestamp_from_micros(us: i64) -> Result<Timestamp, sea_orm::DbErr> {
    Timestamp::from_microsecond(us)
        .map_err(|err| sea_orm::DbErr::Type(format!("stored date {us} is out of range: {err}")))
}
