use jiff::Timestamp;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
    sea_query::{Expr, OnConflict},
};

use crate::{
    entities::user_film,
    models::{Film, HistoryEntry, timestamp_from_micros},
};

/// Films each user has looked up, one row per `(user, film)`.
///
/// Users never see each other's rows. A user's record set exists implicitly from their first
/// successful lookup.
#[derive(Clone)]
pub struct FilmStore {
    db: DatabaseConnection,
}

impl FilmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get(&self, user: &str, film_id: i64) -> Result<Option<Film>, DbErr> {
        let row = user_film::Entity::find_by_id((user.to_string(), film_id)).one(&self.db).await?;
        row.map(Film::try_from).transpose()
    }

    /// Bumps `count` and refreshes `date` for an existing record, returning it.
    pub async fn record_hit(&self, user: &str, film_id: i64) -> Result<Option<Film>, DbErr> {
        let now = now_us();
        let txn = self.db.begin().await?;

        let updated = user_film::Entity::update_many()
            .col_expr(user_film::Column::Date, Expr::value(now))
            .col_expr(user_film::Column::Count, Expr::col(user_film::Column::Count).add(1))
            .filter(user_film::Column::UserId.eq(user))
            .filter(user_film::Column::FilmId.eq(film_id))
            .exec(&txn)
            .await?;

        if updated.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(None);
        }

        let row = user_film::Entity::find_by_id((user.to_string(), film_id)).one(&txn).await?;
        txn.commit().await?;
        row.map(Film::try_from).transpose()
    }

    /// Stores a first lookup. `count` starts at 1 and `date` is now, whatever `film` says.
    ///
    /// If the user already has this film (two first lookups racing), the existing record is
    /// treated as a hit instead: `count` goes up, `date` moves, the stored fields are kept.
    pub async fn insert(&self, user: &str, mut film: Film) -> Result<Film, DbErr> {
        film.count = 1;
        film.date = timestamp_from_micros(now_us())?;
        let film_id = film.film_id;

        user_film::Entity::insert(film.into_row(user))
            .on_conflict(
                OnConflict::columns([user_film::Column::UserId, user_film::Column::FilmId])
                    .update_column(user_film::Column::Date)
                    .value(user_film::Column::Count, Expr::col(user_film::Column::Count).add(1))
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        let row = user_film::Entity::find_by_id((user.to_string(), film_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("film {film_id} for {user}")))?;
        Film::try_from(row)
    }

    pub async fn film_ids(&self, user: &str) -> Result<Vec<i64>, DbErr> {
        user_film::Entity::find()
            .select_only()
            .column(user_film::Column::FilmId)
            .filter(user_film::Column::UserId.eq(user))
            .order_by_asc(user_film::Column::FilmId)
            .into_tuple::<i64>()
            .all(&self.db)
            .await
    }

    /// Most recently accessed first.
    pub async fn history(&self, user: &str) -> Result<Vec<HistoryEntry>, DbErr> {
        let rows = user_film::Entity::find()
            .filter(user_film::Column::UserId.eq(user))
            .order_by_desc(user_film::Column::Date)
            .order_by_desc(user_film::Column::FilmId)
            .all(&self.db)
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(HistoryEntry {
                    film_id: row.film_id,
                    name: row.name,
                    date: timestamp_from_micros(row.date)?,
                    count: row.count,
                })
            })
            .collect()
    }

    pub async fn close(self) -> Result<(), DbErr> {
        self.db.close().await
    }
}

fn now_us() -> i64 {
    Timestamp::now().as_microsecond()
}
