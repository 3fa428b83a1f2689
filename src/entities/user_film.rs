use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_films")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub film_id: i64,
    pub name: Option<String>,
    #[sea_orm(column_name = "type")]
    pub kind: Option<String>,
    pub rating_kp: Option<f64>,
    pub rating_imdb: Option<f64>,
    pub year: Option<i32>,
    pub countries: Option<String>,
    pub genres: Option<String>,
    pub length: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub link_to_watch: Option<String>,
    pub poster: Option<String>,
    pub trailer: Option<String>,
    /// Last access, microseconds since the Unix epoch.
    pub date: i64,
    pub count: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
