use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserFilms::Table)
                    .if_not_exists()
                    .col(string(UserFilms::UserId))
                    .col(big_integer(UserFilms::FilmId))
                    .col(string_null(UserFilms::Name))
                    .col(string_null(UserFilms::Type))
                    .col(double_null(UserFilms::RatingKp))
                    .col(double_null(UserFilms::RatingImdb))
                    .col(integer_null(UserFilms::Year))
                    .col(string_null(UserFilms::Countries))
                    .col(string_null(UserFilms::Genres))
                    .col(integer_null(UserFilms::Length))
                    .col(text_null(UserFilms::Description))
                    .col(string_null(UserFilms::LinkToWatch))
                    .col(string_null(UserFilms::Poster))
                    .col(string_null(UserFilms::Trailer))
                    .col(big_integer(UserFilms::Date))
                    .col(integer(UserFilms::Count))
                    .primary_key(Index::create().col(UserFilms::UserId).col(UserFilms::FilmId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_films_user_date")
                    .table(UserFilms::Table)
                    .col(UserFilms::UserId)
                    .col(UserFilms::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserFilms::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum UserFilms {
    Table,
    UserId,
    FilmId,
    Name,
    Type,
    RatingKp,
    RatingImdb,
    Year,
    Countries,
    Genres,
    Length,
    Description,
    LinkToWatch,
    Poster,
    Trailer,
    Date,
    Count,
}
