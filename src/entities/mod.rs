pub mod user_film;
