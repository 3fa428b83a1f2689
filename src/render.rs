use std::fmt::Display;

use hypertext::{Renderable, maud, validation::hypertext_elements};
use jiff::tz::TimeZone;

use crate::models::{Film, HistoryEntry, LinkButton, RenderRequest};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn film_card(film: &Film) -> RenderRequest {
    let mut lines = Vec::new();
    push_field(&mut lines, "Title", film.name.as_deref().filter(|s| !s.is_empty()));
    push_field(&mut lines, "Type", film.kind.as_deref().filter(|s| !s.is_empty()));
    push_field(&mut lines, "Kinopoisk rating", film.rating_kp.filter(|r| *r != 0.0));
    push_field(&mut lines, "IMDb rating", film.rating_imdb.filter(|r| *r != 0.0));
    push_field(&mut lines, "Year", film.year.filter(|y| *y != 0));
    push_field(&mut lines, "Country", film.countries.as_deref().filter(|s| !s.is_empty()));
    push_field(&mut lines, "Genre", film.genres.as_deref().filter(|s| !s.is_empty()));
    push_field(&mut lines, "Length (min)", film.length.filter(|l| *l != 0));
    push_field(&mut lines, "Description", film.description.as_deref().filter(|s| !s.is_empty()));

    let mut buttons = Vec::new();
    if let Some(url) = film.trailer.as_deref().filter(|s| !s.is_empty()) {
        buttons.push(LinkButton { label: "Trailer".to_string(), url: url.to_string() });
    }
    if let Some(url) = film.link_to_watch.as_deref().filter(|s| !s.is_empty()) {
        buttons.push(LinkButton { label: "Watch".to_string(), url: url.to_string() });
    }

    RenderRequest {
        body_text: lines.join("\n"),
        image_url: film.poster.clone().filter(|s| !s.is_empty()),
        buttons,
    }
}

fn push_field(lines: &mut Vec<String>, label: &str, value: Option<impl Display>) {
    if let Some(value) = value {
        let value = value.to_string();
        lines.push(maud! { b { (label) ":" } " " i { (value) } }.render().into_inner());
    }
}

pub fn not_found() -> RenderRequest {
    markup(maud! { i { "Could not find this film. Try adjusting the title." } })
}

pub fn greeting() -> RenderRequest {
    markup(maud! {
        i {
            "Hi! Send me a film title and I will try to find it.\n"
            "I will reply with a short description, the release year, length, countries and "
            "genres, and the Kinopoisk and IMDb ratings.\n"
            code { "/help" } " lists what else I can do."
        }
    })
}

pub fn help() -> RenderRequest {
    markup(maud! {
        i {
            "Just send me a film title and I will look it up and give you a link to watch it.\n"
            code { "/history" } " shows what you have searched for.\n"
            code { "/stats" } " shows how many times you asked for each film."
        }
    })
}

pub fn history(entries: &[HistoryEntry]) -> RenderRequest {
    let lines: Vec<String> = named(entries)
        .map(|(name, entry)| {
            let date = entry.date.to_zoned(TimeZone::UTC).strftime(DATE_FORMAT).to_string();
            maud! { b { "Title:" } " " i { (name) } ", " b { "Last searched:" } " " i { (date) } }
                .render()
                .into_inner()
        })
        .collect();
    listing("Your search history:", lines)
}

pub fn stats(entries: &[HistoryEntry]) -> RenderRequest {
    let lines: Vec<String> = named(entries)
        .map(|(name, entry)| {
            let count = entry.count.to_string();
            maud! { b { "Title:" } " " i { (name) } ", " b { "Times searched:" } " " i { (count) } }
                .render()
                .into_inner()
        })
        .collect();
    listing("Your search stats:", lines)
}

fn named(entries: &[HistoryEntry]) -> impl Iterator<Item = (&str, &HistoryEntry)> {
    entries.iter().filter_map(|e| e.name.as_deref().filter(|n| !n.is_empty()).map(|n| (n, e)))
}

fn listing(header: &str, lines: Vec<String>) -> RenderRequest {
    if lines.is_empty() {
        return markup(maud! { i { "You have not searched for any films yet." } });
    }
    let header = maud! { i { (header) } }.render().into_inner();
    RenderRequest { body_text: format!("{header}\n{}", lines.join("\n")), ..Default::default() }
}

fn markup(body: impl Renderable) -> RenderRequest {
    RenderRequest { body_text: body.render().into_inner(), ..Default::default() }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;

    fn film() -> Film {
        Film {
            film_id: 447301,
            name: Some("Inception".to_string()),
            kind: Some("movie".to_string()),
            rating_kp: Some(8.7),
            rating_imdb: Some(0.0),
            year: Some(2010),
            countries: None,
            genres: Some("sci-fi".to_string()),
            length: Some(148),
            description: Some("Dreams <within> dreams & more.".to_string()),
            link_to_watch: Some("https://www.kinopoisk.gg/film/447301/".to_string()),
            poster: Some("https://image.example/poster.jpg".to_string()),
            trailer: None,
            date: Timestamp::UNIX_EPOCH,
            count: 1,
        }
    }

    #[test]
    fn card_lists_present_fields_in_order() {
        let card = film_card(&film());
        assert_eq!(
            card.body_text,
            "<b>Title:</b> <i>Inception</i>\n\
             <b>Type:</b> <i>movie</i>\n\
             <b>Kinopoisk rating:</b> <i>8.7</i>\n\
             <b>Year:</b> <i>2010</i>\n\
             <b>Genre:</b> <i>sci-fi</i>\n\
             <b>Length (min):</b> <i>148</i>\n\
             <b>Description:</b> <i>Dreams &lt;within&gt; dreams &amp; more.</i>"
        );
        assert_eq!(card.image_url.as_deref(), Some("https://image.example/poster.jpg"));
        assert_eq!(
            card.buttons,
            vec![LinkButton {
                label: "Watch".to_string(),
                url: "https://www.kinopoisk.gg/film/447301/".to_string()
            }]
        );
    }

    #[test]
    fn card_has_trailer_button_first() {
        let card = film_card(&Film { trailer: Some("https://youtu.be/x".to_string()), ..film() });
        let labels: Vec<&str> = card.buttons.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Trailer", "Watch"]);
    }

    #[test]
    fn history_skips_unnamed_films() {
        let entries = vec![
            HistoryEntry {
                film_id: 1,
                name: Some("Inception".to_string()),
                date: Timestamp::from_second(1_700_000_000).unwrap(),
                count: 2,
            },
            HistoryEntry { film_id: 2, name: None, date: Timestamp::UNIX_EPOCH, count: 1 },
        ];

        let out = history(&entries);
        assert_eq!(
            out.body_text,
            "<i>Your search history:</i>\n\
             <b>Title:</b> <i>Inception</i>, <b>Last searched:</b> <i>2023-11-14 22:13:20</i>"
        );

        let out = stats(&entries);
        assert!(out.body_text.ends_with("<b>Times searched:</b> <i>2</i>"));
        assert_eq!(out.body_text.lines().count(), 2);
    }

    #[test]
    fn listed_names_are_escaped() {
        let entries = [HistoryEntry {
            film_id: 1,
            name: Some("Tom & Jerry <3".to_string()),
            date: Timestamp::UNIX_EPOCH,
            count: 4,
        }];
        assert_eq!(
            stats(&entries).body_text,
            "<i>Your search stats:</i>\n\
             <b>Title:</b> <i>Tom &amp; Jerry &lt;3</i>, <b>Times searched:</b> <i>4</i>"
        );
    }

    #[test]
    fn fixed_messages_keep_their_markup() {
        assert_eq!(
            not_found().body_text,
            "<i>Could not find this film. Try adjusting the title.</i>"
        );
        assert!(help().body_text.contains("<code>/history</code> shows what you have searched for."));
    }

    #[test]
    fn empty_history_has_a_message() {
        assert_eq!(history(&[]).body_text, "<i>You have not searched for any films yet.</i>");
        let unnamed = [HistoryEntry { film_id: 2, name: None, date: Timestamp::UNIX_EPOCH, count: 1 }];
        assert_eq!(stats(&unnamed), history(&[]));
    }
}
