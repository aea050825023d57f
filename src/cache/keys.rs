//! Cache key builders.
//!
//! Produce `<category>_<id-or-page>[_<filter>]` strings so that two different
//! catalog queries never share a key. Caller-supplied parts have `%`, `_` and
//! `-` percent-encoded so they cannot forge a separator. The cache itself
//! treats keys as opaque.

use std::fmt::Display;

/// `genres_<media>`, e.g. `genres_movie` or `genres_tv`.
pub fn genres_key(media: &str) -> String {
    format!("genres_{}", escape(media))
}

/// `movies_<page>[_<filter>]`
pub fn movies_key(page: u32, filter: Option<&str>) -> String {
    with_filter(format!("movies_{}", page), filter)
}

/// `series_<page>[_<filter>]`
pub fn series_key(page: u32, filter: Option<&str>) -> String {
    with_filter(format!("series_{}", page), filter)
}

/// `movie_details_<id>`
pub fn movie_details_key(id: impl Display) -> String {
    format!("movie_details_{}", escape(&id.to_string()))
}

/// `search_<query>_<page>` with the query trimmed, lower-cased and its
/// whitespace runs collapsed to `-`, so "  The  Matrix" and "the matrix"
/// share an entry.
pub fn search_key(query: &str, page: u32) -> String {
    let normalized = query
        .split_whitespace()
        .map(|word| escape(&word.to_lowercase()))
        .collect::<Vec<_>>()
        .join("-");
    format!("search_{}_{}", normalized, page)
}

/// `user_<user_id>_<list>`, e.g. `user_42_watchlist`.
pub fn user_data_key(user_id: impl Display, list: &str) -> String {
    format!("user_{}_{}", escape(&user_id.to_string()), escape(list))
}

/// `trending_<window>`, e.g. `trending_day`.
pub fn trending_key(window: &str) -> String {
    format!("trending_{}", escape(window))
}

fn with_filter(base: String, filter: Option<&str>) -> String {
    match filter {
        Some(filter) if !filter.is_empty() => format!("{}_{}", base, escape(filter)),
        _ => base,
    }
}

fn escape(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    for c in part.chars() {
        match c {
            '%' => out.push_str("%25"),
            '-' => out.push_str("%2D"),
            '_' => out.push_str("%5F"),
            c => out.push(c),
        }
    }
    out
}
