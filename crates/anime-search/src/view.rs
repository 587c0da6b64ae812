//! Plain-text rendering of the list and detail views.

use crate::detail::DetailView;
use crate::state::{ResultItem, SearchState};
use catalog::AnimeDetails;
use std::fmt::Write;

/// Characters of synopsis shown before "Read more"
const SYNOPSIS_PREVIEW_CHARS: usize = 400;

fn score_label(score: Option<f64>) -> String {
    score.map_or_else(|| "N/A".to_string(), |s| s.to_string())
}

fn render_item(out: &mut String, item: &ResultItem) {
    let _ = writeln!(
        out,
        "  [{:>6}] {}  ⭐ {}",
        item.id,
        item.title,
        score_label(item.score)
    );
}

/// Render the search list: echo line, results or placeholder, page controls
pub fn render_search(state: &SearchState, input: &str, page_size: u32) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Search anime: {}", input);

    // Results from the previous search stay on screen until the new ones land.
    if state.loading {
        let _ = writeln!(out, "  Loading...");
    }

    if state.list.is_empty() {
        if !state.loading {
            let _ = writeln!(out, "  No record found.");
        }
    } else {
        for item in &state.list {
            render_item(&mut out, item);
        }
    }

    if let Some(page_info) = state.pagination.as_ref().filter(|p| p.has_controls()) {
        let _ = writeln!(
            out,
            "  Page {} of {} ({} titles){}",
            page_info.current_page,
            page_info.last_page,
            page_info.total_or_estimate(page_size),
            if page_info.has_next { "  :next for more" } else { "" }
        );
    }

    out
}

/// Shorten `text` to at most `max_chars` characters on a char boundary.
fn preview(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => (&text[..idx], true),
        None => (text, false),
    }
}

fn render_details(out: &mut String, anime: &AnimeDetails, expanded: bool) {
    let _ = writeln!(out, "{}", anime.title);
    if let Some(japanese) = &anime.title_japanese {
        let _ = writeln!(out, "{}", japanese);
    }
    if let Some(image) = &anime.images.jpg.large_image_url {
        let _ = writeln!(out, "Cover: {}", image);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Score: {}", score_label(anime.score));
    let _ = writeln!(
        out,
        "Year: {}",
        anime.year.map_or_else(|| "Unknown".to_string(), |y| y.to_string())
    );
    let _ = writeln!(
        out,
        "Episodes: {}",
        anime.episodes.map_or_else(|| "?".to_string(), |e| e.to_string())
    );
    let _ = writeln!(
        out,
        "Rank: #{}",
        anime.rank.map_or_else(|| "?".to_string(), |r| r.to_string())
    );
    let _ = writeln!(out, "Type: {}", anime.anime_type.as_deref().unwrap_or(""));
    let _ = writeln!(out, "Duration: {}", anime.duration.as_deref().unwrap_or(""));
    let _ = writeln!(out);

    let _ = writeln!(out, "Synopsis");
    match anime.synopsis.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(synopsis) if expanded => {
            let _ = writeln!(out, "{}", synopsis);
            let _ = writeln!(out, "[Show less]");
        }
        Some(synopsis) => {
            let (shown, truncated) = preview(synopsis, SYNOPSIS_PREVIEW_CHARS);
            if truncated {
                let _ = writeln!(out, "{}...", shown);
                let _ = writeln!(out, "[Read more]");
            } else {
                let _ = writeln!(out, "{}", shown);
            }
        }
        None => {
            let _ = writeln!(out, "No synopsis available.");
        }
    }
    let _ = writeln!(out);

    let genres: Vec<&str> = anime.genres.iter().map(|g| g.name.as_str()).collect();
    let _ = writeln!(out, "Genres: {}", genres.join(", "));

    if let Some(embed) = anime.trailer.as_ref().and_then(|t| t.embed_url.as_deref()) {
        let _ = writeln!(out, "Trailer: {}", embed);
    }
}

/// Render the detail view
pub fn render_detail(view: &DetailView, expanded: bool) -> String {
    let mut out = String::new();
    match view {
        DetailView::Loading => {
            let _ = writeln!(out, "Loading...");
        }
        DetailView::NotFound => {
            let _ = writeln!(out, "Anime not found.");
        }
        DetailView::Found(anime) => render_details(&mut out, anime, expanded),
    }
    let _ = writeln!(out, "\n:back to return to search");
    out
}
