//! Detail view loading.

use catalog::{AnimeDetails, CatalogApi};
use tracing::{info, warn};

/// State of the detail view for one catalog id
#[derive(Debug, Clone)]
pub enum DetailView {
    Loading,
    Found(Box<AnimeDetails>),
    NotFound,
}

/// Fetch one title for the detail view.
///
/// Any failure degrades to `NotFound`; the cause is only logged.
pub async fn load_detail<C: CatalogApi>(catalog: &C, id: u32) -> DetailView {
    match catalog.get_anime(id).await {
        Ok(Some(details)) => {
            info!(mal_id = id, title = %details.title, "Loaded anime details");
            DetailView::Found(Box::new(details))
        }
        Ok(None) => {
            info!(mal_id = id, "Anime not found");
            DetailView::NotFound
        }
        Err(e) => {
            warn!(mal_id = id, error = %e, "Failed to load anime");
            DetailView::NotFound
        }
    }
}
