// src/app/mod.rs

use std::sync::mpsc::Receiver;
use std::sync::Arc;

use tracing::{debug, info, warn};

pub mod data;
pub mod error;
pub mod fetch;
pub mod filters;
pub mod snapshot;
pub mod source;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use data::CatalogState;
pub use error::{FetchError, StoreError};
pub use snapshot::{
    CatalogSnapshot, MemorySnapshotStore, SnapshotStore, SqliteSnapshotStore, SNAPSHOT_KEY,
};
pub use source::{CatalogSource, TmdbClient};
pub use types::{FetchMsg, Genre, GenreId, LoadPhase, MergeMode, Movie, MovieId, RatingFilter};

/// Owns the catalog and every mutation of it. One instance per session;
/// hand it to the presentation layer by reference.
pub struct CatalogEngine {
    state: CatalogState,
    visible: Vec<Movie>,
    phase: LoadPhase,

    source: Arc<dyn CatalogSource>,
    store: Box<dyn SnapshotStore>,

    // fetch plumbing; present only while Loading
    fetch_rx: Option<Receiver<FetchMsg>>,
}

impl CatalogEngine {
    /// Build an engine, rehydrating from `store` when a snapshot exists.
    pub fn create(source: Arc<dyn CatalogSource>, store: Box<dyn SnapshotStore>) -> Self {
        let initial = match snapshot::load_snapshot(store.as_ref()) {
            Ok(Some(snap)) => {
                info!(
                    "Restored snapshot: {} movies, {} genres, page {}",
                    snap.movies.len(),
                    snap.genres.len(),
                    snap.page_cursor
                );
                Some(snap)
            }
            Ok(None) => {
                debug!("No snapshot under `{SNAPSHOT_KEY}`; starting empty");
                None
            }
            Err(e) => {
                warn!("Ignoring unreadable snapshot: {e}");
                None
            }
        };
        Self::from_snapshot(source, store, initial)
    }

    /// Build an engine from an explicit snapshot; nothing is read from `store`.
    pub fn from_snapshot(
        source: Arc<dyn CatalogSource>,
        store: Box<dyn SnapshotStore>,
        initial: Option<CatalogSnapshot>,
    ) -> Self {
        let state = initial.map(CatalogSnapshot::into_state).unwrap_or_default();
        let mut engine = Self {
            state,
            visible: Vec::new(),
            // a persisted snapshot never carries an in-flight fetch
            phase: LoadPhase::Idle,
            source,
            store,
            fetch_rx: None,
        };
        engine.refresh_view();
        engine
    }

    // ---- read surface ----
    pub fn visible_movies(&self) -> &[Movie] {
        &self.visible
    }

    pub fn genres(&self) -> &[Genre] {
        &self.state.genres
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, LoadPhase::Loading { .. })
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn genre_filter(&self) -> Option<GenreId> {
        self.state.genre_filter
    }

    pub fn rating_filter(&self) -> RatingFilter {
        self.state.rating_filter
    }

    pub fn page_cursor(&self) -> u32 {
        self.state.page_cursor
    }

    pub fn catalog_len(&self) -> usize {
        self.state.movies.len()
    }

    /// Whole catalog in display (first-seen) order, unfiltered.
    pub fn catalog(&self) -> impl Iterator<Item = &Movie> {
        self.state.movies.values()
    }

    pub fn movie(&self, id: MovieId) -> Option<&Movie> {
        self.state.movie(id)
    }

    pub fn genre_label(&self, movie: &Movie) -> String {
        filters::genre_label(&movie.genre_ids, &self.state.genres)
    }

    pub fn is_empty_view(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot::capture(&self.state)
    }

    // ---- filter actions (no network, never touch the loading phase) ----
    pub fn set_genre_filter(&mut self, genre: Option<GenreId>) {
        self.state.genre_filter = genre;
        debug!("genre filter -> {genre:?}");
        self.commit();
    }

    pub fn set_rating_filter(&mut self, mode: RatingFilter) {
        self.state.rating_filter = mode;
        debug!("rating filter -> {}", mode.as_str());
        self.commit();
    }

    // ---- mutation plumbing ----
    fn refresh_view(&mut self) {
        self.visible = filters::derive_view(
            self.state.movies.values(),
            self.state.genre_filter,
            self.state.rating_filter,
        );
    }

    /// Re-derive the view and persist. Called after every state mutation.
    fn commit(&mut self) {
        self.refresh_view();
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = snapshot::save_snapshot(self.store.as_ref(), &self.snapshot()) {
            warn!("Snapshot write failed: {e}");
        }
    }
}
