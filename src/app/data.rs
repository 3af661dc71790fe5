use indexmap::IndexMap;

use super::types::{Genre, GenreId, Movie, MovieId, RatingFilter};

/// The engine's mutable aggregate. Movies are keyed by id in first-seen order;
/// re-fetched ids overwrite in place without moving.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogState {
    pub movies: IndexMap<MovieId, Movie>,
    pub genres: Vec<Genre>,
    pub genre_filter: Option<GenreId>,
    pub rating_filter: RatingFilter,
    /// Last successfully fetched page; 0 before any.
    pub page_cursor: u32,
}

impl CatalogState {
    pub fn replace_movies(&mut self, fetched: Vec<Movie>) {
        self.movies = collect_by_id(fetched);
    }

    /// Merge a page by id. Returns how many ids were new.
    pub fn merge_movies(&mut self, fetched: Vec<Movie>) -> usize {
        let before = self.movies.len();
        for movie in fetched {
            // IndexMap::insert keeps the slot of an existing key
            self.movies.insert(movie.id, movie);
        }
        self.movies.len() - before
    }

    pub fn replace_genres(&mut self, fetched: Vec<Genre>) {
        self.genres = fetched;
    }

    pub fn movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies.get(&id)
    }
}

pub(crate) fn collect_by_id(movies: Vec<Movie>) -> IndexMap<MovieId, Movie> {
    let mut map = IndexMap::with_capacity(movies.len());
    for m in movies {
        map.insert(m.id, m);
    }
    map
}
