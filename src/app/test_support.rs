// Scripted catalog source for engine tests.
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};

use super::error::FetchError;
use super::source::CatalogSource;
use super::types::{Genre, GenreId, Movie, MovieId};

pub fn movie(id: MovieId, rating: f64, genres: &[GenreId]) -> Movie {
    Movie {
        id,
        title: format!("Movie {id}"),
        overview: format!("Overview of {id}"),
        release_date: "2020-01-01".into(),
        poster_path: Some(format!("/poster{id}.jpg")),
        genre_ids: genres.to_vec(),
        vote_average: rating,
    }
}

/// Holds page fetches until opened.
#[derive(Clone, Default)]
pub struct Gate {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) {
        let (lock, cvar) = &*self.inner;
        *lock.lock().unwrap() = true;
        cvar.notify_all();
    }

    fn wait(&self) {
        let (lock, cvar) = &*self.inner;
        let mut open = lock.lock().unwrap();
        while !*open {
            open = cvar.wait(open).unwrap();
        }
    }
}

#[derive(Default)]
pub struct CallLog {
    pages: Mutex<Vec<u32>>,
    genres: AtomicUsize,
}

impl CallLog {
    pub fn pages_requested(&self) -> Vec<u32> {
        self.pages.lock().unwrap().clone()
    }

    pub fn genre_calls(&self) -> usize {
        self.genres.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.pages_requested().len() + self.genre_calls()
    }
}

#[derive(Default)]
pub struct ScriptedSource {
    pages: HashMap<u32, Vec<Movie>>,
    genres: Vec<Genre>,
    failing_pages: HashSet<u32>,
    failing_genres: bool,
    fail_once: Mutex<HashSet<u32>>,
    panicking_pages: HashSet<u32>,
    gate: Option<Gate>,
    calls: Arc<CallLog>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32, movies: Vec<Movie>) -> Self {
        self.pages.insert(page, movies);
        self
    }

    pub fn genres(mut self, genres: Vec<Genre>) -> Self {
        self.genres = genres;
        self
    }

    pub fn failing_page(mut self, page: u32) -> Self {
        self.failing_pages.insert(page);
        self
    }

    pub fn failing_genres(mut self) -> Self {
        self.failing_genres = true;
        self
    }

    pub fn fail_first_attempt(self, page: u32) -> Self {
        self.fail_once.lock().unwrap().insert(page);
        self
    }

    pub fn panicking_page(mut self, page: u32) -> Self {
        self.panicking_pages.insert(page);
        self
    }

    pub fn gated(mut self, gate: Gate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Arc<CallLog> {
        Arc::clone(&self.calls)
    }

    fn transport_error(path: &str) -> FetchError {
        FetchError::Transport {
            url: format!("scripted://{path}"),
            message: "connection reset".into(),
        }
    }
}

impl CatalogSource for ScriptedSource {
    fn fetch_popular_page(&self, page: u32) -> Result<Vec<Movie>, FetchError> {
        self.calls.pages.lock().unwrap().push(page);
        if let Some(gate) = &self.gate {
            gate.wait();
        }
        if self.panicking_pages.contains(&page) {
            panic!("scripted panic on page {page}");
        }
        if self.failing_pages.contains(&page) || self.fail_once.lock().unwrap().remove(&page) {
            return Err(Self::transport_error("/movie/popular"));
        }
        Ok(self.pages.get(&page).cloned().unwrap_or_default())
    }

    fn fetch_genres(&self) -> Result<Vec<Genre>, FetchError> {
        self.calls.genres.fetch_add(1, Ordering::SeqCst);
        if self.failing_genres {
            return Err(Self::transport_error("/genre/movie/list"));
        }
        Ok(self.genres.clone())
    }
}
