// src/app/types.rs
use serde::{Deserialize, Serialize};

use super::error::FetchError;

pub type MovieId = u64;
pub type GenreId = u32;

// ---- catalog records (wire shape of the content API) ----
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    /// Kept as the API sends it; not parsed.
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<GenreId>,
    #[serde(default)]
    pub vote_average: f64,
}

impl Movie {
    pub fn has_genre(&self, genre: GenreId) -> bool {
        self.genre_ids.contains(&genre)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

// ---- UI controls ----
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingFilter {
    #[default]
    #[serde(rename = "high rated")]
    HighRated,
    #[serde(rename = "low rated")]
    LowRated,
}

impl RatingFilter {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HighRated => "high rated",
            Self::LowRated => "low rated",
        }
    }
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high rated" | "high" => Some(Self::HighRated),
            "low rated" | "low" => Some(Self::LowRated),
            _ => None,
        }
    }
}

// ---- engine phases ----
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    /// `outstanding` counts fetch branches that have not reported back yet.
    Loading { outstanding: usize },
}

// ---- cross-thread messages ----
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeMode {
    /// First page of a fresh load; replaces the catalog wholesale.
    Replace,
    /// Subsequent page; merged by id.
    Append,
}

pub enum FetchMsg {
    Movies {
        page: u32,
        mode: MergeMode,
        result: Result<Vec<Movie>, FetchError>,
    },
    Genres(Result<Vec<Genre>, FetchError>),
}
