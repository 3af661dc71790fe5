// src/app/source.rs
use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::error::FetchError;
use super::types::{Genre, Movie};
use crate::config::AppConfig;

/// Remote side of the catalog. Calls block; the engine runs them off-thread.
pub trait CatalogSource: Send + Sync {
    fn fetch_popular_page(&self, page: u32) -> Result<Vec<Movie>, FetchError>;
    fn fetch_genres(&self) -> Result<Vec<Genre>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct PageResponse {
    results: Vec<Movie>,
}

#[derive(Debug, Deserialize)]
struct GenreResponse {
    genres: Vec<Genre>,
}

/// HTTP client for a TMDB-style content API.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    language: Option<String>,
}

impl TmdbClient {
    pub fn from_config(cfg: &AppConfig) -> Result<Self, FetchError> {
        Self::new(
            &cfg.api_base_url,
            cfg.api_token.as_deref(),
            cfg.api_key.clone(),
            cfg.language.clone(),
            cfg.request_timeout,
        )
    }

    pub fn new(
        base_url: &str,
        bearer_token: Option<&str>,
        api_key: Option<String>,
        language: Option<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = bearer_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| FetchError::Client(format!("bad api token: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent("cinelist/catalog")
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            language,
        })
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);

        let mut params: Vec<(&str, String)> = query.to_vec();
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }
        if let Some(lang) = &self.language {
            params.push(("language", lang.clone()));
        }

        let resp = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .map_err(|e| FetchError::Transport {
                url: url.clone(),
                message: e.to_string(),
            })?;
        if !resp.status().is_success() {
            return Err(FetchError::Status {
                url,
                status: resp.status().as_u16(),
            });
        }
        let body = resp.bytes().map_err(|e| FetchError::Transport {
            url: url.clone(),
            message: format!("read body: {e}"),
        })?;
        debug!("GET {url}: {} bytes", body.len());

        serde_json::from_slice(&body).map_err(|e| FetchError::Decode {
            url,
            message: e.to_string(),
        })
    }
}

impl CatalogSource for TmdbClient {
    fn fetch_popular_page(&self, page: u32) -> Result<Vec<Movie>, FetchError> {
        let resp: PageResponse = self.get_json("/movie/popular", &[("page", page.to_string())])?;
        Ok(resp.results)
    }

    fn fetch_genres(&self) -> Result<Vec<Genre>, FetchError> {
        let resp: GenreResponse = self.get_json("/genre/movie/list", &[])?;
        Ok(resp.genres)
    }
}
