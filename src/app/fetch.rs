// src/app/fetch.rs
use std::sync::mpsc::{self, Sender, TryRecvError};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::source::CatalogSource;
use super::types::{FetchMsg, LoadPhase, MergeMode};

impl crate::app::CatalogEngine {
    /// Fetch page 1 and the genre taxonomy concurrently. No-op while loading.
    pub fn initialize(&mut self) {
        if self.is_loading() {
            debug!("initialize ignored: fetch already in flight");
            return;
        }

        let tx = self.begin_loading(2);
        spawn_movies(Arc::clone(&self.source), tx.clone(), 1, MergeMode::Replace);
        spawn_genres(Arc::clone(&self.source), tx);
        info!("Initializing catalog (page 1 + genres)");
    }

    /// Fetch `page_cursor + 1` and merge it by id. No-op while loading.
    pub fn load_next_page(&mut self) {
        if self.is_loading() {
            debug!("load_next_page ignored: fetch already in flight");
            return;
        }

        let Some(next_page) = self.state.page_cursor.checked_add(1) else {
            warn!("load_next_page ignored: page cursor {} is at its limit", self.state.page_cursor);
            return;
        };
        let tx = self.begin_loading(1);
        spawn_movies(Arc::clone(&self.source), tx, next_page, MergeMode::Append);
        info!("Loading page {next_page}");
    }

    /// Apply whatever completions have arrived, without blocking.
    /// Returns true if anything was applied.
    pub fn poll_fetch_done(&mut self) -> bool {
        let mut applied = false;
        while self.is_loading() {
            let received = match &self.fetch_rx {
                Some(rx) => rx.try_recv(),
                None => Err(TryRecvError::Disconnected),
            };
            match received {
                Ok(msg) => {
                    self.apply_fetch_msg(msg);
                    applied = true;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.abandon_outstanding();
                    applied = true;
                }
            }
        }
        applied
    }

    /// Block until the in-flight group has settled.
    pub fn wait_idle(&mut self) {
        while self.is_loading() {
            let received = match &self.fetch_rx {
                Some(rx) => rx.recv().ok(),
                None => None,
            };
            match received {
                Some(msg) => self.apply_fetch_msg(msg),
                None => self.abandon_outstanding(),
            }
        }
    }

    fn begin_loading(&mut self, branches: usize) -> Sender<FetchMsg> {
        let (tx, rx) = mpsc::channel::<FetchMsg>();
        self.fetch_rx = Some(rx);
        self.phase = LoadPhase::Loading {
            outstanding: branches,
        };
        tx
    }

    fn apply_fetch_msg(&mut self, msg: FetchMsg) {
        match msg {
            FetchMsg::Movies { page, mode, result } => match result {
                Ok(movies) => {
                    let fetched = movies.len();
                    match mode {
                        MergeMode::Replace => {
                            self.state.replace_movies(movies);
                            // a fresh first page restarts paging; the only time the cursor goes down
                            self.state.page_cursor = page;
                            info!("Page {page}: {fetched} movies (catalog replaced)");
                        }
                        MergeMode::Append => {
                            let added = self.state.merge_movies(movies);
                            self.state.page_cursor = page;
                            info!(
                                "Page {page}: {fetched} movies, {added} new, catalog {}",
                                self.state.movies.len()
                            );
                        }
                    }
                    self.commit();
                }
                Err(e) => warn!("Error fetching movies page {page}: {e}"),
            },
            FetchMsg::Genres(result) => match result {
                Ok(genres) => {
                    info!("Genres: {} entries", genres.len());
                    self.state.replace_genres(genres);
                    self.commit();
                }
                Err(e) => warn!("Error fetching genres: {e}"),
            },
        }
        self.settle_branch();
    }

    fn settle_branch(&mut self) {
        if let LoadPhase::Loading { outstanding } = self.phase {
            let left = outstanding.saturating_sub(1);
            if left == 0 {
                self.finish_loading();
            } else {
                self.phase = LoadPhase::Loading { outstanding: left };
            }
        }
    }

    /// Every sender is gone but branches never reported (worker died).
    fn abandon_outstanding(&mut self) {
        if let LoadPhase::Loading { outstanding } = self.phase {
            warn!("{outstanding} fetch branch(es) ended without a result; treating as failed");
        }
        self.finish_loading();
    }

    fn finish_loading(&mut self) {
        self.phase = LoadPhase::Idle;
        self.fetch_rx = None;
    }
}

fn spawn_movies(source: Arc<dyn CatalogSource>, tx: Sender<FetchMsg>, page: u32, mode: MergeMode) {
    std::thread::spawn(move || {
        let result = source.fetch_popular_page(page);
        let _ = tx.send(FetchMsg::Movies { page, mode, result });
    });
}

fn spawn_genres(source: Arc<dyn CatalogSource>, tx: Sender<FetchMsg>) {
    std::thread::spawn(move || {
        let result = source.fetch_genres();
        let _ = tx.send(FetchMsg::Genres(result));
    });
}
