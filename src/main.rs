// src/main.rs
use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use cinelist::app::utils::{poster_url, rating_label, release_year, truncate_chars};
use cinelist::app::{CatalogEngine, RatingFilter, SqliteSnapshotStore, TmdbClient};
use cinelist::config::load_config;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str =
    "Usage: cinelist [--pages N] [--genre ID|all] [--sort high|low] [--offline] [--posters]";

struct Args {
    pages: u32,
    genre: Option<Option<u32>>,
    sort: Option<RatingFilter>,
    offline: bool,
    posters: bool,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut out = Args {
        pages: 1,
        genre: None,
        sort: None,
        offline: false,
        posters: false,
    };
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--pages" => {
                let v = it.next().ok_or("--pages needs a value")?;
                out.pages = v.parse().map_err(|_| format!("bad page count `{v}`"))?;
            }
            "--genre" => {
                let v = it.next().ok_or("--genre needs a value")?;
                out.genre = Some(if v == "all" {
                    None
                } else {
                    Some(v.parse().map_err(|_| format!("bad genre id `{v}`"))?)
                });
            }
            "--sort" => {
                let v = it.next().ok_or("--sort needs a value")?;
                out.sort = Some(RatingFilter::from_str(v).ok_or(format!("bad sort `{v}`"))?);
            }
            "--offline" => out.offline = true,
            "--posters" => out.posters = true,
            other => return Err(format!("unknown argument `{other}`")),
        }
    }
    Ok(out)
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let raw: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&raw) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    let cfg = load_config();
    if cfg.api_token.is_none() && cfg.api_key.is_none() && !args.offline {
        warn!("No API credentials: set api_token/api_key in config.json or CINELIST_API_TOKEN.");
    }

    let source = match TmdbClient::from_config(&cfg) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("Failed to build catalog client: {e}");
            return ExitCode::FAILURE;
        }
    };
    let store = match SqliteSnapshotStore::open(&cfg.snapshot_db) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to open snapshot store {}: {e}", cfg.snapshot_db.display());
            return ExitCode::FAILURE;
        }
    };

    let mut engine = CatalogEngine::create(source, Box::new(store));

    if let Some(genre) = args.genre {
        engine.set_genre_filter(genre);
    }
    if let Some(mode) = args.sort {
        engine.set_rating_filter(mode);
    }

    if !args.offline {
        engine.initialize();
        engine.wait_idle();
        for _ in 1..args.pages {
            engine.load_next_page();
            engine.wait_idle();
        }
    }

    info!(
        "Catalog: {} movies through page {}, showing {}",
        engine.catalog_len(),
        engine.page_cursor(),
        engine.visible_movies().len()
    );

    let genre_name = engine
        .genre_filter()
        .map(|id| {
            cinelist::app::filters::genre_name(engine.genres(), id)
                .map(str::to_string)
                .unwrap_or_else(|| format!("genre {id}"))
        })
        .unwrap_or_else(|| "All genres".to_string());
    println!(
        "--- Movie List: {} / {} ---",
        genre_name,
        engine.rating_filter().as_str()
    );

    if engine.is_empty_view() {
        println!("There are no films in this genre.");
        return ExitCode::SUCCESS;
    }

    for movie in engine.visible_movies() {
        let year = release_year(&movie.release_date)
            .map(|y| format!(" ({y})"))
            .unwrap_or_default();
        println!(
            "{:>4}  {}{}  [{}]",
            rating_label(movie.vote_average),
            movie.title,
            year,
            engine.genre_label(movie)
        );
        if !movie.overview.is_empty() {
            println!("      {}", truncate_chars(&movie.overview, 100));
        }
        if args.posters {
            if let Some(url) = poster_url(&cfg.poster_base_url, movie.poster_path.as_deref()) {
                println!("      {url}");
            }
        }
    }

    ExitCode::SUCCESS
}
