use cinelist::app::snapshot::load_snapshot;
use cinelist::app::utils::rating_label;
use cinelist::app::{SqliteSnapshotStore, SnapshotStore, StoreError, SNAPSHOT_KEY};
use cinelist::config::{load_config, local_snapshot_db_path};
use std::env;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

fn main() -> Result<(), StoreError> {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("Usage: cargo run --bin snapshot_explorer [limit] [--db path] [--raw] [--out file]");
        std::process::exit(1);
    }

    let limit: usize = if args.len() > 1 && !args[1].starts_with("--") {
        args[1].parse().unwrap_or(10)
    } else {
        10
    };

    let flag_value = |name: &str| {
        args.iter()
            .position(|a| a == name)
            .and_then(|i| args.get(i + 1).cloned())
    };
    let out_file: Option<String> = flag_value("--out");
    let raw = args.iter().any(|a| a == "--raw");

    let db_path = flag_value("--db").map(PathBuf::from).unwrap_or_else(|| {
        let cfg = load_config();
        if cfg.snapshot_db.as_os_str().is_empty() {
            local_snapshot_db_path()
        } else {
            cfg.snapshot_db
        }
    });
    if !db_path.exists() {
        eprintln!("No snapshot DB at {}", db_path.display());
        std::process::exit(1);
    }
    println!("Opening snapshot DB: {}", db_path.display());

    let store = SqliteSnapshotStore::open_read_only(&db_path)?;
    let mut output = String::new();
    output.push_str(&format!("--- Keys: {:?} ---\n", store.keys()?));

    if raw {
        match store.load(SNAPSHOT_KEY)? {
            Some(value) => output.push_str(&format!("{value}\n")),
            None => output.push_str(&format!("(no value under `{SNAPSHOT_KEY}`)\n")),
        }
    } else {
        match load_snapshot(&store)? {
            Some(snap) => {
                output.push_str(&format!(
                    "Key: {SNAPSHOT_KEY}  updated_at: {}\n",
                    store.updated_at(SNAPSHOT_KEY)?.unwrap_or_default()
                ));
                output.push_str(&format!(
                    "Movies: {}  Genres: {}  Page cursor: {}\n",
                    snap.movies.len(),
                    snap.genres.len(),
                    snap.page_cursor
                ));
                output.push_str(&format!(
                    "Genre filter: {:?}  Rating filter: {}\n",
                    snap.genre_filter,
                    snap.rating_filter.as_str()
                ));
                for m in snap.movies.iter().take(limit) {
                    output.push_str(&format!(
                        "{:>8}  {:>4}  {}  {:?}\n",
                        m.id,
                        rating_label(m.vote_average),
                        m.title,
                        m.genre_ids
                    ));
                }
            }
            None => output.push_str(&format!("(no snapshot under `{SNAPSHOT_KEY}`)\n")),
        }
    }

    if let Some(path) = out_file {
        let mut file = File::create(&path)?;
        file.write_all(output.as_bytes())?;
        println!("Exported snapshot summary to {}", path);
    } else {
        print!("{}", output);
    }

    Ok(())
}
