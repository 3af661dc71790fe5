// src/app/utils.rs

/// Rating with one decimal, e.g. `7.3`.
pub fn rating_label(rating: f64) -> String {
    format!("{rating:.1}")
}

/// Absolute poster URL, or `None` when the movie has no poster.
pub fn poster_url(base: &str, poster_path: Option<&str>) -> Option<String> {
    let path = poster_path.map(str::trim).filter(|p| !p.is_empty())?;
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        Some(format!("{base}{path}"))
    } else {
        Some(format!("{base}/{path}"))
    }
}

/// Leading four-digit year of a release date like `1999-10-15`.
pub fn release_year(release_date: &str) -> Option<i32> {
    let head = release_date.trim().get(..4)?;
    if !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    head.parse::<i32>().ok().filter(|y| (1870..=2200).contains(y))
}

/// Trim long overviews for one-line listings.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
