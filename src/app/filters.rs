use std::cmp::Ordering;

use itertools::Itertools;

use super::types::{Genre, GenreId, Movie, RatingFilter};

/// Filter by genre, then stable-sort by rating. Never mutates its input.
pub fn derive_view<'a, I>(
    movies: I,
    genre_filter: Option<GenreId>,
    rating_filter: RatingFilter,
) -> Vec<Movie>
where
    I: IntoIterator<Item = &'a Movie>,
{
    let mut out: Vec<Movie> = movies
        .into_iter()
        .filter(|m| genre_filter.map_or(true, |g| m.has_genre(g)))
        .cloned()
        .collect();
    // sort_by is stable: equal ratings keep catalog order
    out.sort_by(|a, b| compare_rating(a, b, rating_filter));
    out
}

fn compare_rating(a: &Movie, b: &Movie, mode: RatingFilter) -> Ordering {
    match mode {
        RatingFilter::HighRated => b.vote_average.total_cmp(&a.vote_average),
        RatingFilter::LowRated => a.vote_average.total_cmp(&b.vote_average),
    }
}

/// Comma-joined genre names; ids missing from the taxonomy are skipped.
pub fn genre_label(ids: &[GenreId], genres: &[Genre]) -> String {
    ids.iter()
        .filter_map(|id| genres.iter().find(|g| g.id == *id))
        .map(|g| g.name.as_str())
        .join(", ")
}

pub fn genre_name(genres: &[Genre], id: GenreId) -> Option<&str> {
    genres.iter().find(|g| g.id == id).map(|g| g.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::types::MovieId;

    fn movie(id: MovieId, rating: f64, genres: &[GenreId]) -> Movie {
        Movie {
            id,
            title: format!("Movie {id}"),
            overview: String::new(),
            release_date: String::new(),
            poster_path: None,
            genre_ids: genres.to_vec(),
            vote_average: rating,
        }
    }

    fn ids(view: &[Movie]) -> Vec<MovieId> {
        view.iter().map(|m| m.id).collect()
    }

    fn catalog() -> Vec<Movie> {
        vec![
            movie(1, 7.0, &[3]),
            movie(2, 9.0, &[3, 5]),
            movie(3, 6.0, &[5]),
            movie(4, 7.0, &[]),
            movie(5, 7.0, &[5, 12]),
        ]
    }

    #[test]
    fn no_filter_sorts_high_to_low_with_stable_ties() {
        let view = derive_view(&catalog(), None, RatingFilter::HighRated);
        assert_eq!(ids(&view), vec![2, 1, 4, 5, 3]);
        for pair in view.windows(2) {
            assert!(pair[0].vote_average >= pair[1].vote_average);
        }
    }

    #[test]
    fn low_rated_keeps_tie_order_too() {
        let view = derive_view(&catalog(), None, RatingFilter::LowRated);
        assert_eq!(ids(&view), vec![3, 1, 4, 5, 2]);
        for pair in view.windows(2) {
            assert!(pair[0].vote_average <= pair[1].vote_average);
        }
    }

    #[test]
    fn genre_filter_keeps_only_matching_movies() {
        let all = catalog();
        let view = derive_view(&all, Some(5), RatingFilter::HighRated);
        assert_eq!(ids(&view), vec![2, 5, 3]);
        assert!(view.iter().all(|m| m.genre_ids.contains(&5)));

        let excluded: Vec<MovieId> = all
            .iter()
            .filter(|m| !m.genre_ids.contains(&5))
            .map(|m| m.id)
            .collect();
        assert!(view.iter().all(|m| !excluded.contains(&m.id)));
    }

    #[test]
    fn empty_genre_list_never_matches_a_filter() {
        let view = derive_view(&[movie(4, 7.0, &[])], Some(3), RatingFilter::HighRated);
        assert!(view.is_empty());
    }

    #[test]
    fn unknown_genre_filter_gives_empty_view() {
        let view = derive_view(&catalog(), Some(999), RatingFilter::LowRated);
        assert!(view.is_empty());
    }

    #[test]
    fn derivation_is_idempotent_and_leaves_input_alone() {
        let all = catalog();
        let before = all.clone();
        let a = derive_view(&all, Some(3), RatingFilter::LowRated);
        let b = derive_view(&all, Some(3), RatingFilter::LowRated);
        assert_eq!(a, b);
        assert_eq!(all, before);
    }

    #[test]
    fn genre_label_skips_unknown_ids() {
        let genres = vec![
            Genre { id: 3, name: "Action".into() },
            Genre { id: 5, name: "Drama".into() },
        ];
        assert_eq!(genre_label(&[5, 77, 3], &genres), "Drama, Action");
        assert_eq!(genre_label(&[], &genres), "");
        assert_eq!(genre_name(&genres, 3), Some("Action"));
        assert_eq!(genre_name(&genres, 4), None);
    }
}
