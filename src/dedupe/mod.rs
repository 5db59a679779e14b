//! Collapse per-chain movie listings into one entry per film.

use tracing::debug;

use crate::models::{CanonicalMovie, MovieRecord};

mod flatten;
mod group;
mod normalize;

pub use flatten::{flatten_group, flatten_groups, merge_timings, select_poster};
pub use group::{group_by_title, MovieGroup};
pub use normalize::normalize_title;

/// Chain preference for posters when nothing else is configured.
pub const DEFAULT_CHAIN_PRIORITY: [&str; 4] = ["VOX", "Muvi", "Empire", "AMC"];

/// Group `records` by title and flatten each group into one canonical movie.
///
/// Output follows the order in which each film first appeared in the input.
pub fn dedupe_movies<S: AsRef<str>>(records: Vec<MovieRecord>, priority: &[S]) -> Vec<CanonicalMovie> {
    let input_len = records.len();
    let groups = group_by_title(records);
    debug!(
        records = input_len,
        groups = groups.len(),
        "Grouped movie records by title"
    );
    flatten_groups(&groups, priority)
}

/// Stable, case-insensitive sort by title. Untitled movies sort first.
pub fn sort_by_title(movies: &mut [CanonicalMovie]) {
    movies.sort_by_cached_key(|m| m.title.as_deref().unwrap_or_default().to_lowercase());
}
