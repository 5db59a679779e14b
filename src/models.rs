use serde::{Deserialize, Deserializer, Serialize};

/// One movie document as served by the backend.
///
/// The same film usually shows up once per cinema chain, each copy carrying
/// that chain's poster and showtimes.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct MovieRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "Title", alias = "title", default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "Image URL", alias = "image_url", default)]
    pub image_url: Option<String>,
    #[serde(rename = "Language", alias = "language", default)]
    pub language: Option<String>,
    #[serde(rename = "Genre", default, deserialize_with = "null_as_empty")]
    pub genres: Vec<String>,
    #[serde(rename = "Parent", alias = "parent", default)]
    pub parent_chain: Option<String>,
    #[serde(
        rename = "Timings",
        alias = "timings",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub timings: Vec<TimingEntry>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, Hash)]
pub struct TimingEntry {
    #[serde(rename = "Date", default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(rename = "Showtimes", default, deserialize_with = "null_as_empty")]
    pub showtimes: Vec<ShowtimeEntry>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, Hash)]
pub struct ShowtimeEntry {
    #[serde(rename = "Place", default, deserialize_with = "null_as_default")]
    pub place: String,
    #[serde(rename = "Experiences", default, deserialize_with = "null_as_empty")]
    pub experiences: Vec<ExperienceEntry>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, Hash)]
pub struct ExperienceEntry {
    #[serde(rename = "Experience", default, deserialize_with = "null_as_default")]
    pub experience_name: String,
    #[serde(rename = "Times", default, deserialize_with = "null_as_empty")]
    pub time_slots: Vec<String>,
}

/// A movie after deduplication: same shape as the raw record, with the poster
/// and timings replaced by the merged values.
pub type CanonicalMovie = MovieRecord;

impl MovieRecord {
    /// Every time slot of this movie, walking date, place, then experience.
    pub fn time_slots(&self) -> Vec<String> {
        self.timings
            .iter()
            .flat_map(|t| t.showtimes.iter())
            .flat_map(|s| s.experiences.iter())
            .flat_map(|e| e.time_slots.iter().cloned())
            .collect()
    }

    pub fn has_showtimes(&self) -> bool {
        self.timings
            .iter()
            .flat_map(|t| t.showtimes.iter())
            .flat_map(|s| s.experiences.iter())
            .any(|e| !e.time_slots.is_empty())
    }

    pub fn is_from_chain(&self, chain: &str) -> bool {
        self.parent_chain
            .as_deref()
            .is_some_and(|p| p.eq_ignore_ascii_case(chain))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Offer {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(rename = "offer title", default)]
    pub title: Option<String>,
    #[serde(rename = "offer_image", default)]
    pub image_url: Option<String>,
    #[serde(rename = "offer URL", default)]
    pub url: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct OffersResponse {
    #[serde(default)]
    pub count: usize,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub offers: Vec<Offer>,
}

/// Envelope used by the backend's per-chain movie listings.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ChainMoviesResponse {
    #[serde(default)]
    pub count: usize,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub movies: Vec<MovieRecord>,
}

// The backend stores sparse documents; a `null` list means "nothing here",
// and `null` items inside a list are dropped.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<Option<T>>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .collect())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_backend_movie_document() {
        let value = json!({
            "_id": "665f0c",
            "Title": "Inception",
            "description": "Dreams within dreams",
            "Image URL": "https://cdn/vox.png",
            "Language": "English",
            "Genre": ["Sci-Fi", "Thriller"],
            "Parent": "VOX",
            "Timings": [{
                "Date": "2025-05-01",
                "Showtimes": [{
                    "Place": "Mall of the Emirates",
                    "Experiences": [{ "Experience": "IMAX", "Times": ["18:00", "21:30"] }]
                }]
            }]
        });
        let movie: MovieRecord = serde_json::from_value(value).expect("movie deserialize");
        assert_eq!(movie.id.as_deref(), Some("665f0c"));
        assert_eq!(movie.parent_chain.as_deref(), Some("VOX"));
        assert_eq!(movie.genres.len(), 2);
        assert_eq!(movie.time_slots(), vec!["18:00", "21:30"]);
        assert!(movie.has_showtimes());
    }

    #[test]
    fn null_nested_lists_decode_as_empty() {
        let value = json!({
            "Title": "Dune",
            "Genre": null,
            "Timings": [{
                "Date": "2025-05-01",
                "Showtimes": [{ "Place": "City Centre", "Experiences": null }]
            }, {
                "Date": "2025-05-02",
                "Showtimes": null
            }]
        });
        let movie: MovieRecord = serde_json::from_value(value).expect("movie deserialize");
        assert!(movie.genres.is_empty());
        assert_eq!(movie.timings.len(), 2);
        assert!(movie.timings[0].showtimes[0].experiences.is_empty());
        assert!(movie.timings[1].showtimes.is_empty());
        assert!(movie.time_slots().is_empty());
        assert!(!movie.has_showtimes());
    }

    #[test]
    fn null_nested_scalars_do_not_sink_the_batch() {
        let value = json!([
            {
                "Title": "Dune",
                "Timings": [
                    null,
                    {
                        "Date": null,
                        "Showtimes": [{
                            "Place": null,
                            "Experiences": [
                                { "Experience": null, "Times": ["18:00", null, "21:00"] },
                                null
                            ]
                        }]
                    }
                ],
                "Genre": ["Sci-Fi", null]
            },
            { "Title": "Wicked" }
        ]);
        let movies: Vec<MovieRecord> = serde_json::from_value(value).expect("batch deserialize");
        assert_eq!(movies.len(), 2);

        let dune = &movies[0];
        assert_eq!(dune.genres, vec!["Sci-Fi"]);
        assert_eq!(dune.timings.len(), 1);
        assert_eq!(dune.timings[0].date, "");
        let showtime = &dune.timings[0].showtimes[0];
        assert_eq!(showtime.place, "");
        assert_eq!(showtime.experiences.len(), 1);
        assert_eq!(showtime.experiences[0].experience_name, "");
        assert_eq!(dune.time_slots(), vec!["18:00", "21:00"]);
        assert_eq!(movies[1].title.as_deref(), Some("Wicked"));
    }

    #[test]
    fn accepts_lowercase_field_aliases() {
        let value = json!({
            "title": "Dune",
            "image_url": "https://cdn/dune.png",
            "parent": "amc",
            "timings": null
        });
        let movie: MovieRecord = serde_json::from_value(value).expect("movie deserialize");
        assert_eq!(movie.title.as_deref(), Some("Dune"));
        assert_eq!(movie.image_url.as_deref(), Some("https://cdn/dune.png"));
        assert!(movie.is_from_chain("AMC"));
        assert!(movie.timings.is_empty());
    }

    #[test]
    fn decodes_offers_envelope() {
        let value = json!({
            "count": 1,
            "offers": [{
                "_id": "o1",
                "offer title": "Half price Tuesdays",
                "offer_image": "https://cdn/offer.png",
                "offer URL": "https://vox/offers/1",
                "parent": "VOX"
            }]
        });
        let resp: OffersResponse = serde_json::from_value(value).expect("offers deserialize");
        assert_eq!(resp.count, 1);
        assert_eq!(resp.offers[0].title.as_deref(), Some("Half price Tuesdays"));
        assert_eq!(resp.offers[0].url.as_deref(), Some("https://vox/offers/1"));
    }
}
