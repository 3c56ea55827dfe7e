use serde::{Deserialize, Serialize};

use super::TasteCategory;

/// Base used to turn poster path fragments into renderable URLs
const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w342";

/// Base for trailer links built from video keys
const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

// ============================================================================
// TMDB API Types
// ============================================================================

/// One movie as returned by the discovery endpoint
///
/// Identity is the provider id: two results with the same id are the same
/// movie no matter which genre, page or locale produced them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogMovie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl CatalogMovie {
    /// Whether the item carries a usable poster fragment. Items without one
    /// are excluded from recommendations outright, never down-ranked.
    pub fn has_poster(&self) -> bool {
        self.poster_path
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty())
    }
}

/// Raw page from GET /discover/movie
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<CatalogMovie>,
    #[serde(default)]
    pub total_pages: u32,
}

/// Localized detail response from GET /movie/{id} with appended videos
/// and credits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub videos: Option<VideoList>,
    #[serde(default)]
    pub credits: Option<CreditList>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoList {
    #[serde(default)]
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreditList {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastMember {
    pub name: String,
}

impl MovieDetails {
    /// First YouTube trailer in provider order, if any
    pub fn trailer_key(&self) -> Option<&str> {
        self.videos.as_ref().and_then(|videos| {
            videos
                .results
                .iter()
                .find(|v| v.site == "YouTube" && v.video_type == "Trailer")
                .map(|v| v.key.as_str())
        })
    }

    /// Leading cast names in billing order
    pub fn top_cast(&self, count: usize) -> Vec<String> {
        self.credits
            .as_ref()
            .map(|credits| {
                credits
                    .cast
                    .iter()
                    .take(count)
                    .map(|member| member.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ============================================================================
// Client-facing types
// ============================================================================

/// One recommended movie as returned to the client
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub id: u64,
    pub title: String,
    /// Provider rating on a 0-10 scale
    pub rating: f64,
    pub overview: Option<String>,
    pub poster_url: String,
    pub rationale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailer_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cast: Vec<String>,
}

impl Recommendation {
    /// Projects a catalog item into a recommendation for the given taste
    /// bucket. Returns `None` when the item has no usable poster.
    pub fn from_catalog(movie: CatalogMovie, category: TasteCategory) -> Option<Self> {
        if !movie.has_poster() {
            return None;
        }

        let poster_url = movie
            .poster_path
            .as_deref()
            .map(|p| format!("{}{}", POSTER_BASE_URL, p))?;

        Some(Self {
            id: movie.id,
            title: movie.title,
            rating: movie.vote_average,
            overview: movie.overview.filter(|o| !o.trim().is_empty()),
            poster_url,
            rationale: category.rationale().to_string(),
            trailer_url: None,
            cast: Vec::new(),
        })
    }

    /// Overlays localized detail data onto an already-picked item.
    /// Missing fields in the details leave the original values in place.
    pub fn apply_details(&mut self, details: &MovieDetails) {
        if !details.title.trim().is_empty() {
            self.title = details.title.clone();
        }
        if let Some(overview) = details.overview.as_deref() {
            if !overview.trim().is_empty() {
                self.overview = Some(overview.to_string());
            }
        }
        if let Some(key) = details.trailer_key() {
            self.trailer_url = Some(format!("{}{}", YOUTUBE_WATCH_URL, key));
        }
        let cast = details.top_cast(3);
        if !cast.is_empty() {
            self.cast = cast;
        }
    }
}
