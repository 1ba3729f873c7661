use serde::{Deserialize, Serialize};

/// Movie metadata as served by the catalog. Different backend revisions use
/// different field names; the alias table below is the explicit mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    #[serde(default, deserialize_with = "crate::models::de::opt_id_string")]
    pub id: Option<String>,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default, alias = "type")]
    pub genre: Option<String>,
    #[serde(default, alias = "length")]
    pub duration: Option<String>,
    #[serde(default, alias = "lang")]
    pub language: Option<String>,
    #[serde(default, alias = "description")]
    pub summary: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, alias = "posterUrl", alias = "image")]
    pub poster: Option<String>,
}

impl Movie {
    // "Genre • 2h 15m" subtitle line
    pub fn tagline(&self) -> String {
        match (self.genre.as_deref(), self.duration.as_deref()) {
            (Some(genre), Some(duration)) => format!("{genre} • {duration}"),
            (Some(genre), None) => genre.to_string(),
            (None, Some(duration)) => duration.to_string(),
            (None, None) => String::new(),
        }
    }
}
