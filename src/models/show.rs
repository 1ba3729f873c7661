use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single screening of a movie. Immutable once fetched; the pricing fields
/// feed the pricing engine, everything else is display data. Field-name
/// variability across backend revisions is captured by the alias table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Show {
    #[serde(default, deserialize_with = "crate::models::de::opt_id_string")]
    pub id: Option<String>,
    #[serde(
        default,
        rename = "movieId",
        alias = "movie_id",
        alias = "movie",
        deserialize_with = "crate::models::de::opt_id_string"
    )]
    pub movie_id: Option<String>,
    #[serde(default, rename = "startTime", alias = "start_time", alias = "start")]
    pub start_time: Option<String>,
    #[serde(default, rename = "endTime", alias = "end_time", alias = "end")]
    pub end_time: Option<String>,
    #[serde(
        default,
        alias = "auditoriumName",
        alias = "theatre",
        alias = "theatreName",
        alias = "theater",
        alias = "theaterId",
        alias = "theatreId"
    )]
    pub auditorium: Option<String>,
    #[serde(default, rename = "priceRegular", alias = "price_regular", alias = "price")]
    pub price_regular: Option<f64>,
    #[serde(
        default,
        rename = "pricePremium",
        alias = "price_premium",
        alias = "pricepremium"
    )]
    pub price_premium: Option<f64>,
    #[serde(default, rename = "seatsAvailable", alias = "seats_available")]
    pub seats_available: Option<i64>,
}

impl Show {
    pub fn auditorium_name(&self) -> String {
        self.auditorium.clone().unwrap_or_default()
    }

    pub fn formatted_start_time(&self) -> String {
        match self.start_time.as_deref() {
            Some(raw) => format_show_time(raw),
            None => "TBA".to_string(),
        }
    }
}

/// Formats a backend timestamp for display. Timestamps this client cannot
/// parse are shown verbatim rather than dropped.
pub fn format_show_time(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%a %e %b • %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return dt.format("%a %e %b • %H:%M").to_string();
    }
    raw.to_string()
}
