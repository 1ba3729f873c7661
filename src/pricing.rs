use crate::models::Show;
use crate::seatmap::SeatMapLayout;

/// Derives per-seat and total prices from the show's two price points and
/// the seat map's premium classification. Pure: the same selection, pricing
/// and layout always produce the same total, so callers recompute instead of
/// caching.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PricingEngine {
    regular: f64,
    premium: f64,
}

impl PricingEngine {
    /// Missing price fields price as 0 rather than failing the page.
    pub fn new(price_regular: Option<f64>, price_premium: Option<f64>) -> Self {
        Self {
            regular: price_regular.unwrap_or(0.0),
            premium: price_premium.unwrap_or(0.0),
        }
    }

    /// A show that failed to load prices everything at 0 (degraded state).
    pub fn from_show(show: Option<&Show>) -> Self {
        match show {
            Some(show) => Self::new(show.price_regular, show.price_premium),
            None => Self::default(),
        }
    }

    pub fn price_regular(&self) -> f64 {
        self.regular
    }

    pub fn price_premium(&self) -> f64 {
        self.premium
    }

    pub fn price_for(&self, layout: &SeatMapLayout, row_index: usize) -> f64 {
        if layout.is_premium(row_index) {
            self.premium
        } else {
            self.regular
        }
    }

    /// Price of one labelled seat; labels outside the grid price as 0.
    pub fn price_for_label(&self, layout: &SeatMapLayout, label: &str) -> f64 {
        match layout.parse_label(label) {
            Some((row_index, _)) => self.price_for(layout, row_index),
            None => 0.0,
        }
    }

    pub fn total(&self, layout: &SeatMapLayout, labels: &[String]) -> f64 {
        labels
            .iter()
            .map(|label| self.price_for_label(layout, label))
            .sum()
    }
}
