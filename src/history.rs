//! Booking-history support: the user's bookings with their show details
//! resolved and a display countdown for unpaid entries. Resolving a pending
//! booking (cancel or pay) goes through the backend and a full re-fetch;
//! nothing is patched locally.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::cache::CacheService;
use crate::guard::{format_countdown, PendingCountdown};
use crate::models::{Booking, BookingStatus, Show};
use crate::services::backend::{BackendClient, BackendError};
use crate::session::PaymentHandoff;

pub struct BookingHistory {
    backend: Arc<BackendClient>,
    cache: CacheService,
    countdown: PendingCountdown,
    bookings: Vec<Booking>,
    shows: HashMap<String, Show>,
}

impl BookingHistory {
    pub fn new(backend: Arc<BackendClient>, cache: CacheService, pending_ttl_seconds: u64) -> Self {
        Self {
            backend,
            cache,
            countdown: PendingCountdown::new(pending_ttl_seconds),
            bookings: Vec::new(),
            shows: HashMap::new(),
        }
    }

    /// Loads the user's bookings and resolves show info for every distinct
    /// show id through the cache. Fail-soft throughout: a missing show just
    /// leaves that booking without show details.
    pub async fn load(&mut self) {
        let bookings = self.backend.fetch_my_bookings().await;

        // Start the countdown clock the first time a booking shows up unpaid.
        for booking in &bookings {
            if booking.status == BookingStatus::PendingPayment {
                self.countdown.track(&booking.id);
            }
        }

        let show_ids: BTreeSet<String> = bookings
            .iter()
            .filter_map(|booking| booking.show_id.clone())
            .collect();

        let mut shows = HashMap::new();
        for show_id in show_ids {
            if let Some(show) = self.cache.get_show(&self.backend, &show_id).await {
                shows.insert(show_id, show);
            }
        }

        self.bookings = bookings;
        self.shows = shows;
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn show_for(&self, booking: &Booking) -> Option<&Show> {
        self.shows.get(booking.show_id.as_deref()?)
    }

    /// `MM:SS` countdown text for an unpaid booking, `None` for anything
    /// settled. Display only; expiry is enforced by the backend.
    pub fn countdown_for(&self, booking: &Booking) -> Option<String> {
        if booking.status != BookingStatus::PendingPayment {
            return None;
        }
        self.countdown.seconds_left(&booking.id).map(format_countdown)
    }

    /// Cancels an unpaid booking, then re-fetches the list so the pending
    /// guard is re-evaluated from backend state.
    pub async fn cancel(&mut self, booking_id: &str) -> Result<(), BackendError> {
        self.backend.cancel_booking(booking_id).await?;
        self.countdown.forget(booking_id);
        self.load().await;
        Ok(())
    }

    /// Payment handoff for resuming an unpaid booking.
    pub fn payment_handoff(&self, booking_id: &str) -> Option<PaymentHandoff> {
        let booking = self.bookings.iter().find(|b| b.id == booking_id)?;
        Some(PaymentHandoff {
            booking_id: booking.id.clone(),
            show_id: booking.show_id.clone().unwrap_or_default(),
            seat_labels: booking.seat_labels(),
            total_amount: booking.total_amount,
            auditorium: self
                .show_for(booking)
                .map(Show::auditorium_name)
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticToken;
    use crate::config::ApiConfig;

    fn test_history() -> BookingHistory {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_seconds: 1,
        };
        let backend = Arc::new(BackendClient::from_config(
            &config,
            Arc::new(StaticToken("test-token".to_string())),
        ));
        BookingHistory::new(backend, CacheService::new(60), 600)
    }

    fn bookings() -> Vec<Booking> {
        serde_json::from_value(serde_json::json!([
            {
                "id": "7",
                "showId": 42,
                "totalAmount": 550.0,
                "status": "PENDING_PAYMENT",
                "seats": [
                    { "rowLabel": "A", "seatNumber": 1 },
                    { "label": "L-2" }
                ]
            },
            { "id": "8", "showId": 43, "status": "CONFIRMED" }
        ]))
        .unwrap()
    }

    #[test]
    fn handoff_reuses_the_booking_fields() {
        let mut history = test_history();
        history.bookings = bookings();

        let handoff = history.payment_handoff("7").unwrap();
        assert_eq!(handoff.booking_id, "7");
        assert_eq!(handoff.show_id, "42");
        assert_eq!(handoff.total_amount, 550.0);
        assert_eq!(handoff.seat_labels, vec!["A1".to_string(), "L-2".to_string()]);
        assert!(history.payment_handoff("9").is_none());
    }

    #[test]
    fn countdown_only_applies_to_unpaid_bookings() {
        let mut history = test_history();
        history.bookings = bookings();
        history.countdown.track("7");

        let pending = history.bookings[0].clone();
        let confirmed = history.bookings[1].clone();

        let text = history.countdown_for(&pending).unwrap();
        assert_eq!(text.len(), 5); // MM:SS
        assert!(history.countdown_for(&confirmed).is_none());
    }
}
