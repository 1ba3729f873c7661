//! One show's booking flow, from initial load to the payment handoff.
//!
//! The session owns the client-side state machine only; seat locks, booking
//! lifecycle and settlement stay on the backend, which re-validates every
//! create call regardless of what this state machine believes.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::availability::SeatAvailability;
use crate::cache::CacheService;
use crate::guard;
use crate::models::{Booking, CreateBookingRequest, CreateBookingSeat, Movie, SeatType, Show};
use crate::pricing::PricingEngine;
use crate::seatmap::{SeatMap, SeatMapLayout};
use crate::services::backend::{BackendClient, BackendError};

/// Lifecycle of one booking flow.
///
/// `Loading → Ready → Confirming → Submitting → Success`. A rejected submit
/// returns the phase to `Ready` with the error recorded on the session, so
/// an unassisted re-click retries; there is no automatic retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    Ready,
    Confirming,
    Submitting,
    Success { booking_id: String },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("an unpaid booking ({booking_id}) already exists for this show; pay or cancel it from your bookings first")]
    PendingBookingExists { booking_id: String },
    #[error("no seats selected")]
    NoSeatsSelected,
    #[error("the booking flow is not at the {expected} step")]
    WrongPhase { expected: &'static str },
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Payload handed to the payment collaborator after a successful create.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentHandoff {
    pub booking_id: String,
    pub show_id: String,
    pub seat_labels: Vec<String>,
    pub total_amount: f64,
    pub auditorium: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummarySeat {
    pub label: String,
    pub seat_id: i64,
    pub premium: bool,
    pub price: f64,
}

/// Confirmation view data. Built locally; opening it makes no network call.
#[derive(Debug, Clone)]
pub struct BookingSummary {
    pub movie_title: Option<String>,
    pub show_time: String,
    pub auditorium: String,
    pub seats: Vec<SummarySeat>,
    pub total_amount: f64,
}

pub struct BookingSession {
    backend: Arc<BackendClient>,
    cache: CacheService,
    show_id: String,
    seat_map: SeatMap,
    availability: SeatAvailability,
    pricing: PricingEngine,
    show: Option<Show>,
    movie: Option<Movie>,
    pending: Option<Booking>,
    phase: SessionPhase,
    last_error: Option<String>,
}

impl BookingSession {
    pub fn new(
        show_id: impl Into<String>,
        layout: SeatMapLayout,
        backend: Arc<BackendClient>,
        cache: CacheService,
    ) -> Self {
        Self {
            backend,
            cache,
            show_id: show_id.into(),
            seat_map: SeatMap::new(layout),
            availability: SeatAvailability::default(),
            pricing: PricingEngine::default(),
            show: None,
            movie: None,
            pending: None,
            phase: SessionPhase::Loading,
            last_error: None,
        }
    }

    /// Initial load. The show comes first (it carries pricing and the movie
    /// id); movie, seat status and the user's bookings are then fetched
    /// concurrently. Every sub-fetch is independently fail-soft: a missing
    /// show still yields a degraded but usable "select seats" page.
    pub async fn load(&mut self, movie_id_hint: Option<&str>) {
        let show = self.backend.fetch_show(&self.show_id).await;
        match &show {
            Some(show) => self.cache.store_show(&self.show_id, show),
            None => warn!("show {} could not be loaded, rendering degraded", self.show_id),
        }
        self.pricing = PricingEngine::from_show(show.as_ref());

        let movie_id = movie_id_hint
            .map(str::to_string)
            .or_else(|| show.as_ref().and_then(|s| s.movie_id.clone()));

        let movie_future = async {
            match movie_id.as_deref() {
                Some(id) => self.cache.get_movie(&self.backend, id).await,
                None => None,
            }
        };
        let (movie, status, bookings) = futures::join!(
            movie_future,
            self.backend.fetch_seat_status(&self.show_id),
            self.backend.fetch_my_bookings(),
        );

        if status.is_none() {
            // Fail-open: the backend's create call stays the final arbiter.
            warn!(
                "seat status for show {} unavailable, treating all seats as open",
                self.show_id
            );
        }
        self.availability.replace(status);
        self.pending = guard::find_pending(&bookings, &self.show_id).cloned();
        if let Some(pending) = &self.pending {
            info!(
                "show {} is blocked by unpaid booking {}",
                self.show_id, pending.id
            );
        }

        self.show = show;
        self.movie = movie;
        self.phase = SessionPhase::Ready;
    }

    /// Re-reads seat status and the pending-booking check. Full replace
    /// semantics; selected seats that became unavailable are dropped so the
    /// selection invariant keeps holding after reconciliation.
    pub async fn refresh(&mut self) {
        let (status, bookings) = futures::join!(
            self.backend.fetch_seat_status(&self.show_id),
            self.backend.fetch_my_bookings(),
        );

        self.availability.replace(status);
        let removed = self.seat_map.retain_available(&self.availability);
        if !removed.is_empty() {
            warn!(
                "seats {:?} were taken while selecting and have been deselected",
                removed
            );
        }
        self.pending = guard::find_pending(&bookings, &self.show_id).cloned();
    }

    /// Moves the session to a different show. The selection is cleared
    /// unconditionally: computed seat ids are only valid for one layout and
    /// one show.
    pub fn switch_show(&mut self, show_id: impl Into<String>) {
        self.show_id = show_id.into();
        self.seat_map.clear();
        self.availability.replace(None);
        self.pricing = PricingEngine::default();
        self.show = None;
        self.movie = None;
        self.pending = None;
        self.last_error = None;
        self.phase = SessionPhase::Loading;
    }

    /// Toggles a seat. Only meaningful in `Ready`; unavailable seats are
    /// silently ignored. Returns whether the selection changed.
    pub fn toggle_seat(&mut self, label: &str) -> bool {
        if self.phase != SessionPhase::Ready {
            return false;
        }
        self.seat_map.toggle(label, &self.availability)
    }

    /// Opens the confirmation summary. Refused without a selection or while
    /// an unpaid booking for this show exists; the phase is unchanged on
    /// refusal.
    pub fn begin_confirmation(&mut self) -> Result<BookingSummary, SessionError> {
        if self.phase != SessionPhase::Ready {
            return Err(SessionError::WrongPhase {
                expected: "seat selection",
            });
        }
        if let Some(pending) = &self.pending {
            return Err(SessionError::PendingBookingExists {
                booking_id: pending.id.clone(),
            });
        }
        if self.seat_map.selected_count() == 0 {
            return Err(SessionError::NoSeatsSelected);
        }

        self.phase = SessionPhase::Confirming;
        Ok(self.summary())
    }

    pub fn cancel_confirmation(&mut self) {
        if self.phase == SessionPhase::Confirming {
            self.phase = SessionPhase::Ready;
        }
    }

    /// Creates the booking. The request is sent exactly once per call; on
    /// rejection the session returns to `Ready` with the error recorded and
    /// retrying is the user's decision.
    pub async fn submit(&mut self) -> Result<PaymentHandoff, SessionError> {
        if self.phase != SessionPhase::Confirming {
            return Err(SessionError::WrongPhase {
                expected: "confirmation",
            });
        }
        // Проверяем guard ещё раз перед сетевым вызовом
        if let Some(pending) = &self.pending {
            self.phase = SessionPhase::Ready;
            return Err(SessionError::PendingBookingExists {
                booking_id: pending.id.clone(),
            });
        }

        self.phase = SessionPhase::Submitting;
        let request = self.build_create_request();

        match self.backend.create_booking(&request).await {
            Ok(booking) => {
                info!("booking {} created for show {}", booking.id, self.show_id);
                let handoff = PaymentHandoff {
                    booking_id: booking.id.clone(),
                    show_id: self.show_id.clone(),
                    seat_labels: self.seat_map.selected_labels(),
                    total_amount: request.total_amount,
                    auditorium: self
                        .show
                        .as_ref()
                        .map(Show::auditorium_name)
                        .unwrap_or_default(),
                };
                // The fresh booking is itself unpaid and blocks this show
                // until the payment collaborator settles it.
                self.pending = Some(booking.clone());
                self.last_error = None;
                self.phase = SessionPhase::Success {
                    booking_id: booking.id,
                };
                Ok(handoff)
            }
            Err(e) => {
                warn!("create booking failed for show {}: {}", self.show_id, e);
                self.last_error = Some(e.to_string());
                self.phase = SessionPhase::Ready;
                Err(e.into())
            }
        }
    }

    /// Confirmation view of the current selection. Pure; recomputed on
    /// every call rather than cached.
    pub fn summary(&self) -> BookingSummary {
        let layout = *self.seat_map.layout();
        let seats = self
            .seat_map
            .selected_labels()
            .into_iter()
            .filter_map(|label| {
                let (row_index, seat_number) = layout.parse_label(&label)?;
                Some(SummarySeat {
                    seat_id: layout.seat_id(row_index, seat_number),
                    premium: layout.is_premium(row_index),
                    price: self.pricing.price_for(&layout, row_index),
                    label,
                })
            })
            .collect();

        BookingSummary {
            movie_title: self.movie.as_ref().map(|m| m.title.clone()),
            show_time: self
                .show
                .as_ref()
                .map(Show::formatted_start_time)
                .unwrap_or_else(|| "TBA".to_string()),
            auditorium: self
                .show
                .as_ref()
                .map(Show::auditorium_name)
                .unwrap_or_default(),
            seats,
            total_amount: self.total_amount(),
        }
    }

    fn build_create_request(&self) -> CreateBookingRequest {
        let layout = *self.seat_map.layout();
        let seats = self
            .seat_map
            .selected_labels()
            .iter()
            .filter_map(|label| {
                let (row_index, seat_number) = layout.parse_label(label)?;
                Some(CreateBookingSeat {
                    seat_id: layout.seat_id(row_index, seat_number),
                    row_label: SeatMapLayout::row_letter(row_index).to_string(),
                    seat_number: seat_number as u32,
                    seat_type: if layout.is_premium(row_index) {
                        SeatType::Premium
                    } else {
                        SeatType::Regular
                    },
                    price: self.pricing.price_for(&layout, row_index),
                })
            })
            .collect();

        CreateBookingRequest {
            show_id: self.show_id.clone(),
            total_amount: self.total_amount(),
            seats,
        }
    }

    // --- Accessors ---

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn show_id(&self) -> &str {
        &self.show_id
    }

    pub fn show(&self) -> Option<&Show> {
        self.show.as_ref()
    }

    pub fn movie(&self) -> Option<&Movie> {
        self.movie.as_ref()
    }

    pub fn pending_booking(&self) -> Option<&Booking> {
        self.pending.as_ref()
    }

    pub fn seat_map(&self) -> &SeatMap {
        &self.seat_map
    }

    pub fn availability(&self) -> &SeatAvailability {
        &self.availability
    }

    pub fn pricing(&self) -> &PricingEngine {
        &self.pricing
    }

    pub fn selected_labels(&self) -> Vec<String> {
        self.seat_map.selected_labels()
    }

    pub fn total_amount(&self) -> f64 {
        self.pricing
            .total(self.seat_map.layout(), &self.seat_map.selected_labels())
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticToken;
    use crate::config::ApiConfig;
    use crate::models::SeatStatus;

    fn test_session(show_id: &str) -> BookingSession {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_seconds: 1,
        };
        let backend = Arc::new(BackendClient::from_config(
            &config,
            Arc::new(StaticToken("test-token".to_string())),
        ));
        BookingSession::new(
            show_id,
            SeatMapLayout::new(12, 14, 4),
            backend,
            CacheService::new(60),
        )
    }

    fn ready_session(show_id: &str) -> BookingSession {
        let mut session = test_session(show_id);
        session.phase = SessionPhase::Ready;
        session.pricing = PricingEngine::new(Some(200.0), Some(350.0));
        session
    }

    fn pending_booking(show_id: &str) -> Booking {
        serde_json::from_value(serde_json::json!({
            "id": "77",
            "showId": show_id,
            "status": "PENDING_PAYMENT"
        }))
        .unwrap()
    }

    #[test]
    fn toggling_before_load_is_a_no_op() {
        let mut session = test_session("42");
        assert!(!session.toggle_seat("A-1"));
        assert_eq!(session.selected_labels().len(), 0);
    }

    #[test]
    fn confirmation_requires_a_selection() {
        let mut session = ready_session("42");
        let err = session.begin_confirmation().unwrap_err();
        assert!(matches!(err, SessionError::NoSeatsSelected));
        assert_eq!(*session.phase(), SessionPhase::Ready);
    }

    #[test]
    fn pending_booking_blocks_confirmation_and_leaves_state_unchanged() {
        let mut session = ready_session("42");
        session.pending = Some(pending_booking("42"));
        assert!(session.toggle_seat("A-1"));

        let err = session.begin_confirmation().unwrap_err();
        match err {
            SessionError::PendingBookingExists { booking_id } => assert_eq!(booking_id, "77"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(*session.phase(), SessionPhase::Ready);
        assert_eq!(session.selected_labels(), vec!["A-1".to_string()]);
    }

    #[test]
    fn confirmation_opens_the_summary() {
        let mut session = ready_session("42");
        session.toggle_seat("A-1");
        session.toggle_seat("L-2");

        let summary = session.begin_confirmation().unwrap();
        assert_eq!(*session.phase(), SessionPhase::Confirming);
        assert_eq!(summary.total_amount, 550.0);
        assert_eq!(summary.seats.len(), 2);
        assert!(!summary.seats[0].premium);
        assert!(summary.seats[1].premium);

        session.cancel_confirmation();
        assert_eq!(*session.phase(), SessionPhase::Ready);
    }

    #[test]
    fn unavailable_seats_cannot_be_toggled() {
        let mut session = ready_session("42");
        session.availability.replace(Some(SeatStatus {
            booked_seat_ids: vec![5, 6],
            locked_seat_ids: vec![7],
        }));

        assert!(!session.toggle_seat("A-6"));
        assert!(session.toggle_seat("A-8"));
        assert_eq!(session.selected_labels(), vec!["A-8".to_string()]);
    }

    #[test]
    fn switching_shows_clears_the_selection_unconditionally() {
        let mut session = ready_session("42");
        session.toggle_seat("A-1");
        session.pending = Some(pending_booking("42"));

        session.switch_show("43");

        assert_eq!(session.show_id(), "43");
        assert_eq!(session.selected_labels().len(), 0);
        assert!(session.pending_booking().is_none());
        assert_eq!(*session.phase(), SessionPhase::Loading);
    }

    #[test]
    fn create_request_carries_one_entry_per_seat() {
        let mut session = ready_session("42");
        session.toggle_seat("A-1");
        session.toggle_seat("L-1");

        let request = session.build_create_request();
        assert_eq!(request.show_id, "42");
        assert_eq!(request.total_amount, 550.0);
        assert_eq!(request.seats.len(), 2);

        let premium = &request.seats[1];
        assert_eq!(premium.seat_id, 155);
        assert_eq!(premium.row_label, "L");
        assert_eq!(premium.seat_number, 1);
        assert_eq!(premium.seat_type, SeatType::Premium);
        assert_eq!(premium.price, 350.0);
    }

    #[tokio::test]
    async fn submit_outside_confirming_is_rejected() {
        let mut session = ready_session("42");
        let err = session.submit().await.unwrap_err();
        assert!(matches!(err, SessionError::WrongPhase { .. }));
        assert_eq!(*session.phase(), SessionPhase::Ready);
    }
}
