use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::models::{Booking, BookingStatus};

/// At most one unpaid booking may exist per user and show; while one does,
/// creating another booking for that show is blocked client-side. Show ids
/// are compared as normalized strings since they arrive as strings or
/// numbers depending on the endpoint.
pub fn find_pending<'a>(bookings: &'a [Booking], show_id: &str) -> Option<&'a Booking> {
    bookings.iter().find(|booking| {
        booking.status == BookingStatus::PendingPayment
            && booking.show_id.as_deref() == Some(show_id)
    })
}

/// Client-side countdown for unpaid bookings. The TTL is owned and enforced
/// by the backend; this only feeds display and disable logic, keyed by when
/// this client first saw the booking in PENDING_PAYMENT.
#[derive(Debug)]
pub struct PendingCountdown {
    ttl: Duration,
    first_seen: HashMap<String, Instant>,
}

impl PendingCountdown {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            ttl: Duration::from_secs(ttl_seconds),
            first_seen: HashMap::new(),
        }
    }

    /// Starts the clock for a booking the first time it shows up as pending.
    pub fn track(&mut self, booking_id: &str) {
        self.first_seen
            .entry(booking_id.to_string())
            .or_insert_with(Instant::now);
    }

    /// Remaining seconds for a tracked booking, `None` if it was never seen.
    pub fn seconds_left(&self, booking_id: &str) -> Option<u64> {
        let started = self.first_seen.get(booking_id)?;
        Some(remaining_seconds(
            self.ttl.as_secs(),
            started.elapsed().as_secs(),
        ))
    }

    pub fn forget(&mut self, booking_id: &str) {
        self.first_seen.remove(booking_id);
    }
}

pub fn remaining_seconds(ttl_seconds: u64, elapsed_seconds: u64) -> u64 {
    ttl_seconds.saturating_sub(elapsed_seconds)
}

/// `MM:SS` countdown text.
pub fn format_countdown(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
