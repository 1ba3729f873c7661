use std::collections::HashSet;

use tracing::warn;

use crate::models::SeatStatus;

/// Server-reported seat state merged into the local view before rendering
/// and interaction. `booked` and `locked` should be disjoint in a consistent
/// backend; the client treats the union as unavailable regardless.
///
/// Reconciliation is full-replace per fetch: the backend is authoritative
/// and both sets can change arbitrarily between polls, so nothing is patched
/// incrementally. When the status fetch failed entirely the sets stay empty
/// (fail-open) and the backend's create call remains the final arbiter.
#[derive(Debug, Clone, Default)]
pub struct SeatAvailability {
    booked: HashSet<i64>,
    locked: HashSet<i64>,
}

impl SeatAvailability {
    pub fn from_status(status: Option<SeatStatus>) -> Self {
        let mut availability = Self::default();
        availability.replace(status);
        availability
    }

    /// Replaces both sets with the latest fetch result. `None` means the
    /// fetch failed or returned garbage; everything is then considered
    /// available locally.
    pub fn replace(&mut self, status: Option<SeatStatus>) {
        match status {
            Some(status) => {
                self.booked = status.booked_seat_ids.into_iter().collect();
                self.locked = status.locked_seat_ids.into_iter().collect();

                let overlap: Vec<&i64> = self.booked.intersection(&self.locked).collect();
                if !overlap.is_empty() {
                    warn!(
                        "backend reported {} seat(s) as both booked and locked",
                        overlap.len()
                    );
                }
            }
            None => {
                self.booked.clear();
                self.locked.clear();
            }
        }
    }

    pub fn is_unavailable(&self, seat_id: i64) -> bool {
        self.booked.contains(&seat_id) || self.locked.contains(&seat_id)
    }

    pub fn is_booked(&self, seat_id: i64) -> bool {
        self.booked.contains(&seat_id)
    }

    pub fn is_locked(&self, seat_id: i64) -> bool {
        self.locked.contains(&seat_id)
    }

    pub fn unavailable_count(&self) -> usize {
        self.booked.union(&self.locked).count()
    }
}
