use std::collections::BTreeSet;

use crate::availability::SeatAvailability;
use crate::config::SeatMapConfig;

/// Rows are labelled with a single letter A..Z, which caps the grid at 26
/// rows. A hard limit of the labelling scheme, not a tunable.
pub const MAX_ROWS: usize = 26;

/// Geometry of one auditorium's seat grid: `rows_count` lettered rows of
/// `seats_per_row` seats, with the back `premium_row_count` rows priced as
/// premium. A seat is identified both by its label `"{RowLetter}-{number}"`
/// and by the integer id `row_index * seats_per_row + (number - 1) + 1`;
/// the two are a bijection for one layout. Changing `seats_per_row`
/// invalidates every previously computed id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatMapLayout {
    rows_count: usize,
    seats_per_row: usize,
    premium_row_count: usize,
}

impl SeatMapLayout {
    pub fn new(rows_count: usize, seats_per_row: usize, premium_row_count: usize) -> Self {
        let rows_count = rows_count.clamp(1, MAX_ROWS);
        Self {
            rows_count,
            seats_per_row: seats_per_row.max(1),
            premium_row_count: premium_row_count.min(rows_count),
        }
    }

    pub fn from_config(config: &SeatMapConfig) -> Self {
        Self::new(config.rows_count, config.seats_per_row, config.premium_row_count)
    }

    pub fn rows_count(&self) -> usize {
        self.rows_count
    }

    pub fn seats_per_row(&self) -> usize {
        self.seats_per_row
    }

    pub fn premium_row_count(&self) -> usize {
        self.premium_row_count
    }

    pub fn capacity(&self) -> usize {
        self.rows_count * self.seats_per_row
    }

    pub fn row_letter(row_index: usize) -> char {
        (b'A' + row_index as u8) as char
    }

    /// Premium rows sit at the back of the auditorium.
    pub fn is_premium(&self, row_index: usize) -> bool {
        row_index >= self.rows_count - self.premium_row_count
    }

    /// 1-based integer seat id, unique across the layout.
    pub fn seat_id(&self, row_index: usize, seat_number: usize) -> i64 {
        (row_index * self.seats_per_row + (seat_number - 1) + 1) as i64
    }

    pub fn label(&self, row_index: usize, seat_number: usize) -> String {
        format!("{}-{}", Self::row_letter(row_index), seat_number)
    }

    /// Parses `"L-1"` back into `(row_index, seat_number)`, rejecting
    /// anything outside the grid.
    pub fn parse_label(&self, label: &str) -> Option<(usize, usize)> {
        let (row_part, number_part) = label.split_once('-')?;
        let mut chars = row_part.chars();
        let letter = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        let row_index = (letter.to_ascii_uppercase() as usize).checked_sub('A' as usize)?;
        if row_index >= self.rows_count {
            return None;
        }
        let seat_number: usize = number_part.trim().parse().ok()?;
        if seat_number < 1 || seat_number > self.seats_per_row {
            return None;
        }
        Some((row_index, seat_number))
    }

    pub fn seat_id_for_label(&self, label: &str) -> Option<i64> {
        let (row_index, seat_number) = self.parse_label(label)?;
        Some(self.seat_id(row_index, seat_number))
    }
}

/// The seat grid plus the current user's selection. Selection state is the
/// only thing this struct mutates; availability is consulted, never stored.
#[derive(Debug, Clone)]
pub struct SeatMap {
    layout: SeatMapLayout,
    selection: BTreeSet<String>,
}

impl SeatMap {
    pub fn new(layout: SeatMapLayout) -> Self {
        Self {
            layout,
            selection: BTreeSet::new(),
        }
    }

    pub fn layout(&self) -> &SeatMapLayout {
        &self.layout
    }

    /// Toggles a seat. Selecting an unavailable or unknown seat is silently
    /// ignored; deselecting always works. Returns whether the selection
    /// changed.
    pub fn toggle(&mut self, label: &str, availability: &SeatAvailability) -> bool {
        let Some((row_index, seat_number)) = self.layout.parse_label(label) else {
            return false;
        };
        let canonical = self.layout.label(row_index, seat_number);

        if self.selection.contains(&canonical) {
            self.selection.remove(&canonical);
            return true;
        }

        if availability.is_unavailable(self.layout.seat_id(row_index, seat_number)) {
            return false;
        }

        self.selection.insert(canonical);
        true
    }

    /// Empties the selection. Called whenever the active show changes.
    pub fn clear(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, label: &str) -> bool {
        self.selection.contains(label)
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    /// Selected labels in stable sorted order.
    pub fn selected_labels(&self) -> Vec<String> {
        self.selection.iter().cloned().collect()
    }

    pub fn selected_seat_ids(&self) -> Vec<i64> {
        self.selection
            .iter()
            .filter_map(|label| self.layout.seat_id_for_label(label))
            .collect()
    }

    /// Drops selected seats that the latest reconciliation reports as
    /// unavailable. Returns the labels that were removed.
    pub fn retain_available(&mut self, availability: &SeatAvailability) -> Vec<String> {
        let removed: Vec<String> = self
            .selection
            .iter()
            .filter(|label| {
                self.layout
                    .seat_id_for_label(label.as_str())
                    .is_some_and(|id| availability.is_unavailable(id))
            })
            .cloned()
            .collect();
        for label in &removed {
            self.selection.remove(label);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeatStatus;
    use proptest::prelude::*;

    fn demo_layout() -> SeatMapLayout {
        SeatMapLayout::new(12, 14, 4)
    }

    #[test]
    fn back_rows_are_premium() {
        let layout = demo_layout();
        assert!(!layout.is_premium(0));
        assert!(!layout.is_premium(7));
        assert!(layout.is_premium(8));
        assert!(layout.is_premium(11));
    }

    #[test]
    fn last_row_first_seat_scenario() {
        // L-1 in a 12x14 grid with 4 premium rows: row index 11, id 155.
        let layout = demo_layout();
        let (row_index, seat_number) = layout.parse_label("L-1").unwrap();
        assert_eq!(row_index, 11);
        assert!(layout.is_premium(row_index));
        assert_eq!(layout.seat_id(row_index, seat_number), 155);
    }

    #[test]
    fn rows_count_is_clamped_to_alphabet() {
        let layout = SeatMapLayout::new(40, 10, 50);
        assert_eq!(layout.rows_count(), MAX_ROWS);
        assert_eq!(layout.premium_row_count(), MAX_ROWS);
    }

    #[test]
    fn labels_outside_the_grid_are_rejected() {
        let layout = demo_layout();
        assert!(layout.parse_label("M-1").is_none());
        assert!(layout.parse_label("A-15").is_none());
        assert!(layout.parse_label("A-0").is_none());
        assert!(layout.parse_label("AA-1").is_none());
        assert!(layout.parse_label("A1").is_none());
    }

    #[test]
    fn toggle_twice_restores_the_selection() {
        let mut map = SeatMap::new(demo_layout());
        let availability = SeatAvailability::default();

        assert!(map.toggle("A-1", &availability));
        assert!(map.is_selected("A-1"));
        assert!(map.toggle("A-1", &availability));
        assert_eq!(map.selected_count(), 0);
    }

    #[test]
    fn toggling_an_unavailable_seat_is_a_no_op() {
        let mut map = SeatMap::new(demo_layout());
        let availability = SeatAvailability::from_status(Some(SeatStatus {
            booked_seat_ids: vec![5, 6],
            locked_seat_ids: vec![7],
        }));

        // Seat id 6 is A-6, id 8 is A-8.
        assert!(!map.toggle("A-6", &availability));
        assert_eq!(map.selected_count(), 0);
        assert!(map.toggle("A-8", &availability));
        assert_eq!(map.selected_labels(), vec!["A-8".to_string()]);
    }

    #[test]
    fn retain_available_prunes_stale_selection() {
        let mut map = SeatMap::new(demo_layout());
        let open = SeatAvailability::default();
        map.toggle("A-1", &open);
        map.toggle("A-2", &open);

        let refreshed = SeatAvailability::from_status(Some(SeatStatus {
            booked_seat_ids: vec![],
            locked_seat_ids: vec![2],
        }));
        let removed = map.retain_available(&refreshed);

        assert_eq!(removed, vec!["A-2".to_string()]);
        assert_eq!(map.selected_labels(), vec!["A-1".to_string()]);
    }

    proptest! {
        #[test]
        fn seat_ids_are_a_bijection_within_bounds(
            rows in 1usize..=26,
            seats in 1usize..=30,
            premium in 0usize..=26,
        ) {
            let layout = SeatMapLayout::new(rows, seats, premium);
            let mut seen = std::collections::HashSet::new();

            for row_index in 0..layout.rows_count() {
                for seat_number in 1..=layout.seats_per_row() {
                    let id = layout.seat_id(row_index, seat_number);
                    prop_assert!(id >= 1);
                    prop_assert!(id <= layout.capacity() as i64);
                    prop_assert!(seen.insert(id), "duplicate seat id {}", id);

                    let label = layout.label(row_index, seat_number);
                    prop_assert_eq!(layout.parse_label(&label), Some((row_index, seat_number)));
                }
            }
        }
    }
}
