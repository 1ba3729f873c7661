use serde::{Deserialize, Serialize};

/// Booking lifecycle as owned by the backend. The client never mutates a
/// status locally, only re-fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    PendingPayment,
    Confirmed,
    Cancelled,
    Expired,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatType {
    Regular,
    Premium,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSeat {
    #[serde(default, rename = "seatId", alias = "seat_id")]
    pub seat_id: Option<i64>,
    #[serde(default, rename = "rowLabel", alias = "row_label")]
    pub row_label: Option<String>,
    #[serde(default, rename = "seatNumber", alias = "seat_number")]
    pub seat_number: Option<u32>,
    #[serde(default, rename = "seatType", alias = "seat_type")]
    pub seat_type: Option<SeatType>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, rename = "seatLabel", alias = "seat_label")]
    pub seat_label: Option<String>,
}

impl BookingSeat {
    /// Display label fallback chain: label, seatLabel, rowLabel + seatNumber,
    /// bare seat number.
    pub fn display_label(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        if let Some(label) = &self.seat_label {
            return label.clone();
        }
        match (self.row_label.as_deref(), self.seat_number) {
            (Some(row), Some(number)) => format!("{row}{number}"),
            (_, Some(number)) => format!("Seat {number}"),
            _ => "Seat".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(deserialize_with = "crate::models::de::id_string")]
    pub id: String,
    #[serde(
        default,
        rename = "showId",
        alias = "show_id",
        deserialize_with = "crate::models::de::opt_id_string"
    )]
    pub show_id: Option<String>,
    #[serde(default, rename = "totalAmount", alias = "total_amount")]
    pub total_amount: f64,
    #[serde(default)]
    pub seats: Vec<BookingSeat>,
    #[serde(default)]
    pub status: BookingStatus,
}

impl Booking {
    pub fn seat_labels(&self) -> Vec<String> {
        self.seats.iter().map(BookingSeat::display_label).collect()
    }
}

// --- Create-booking request, one entry per selected seat ---

#[derive(Debug, Clone, Serialize)]
pub struct CreateBookingRequest {
    #[serde(rename = "showId")]
    pub show_id: String,
    #[serde(rename = "totalAmount")]
    pub total_amount: f64,
    pub seats: Vec<CreateBookingSeat>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateBookingSeat {
    #[serde(rename = "seatId")]
    pub seat_id: i64,
    #[serde(rename = "rowLabel")]
    pub row_label: String,
    #[serde(rename = "seatNumber")]
    pub seat_number: u32,
    #[serde(rename = "seatType")]
    pub seat_type: SeatType,
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_parse_to_lifecycle_states() {
        let booking: Booking = serde_json::from_value(serde_json::json!({
            "id": 11,
            "showId": 42,
            "totalAmount": 550.0,
            "status": "PENDING_PAYMENT"
        }))
        .unwrap();

        assert_eq!(booking.id, "11");
        assert_eq!(booking.show_id.as_deref(), Some("42"));
        assert_eq!(booking.status, BookingStatus::PendingPayment);
    }

    #[test]
    fn unknown_status_does_not_fail_the_whole_list() {
        let booking: Booking = serde_json::from_value(serde_json::json!({
            "id": "12",
            "status": "SOMETHING_NEW"
        }))
        .unwrap();

        assert_eq!(booking.status, BookingStatus::Unknown);
    }

    #[test]
    fn display_label_falls_back_in_order() {
        let full: BookingSeat = serde_json::from_value(serde_json::json!({
            "label": "A-1",
            "rowLabel": "A",
            "seatNumber": 1
        }))
        .unwrap();
        assert_eq!(full.display_label(), "A-1");

        let row_and_number: BookingSeat = serde_json::from_value(serde_json::json!({
            "rowLabel": "L",
            "seatNumber": 2
        }))
        .unwrap();
        assert_eq!(row_and_number.display_label(), "L2");

        let number_only: BookingSeat =
            serde_json::from_value(serde_json::json!({ "seatNumber": 9 })).unwrap();
        assert_eq!(number_only.display_label(), "Seat 9");

        let empty: BookingSeat = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(empty.display_label(), "Seat");
    }

    #[test]
    fn create_request_serializes_with_wire_names() {
        let request = CreateBookingRequest {
            show_id: "42".to_string(),
            total_amount: 550.0,
            seats: vec![CreateBookingSeat {
                seat_id: 155,
                row_label: "L".to_string(),
                seat_number: 1,
                seat_type: SeatType::Premium,
                price: 350.0,
            }],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["showId"], "42");
        assert_eq!(value["totalAmount"], 550.0);
        assert_eq!(value["seats"][0]["seatId"], 155);
        assert_eq!(value["seats"][0]["seatType"], "PREMIUM");
    }
}
