pub mod booking;
pub mod movie;
pub mod seat;
pub mod show;

pub use booking::{Booking, BookingSeat, BookingStatus, CreateBookingRequest, CreateBookingSeat, SeatType};
pub use movie::Movie;
pub use seat::SeatStatus;
pub use show::Show;

/// Deserialization helpers shared by the wire models. Backend ids arrive as
/// JSON numbers or strings depending on the endpoint revision; everything is
/// normalized to strings here so comparisons stay uniform.
pub(crate) mod de {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "expected a string or numeric id, got {other}"
            ))),
        }
    }

    pub fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(other) => Err(serde::de::Error::custom(format!(
                "expected a string or numeric id, got {other}"
            ))),
        }
    }
}
