use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Per-show seat state as reported by the booking backend. `booked` seats are
/// confirmed and permanently unavailable, `locked` seats are held by another
/// in-flight booking until the lock expires. The client treats the union as
/// unavailable either way.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeatStatus {
    #[serde(
        default,
        rename = "bookedSeatIds",
        alias = "booked_seat_ids",
        deserialize_with = "seat_id_list"
    )]
    pub booked_seat_ids: Vec<i64>,
    #[serde(
        default,
        rename = "lockedSeatIds",
        alias = "locked_seat_ids",
        deserialize_with = "seat_id_list"
    )]
    pub locked_seat_ids: Vec<i64>,
}

// Ids arrive as numbers or numeric strings depending on the backend revision;
// entries that are neither are dropped.
fn seat_id_list<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|value| match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .collect())
}
