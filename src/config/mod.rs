use std::env;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub api: ApiConfig,
    pub seat_map: SeatMapConfig,
    pub booking: BookingConfig,
}

// Настройки приложения
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub rust_log: String,
}

// Настройки доступа к backend API
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_seconds: u64,
}

// Геометрия зала: буквенные ряды A..Z, премиум-ряды сзади
#[derive(Debug, Clone)]
pub struct SeatMapConfig {
    pub rows_count: usize,
    pub seats_per_row: usize,
    pub premium_row_count: usize,
}

// Настройки бронирования
#[derive(Debug, Clone)]
pub struct BookingConfig {
    /// TTL of an unpaid booking, owned by the backend. The client only uses
    /// it for countdown display and never expires anything locally.
    pub pending_ttl_seconds: u64,
    pub cache_ttl_seconds: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            },
            api: ApiConfig {
                base_url: env::var("API_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:8080".to_string()),
                request_timeout_seconds: env::var("API_REQUEST_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .expect("API_REQUEST_TIMEOUT_SECONDS must be a valid number"),
            },
            seat_map: SeatMapConfig {
                rows_count: env::var("SEAT_MAP_ROWS")
                    .unwrap_or_else(|_| "12".to_string())
                    .parse()
                    .expect("SEAT_MAP_ROWS must be a valid number"),
                seats_per_row: env::var("SEAT_MAP_SEATS_PER_ROW")
                    .unwrap_or_else(|_| "14".to_string())
                    .parse()
                    .expect("SEAT_MAP_SEATS_PER_ROW must be a valid number"),
                premium_row_count: env::var("SEAT_MAP_PREMIUM_ROWS")
                    .unwrap_or_else(|_| "4".to_string())
                    .parse()
                    .expect("SEAT_MAP_PREMIUM_ROWS must be a valid number"),
            },
            booking: BookingConfig {
                pending_ttl_seconds: env::var("PENDING_BOOKING_TTL_SECONDS")
                    .unwrap_or_else(|_| "600".to_string())
                    .parse()
                    .expect("PENDING_BOOKING_TTL_SECONDS must be a valid number"),
                cache_ttl_seconds: env::var("CATALOG_CACHE_TTL_SECONDS")
                    .unwrap_or_else(|_| "3600".to_string())
                    .parse()
                    .expect("CATALOG_CACHE_TTL_SECONDS must be a valid number"),
            },
        }
    }
}
