//! backend.rs
//!
//! Этот модуль реализует сервисный слой для взаимодействия с booking backend.
//!
//! Ключевые компоненты:
//! 1.  **BackendClient**: инкапсулирует все HTTP-вызовы к backend —
//!     каталог (фильмы, сеансы), статус мест, бронирования и оплата.
//! 2.  **Fail-soft чтение**: все read-запросы деградируют до "нет данных"
//!     (None / пустой список) при любой ошибке сети, не-2xx ответе или
//!     не-JSON теле. Страница рендерится в degraded-состоянии.
//! 3.  **Строгие мутации**: create/cancel/pay возвращают `BackendError`,
//!     который показывается пользователю; без автоматических retry.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::{bearer_header_value, TokenProvider};
use crate::config::ApiConfig;
use crate::models::{Booking, CreateBookingRequest, Movie, SeatStatus, Show};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request to the booking backend failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("booking backend rejected the request ({status}): {message}")]
    Rejected { status: StatusCode, message: String },
    #[error("booking backend returned a non-JSON body")]
    NotJson,
}

/// Error payload shape used by the backend for rejected requests.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct PayRequest {
    #[serde(rename = "bookingId")]
    booking_id: String,
    amount: f64,
}

/// Клиент для взаимодействия с booking backend.
#[derive(Clone)]
pub struct BackendClient {
    /// Базовый URL backend'а, без завершающего слеша.
    base_url: String,
    /// Асинхронный HTTP-клиент.
    http_client: reqwest::Client,
    /// Источник bearer-токена (auth collaborator).
    token_provider: Arc<dyn TokenProvider>,
}

impl BackendClient {
    /// Создает и конфигурирует клиент на основе настроек приложения.
    pub fn from_config(config: &ApiConfig, token_provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.request_timeout_seconds))
                .build()
                .expect("Failed to create HTTP client"),
            token_provider,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token_provider.token() {
            Some(token) => request.header(AUTHORIZATION, bearer_header_value(&token)),
            None => request,
        }
    }

    // Fail-soft чтение: любая ошибка = "данных нет"
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        let response = match self
            .authorize(self.http_client.get(self.url(path)))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("GET {} failed: {:?}", path, e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!("GET {} returned {}", path, response.status());
            return None;
        }

        if !is_json(&response) {
            warn!("GET {} returned a non-JSON body, ignoring", path);
            return None;
        }

        match response.json::<T>().await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("GET {} body could not be parsed: {:?}", path, e);
                None
            }
        }
    }

    // --- Каталог ---

    pub async fn fetch_movie(&self, movie_id: &str) -> Option<Movie> {
        self.get_json(&format!("/movies/{movie_id}")).await
    }

    pub async fn fetch_shows_for_movie(&self, movie_id: &str) -> Vec<Show> {
        self.get_json(&format!("/movies/{movie_id}/shows"))
            .await
            .unwrap_or_default()
    }

    pub async fn fetch_show(&self, show_id: &str) -> Option<Show> {
        self.get_json(&format!("/movies/shows/{show_id}")).await
    }

    // --- Бронирования ---

    pub async fn fetch_seat_status(&self, show_id: &str) -> Option<SeatStatus> {
        self.get_json(&format!("/bookings/show/{show_id}/seats/status"))
            .await
    }

    pub async fn fetch_my_bookings(&self) -> Vec<Booking> {
        self.get_json("/bookings/my").await.unwrap_or_default()
    }

    /// Creates a booking. Sent exactly once per call; a rejection is
    /// surfaced to the caller and retrying is a user decision.
    pub async fn create_booking(
        &self,
        request: &CreateBookingRequest,
    ) -> Result<Booking, BackendError> {
        let response = self
            .authorize(self.http_client.post(self.url("/bookings/create")))
            .json(request)
            .send()
            .await?;
        let response = check_status(response, "create booking").await?;

        if !is_json(&response) {
            return Err(BackendError::NotJson);
        }
        Ok(response.json::<Booking>().await?)
    }

    pub async fn cancel_booking(&self, booking_id: &str) -> Result<(), BackendError> {
        let response = self
            .authorize(
                self.http_client
                    .put(self.url(&format!("/bookings/{booking_id}/cancel"))),
            )
            .send()
            .await?;
        check_status(response, "cancel booking").await?;
        Ok(())
    }

    // --- Оплата (payment collaborator) ---

    pub async fn pay(&self, booking_id: &str, amount: f64) -> Result<(), BackendError> {
        let request = PayRequest {
            booking_id: booking_id.to_string(),
            amount,
        };
        let response = self
            .authorize(self.http_client.post(self.url("/payment/pay")))
            .json(&request)
            .send()
            .await?;
        check_status(response, "pay booking").await?;
        Ok(())
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"))
}

async fn check_status(response: Response, action: &str) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.message)
        .unwrap_or_else(|| {
            if body.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request rejected")
                    .to_string()
            } else {
                body
            }
        });

    error!("{} rejected by backend: {} {}", action, status, message);
    Err(BackendError::Rejected { status, message })
}
