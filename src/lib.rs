pub mod auth;
pub mod availability;
pub mod cache;
pub mod config;
pub mod guard;
pub mod history;
pub mod models;
pub mod pricing;
pub mod seatmap;
pub mod services;
pub mod session;

use std::sync::Arc;

use crate::auth::TokenProvider;
use crate::services::backend::BackendClient;

// Shared state для всего клиента
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<BackendClient>,
    pub cache: cache::CacheService,
    pub config: config::Config,
}

impl AppState {
    pub fn new(config: config::Config, token_provider: Arc<dyn TokenProvider>) -> Self {
        let backend = Arc::new(BackendClient::from_config(&config.api, token_provider));
        let cache = cache::CacheService::new(config.booking.cache_ttl_seconds);

        Self {
            backend,
            cache,
            config,
        }
    }
}
