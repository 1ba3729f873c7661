use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::models::{Movie, Show};
use crate::services::backend::BackendClient;

/// Read-through cache for catalog lookups (movies and shows). Entries expire
/// after a TTL; expired or missing entries fall through to the backend and
/// the result is stored back. Injected into the session instead of living in
/// ambient shared state.
#[derive(Clone)]
pub struct CacheService {
    inner: Arc<Mutex<CacheInner>>,
    ttl: Duration,
}

#[derive(Default)]
struct CacheInner {
    movies: HashMap<String, Entry<Movie>>,
    shows: HashMap<String, Entry<Show>>,
}

struct Entry<T> {
    fetched_at: Instant,
    value: T,
}

impl CacheService {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheInner::default())),
            ttl: Duration::from_secs(ttl_seconds),
        }
    }

    // Получить фильм: сначала кеш, иначе backend + сохранить
    pub async fn get_movie(&self, backend: &BackendClient, movie_id: &str) -> Option<Movie> {
        if let Some(movie) = self.cached_movie(movie_id) {
            return Some(movie);
        }

        let movie = backend.fetch_movie(movie_id).await?;
        self.store_movie(movie_id, &movie);
        Some(movie)
    }

    // Получить сеанс: сначала кеш, иначе backend + сохранить
    pub async fn get_show(&self, backend: &BackendClient, show_id: &str) -> Option<Show> {
        if let Some(show) = self.cached_show(show_id) {
            return Some(show);
        }

        let show = backend.fetch_show(show_id).await?;
        self.store_show(show_id, &show);
        Some(show)
    }

    pub fn store_movie(&self, movie_id: &str, movie: &Movie) {
        let mut inner = self.inner.lock().unwrap();
        inner.movies.insert(
            movie_id.to_string(),
            Entry {
                fetched_at: Instant::now(),
                value: movie.clone(),
            },
        );
    }

    pub fn store_show(&self, show_id: &str, show: &Show) {
        let mut inner = self.inner.lock().unwrap();
        inner.shows.insert(
            show_id.to_string(),
            Entry {
                fetched_at: Instant::now(),
                value: show.clone(),
            },
        );
    }

    fn cached_movie(&self, movie_id: &str) -> Option<Movie> {
        let inner = self.inner.lock().unwrap();
        inner
            .movies
            .get(movie_id)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    fn cached_show(&self, show_id: &str) -> Option<Show> {
        let inner = self.inner.lock().unwrap();
        inner
            .shows
            .get(show_id)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str) -> Movie {
        serde_json::from_value(serde_json::json!({ "id": "1", "title": title })).unwrap()
    }

    #[test]
    fn stored_movie_is_served_from_cache() {
        let cache = CacheService::new(3600);
        cache.store_movie("1", &movie("Dune"));

        let cached = cache.cached_movie("1").unwrap();
        assert_eq!(cached.title, "Dune");
        assert!(cache.cached_movie("2").is_none());
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let cache = CacheService::new(0);
        cache.store_movie("1", &movie("Dune"));
        assert!(cache.cached_movie("1").is_none());
    }
}
