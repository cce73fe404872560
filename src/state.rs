use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;

use crate::config::Config;
use crate::srs::clock;
use crate::store::Store;

type TodayFn = dyn Fn() -> NaiveDate + Send + Sync;

#[derive(Clone)]
pub struct AppState {
    store: Arc<Store>,
    config: Arc<Config>,
    started_at: Instant,
    today: Arc<TodayFn>,
}

impl AppState {
    pub fn new(store: Arc<Store>, config: &Config) -> Self {
        Self {
            store,
            config: Arc::new(config.clone()),
            started_at: Instant::now(),
            today: Arc::new(clock::today),
        }
    }

    /// Pins the calendar date handlers see, for tests that cross a day boundary.
    pub fn with_today<F>(mut self, today: F) -> Self
    where
        F: Fn() -> NaiveDate + Send + Sync + 'static,
    {
        self.today = Arc::new(today);
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        (self.today)()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
