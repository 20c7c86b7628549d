use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::config::Config;
use crate::services::favorite_service;
use crate::services::search_service::FileSearcher;

pub struct AppState {
    pub config: Config,
    pub db: Mutex<Connection>,
    pub searcher: Arc<dyn FileSearcher>,
}

impl AppState {
    pub fn new(config: Config, conn: Connection, searcher: Arc<dyn FileSearcher>) -> Self {
        Self {
            config,
            db: Mutex::new(conn),
            searcher,
        }
    }

    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        self.db
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_favorite(&self, path: &str) -> bool {
        favorite_service::is_favorite(&self.conn(), path)
    }
}
