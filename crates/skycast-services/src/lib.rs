//! Application services for SkyCast
//!
//! Preferences, search history and the query orchestration that ties them
//! to the weather provider.

pub mod history;
pub mod preferences;
pub mod service;
pub mod store;

pub use history::{HistoryManager, MAX_HISTORY};
pub use preferences::{Preferences, Theme, UserPreferences};
pub use service::WeatherService;
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreResult};
