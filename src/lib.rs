pub mod types;
pub mod config;
pub mod broadcast;
pub mod reporter;
pub mod status_client;
pub mod tracker;
pub mod poller;
pub mod utils;

pub use config::WatcherConfig;
pub use poller::{Poller, PollerOutcome};
pub use status_client::{HttpStatusClient, StatusSource};
pub use tracker::StatusTracker;
