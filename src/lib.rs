pub mod assistant;
pub mod config;
pub mod error;
pub mod llm;
pub mod routes;
pub mod snapshot;
pub mod store;
pub mod telemetry;

use std::sync::Arc;

pub use config::Config;

use assistant::Assistant;
use snapshot::SnapshotGenerator;
use store::HealthStore;

#[derive(Clone)]
pub struct AppState {
    pub generator: SnapshotGenerator,
    pub assistant: Arc<Assistant>,
    pub store: Arc<dyn HealthStore>,
}
