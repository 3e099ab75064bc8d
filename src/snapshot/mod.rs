pub mod baseline;
pub mod generator;
pub mod model;

pub use baseline::{default_baseline, load_baseline};
pub use generator::{JitterBounds, SnapshotGenerator};
pub use model::HealthSnapshot;
