use axum::{Json, extract::State};

use crate::AppState;
use crate::snapshot::HealthSnapshot;
use crate::store::ReadingRecord;
use crate::telemetry::metrics::SNAPSHOTS_SERVED;

#[tracing::instrument(name = "health_data get", skip(state), fields(snapshot.glucose))]
pub async fn get_health_data(State(state): State<AppState>) -> Json<HealthSnapshot> {
    let snapshot = state.generator.snapshot();
    tracing::Span::current().record("snapshot.glucose", snapshot.current_glucose);

    SNAPSHOTS_SERVED.add(1, &[]);

    // Recorded off the request path so a slow store cannot delay polling.
    let reading = ReadingRecord::from_snapshot(&snapshot);
    let store = state.store.clone();
    tokio::spawn(async move {
        if let Err(e) = store.record_reading(&reading).await {
            tracing::warn!(error = %e, store = store.backend(), "Failed to record reading");
        }
    });

    Json(snapshot)
}
