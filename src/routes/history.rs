use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;

use crate::AppState;
use crate::error::{AppError, RouteError};
use crate::store::{ChatRecord, ReadingRecord};

const HISTORY_FAILED: &str = "Failed to fetch history";
const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

impl ListQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

fn list_params(
    params: Result<Query<ListQuery>, QueryRejection>,
) -> Result<ListQuery, RouteError> {
    let Query(params) = params.map_err(|rejection| {
        AppError::Validation(format!("invalid query string: {}", rejection.body_text()))
            .with_message(HISTORY_FAILED)
    })?;
    Ok(params)
}

pub async fn list_readings(
    State(state): State<AppState>,
    params: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<ReadingRecord>>, RouteError> {
    let params = list_params(params)?;
    let readings = state
        .store
        .recent_readings(params.limit())
        .await
        .map_err(|e| e.with_message(HISTORY_FAILED))?;

    Ok(Json(readings))
}

pub async fn list_chats(
    State(state): State<AppState>,
    params: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<ChatRecord>>, RouteError> {
    let params = list_params(params)?;
    let chats = state
        .store
        .recent_chats(params.limit())
        .await
        .map_err(|e| e.with_message(HISTORY_FAILED))?;

    Ok(Json(chats))
}
