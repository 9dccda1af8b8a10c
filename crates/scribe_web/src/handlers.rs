use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use scribe_core::RunReport;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct TriggerResponse {
    pub success: bool,
    pub message: String,
    pub logs: String,
}

impl TriggerResponse {
    fn busy() -> (StatusCode, Json<Self>) {
        (
            StatusCode::CONFLICT,
            Json(Self {
                success: false,
                message: "Another run is in progress".to_string(),
                logs: String::new(),
            }),
        )
    }

    fn from_report<S>(report: RunReport<S>, done: &str) -> (StatusCode, Json<Self>) {
        let logs = report.trace.render();
        match report.outcome {
            Ok(_) => (
                StatusCode::OK,
                Json(Self {
                    success: true,
                    message: done.to_string(),
                    logs,
                }),
            ),
            Err(e) => {
                tracing::error!("{} failed: {}", done, e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(Self {
                        success: false,
                        message: e.to_string(),
                        logs,
                    }),
                )
            }
        }
    }
}

pub async fn health() -> &'static str {
    "Scribe pipeline is running"
}

pub async fn trigger_scrape(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<TriggerResponse>) {
    let Ok(_guard) = state.run_lock.try_lock() else {
        return TriggerResponse::busy();
    };
    TriggerResponse::from_report(state.pipeline.scrape().await, "Scraping completed")
}

pub async fn trigger_enhance(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<TriggerResponse>) {
    let Ok(_guard) = state.run_lock.try_lock() else {
        return TriggerResponse::busy();
    };
    TriggerResponse::from_report(state.pipeline.enhance().await, "Enhancement completed")
}
