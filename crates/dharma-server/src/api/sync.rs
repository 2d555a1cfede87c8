use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use dharma_sync::{SyncCommand, SyncReport};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct SyncQuery {
    /// `teachers`, `talks`, `all` or `retreats`. Defaults to `talks`.
    pub command: Option<String>,
    #[serde(default)]
    pub skip_processing: bool,
    pub max_pages: Option<u32>,
}

/// Runs a sync to completion and returns its report.
///
/// 200 when every sub-command finished, 500 when one aborted (the report
/// still carries the per-command results), 409 when a run is in progress.
/// The run continues on its own task if the request is dropped.
pub(super) async fn run_sync(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SyncQuery>,
) -> Result<(StatusCode, Json<ApiResponse<SyncReport>>), ApiError> {
    let command = match query.command.as_deref() {
        None => SyncCommand::Talks,
        Some(raw) => raw
            .parse::<SyncCommand>()
            .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?,
    };
    if query.max_pages == Some(0) {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "max_pages must be at least 1",
        ));
    }

    tracing::info!(
        request_id = %req_id.0,
        %command,
        skip_processing = query.skip_processing,
        max_pages = ?query.max_pages,
        "sync requested"
    );

    let report = match state
        .runner
        .try_run(command, query.skip_processing, query.max_pages)
        .await
    {
        Ok(Some(report)) => report,
        Ok(None) => {
            return Err(ApiError::new(
                req_id.0,
                "conflict",
                "a sync run is already in progress",
            ))
        }
        Err(e) => {
            tracing::error!(request_id = %req_id.0, %command, error = %e, "sync task failed");
            return Err(ApiError::new(req_id.0, "internal_error", "sync task failed"));
        }
    };

    let status = if report.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    Ok((
        status,
        Json(ApiResponse {
            data: report,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}
