use axum::{
    extract::{FromRequest, Request, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Form, Json,
};

use crate::db::Database;
use crate::dispatch::{dispatch, DispatchError};
use crate::models::*;
use crate::store::{StoreError, TaskStore};

// ============================================================
// Error Handling
// ============================================================

/// Map a dispatch failure to a response.
///
/// Client-input defects and missing tasks are returned verbatim. Store
/// failures are logged in full and the client only sees a generic message.
fn dispatch_error(e: DispatchError) -> (StatusCode, String) {
    match e {
        DispatchError::Validation(_) | DispatchError::UnknownAction => {
            tracing::warn!("Rejected submission: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        DispatchError::Store(StoreError::NotFound(_)) => {
            tracing::warn!("Submission for missing task: {}", e);
            (StatusCode::NOT_FOUND, e.to_string())
        }
        DispatchError::Store(err) => internal_error(err),
    }
}

fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

// ============================================================
// Submission body
// ============================================================

/// A submitted field map, read from a JSON object or a urlencoded form.
pub struct Submission(pub Fields);

impl<S> FromRequest<S> for Submission
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        if is_json {
            let Json(fields) = Json::<Fields>::from_request(req, state)
                .await
                .map_err(|e| (e.status(), e.body_text()))?;
            Ok(Self(fields))
        } else {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| (e.status(), e.body_text()))?;
            Ok(Self(fields_from_pairs(pairs)))
        }
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Tasks
// ============================================================

pub async fn list_tasks(
    State(db): State<Database>,
) -> Result<Json<Vec<Task>>, (StatusCode, String)> {
    db.list_tasks().map(Json).map_err(internal_error)
}

/// The single mutation entry point.
pub async fn submit(
    State(db): State<Database>,
    Submission(fields): Submission,
) -> Result<StatusCode, (StatusCode, String)> {
    dispatch(&db, &fields).map_err(dispatch_error)?;
    Ok(StatusCode::NO_CONTENT)
}
