//! Unauthenticated classify-and-respond endpoint.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::server::AppState;
use crate::server::error::ApiResult;

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub input: String,
    pub response: String,
}

/// `POST /predict`
pub async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> ApiResult<Json<PredictResponse>> {
    let response = state.responder.respond(&req.text);
    Ok(Json(PredictResponse {
        input: req.text,
        response,
    }))
}
