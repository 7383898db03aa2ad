//! HMAC signing endpoint

use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ErrorResponse;
use crate::signing::{sign_hmac_sha512, ALGORITHM};

#[derive(Debug, Default, Deserialize)]
pub struct HmacRequest {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub secret: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HmacResponse {
    pub success: bool,
    pub data: String,
    pub signature: String,
    pub algorithm: &'static str,
    pub generated_at: DateTime<Utc>,
    pub data_length: usize,
}

fn non_empty_string(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

pub async fn generate_hmac(
    payload: Result<Json<HmacRequest>, JsonRejection>,
) -> Result<Json<HmacResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();

    let (Some(data), Some(secret)) = (
        non_empty_string(request.data),
        non_empty_string(request.secret),
    ) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "Missing required fields",
                "Both data and secret are required",
            )),
        ));
    };

    let signature = sign_hmac_sha512(&data, &secret);
    tracing::debug!(data_length = data.len(), "Generated HMAC signature");

    Ok(Json(HmacResponse {
        success: true,
        data_length: data.chars().count(),
        data,
        signature,
        algorithm: ALGORITHM,
        generated_at: Utc::now(),
    }))
}
