use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

use crate::error::GameError;

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct ErrorBody {
    pub code: u32,
    pub message: String,
}

/// Envelope wrapped around every response body.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<ErrorBody>,
}

/// Status plus envelope, as returned by every endpoint.
pub type ApiResult<T> = Custom<Json<ApiResponse<T>>>;

pub fn new_status<T>(error: &GameError) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: false,
        data: None,
        error: Some(ErrorBody {
            code: error.code(),
            message: error.public_message(),
        }),
    })
}

pub fn success<T>(status: Status, data: T) -> ApiResult<T> {
    Custom(
        status,
        Json(ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }),
    )
}

/// Turn an engine result into the response envelope, logging failures on the way out.
pub fn respond<T>(operation: &str, result: Result<T, GameError>) -> ApiResult<T> {
    respond_with(operation, Status::Ok, result)
}

pub fn respond_with<T>(operation: &str, ok: Status, result: Result<T, GameError>) -> ApiResult<T> {
    match result {
        Ok(data) => success(ok, data),
        Err(e) => {
            match &e {
                GameError::Internal(detail) => log::error!("{operation} failed: {detail}"),
                GameError::Unauthorized(_) => log::warn!("{operation} rejected: unauthorized"),
                GameError::Validation(msg) => log::warn!("{operation} rejected: {msg}"),
                other => log::info!("{operation} rejected: {} ({})", other.kind(), other),
            }
            Custom(e.status(), new_status(&e))
        }
    }
}
