//! API response helpers

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

/// Create a 200 OK JSON response
pub fn ok<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::OK, Json(data))
}

/// Create a 201 Created JSON response
pub fn created<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::CREATED, Json(data))
}

/// Create a 202 Accepted JSON response (cancellation requested, not yet applied)
pub fn accepted<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::ACCEPTED, Json(data))
}

/// Create a 204 No Content response
pub fn no_content() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}
