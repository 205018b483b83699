//! Error catchers keeping failure responses inside the standard envelope.
//!
//! Guard rejections (401/403) surface through these since request guards
//! cannot produce response bodies themselves. The 422 catcher remaps Rocket's
//! payload-deserialization status to the 400 the API contract promises for
//! malformed input.

use rocket::catch;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::models::ApiResponse;

fn envelope(message: &str) -> Json<ApiResponse<()>> {
    Json(ApiResponse {
        success: false,
        message: Some(message.to_string()),
        data: None,
    })
}

#[catch(400)]
pub fn bad_request() -> Json<ApiResponse<()>> {
    envelope("Bad request")
}

#[catch(401)]
pub fn unauthorized() -> Json<ApiResponse<()>> {
    envelope("Invalid or expired token")
}

#[catch(403)]
pub fn forbidden() -> Json<ApiResponse<()>> {
    envelope("Super admin privileges required")
}

#[catch(404)]
pub fn not_found() -> Json<ApiResponse<()>> {
    envelope("Route not found")
}

#[catch(422)]
pub fn unprocessable() -> status::Custom<Json<ApiResponse<()>>> {
    status::Custom(Status::BadRequest, envelope("Invalid request payload"))
}

#[catch(500)]
pub fn internal_error() -> Json<ApiResponse<()>> {
    envelope("Internal server error")
}
