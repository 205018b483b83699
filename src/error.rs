use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::{Request, Response};
use rocket_okapi::r#gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::Responses;
use rocket_okapi::response::OpenApiResponderInner;
use serde::Serialize;
use std::io::Cursor;

/// Error taxonomy shared by every route handler.
///
/// Each variant maps to one HTTP status class; the response body always uses
/// the `{success: false, message}` envelope so clients can treat errors and
/// successes uniformly.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed input (400).
    Validation(String),
    /// Missing, invalid, or expired credentials (401).
    Unauthorized(String),
    /// Authenticated but insufficient role (403).
    Forbidden(String),
    /// Referenced record absent (404).
    NotFound(String),
    /// Query-level failure (500).
    DatabaseError(sqlx::Error),
    /// Anything else unexpected (500).
    InternalError(String),
}

#[derive(Serialize)]
struct ErrorEnvelope {
    success: bool,
    message: String,
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let (status, message) = match self {
            ApiError::Validation(msg) => {
                log::debug!("validation error: {}", msg);
                (Status::BadRequest, msg)
            }
            ApiError::Unauthorized(msg) => {
                log::debug!("unauthorized: {}", msg);
                (Status::Unauthorized, msg)
            }
            ApiError::Forbidden(msg) => {
                log::debug!("forbidden: {}", msg);
                (Status::Forbidden, msg)
            }
            ApiError::NotFound(msg) => {
                log::debug!("not found: {}", msg);
                (Status::NotFound, msg)
            }
            ApiError::DatabaseError(e) => {
                log::error!("database error: {}", e);
                (Status::InternalServerError, "Internal server error".to_string())
            }
            ApiError::InternalError(msg) => {
                log::error!("internal error: {}", msg);
                (Status::InternalServerError, "Internal server error".to_string())
            }
        };

        let envelope = ErrorEnvelope {
            success: false,
            message,
        };

        let json = serde_json::to_string(&envelope).unwrap_or_else(|_| {
            r#"{"success":false,"message":"Failed to serialize error"}"#.to_string()
        });

        Response::build()
            .status(status)
            .header(rocket::http::ContentType::JSON)
            .sized_body(json.len(), Cursor::new(json))
            .ok()
    }
}

impl OpenApiResponderInner for ApiError {
    fn responses(_gen: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        Ok(Responses::default())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            _ => ApiError::DatabaseError(err),
        }
    }
}
