//! Error handling middleware - RFC 7807 bodies and redirects.

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header};
use blogicum_core::domain::Redirect;
use blogicum_core::error::DomainError;
use blogicum_shared::ErrorResponse;
use std::fmt;

use crate::handlers::location_of;

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    /// Send the client to the login flow.
    LoginRequired,
    /// Send the client to `location`, typically a read-only view.
    Redirect { location: String },
    Validation(String),
    Conflict(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::LoginRequired => write!(f, "Login required"),
            AppError::Redirect { location } => write!(f, "Redirect to {}", location),
            AppError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::LoginRequired | AppError::Redirect { .. } => StatusCode::FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::LoginRequired => {
                return found(&location_of(&Redirect::Login));
            }
            AppError::Redirect { location } => return found(location),
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Validation(detail) => {
                ErrorResponse::new(422, "Validation Failed").with_detail(detail)
            }
            AppError::Conflict(detail) => ErrorResponse::new(409, "Conflict").with_detail(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

fn found(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{} {} not found", entity_type, key))
            }
            DomainError::Unauthenticated => AppError::LoginRequired,
            DomainError::Forbidden { redirect } => AppError::Redirect {
                location: location_of(&redirect),
            },
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
