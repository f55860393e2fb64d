//! Viewer resolution from bearer tokens.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};

use blogicum_core::domain::Viewer;
use blogicum_core::ports::AuthError;

use crate::state::AppState;

/// The viewer a request runs as.
///
/// Never rejects: a missing, malformed or expired token yields
/// [`Viewer::Anonymous`], and the core decides what anonymous viewers may do.
#[derive(Debug, Clone)]
pub struct CurrentViewer(pub Viewer);

/// The token from `Authorization: Bearer <token>`.
fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))
}

fn resolve(req: &HttpRequest) -> Viewer {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        tracing::error!("AppState not found in app data");
        return Viewer::Anonymous;
    };

    match bearer_token(req).and_then(|token| state.tokens.validate_token(token)) {
        Ok(claims) => Viewer::from(claims),
        Err(AuthError::MissingAuth) => Viewer::Anonymous,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring unusable credentials");
            Viewer::Anonymous
        }
    }
}

impl FromRequest for CurrentViewer {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(CurrentViewer(resolve(req))))
    }
}
