//! HTTP handlers and route configuration.

mod comments;
mod health;
mod posts;
mod profiles;
mod render;

use actix_web::{error::JsonPayloadError, web};

use blogicum_core::domain::Redirect;

use crate::middleware::error::AppError;

/// Where the external login flow lives.
pub const LOGIN_PATH: &str = "/auth/login/";

/// The URL a [`Redirect`] points at.
pub fn location_of(redirect: &Redirect) -> String {
    match redirect {
        Redirect::Login => LOGIN_PATH.to_string(),
        Redirect::PostDetail { post_id } => format!("/api/posts/{post_id}"),
        Redirect::Profile { username } => format!("/api/profile/{username}"),
    }
}

fn json_error(err: JsonPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(json_error))
            .route("/health", web::get().to(health::health_check))
            // Listings
            .route("/posts", web::get().to(posts::index))
            .route("/category/{slug}", web::get().to(posts::category))
            .route("/profile/{username}", web::get().to(profiles::show))
            .route("/profile", web::put().to(profiles::update))
            // Posts
            .route("/posts", web::post().to(posts::create))
            .route("/posts/{post_id}", web::get().to(posts::detail))
            .route("/posts/{post_id}", web::put().to(posts::update))
            .route("/posts/{post_id}", web::delete().to(posts::delete))
            .route("/posts/{post_id}/edit", web::get().to(posts::edit_form))
            .route("/posts/{post_id}/delete", web::get().to(posts::delete_form))
            // Comments
            .route("/posts/{post_id}/comments", web::post().to(comments::create))
            .route(
                "/posts/{post_id}/comments/{comment_id}",
                web::put().to(comments::update),
            )
            .route(
                "/posts/{post_id}/comments/{comment_id}",
                web::delete().to(comments::delete),
            )
            .route("/comments/mine", web::get().to(comments::mine)),
    );
}
