//! Profile pages.

use actix_web::{HttpResponse, web};

use blogicum_core::pagination::PageNumber;
use blogicum_shared::dto::{PageQuery, ProfileResponse, ProfileUpdateRequest};

use super::render;
use crate::middleware::auth::CurrentViewer;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/profile/{username}?page=
pub async fn show(
    state: web::Data<AppState>,
    viewer: CurrentViewer,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let listing = state
        .posts
        .list_by_author(&username, &viewer.0, PageNumber::parse(query.page.as_deref()))
        .await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        profile: render::author(&listing.profile),
        is_owner: listing.is_owner,
        posts: render::page(listing.page, render::listed),
    }))
}

/// PUT /api/profile
pub async fn update(
    state: web::Data<AppState>,
    viewer: CurrentViewer,
    body: web::Json<ProfileUpdateRequest>,
) -> AppResult<HttpResponse> {
    let fields = render::profile_fields(body.into_inner());
    let completed = state.commands.update_profile(&viewer.0, fields).await?;

    Ok(HttpResponse::Ok().json(render::mutation(completed, render::author)))
}
