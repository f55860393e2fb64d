//! Post listings, detail and post writes.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogicum_core::pagination::PageNumber;
use blogicum_shared::dto::{CategoryPostsResponse, PageQuery, PostDetailResponse, PostRequest};

use super::render;
use crate::middleware::auth::CurrentViewer;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts?page=
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .posts
        .list_index(PageNumber::parse(query.page.as_deref()))
        .await?;

    Ok(HttpResponse::Ok().json(render::page(page, render::listed)))
}

/// GET /api/category/{slug}?page=
pub async fn category(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let listing = state
        .posts
        .list_by_category(&slug, PageNumber::parse(query.page.as_deref()))
        .await?;

    Ok(HttpResponse::Ok().json(CategoryPostsResponse {
        category: render::category(&listing.category),
        posts: render::page(listing.page, render::listed),
    }))
}

/// GET /api/posts/{post_id}
pub async fn detail(
    state: web::Data<AppState>,
    viewer: CurrentViewer,
    post_id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let detail = state.posts.detail(*post_id, &viewer.0).await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: render::post(&detail.record, None),
        comments: detail.comments.iter().map(render::comment_record).collect(),
    }))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    viewer: CurrentViewer,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let fields = render::post_fields(body.into_inner(), state.clock.now());
    let completed = state.commands.create_post(&viewer.0, fields).await?;

    Ok(HttpResponse::Created().json(render::mutation(completed, render::stored_post)))
}

/// GET /api/posts/{post_id}/edit
pub async fn edit_form(
    state: web::Data<AppState>,
    viewer: CurrentViewer,
    post_id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let form = state.commands.edit_post_form(&viewer.0, *post_id).await?;

    Ok(HttpResponse::Ok().json(render::post_form(&form)))
}

/// PUT /api/posts/{post_id}
pub async fn update(
    state: web::Data<AppState>,
    viewer: CurrentViewer,
    post_id: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let fields = render::post_fields(body.into_inner(), state.clock.now());
    let completed = state
        .commands
        .update_post(&viewer.0, *post_id, fields)
        .await?;

    Ok(HttpResponse::Ok().json(render::mutation(completed, render::stored_post)))
}

/// GET /api/posts/{post_id}/delete
pub async fn delete_form(
    state: web::Data<AppState>,
    viewer: CurrentViewer,
    post_id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let form = state
        .commands
        .confirm_post_delete(&viewer.0, *post_id)
        .await?;

    Ok(HttpResponse::Ok().json(render::post_form(&form)))
}

/// DELETE /api/posts/{post_id}
pub async fn delete(
    state: web::Data<AppState>,
    viewer: CurrentViewer,
    post_id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let completed = state.commands.delete_post(&viewer.0, *post_id).await?;

    Ok(HttpResponse::Ok().json(render::mutation(completed, render::stored_post)))
}
