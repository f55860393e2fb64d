//! Comment writes and the caller's own comments.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogicum_shared::dto::{CommentRequest, CommentResponse};

use super::render;
use crate::middleware::auth::CurrentViewer;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts/{post_id}/comments
pub async fn create(
    state: web::Data<AppState>,
    viewer: CurrentViewer,
    post_id: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let completed = state
        .commands
        .create_comment(&viewer.0, *post_id, body.into_inner().text)
        .await?;

    Ok(HttpResponse::Created().json(render::mutation(completed, render::comment)))
}

/// PUT /api/posts/{post_id}/comments/{comment_id}
pub async fn update(
    state: web::Data<AppState>,
    viewer: CurrentViewer,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let completed = state
        .commands
        .update_comment(&viewer.0, post_id, comment_id, body.into_inner().text)
        .await?;

    Ok(HttpResponse::Ok().json(render::mutation(completed, render::comment)))
}

/// DELETE /api/posts/{post_id}/comments/{comment_id}
pub async fn delete(
    state: web::Data<AppState>,
    viewer: CurrentViewer,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let completed = state
        .commands
        .delete_comment(&viewer.0, post_id, comment_id)
        .await?;

    Ok(HttpResponse::Ok().json(render::mutation(completed, render::comment)))
}

/// GET /api/comments/mine
pub async fn mine(state: web::Data<AppState>, viewer: CurrentViewer) -> AppResult<HttpResponse> {
    let comments = state.comments.mutable_scope(&viewer.0).await?;
    let body: Vec<CommentResponse> = comments.iter().map(render::comment).collect();

    Ok(HttpResponse::Ok().json(body))
}
