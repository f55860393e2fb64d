//! Core types to wire DTOs and back.

use chrono::{DateTime, Utc};

use blogicum_core::domain::{
    Category, Comment, CommentRecord, ListedPost, Location, Post, PostFields, PostForm,
    PostRecord, ProfileFields, User,
};
use blogicum_core::pagination::Page;
use blogicum_core::services::Completed;
use blogicum_shared::dto::{
    AuthorResponse, CategoryResponse, CommentResponse, LocationResponse, MutationResponse,
    PageResponse, PostFormResponse, PostRequest, PostResponse, ProfileUpdateRequest,
    StoredPostResponse,
};

use super::location_of;

pub fn post_fields(request: PostRequest, now: DateTime<Utc>) -> PostFields {
    PostFields {
        title: request.title,
        text: request.text,
        pub_date: request.pub_date.unwrap_or(now),
        is_published: request.is_published,
        category_id: request.category_id,
        location_id: request.location_id,
    }
}

pub fn profile_fields(request: ProfileUpdateRequest) -> ProfileFields {
    ProfileFields {
        username: request.username,
        first_name: request.first_name,
        last_name: request.last_name,
        email: request.email,
    }
}

pub fn author(user: &User) -> AuthorResponse {
    AuthorResponse {
        id: user.id,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
    }
}

pub fn category(category: &Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        title: category.title.clone(),
        description: category.description.clone(),
        slug: category.slug.clone(),
    }
}

fn location(location: &Location) -> LocationResponse {
    LocationResponse {
        id: location.id,
        name: location.name.clone(),
    }
}

pub fn post(record: &PostRecord, comment_count: Option<u64>) -> PostResponse {
    let post = &record.post;
    PostResponse {
        id: post.id,
        title: post.title.clone(),
        text: post.text.clone(),
        pub_date: post.pub_date,
        is_published: post.is_published,
        author: author(&record.author),
        category: record.category.as_ref().map(category),
        location: record.location.as_ref().map(location),
        comment_count,
        created_at: post.created_at,
    }
}

pub fn listed(item: ListedPost) -> PostResponse {
    post(&item.record, Some(item.comment_count))
}

pub fn stored_post(post: &Post) -> StoredPostResponse {
    StoredPostResponse {
        id: post.id,
        author_id: post.author_id,
        title: post.title.clone(),
        text: post.text.clone(),
        pub_date: post.pub_date,
        is_published: post.is_published,
        category_id: post.category_id,
        location_id: post.location_id,
        created_at: post.created_at,
    }
}

pub fn comment(comment: &Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        text: comment.text.clone(),
        author: None,
        author_id: comment.author_id,
        created_at: comment.created_at,
    }
}

pub fn comment_record(record: &CommentRecord) -> CommentResponse {
    CommentResponse {
        author: Some(author(&record.author)),
        ..comment(&record.comment)
    }
}

pub fn post_form(form: &PostForm) -> PostFormResponse {
    let fields = form.fields();
    PostFormResponse {
        post_id: form.post_id(),
        title: fields.title.clone(),
        text: fields.text.clone(),
        pub_date: fields.pub_date,
        is_published: fields.is_published,
        category_id: fields.category_id,
        location_id: fields.location_id,
        read_only: form.is_read_only(),
    }
}

pub fn page<T, U>(page: Page<T>, f: impl FnMut(T) -> U) -> PageResponse<U> {
    let has_next = page.has_next();
    let has_previous = page.has_previous();
    let page = page.map(f);

    PageResponse {
        items: page.items,
        number: page.number,
        num_pages: page.num_pages,
        total: page.total,
        page_size: page.page_size,
        has_next,
        has_previous,
    }
}

pub fn mutation<T, U>(completed: Completed<T>, f: impl FnOnce(&T) -> U) -> MutationResponse<U> {
    MutationResponse {
        data: f(&completed.entity),
        redirect: location_of(&completed.redirect),
    }
}
