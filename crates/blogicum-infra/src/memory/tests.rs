use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use blogicum_core::DomainError;
use blogicum_core::error::RepoError;
use blogicum_core::domain::{
    Category, Comment, ListedPost, Location, Post, PostFields, ProfileFields, Redirect, User,
    Viewer,
};
use blogicum_core::pagination::PageNumber;
use blogicum_core::ports::{Clock, Repositories};
use blogicum_core::services::{BlogCommands, CommentQueries, Decision, Operation, Permit, PostQueries};

use super::InMemoryStore;
use crate::clock::FixedClock;

struct Fixture {
    repos: Repositories,
    now: DateTime<Utc>,
}

impl Fixture {
    fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            repos: store.repositories(),
            now: "2024-05-01T12:00:00Z".parse().unwrap(),
        }
    }

    fn clock(&self) -> Arc<dyn Clock> {
        Arc::new(FixedClock(self.now))
    }

    fn posts(&self) -> PostQueries {
        PostQueries::new(&self.repos, self.clock())
    }

    fn comments(&self) -> CommentQueries {
        CommentQueries::new(&self.repos)
    }

    fn commands(&self) -> BlogCommands {
        BlogCommands::new(&self.repos, self.clock())
    }

    async fn user(&self, username: &str) -> (User, Viewer) {
        let user = self
            .repos
            .users
            .insert(User::new(username, format!("{username}@example.com")))
            .await
            .unwrap();
        let viewer = Viewer::authenticated(user.id, username);
        (user, viewer)
    }

    async fn category(&self, slug: &str, is_published: bool) -> Category {
        self.repos
            .categories
            .insert(Category::new(slug.to_uppercase(), slug, is_published))
            .await
            .unwrap()
    }

    fn fields(&self, title: &str, age: Duration, category: Option<&Category>) -> PostFields {
        PostFields {
            title: title.to_string(),
            text: format!("{title} body"),
            pub_date: self.now - age,
            is_published: true,
            category_id: category.map(|c| c.id),
            location_id: None,
        }
    }

    async fn post(&self, author: &User, fields: PostFields) -> Post {
        self.repos
            .posts
            .insert(Post::new(author.id, fields, self.now))
            .await
            .unwrap()
    }

    async fn published(&self, author: &User, title: &str, category: Option<&Category>) -> Post {
        self.post(author, self.fields(title, Duration::hours(1), category))
            .await
    }

    async fn draft(&self, author: &User, title: &str) -> Post {
        let mut fields = self.fields(title, -Duration::days(7), None);
        fields.is_published = false;
        self.post(author, fields).await
    }

    async fn comment(&self, post: &Post, author: &User, minutes_ago: i64) -> Comment {
        self.repos
            .comments
            .insert(Comment::new(
                post.id,
                author.id,
                format!("comment by {}", author.username),
                self.now - Duration::minutes(minutes_ago),
            ))
            .await
            .unwrap()
    }
}

fn titles<'a>(items: impl IntoIterator<Item = &'a ListedPost>) -> Vec<String> {
    items
        .into_iter()
        .map(|p| p.record.post.title.clone())
        .collect()
}

// ---------------------------------------------------------------- listings

#[tokio::test]
async fn test_index_lists_only_publicly_visible_posts_newest_first() {
    let fx = Fixture::new();
    let (ada, _) = fx.user("ada").await;
    let open = fx.category("travel", true).await;
    let hidden = fx.category("secret", false).await;

    fx.post(&ada, fx.fields("old", Duration::days(3), Some(&open)))
        .await;
    fx.post(&ada, fx.fields("new", Duration::hours(2), None)).await;
    fx.post(&ada, fx.fields("scheduled", -Duration::hours(1), None))
        .await;
    fx.post(&ada, fx.fields("in hidden category", Duration::days(1), Some(&hidden)))
        .await;
    fx.draft(&ada, "draft").await;

    let page = fx.posts().list_index(PageNumber::FIRST).await.unwrap();

    assert_eq!(titles(&page.items), vec!["new", "old"]);
    assert_eq!(page.total, 2);
    assert_eq!(page.num_pages, 1);
}

#[tokio::test]
async fn test_listings_carry_comment_counts_and_relations() {
    let fx = Fixture::new();
    let (ada, _) = fx.user("ada").await;
    let (bob, _) = fx.user("bob").await;
    let travel = fx.category("travel", true).await;
    let harbour = fx
        .repos
        .locations
        .insert(Location::new("Harbour"))
        .await
        .unwrap();

    let mut fields = fx.fields("with location", Duration::hours(1), Some(&travel));
    fields.location_id = Some(harbour.id);
    let post = fx.post(&ada, fields).await;
    fx.comment(&post, &bob, 10).await;
    fx.comment(&post, &ada, 5).await;

    let page = fx.posts().list_index(PageNumber::FIRST).await.unwrap();
    let listed = &page.items[0];

    assert_eq!(listed.comment_count, 2);
    assert_eq!(listed.record.author.username, "ada");
    assert_eq!(listed.record.category.as_ref().map(|c| c.slug.as_str()), Some("travel"));
    assert_eq!(listed.record.location.as_ref().map(|l| l.name.as_str()), Some("Harbour"));
}

#[tokio::test]
async fn test_category_pages_of_ten_newest_first() {
    let fx = Fixture::new();
    let (ada, _) = fx.user("ada").await;
    let travel = fx.category("travel", true).await;
    for i in 0..12 {
        fx.post(&ada, fx.fields(&format!("post {i:02}"), Duration::hours(i + 1), Some(&travel)))
            .await;
    }

    let queries = fx.posts();
    let first = queries
        .list_by_category("travel", PageNumber::new(1))
        .await
        .unwrap();
    let second = queries
        .list_by_category("travel", PageNumber::new(2))
        .await
        .unwrap();

    assert_eq!(first.category.id, travel.id);
    assert_eq!(first.page.items.len(), 10);
    assert_eq!(first.page.num_pages, 2);
    assert_eq!(first.page.items[0].record.post.title, "post 00");
    assert!(
        first
            .page
            .items
            .windows(2)
            .all(|w| w[0].record.post.pub_date >= w[1].record.post.pub_date)
    );
    assert_eq!(titles(&second.page.items), vec!["post 10", "post 11"]);
}

#[tokio::test]
async fn test_out_of_range_pages_clamp_instead_of_failing() {
    let fx = Fixture::new();
    let (ada, _) = fx.user("ada").await;
    for i in 0..12 {
        fx.published(&ada, &format!("post {i}"), None).await;
    }
    let queries = fx.posts();

    let zero = queries.list_index(PageNumber::new(0)).await.unwrap();
    let huge = queries.list_index(PageNumber::new(500)).await.unwrap();

    assert_eq!(zero.number, 1);
    assert_eq!(zero.items.len(), 10);
    assert_eq!(huge.number, 2);
    assert_eq!(huge.items.len(), 2);
}

#[tokio::test]
async fn test_unpublished_category_is_not_found_not_empty() {
    let fx = Fixture::new();
    let (ada, _) = fx.user("ada").await;
    let secret = fx.category("secret", false).await;
    fx.published(&ada, "visible post", Some(&secret)).await;

    let hidden = fx
        .posts()
        .list_by_category("secret", PageNumber::FIRST)
        .await;
    let unknown = fx
        .posts()
        .list_by_category("nowhere", PageNumber::FIRST)
        .await;

    assert!(matches!(hidden, Err(DomainError::NotFound { .. })));
    assert!(matches!(unknown, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_category_slug_is_case_sensitive() {
    let fx = Fixture::new();
    fx.category("travel", true).await;

    let result = fx.posts().list_by_category("Travel", PageNumber::FIRST).await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_empty_published_category_is_an_empty_page() {
    let fx = Fixture::new();
    fx.category("travel", true).await;

    let listing = fx
        .posts()
        .list_by_category("travel", PageNumber::new(3))
        .await
        .unwrap();

    assert!(listing.page.items.is_empty());
    assert_eq!(listing.page.number, 1);
    assert_eq!(listing.page.num_pages, 1);
}

#[tokio::test]
async fn test_profile_shows_drafts_to_owner_only() {
    let fx = Fixture::new();
    let (ada, ada_viewer) = fx.user("ada").await;
    let (_, bob_viewer) = fx.user("bob").await;
    let hidden = fx.category("secret", false).await;
    fx.published(&ada, "public", None).await;
    fx.draft(&ada, "future draft").await;
    fx.post(&ada, fx.fields("hidden category", Duration::days(2), Some(&hidden)))
        .await;
    let queries = fx.posts();

    let own = queries
        .list_by_author("ada", &ada_viewer, PageNumber::FIRST)
        .await
        .unwrap();
    let other = queries
        .list_by_author("ada", &bob_viewer, PageNumber::FIRST)
        .await
        .unwrap();
    let anonymous = queries
        .list_by_author("ada", &Viewer::Anonymous, PageNumber::FIRST)
        .await
        .unwrap();

    assert!(own.is_owner);
    assert_eq!(own.profile.id, ada.id);
    assert_eq!(
        titles(&own.page.items),
        vec!["future draft", "public", "hidden category"]
    );
    assert!(!other.is_owner);
    assert_eq!(titles(&other.page.items), vec!["public"]);
    assert_eq!(titles(&anonymous.page.items), vec!["public"]);
}

#[tokio::test]
async fn test_profile_of_unknown_user_is_not_found() {
    let fx = Fixture::new();

    let result = fx
        .posts()
        .list_by_author("ghost", &Viewer::Anonymous, PageNumber::FIRST)
        .await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

// ------------------------------------------------------------------ detail

#[tokio::test]
async fn test_detail_hides_drafts_from_everyone_but_the_author() {
    let fx = Fixture::new();
    let (ada, ada_viewer) = fx.user("ada").await;
    let (_, bob_viewer) = fx.user("bob").await;
    let draft = fx.draft(&ada, "draft").await;
    let queries = fx.posts();

    let own = queries.get_detail(draft.id, &ada_viewer).await.unwrap();
    let other = queries.get_detail(draft.id, &bob_viewer).await;
    let anonymous = queries.get_detail(draft.id, &Viewer::Anonymous).await;

    assert_eq!(own.post.id, draft.id);
    assert!(matches!(other, Err(DomainError::NotFound { .. })));
    assert!(matches!(anonymous, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_detail_of_published_post_is_open_to_all() {
    let fx = Fixture::new();
    let (ada, ada_viewer) = fx.user("ada").await;
    let (_, bob_viewer) = fx.user("bob").await;
    let post = fx.published(&ada, "hello", None).await;
    let queries = fx.posts();

    for viewer in [ada_viewer, bob_viewer, Viewer::Anonymous] {
        let record = queries.get_detail(post.id, &viewer).await.unwrap();
        assert_eq!(record.post.id, post.id);
    }
}

#[tokio::test]
async fn test_detail_of_missing_post_is_not_found() {
    let fx = Fixture::new();
    let (_, viewer) = fx.user("ada").await;

    let result = fx.posts().get_detail(Uuid::new_v4(), &viewer).await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_comments_are_listed_oldest_first() {
    let fx = Fixture::new();
    let (ada, _) = fx.user("ada").await;
    let (bob, _) = fx.user("bob").await;
    let post = fx.published(&ada, "hello", None).await;
    let late = fx.comment(&post, &ada, 1).await;
    let early = fx.comment(&post, &bob, 30).await;

    let comments = fx.comments().list_for_post(post.id).await.unwrap();

    let ids: Vec<Uuid> = comments.iter().map(|c| c.comment.id).collect();
    assert_eq!(ids, vec![early.id, late.id]);
    assert_eq!(comments[0].author.username, "bob");
}

#[tokio::test]
async fn test_detail_bundles_comments() {
    let fx = Fixture::new();
    let (ada, _) = fx.user("ada").await;
    let (bob, _) = fx.user("bob").await;
    let post = fx.published(&ada, "hello", None).await;
    let comment = fx.comment(&post, &bob, 5).await;

    let detail = fx.posts().detail(post.id, &Viewer::Anonymous).await.unwrap();

    assert_eq!(detail.record.post.id, post.id);
    assert_eq!(detail.comments.len(), 1);
    assert_eq!(detail.comments[0].comment.id, comment.id);
}

// ---------------------------------------------------------- authorization

#[tokio::test]
async fn test_post_changes_by_role() {
    let fx = Fixture::new();
    let (ada, ada_viewer) = fx.user("ada").await;
    let (_, bob_viewer) = fx.user("bob").await;
    let post = fx.published(&ada, "hello", None).await;
    let commands = fx.commands();
    let gate = commands.gate();

    let anonymous = gate
        .authorize(&Viewer::Anonymous, Operation::UpdatePost { post_id: post.id })
        .await
        .unwrap();
    let stranger = gate
        .authorize(&bob_viewer, Operation::DeletePost { post_id: post.id })
        .await
        .unwrap();
    let owner = gate
        .authorize(&ada_viewer, Operation::UpdatePost { post_id: post.id })
        .await
        .unwrap();

    assert_eq!(anonymous, Decision::Rejected(Redirect::Login));
    assert_eq!(
        stranger,
        Decision::Rejected(Redirect::PostDetail { post_id: post.id })
    );
    assert_eq!(owner, Decision::Permitted(Permit::Post(post)));
}

#[tokio::test]
async fn test_missing_post_is_not_found_before_any_login_check() {
    let fx = Fixture::new();
    let commands = fx.commands();

    let result = commands
        .gate()
        .authorize(
            &Viewer::Anonymous,
            Operation::DeletePost {
                post_id: Uuid::new_v4(),
            },
        )
        .await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_missing_comment_is_not_found_before_any_login_check() {
    let fx = Fixture::new();
    let (ada, _) = fx.user("ada").await;
    let post = fx.published(&ada, "hello", None).await;
    let other = fx.published(&ada, "other", None).await;
    let comment = fx.comment(&post, &ada, 5).await;
    let commands = fx.commands();

    let missing = commands
        .delete_comment(&Viewer::Anonymous, post.id, Uuid::new_v4())
        .await;
    let misplaced = commands
        .update_comment(&Viewer::Anonymous, other.id, comment.id, "x".to_string())
        .await;
    let existing = commands
        .delete_comment(&Viewer::Anonymous, post.id, comment.id)
        .await;

    assert!(matches!(missing, Err(DomainError::NotFound { .. })));
    assert!(matches!(misplaced, Err(DomainError::NotFound { .. })));
    assert!(matches!(existing, Err(DomainError::Unauthenticated)));
}

#[tokio::test]
async fn test_rejections_surface_as_typed_errors() {
    let fx = Fixture::new();
    let (ada, _) = fx.user("ada").await;
    let (_, bob_viewer) = fx.user("bob").await;
    let post = fx.published(&ada, "hello", None).await;
    let commands = fx.commands();
    let edit = fx.fields("edited", Duration::hours(1), None);

    let anonymous = commands
        .update_post(&Viewer::Anonymous, post.id, edit.clone())
        .await;
    let stranger = commands.update_post(&bob_viewer, post.id, edit).await;

    assert!(matches!(anonymous, Err(DomainError::Unauthenticated)));
    match stranger {
        Err(DomainError::Forbidden { redirect }) => {
            assert_eq!(redirect, Redirect::PostDetail { post_id: post.id });
        }
        other => panic!("expected Forbidden, got {other:?}"),
    }
    let stored = fx.repos.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "hello");
}

#[tokio::test]
async fn test_comment_delete_by_author_then_stranger() {
    let fx = Fixture::new();
    let (ada, ada_viewer) = fx.user("ada").await;
    let (_, bob_viewer) = fx.user("bob").await;
    let post = fx.published(&ada, "hello", None).await;
    let comment = fx.comment(&post, &ada, 5).await;
    let commands = fx.commands();

    let stranger = commands
        .gate()
        .authorize(
            &bob_viewer,
            Operation::DeleteComment {
                post_id: post.id,
                comment_id: comment.id,
            },
        )
        .await;
    let owner = commands
        .gate()
        .authorize(
            &ada_viewer,
            Operation::DeleteComment {
                post_id: post.id,
                comment_id: comment.id,
            },
        )
        .await
        .unwrap();

    assert!(matches!(stranger, Err(DomainError::NotFound { .. })));
    assert_eq!(owner, Decision::Permitted(Permit::Comment(comment.clone())));

    let deleted = commands
        .delete_comment(&ada_viewer, post.id, comment.id)
        .await
        .unwrap();
    assert_eq!(deleted.redirect, Redirect::PostDetail { post_id: post.id });
    assert!(fx.comments().list_for_post(post.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_comment_changes_require_login() {
    let fx = Fixture::new();
    let (ada, _) = fx.user("ada").await;
    let post = fx.published(&ada, "hello", None).await;
    let comment = fx.comment(&post, &ada, 5).await;
    let commands = fx.commands();

    let result = commands
        .update_comment(&Viewer::Anonymous, post.id, comment.id, "x".to_string())
        .await;

    assert!(matches!(result, Err(DomainError::Unauthenticated)));
}

#[tokio::test]
async fn test_mutable_scope_is_exactly_own_comments() {
    let fx = Fixture::new();
    let (ada, ada_viewer) = fx.user("ada").await;
    let (bob, bob_viewer) = fx.user("bob").await;
    let post = fx.published(&ada, "hello", None).await;
    let mine = fx.comment(&post, &ada, 3).await;
    let theirs = fx.comment(&post, &bob, 2).await;
    let queries = fx.comments();

    let scope = queries.mutable_scope(&ada_viewer).await.unwrap();

    assert_eq!(scope, vec![mine]);
    assert!(matches!(
        queries.find_mutable(&ada_viewer, theirs.id).await,
        Err(DomainError::NotFound { .. })
    ));
    assert_eq!(
        queries.find_mutable(&bob_viewer, theirs.id).await.unwrap(),
        theirs
    );
    assert!(matches!(
        queries.mutable_scope(&Viewer::Anonymous).await,
        Err(DomainError::Unauthenticated)
    ));
}

#[tokio::test]
async fn test_comment_addressed_under_wrong_post_is_not_found() {
    let fx = Fixture::new();
    let (ada, ada_viewer) = fx.user("ada").await;
    let first = fx.published(&ada, "first", None).await;
    let second = fx.published(&ada, "second", None).await;
    let comment = fx.comment(&first, &ada, 5).await;

    let result = fx
        .commands()
        .update_comment(&ada_viewer, second.id, comment.id, "moved".to_string())
        .await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

// --------------------------------------------------------------- mutations

#[tokio::test]
async fn test_create_post_makes_viewer_the_author() {
    let fx = Fixture::new();
    let (ada, ada_viewer) = fx.user("ada").await;
    let commands = fx.commands();

    let created = commands
        .create_post(&ada_viewer, fx.fields("first", Duration::zero(), None))
        .await
        .unwrap();
    let anonymous = commands
        .create_post(&Viewer::Anonymous, fx.fields("nope", Duration::zero(), None))
        .await;

    assert_eq!(created.entity.author_id, ada.id);
    assert_eq!(created.entity.created_at, fx.now);
    assert_eq!(
        created.redirect,
        Redirect::Profile {
            username: "ada".to_string()
        }
    );
    assert!(matches!(anonymous, Err(DomainError::Unauthenticated)));
    assert!(matches!(
        commands.gate().authorize(&ada_viewer, Operation::CreatePost).await,
        Ok(Decision::Permitted(Permit::NewPost { author_id })) if author_id == ada.id
    ));
}

#[tokio::test]
async fn test_profile_redirects_follow_a_rename() {
    let fx = Fixture::new();
    let (_, ada_viewer) = fx.user("ada").await;
    let commands = fx.commands();

    commands
        .update_profile(
            &ada_viewer,
            ProfileFields {
                username: "countess".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                email: String::new(),
            },
        )
        .await
        .unwrap();

    // The viewer still carries the name it was issued with.
    let created = commands
        .create_post(&ada_viewer, fx.fields("after", Duration::zero(), None))
        .await
        .unwrap();
    let deleted = commands
        .delete_post(&ada_viewer, created.entity.id)
        .await
        .unwrap();

    let countess = Redirect::Profile {
        username: "countess".to_string(),
    };
    assert_eq!(created.redirect, countess);
    assert_eq!(deleted.redirect, countess);
    assert!(
        fx.posts()
            .list_by_author("countess", &ada_viewer, PageNumber::FIRST)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_create_post_validates_fields_and_references() {
    let fx = Fixture::new();
    let (_, ada_viewer) = fx.user("ada").await;
    let commands = fx.commands();

    let mut blank = fx.fields("x", Duration::zero(), None);
    blank.title = " ".to_string();
    let mut dangling = fx.fields("dangling", Duration::zero(), None);
    dangling.category_id = Some(Uuid::new_v4());

    assert!(matches!(
        commands.create_post(&ada_viewer, blank).await,
        Err(DomainError::Validation(_))
    ));
    assert!(matches!(
        commands.create_post(&ada_viewer, dangling).await,
        Err(DomainError::Validation(_))
    ));
}

#[tokio::test]
async fn test_update_keeps_author_and_last_write_wins() {
    let fx = Fixture::new();
    let (ada, ada_viewer) = fx.user("ada").await;
    let post = fx.published(&ada, "hello", None).await;
    let commands = fx.commands();

    let first = commands
        .update_post(&ada_viewer, post.id, fx.fields("first edit", Duration::hours(1), None))
        .await
        .unwrap();
    let second = commands
        .update_post(&ada_viewer, post.id, fx.fields("second edit", Duration::hours(1), None))
        .await
        .unwrap();

    assert_eq!(first.redirect, Redirect::PostDetail { post_id: post.id });
    assert_eq!(second.entity.author_id, ada.id);
    let stored = fx.repos.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "second edit");
    assert_eq!(stored.created_at, post.created_at);
}

#[tokio::test]
async fn test_edit_and_delete_forms() {
    let fx = Fixture::new();
    let (ada, ada_viewer) = fx.user("ada").await;
    let (_, bob_viewer) = fx.user("bob").await;
    let post = fx.published(&ada, "hello", None).await;
    let commands = fx.commands();

    let edit = commands.edit_post_form(&ada_viewer, post.id).await.unwrap();
    let confirm = commands
        .confirm_post_delete(&ada_viewer, post.id)
        .await
        .unwrap();
    let stranger = commands.confirm_post_delete(&bob_viewer, post.id).await;

    assert!(!edit.is_read_only());
    assert!(confirm.is_read_only());
    assert_eq!(confirm.fields(), &post.fields());
    assert!(matches!(stranger, Err(DomainError::Forbidden { .. })));
}

#[tokio::test]
async fn test_delete_post_takes_its_comments_along() {
    let fx = Fixture::new();
    let (ada, ada_viewer) = fx.user("ada").await;
    let (bob, _) = fx.user("bob").await;
    let post = fx.published(&ada, "hello", None).await;
    let comment = fx.comment(&post, &bob, 5).await;
    let commands = fx.commands();

    let deleted = commands.delete_post(&ada_viewer, post.id).await.unwrap();

    assert_eq!(
        deleted.redirect,
        Redirect::Profile {
            username: "ada".to_string()
        }
    );
    assert!(fx.repos.posts.find_by_id(post.id).await.unwrap().is_none());
    assert!(fx.repos.comments.find_by_id(comment.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_commenting_needs_a_readable_post() {
    let fx = Fixture::new();
    let (ada, ada_viewer) = fx.user("ada").await;
    let (_, bob_viewer) = fx.user("bob").await;
    let draft = fx.draft(&ada, "draft").await;
    let commands = fx.commands();

    let stranger = commands
        .create_comment(&bob_viewer, draft.id, "hi".to_string())
        .await;
    let author = commands
        .create_comment(&ada_viewer, draft.id, "note to self".to_string())
        .await
        .unwrap();
    let anonymous = commands
        .create_comment(&Viewer::Anonymous, draft.id, "hi".to_string())
        .await;
    let blank = commands
        .create_comment(&ada_viewer, draft.id, "  ".to_string())
        .await;

    assert!(matches!(stranger, Err(DomainError::NotFound { .. })));
    assert_eq!(author.entity.post_id, draft.id);
    assert_eq!(author.redirect, Redirect::PostDetail { post_id: draft.id });
    assert!(matches!(anonymous, Err(DomainError::Unauthenticated)));
    assert!(matches!(blank, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn test_update_profile() {
    let fx = Fixture::new();
    let (ada, ada_viewer) = fx.user("ada").await;
    fx.user("bob").await;
    let commands = fx.commands();
    let fields = |username: &str| ProfileFields {
        username: username.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
    };

    let taken = commands.update_profile(&ada_viewer, fields("bob")).await;
    let anonymous = commands
        .update_profile(&Viewer::Anonymous, fields("ada"))
        .await;
    let renamed = commands
        .update_profile(&ada_viewer, fields("countess"))
        .await
        .unwrap();

    assert!(matches!(taken, Err(DomainError::Duplicate(_))));
    assert!(matches!(anonymous, Err(DomainError::Unauthenticated)));
    assert_eq!(renamed.entity.id, ada.id);
    assert_eq!(
        renamed.redirect,
        Redirect::Profile {
            username: "countess".to_string()
        }
    );
}

// ------------------------------------------------------------------ store

#[tokio::test]
async fn test_dangling_reference_is_not_a_duplicate() {
    let fx = Fixture::new();

    let orphan = Post::new(
        Uuid::new_v4(),
        fx.fields("orphan", Duration::zero(), None),
        fx.now,
    );
    let result = fx.repos.posts.insert(orphan).await;

    assert!(matches!(result, Err(RepoError::Query(_))));
    assert!(!matches!(
        DomainError::from(result.unwrap_err()),
        DomainError::Duplicate(_)
    ));
}

#[tokio::test]
async fn test_store_enforces_unique_keys() {
    let fx = Fixture::new();
    fx.user("ada").await;
    fx.category("travel", true).await;

    let user = fx.repos.users.insert(User::new("ada", "other@example.com")).await;
    let category = fx
        .repos
        .categories
        .insert(Category::new("Travel again", "travel", true))
        .await;

    assert!(user.is_err());
    assert!(category.is_err());
}

#[tokio::test]
async fn test_deleting_a_category_detaches_its_posts() {
    let fx = Fixture::new();
    let (ada, _) = fx.user("ada").await;
    let travel = fx.category("travel", true).await;
    let post = fx.published(&ada, "hello", Some(&travel)).await;

    fx.repos.categories.delete(travel.id).await.unwrap();

    let stored = fx.repos.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.category_id, None);
}
