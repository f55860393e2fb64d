use serde::Serialize;
use uuid::Uuid;

/// Where the presentation layer should send the viewer next.
///
/// Core code only names the destination; turning it into a URL is up to
/// whoever renders the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "to", rename_all = "snake_case")]
pub enum Redirect {
    /// The external login flow.
    Login,
    /// The read-only detail view of a post.
    PostDetail { post_id: Uuid },
    /// A user's profile page.
    Profile { username: String },
}
