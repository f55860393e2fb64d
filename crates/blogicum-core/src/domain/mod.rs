//! Domain entities - the core business objects.

mod category;
mod comment;
mod location;
mod post;
mod redirect;
mod user;
mod viewer;

pub use category::Category;
pub use comment::{Comment, CommentRecord};
pub use location::Location;
pub use post::{ListedPost, Post, PostFields, PostForm, PostRecord};
pub use redirect::Redirect;
pub use user::{ProfileFields, User};
pub use viewer::Viewer;
