//! Application services: reads, authorization and writes.
//!
//! Presentation code calls these with an explicit [`Viewer`](crate::domain::Viewer);
//! none of them look at ambient request state.

mod commands;
mod comment_query;
mod gate;
mod post_query;

pub use commands::{BlogCommands, Completed};
pub use comment_query::CommentQueries;
pub use gate::{AuthorizationGate, Decision, Operation, Permit, check_owner};
pub use post_query::{CategoryListing, PostDetail, PostQueries, ProfileListing};
