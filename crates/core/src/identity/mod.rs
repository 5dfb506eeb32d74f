mod error;
mod merge;
mod registry;
mod types;

pub use error::ValidationError;
pub use merge::{merge_roles, merge_users};
pub use registry::{AnyEntity, TagRegistry};
pub use types::{Role, User};
