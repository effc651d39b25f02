//! Project entities and membership roles.

pub mod model;
pub mod role;

pub use model::{Project, ProjectMember};
pub use role::{MemberRole, ProjectRole};
