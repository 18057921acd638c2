//! Domain logic - pure business rules independent of git operations

pub mod owners;
pub mod tag;
pub mod version;

pub use owners::CodeOwners;
pub use tag::{series_branch, v_prefix, MessageTemplate};
pub use version::{PreRelease, PreReleaseKind, Version};
