//! Trait definitions for OpenProject operations.
//!
//! Each resource type implements the traits its endpoints support. The
//! traits differ only in the HTTP verb and in how the path is built; the
//! request plumbing lives in [`OpenProjectClient`](crate::OpenProjectClient).

mod create;
mod delete;
mod get;
mod list;

pub use create::Create;
pub use delete::Delete;
pub use get::Get;
pub use list::{List, LIST_ALL_PAGE_SIZE};
