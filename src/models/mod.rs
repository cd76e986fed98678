//! OpenProject API resource types.

mod activity;
mod attachment;
mod category;
mod common;
mod project;
mod query;
mod status;
mod user;
mod wiki_page;
mod work_package;

pub use activity::*;
pub use attachment::*;
pub use category::*;
pub use common::{Formattable, Link};
pub use project::*;
pub use query::*;
pub use status::*;
pub use user::*;
pub use wiki_page::*;
pub use work_package::*;
