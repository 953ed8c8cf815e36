pub mod lookup_handler;

pub use lookup_handler::{lookup_user, remove_limit, set_limit};
