pub mod users_handler;

pub use users_handler::{edit_user, list_users, remove_override, save_user_limits};
