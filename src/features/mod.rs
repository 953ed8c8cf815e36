pub mod auth;
pub mod limits;
pub mod lookup;
pub mod users;
