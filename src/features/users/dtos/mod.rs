pub mod users_dto;

pub use users_dto::*;
