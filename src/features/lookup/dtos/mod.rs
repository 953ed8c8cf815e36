pub mod lookup_dto;

pub use lookup_dto::*;
