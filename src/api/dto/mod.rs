//! Data Transfer Objects for REST request/response serialization.

pub mod credential_dto;
pub mod system_dto;

pub use credential_dto::*;
pub use system_dto::*;
