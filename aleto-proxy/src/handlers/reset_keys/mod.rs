pub mod dto;
pub mod validate;
