pub mod predictions;
pub mod reset_keys;
pub mod root;
