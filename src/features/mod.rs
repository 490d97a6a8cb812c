pub mod auth;
pub mod voters;
