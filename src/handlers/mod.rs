pub mod auth;
pub mod cloud;
