pub mod admin;
pub mod auth;
pub mod session;
pub mod users;
pub mod webhook;
