pub mod offboarding;
pub mod session;
pub mod tool;
pub mod user;
