pub mod attendance;
pub mod auth;
pub mod classes;
pub mod clubs;
pub mod core;
pub mod dashboard;
pub mod students;
pub mod users;
